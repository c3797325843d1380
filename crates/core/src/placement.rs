/// An advertising placement identifier.
///
/// Placement names are case-insensitive, so the stored form is always trimmed and lowercased.
/// `ACME` and `acme` construct equal values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct PlacementId(String);

impl PlacementId {
    /// Creates a placement id from a raw name.
    ///
    /// Returns `None` if the name is empty after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PlacementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PlacementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_id_is_case_insensitive() {
        assert_eq!(PlacementId::new("ACME"), PlacementId::new(" acme "));
    }

    #[test]
    fn test_placement_id_rejects_blank() {
        assert!(PlacementId::new("").is_none());
        assert!(PlacementId::new("   ").is_none());
    }
}
