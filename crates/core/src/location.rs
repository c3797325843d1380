//! Location normalisation.
//!
//! Every location that enters the index, and every location that is looked up, passes through
//! [`CanonicalLocation::parse`] first. The canonical form is:
//! - lowercase
//! - starts with `/`
//! - no empty segments (`//` never appears)
//! - no trailing `/`, except for the root `/` itself
//!
//! Two raw strings that normalise to the same value address the same index entry.

use crate::constants::LOCATION_SEPARATOR;
use crate::LocationError;

/// A location path in canonical form.
///
/// Only constructible via [`CanonicalLocation::parse`], so holding one is proof that the string
/// satisfies the canonical-form rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct CanonicalLocation(String);

impl CanonicalLocation {
    /// Normalises a raw location string.
    ///
    /// # Arguments
    ///
    /// * `raw` - The location as supplied by a client or an upload line.
    ///
    /// # Errors
    ///
    /// Returns `LocationError::Empty` for empty or whitespace-only input and
    /// `LocationError::MissingLeadingSlash` when the trimmed input does not start with `/`.
    pub fn parse(raw: &str) -> Result<Self, LocationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LocationError::Empty);
        }

        let lowered = trimmed.to_lowercase();
        if !lowered.starts_with(LOCATION_SEPARATOR) {
            return Err(LocationError::MissingLeadingSlash(trimmed.to_owned()));
        }

        let mut canonical = String::with_capacity(lowered.len());
        for c in lowered.chars() {
            if c == LOCATION_SEPARATOR && canonical.ends_with(LOCATION_SEPARATOR) {
                continue;
            }
            canonical.push(c);
        }

        if canonical.len() > 1 && canonical.ends_with(LOCATION_SEPARATOR) {
            canonical.pop();
        }

        Ok(Self(canonical))
    }

    /// Returns the canonical string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates this location followed by each of its proper ancestors, most specific first.
    ///
    /// Truncation happens at the last `/` for as long as that separator sits past index 0, so
    /// `/eu/de/berlin` yields `/eu/de/berlin`, `/eu/de`, `/eu`. The root `/` is never produced
    /// as an ancestor; it is only yielded when `self` is the root.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: Some(self.as_str()),
        }
    }
}

impl std::fmt::Display for CanonicalLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CanonicalLocation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Hash and Eq are derived from the inner `String`, so they agree with `str`.
impl std::borrow::Borrow<str> for CanonicalLocation {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Iterator over the ancestor chain of a [`CanonicalLocation`].
///
/// Yields borrowed prefixes of the canonical string; every yielded value is itself canonical.
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    next: Option<&'a str>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = match current.rfind(LOCATION_SEPARATOR) {
            Some(idx) if idx > 0 => Some(&current[..idx]),
            _ => None,
        };
        Some(current)
    }
}
