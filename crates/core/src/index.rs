//! Hierarchical location index.
//!
//! A [`LocationIndex`] maps canonical locations to the placements registered there. It is built
//! in one pass over an upload by [`IndexBuilder`] and is never mutated afterwards; replacing the
//! served index means building a new one and publishing it (see [`crate::PlacementService`]).
//!
//! ## Upload line protocol
//!
//! ```text
//! <placement-name>:<loc1>,<loc2>,...
//! # comment lines ignored
//! ```
//!
//! Blank lines are ignored. Each line must contain exactly one `:`. Location tokens that fail
//! normalisation are dropped; a line with an empty placement name or no surviving location is
//! reported as an error and skipped. A bad line never aborts the upload.

use std::collections::{BTreeSet, HashMap};

use crate::constants::{
    BYTE_ORDER_MARK, COMMENT_PREFIX, FIELD_SEPARATOR, LOCATION_LIST_SEPARATOR, NO_DATA_WARNING,
};
use crate::{CanonicalLocation, PlacementId};

/// Immutable mapping from canonical location to the placements registered at it.
///
/// Every stored set is non-empty; a location without placements is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationIndex {
    entries: HashMap<CanonicalLocation, BTreeSet<PlacementId>>,
}

impl LocationIndex {
    /// Number of distinct locations in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Placements registered at exactly `location`, without ancestor matching.
    #[cfg(test)]
    pub fn placements_at(&self, location: &str) -> Option<&BTreeSet<PlacementId>> {
        self.entries.get(location)
    }

    /// Placements visible at `location`: the union of the sets registered at every element of
    /// its ancestor chain, sorted and deduplicated.
    pub fn lookup(&self, location: &CanonicalLocation) -> Vec<PlacementId> {
        let mut visible = BTreeSet::new();
        for prefix in location.ancestors() {
            if let Some(placements) = self.entries.get(prefix) {
                visible.extend(placements.iter().cloned());
            }
        }
        visible.into_iter().collect()
    }

    /// Iterates the stored locations in no particular order.
    #[cfg(test)]
    pub fn locations(&self) -> impl Iterator<Item = &CanonicalLocation> {
        self.entries.keys()
    }
}

/// Summary of one upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct UploadOutcome {
    /// Lines that contributed at least one placement/location pair.
    pub processed_lines: usize,
    /// Distinct locations in the index built from this upload.
    pub distinct_locations: usize,
    /// One message per rejected line, in line order.
    pub errors: Vec<String>,
    /// Set when no line was usable.
    pub warning: Option<String>,
}

/// Why an upload line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("malformed line, expected <placement>:<locations>")]
    Malformed,
    #[error("no placement or valid location")]
    NoData,
}

/// A single accepted upload line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub placement: PlacementId,
    pub locations: Vec<CanonicalLocation>,
}

/// Parses one raw upload line.
///
/// Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// * `LineError::Malformed` - the line does not contain exactly one `:`.
/// * `LineError::NoData` - the placement name is blank or no location token normalises.
pub fn parse_line(line: &str) -> Result<Option<ParsedLine>, LineError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
        return Ok(None);
    }

    let mut fields = line.split(FIELD_SEPARATOR);
    let (Some(placement), Some(locations), None) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(LineError::Malformed);
    };

    let locations: Vec<CanonicalLocation> = locations
        .split(LOCATION_LIST_SEPARATOR)
        .filter_map(|token| match CanonicalLocation::parse(token) {
            Ok(location) => Some(location),
            Err(e) => {
                tracing::debug!("dropping location token {:?}: {}", token, e);
                None
            }
        })
        .collect();

    match PlacementId::new(placement) {
        Some(placement) if !locations.is_empty() => Ok(Some(ParsedLine {
            placement,
            locations,
        })),
        _ => Err(LineError::NoData),
    }
}

/// Accumulates a candidate [`LocationIndex`] from upload lines.
///
/// The builder is private to one upload; nothing is visible to lookups until the finished index
/// is published.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    entries: HashMap<CanonicalLocation, BTreeSet<PlacementId>>,
    line_number: usize,
    processed_lines: usize,
    errors: Vec<String>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next raw line of the upload.
    ///
    /// A UTF-8 byte-order mark at the very start of the upload is ignored.
    pub fn push_line(&mut self, line: &str) {
        let line = if self.line_number == 0 {
            line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(line)
        } else {
            line
        };
        self.line_number += 1;

        match parse_line(line) {
            Ok(None) => {}
            Ok(Some(parsed)) => {
                for location in parsed.locations {
                    self.entries
                        .entry(location)
                        .or_default()
                        .insert(parsed.placement.clone());
                }
                self.processed_lines += 1;
            }
            Err(e) => {
                tracing::debug!("skipping upload line {}: {}", self.line_number, e);
                self.errors
                    .push(format!("line {}: {}: {}", self.line_number, e, line.trim()));
            }
        }
    }

    /// Completes the build, returning the index and the upload summary.
    pub fn finish(self) -> (LocationIndex, UploadOutcome) {
        let index = LocationIndex {
            entries: self.entries,
        };
        let warning = (self.processed_lines == 0).then(|| NO_DATA_WARNING.to_owned());
        let outcome = UploadOutcome {
            processed_lines: self.processed_lines,
            distinct_locations: index.len(),
            errors: self.errors,
            warning,
        };
        (index, outcome)
    }
}

/// Builds an index from a complete upload text.
pub fn build_index(text: &str) -> (LocationIndex, UploadOutcome) {
    let mut builder = IndexBuilder::new();
    for line in text.lines() {
        builder.push_line(line);
    }
    builder.finish()
}
