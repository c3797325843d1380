//! Placement service: the published index plus the two operations callers use.
//!
//! The currently served [`LocationIndex`] sits behind an [`ArcSwap`]. Uploads build a candidate
//! index privately and publish it with a single `store`; lookups `load` whichever snapshot is
//! current and never wait on a writer. A superseded snapshot is dropped once the last lookup
//! holding it finishes.

use std::io::BufRead;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::index::{build_index, IndexBuilder, LocationIndex, UploadOutcome};
use crate::{CanonicalLocation, PlacementError, PlacementId, PlacementResult};

/// Placements visible at a location.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LookupResult {
    /// The queried location in canonical form.
    pub location: CanonicalLocation,
    /// Sorted, deduplicated placement ids.
    pub placements: Vec<PlacementId>,
}

/// Owns the published index. Clones share the same slot.
#[derive(Clone, Default)]
pub struct PlacementService {
    current: Arc<ArcSwap<LocationIndex>>,
}

impl PlacementService {
    /// Creates a service serving an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the served index with one built from `text`.
    ///
    /// Malformed lines are reported in the returned outcome and never abort the upload. The new
    /// index is published even when no line was usable, in which case the outcome carries a
    /// warning and the service serves an empty index.
    pub fn replace_index(&self, text: &str) -> UploadOutcome {
        let (index, outcome) = build_index(text);
        self.publish(index, &outcome);
        outcome
    }

    /// Replaces the served index with one built from a line-oriented reader.
    ///
    /// # Errors
    ///
    /// Returns `PlacementError::UploadRead` if the reader fails or yields invalid UTF-8. Nothing
    /// is published in that case and the previous index keeps serving.
    pub fn replace_index_from_reader<R: BufRead>(
        &self,
        reader: R,
    ) -> PlacementResult<UploadOutcome> {
        let mut builder = IndexBuilder::new();
        for line in reader.lines() {
            let line = line.map_err(|e| {
                tracing::error!("upload stream unreadable, keeping current index: {}", e);
                PlacementError::UploadRead(e)
            })?;
            builder.push_line(&line);
        }

        let (index, outcome) = builder.finish();
        self.publish(index, &outcome);
        Ok(outcome)
    }

    /// Returns the placements visible at `raw_location` in the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns `PlacementError::InvalidLocation` if `raw_location` does not normalise. The index
    /// is not consulted in that case.
    pub fn lookup(&self, raw_location: &str) -> PlacementResult<LookupResult> {
        let location = CanonicalLocation::parse(raw_location)?;
        let placements = self.current.load().lookup(&location);
        Ok(LookupResult {
            location,
            placements,
        })
    }

    /// Returns the currently published snapshot.
    pub fn snapshot(&self) -> Arc<LocationIndex> {
        self.current.load_full()
    }

    fn publish(&self, index: LocationIndex, outcome: &UploadOutcome) {
        self.current.store(Arc::new(index));

        if let Some(warning) = &outcome.warning {
            tracing::warn!("published empty placement index: {}", warning);
        }
        tracing::info!(
            "published placement index: {} lines processed, {} locations, {} errors",
            outcome.processed_lines,
            outcome.distinct_locations,
            outcome.errors.len()
        );
    }
}

impl std::fmt::Debug for PlacementService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacementService")
            .field("distinct_locations", &self.current.load().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocationError;
    use std::io::{self, BufReader, Read};

    fn placements(service: &PlacementService, raw: &str) -> Vec<String> {
        service
            .lookup(raw)
            .expect("valid location")
            .placements
            .into_iter()
            .map(PlacementId::into_string)
            .collect()
    }

    /// Reader that yields some good bytes and then fails.
    struct BrokenReader {
        served: bool,
    }

    impl Read for BrokenReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::Other, "connection reset"));
            }
            self.served = true;
            let data = b"other:/us\n";
            buf[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }
    }

    #[test]
    fn test_new_service_serves_empty_index() {
        let service = PlacementService::new();
        assert!(service.snapshot().is_empty());
        assert!(placements(&service, "/eu").is_empty());
    }

    #[test]
    fn test_lookup_returns_canonical_location() {
        let service = PlacementService::new();
        service.replace_index("acme:/eu/de/berlin,/eu/fr");
        let result = service.lookup(" /EU//De/Berlin/Mitte/ ").unwrap();
        assert_eq!(result.location.as_str(), "/eu/de/berlin/mitte");
        assert_eq!(result.placements, vec![PlacementId::new("acme").unwrap()]);
    }

    #[test]
    fn test_lookup_rejects_invalid_location() {
        let service = PlacementService::new();
        service.replace_index("acme:/eu");

        let err = service.lookup("not-a-path").expect_err("should reject");
        assert!(matches!(
            err,
            PlacementError::InvalidLocation(LocationError::MissingLeadingSlash(_))
        ));

        let err = service.lookup("   ").expect_err("should reject");
        assert!(matches!(
            err,
            PlacementError::InvalidLocation(LocationError::Empty)
        ));
    }

    #[test]
    fn test_replace_index_is_full_replace() {
        let service = PlacementService::new();
        service.replace_index("acme:/eu\nbeta:/us");
        assert_eq!(placements(&service, "/eu/de"), vec!["acme"]);

        let outcome = service.replace_index("gamma:/asia");
        assert_eq!(outcome.processed_lines, 1);
        assert!(placements(&service, "/eu/de").is_empty());
        assert!(placements(&service, "/us").is_empty());
        assert_eq!(placements(&service, "/asia/jp"), vec!["gamma"]);
    }

    #[test]
    fn test_replace_index_without_data_empties_index() {
        let service = PlacementService::new();
        service.replace_index("acme:/eu");

        let outcome = service.replace_index("# nothing here\n\nbroken");
        assert_eq!(outcome.processed_lines, 0);
        assert!(outcome.warning.is_some());
        assert_eq!(outcome.errors.len(), 1);
        assert!(service.snapshot().is_empty());
        assert!(placements(&service, "/eu").is_empty());
    }

    #[test]
    fn test_replace_index_from_reader() {
        let service = PlacementService::new();
        let outcome = service
            .replace_index_from_reader("acme:/eu\r\nbeta:/eu/de\r\n".as_bytes())
            .unwrap();
        assert_eq!(outcome.processed_lines, 2);
        assert_eq!(placements(&service, "/eu/de"), vec!["acme", "beta"]);
    }

    #[test]
    fn test_reader_upload_strips_byte_order_mark() {
        let service = PlacementService::new();
        let outcome = service
            .replace_index_from_reader("\u{feff}ACME:/eu\n".as_bytes())
            .unwrap();
        assert!(outcome.errors.is_empty());
        assert_eq!(placements(&service, "/eu"), vec!["acme"]);

        let outcome = service
            .replace_index_from_reader("\u{feff}# header\nacme:/eu\n".as_bytes())
            .unwrap();
        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.processed_lines, 1);
    }

    #[test]
    fn test_replace_index_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("placements.txt");
        std::fs::write(&path, "# sites\nacme:/eu/de/berlin,/eu/fr\n").unwrap();

        let service = PlacementService::new();
        let file = std::fs::File::open(&path).unwrap();
        let outcome = service
            .replace_index_from_reader(BufReader::new(file))
            .unwrap();
        assert_eq!(outcome.distinct_locations, 2);
        assert_eq!(placements(&service, "/eu/fr/paris"), vec!["acme"]);
    }

    #[test]
    fn test_unreadable_upload_keeps_previous_index() {
        let service = PlacementService::new();
        service.replace_index("acme:/eu");

        let err = service
            .replace_index_from_reader(BufReader::new(BrokenReader { served: false }))
            .expect_err("should fail");
        assert!(matches!(err, PlacementError::UploadRead(_)));
        assert_eq!(placements(&service, "/eu"), vec!["acme"]);
        assert!(placements(&service, "/us").is_empty());
    }

    #[test]
    fn test_invalid_utf8_upload_keeps_previous_index() {
        let service = PlacementService::new();
        service.replace_index("acme:/eu");

        let bytes: &[u8] = b"beta:/eu\n\xff\xfe:/us\n";
        let err = service
            .replace_index_from_reader(bytes)
            .expect_err("should fail");
        assert!(matches!(err, PlacementError::UploadRead(_)));
        assert_eq!(placements(&service, "/eu"), vec!["acme"]);
    }

    #[test]
    fn test_clones_share_published_index() {
        let service = PlacementService::new();
        let other = service.clone();
        service.replace_index("acme:/eu");
        assert_eq!(placements(&other, "/eu"), vec!["acme"]);
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let service = PlacementService::new();
        service.replace_index("acme:/eu");
        let old = service.snapshot();

        service.replace_index("beta:/us");
        assert!(old.placements_at("/eu").is_some());
        assert!(service.snapshot().placements_at("/eu").is_none());
    }

    #[test]
    fn test_concurrent_lookups_see_whole_snapshots() {
        let first: String = (0..200).map(|i| format!("first{i}:/eu/de\n")).collect();
        let second: String = (0..200).map(|i| format!("second{i}:/eu\n")).collect();

        let service = PlacementService::new();
        service.replace_index(&first);

        let expected_first = placements(&service, "/eu/de/berlin");
        let expected_second = {
            let probe = PlacementService::new();
            probe.replace_index(&second);
            placements(&probe, "/eu/de/berlin")
        };

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let service = service.clone();
                let expected_first = &expected_first;
                let expected_second = &expected_second;
                scope.spawn(move || {
                    for _ in 0..500 {
                        let seen = placements(&service, "/eu/de/berlin");
                        assert!(
                            seen == *expected_first || seen == *expected_second,
                            "lookup observed a mixed snapshot"
                        );
                    }
                });
            }

            scope.spawn(|| {
                for round in 0..50 {
                    if round % 2 == 0 {
                        service.replace_index(&second);
                    } else {
                        service.replace_index(&first);
                    }
                }
            });
        });
    }
}
