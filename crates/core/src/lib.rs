//! # Placements Core
//!
//! Core business logic for the placement locator.
//!
//! This crate maps hierarchical location paths (`/eu/de/berlin`) to the advertising placements
//! eligible there:
//! - Location normalisation to a canonical, lowercase, slash-separated form
//! - Parsing of uploaded placement definition files into an immutable index
//! - Atomic replacement of the served index and ancestor-chain lookups against it
//!
//! **No API concerns**: HTTP servers, multipart handling and wire types belong in `api-rest` and
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod index;
pub mod location;
pub mod placement;
pub mod service;

mod error;

pub use config::CoreConfig;
pub use error::{LocationError, PlacementError, PlacementResult};
pub use index::{build_index, IndexBuilder, LineError, LocationIndex, UploadOutcome};
pub use location::CanonicalLocation;
pub use placement::PlacementId;
pub use service::{LookupResult, PlacementService};
