//! Request and response bodies exchanged with API clients.
//!
//! Field names are snake_case on the wire. Conversions from the core result types live here so
//! every API surface renders outcomes identically.

use placements_core::{LookupResult, UploadOutcome};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    /// Distinct locations in the currently served index
    pub distinct_locations: usize,
}

/// Error body returned with every 4xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Multipart form accepted by the upload endpoint.
#[derive(Debug, ToSchema)]
pub struct UploadReq {
    /// Placement definition file, one `<placement>:<loc1>,<loc2>` entry per line
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadRes {
    /// Always true once the file was read; per-line problems are listed in `errors`
    pub success: bool,
    pub processed_lines: usize,
    pub distinct_locations: usize,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub warning: Option<String>,
}

impl From<UploadOutcome> for UploadRes {
    fn from(outcome: UploadOutcome) -> Self {
        Self {
            success: true,
            processed_lines: outcome.processed_lines,
            distinct_locations: outcome.distinct_locations,
            errors: outcome.errors,
            warning: outcome.warning,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchReq {
    /// Location to search, e.g. `/eu/de/berlin`
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchRes {
    /// The queried location in canonical form
    pub location: String,
    /// Placements visible at the location, sorted
    pub placements: Vec<String>,
}

impl From<LookupResult> for SearchRes {
    fn from(result: LookupResult) -> Self {
        Self {
            location: result.location.as_str().to_owned(),
            placements: result
                .placements
                .into_iter()
                .map(|p| p.into_string())
                .collect(),
        }
    }
}
