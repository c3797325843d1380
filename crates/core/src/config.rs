//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the services and the
//! HTTP layer, so request handling never reads process-wide environment variables.

use crate::constants::DEFAULT_MAX_UPLOAD_BYTES;
use crate::{PlacementError, PlacementResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    max_upload_bytes: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `PlacementError::InvalidInput` if `max_upload_bytes` is zero.
    pub fn new(max_upload_bytes: usize) -> PlacementResult<Self> {
        if max_upload_bytes == 0 {
            return Err(PlacementError::InvalidInput(
                "max_upload_bytes must be greater than zero".into(),
            ));
        }

        Ok(Self { max_upload_bytes })
    }

    /// Largest accepted upload body, in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Parse the upload size limit from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_MAX_UPLOAD_BYTES`].
pub fn max_upload_bytes_from_env_value(value: Option<String>) -> PlacementResult<usize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(value) = value else {
        return Ok(DEFAULT_MAX_UPLOAD_BYTES);
    };

    match value.parse::<usize>() {
        Ok(0) | Err(_) => Err(PlacementError::InvalidInput(format!(
            "upload size limit must be a positive integer, got {:?}",
            value
        ))),
        Ok(bytes) => Ok(bytes),
    }
}
