//! Constants used throughout the placements core crate.
//!
//! Keeps the upload line protocol and configuration defaults in one place.

/// Separator between location path segments.
pub const LOCATION_SEPARATOR: char = '/';

/// Separator between the placement name and its location list in an upload line.
pub const FIELD_SEPARATOR: char = ':';

/// Separator between locations in an upload line.
pub const LOCATION_LIST_SEPARATOR: char = ',';

/// Prefix marking an upload line as a comment.
pub const COMMENT_PREFIX: char = '#';

/// UTF-8 byte-order mark some editors write at the start of a text file.
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// Warning attached to an upload that produced no usable lines.
pub const NO_DATA_WARNING: &str = "upload contains no usable placement lines";

/// Default request body limit for uploads (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
