/// Reasons a raw location string cannot be turned into a canonical location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// The input was empty or contained only whitespace
    #[error("location cannot be empty")]
    Empty,
    /// The trimmed input did not begin with `/`
    #[error("location must start with '/': {0}")]
    MissingLeadingSlash(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid location: {0}")]
    InvalidLocation(#[from] LocationError),
    #[error("failed to read upload: {0}")]
    UploadRead(std::io::Error),
}

pub type PlacementResult<T> = std::result::Result<T, PlacementError>;
