//! Error types for firegrid.

use thiserror::Error;

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FiregridError>;

/// Errors produced by the coverage engine.
///
/// Only boundary conditions are errors here. Query-time conditions such as
/// an empty index or a degenerate polygon degrade to documented sentinel
/// values (`None`, `+inf`, `0`) instead.
#[derive(Debug, Error)]
pub enum FiregridError {
    /// Input failed validation (missing or unparseable coordinates,
    /// unsupported geometry kind, invalid configuration).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The worker thread has shut down and can no longer accept requests.
    #[error("Engine is closed")]
    EngineClosed,

    /// Catch-all for conditions that do not fit the variants above.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for FiregridError {
    fn from(err: serde_json::Error) -> Self {
        FiregridError::Serialization(err.to_string())
    }
}
