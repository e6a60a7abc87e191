//! Error types for the ngspice backend.

use thiserror::Error;

/// Result type for ngspice operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving ngspice.
#[derive(Debug, Error)]
pub enum Error {
    /// ngspice is not installed or not found in PATH.
    #[error("ngspice not found: {0}")]
    NgspiceNotFound(String),

    /// ngspice execution failed.
    #[error("ngspice execution failed: {0}")]
    NgspiceExecutionFailed(String),

    /// ngspice timed out.
    #[error("ngspice timed out after {0} seconds")]
    NgspiceTimeout(u64),

    /// Failed to parse ngspice rawfile.
    #[error("failed to parse rawfile: {0}")]
    RawfileParseError(String),

    /// The rawfile holds a different analysis than the one requested.
    #[error("analysis type mismatch: expected {expected}, got {actual}")]
    AnalysisTypeMismatch { expected: String, actual: String },

    /// The circuit or sweep was rejected before reaching ngspice.
    #[error(transparent)]
    Circuit(#[from] ampsweep_core::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Temp file error.
    #[error("temp file error: {0}")]
    TempFile(String),
}

impl From<Error> for ampsweep_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Circuit(inner) => inner,
            other => ampsweep_core::Error::Simulation {
                backend: "ngspice".to_string(),
                message: other.to_string(),
            },
        }
    }
}
