//! Error types for ampsweep-core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("duplicate {kind} designator: {name}")]
    DuplicateDesignator { kind: &'static str, name: String },

    #[error("invalid designator {name}: {kind} names must start with '{prefix}'")]
    InvalidDesignator {
        kind: &'static str,
        name: String,
        prefix: char,
    },

    #[error("{element} references undeclared node {node}")]
    DanglingNode { element: String, node: String },

    #[error("{element} references unknown model {model}")]
    UnknownModel { element: String, model: String },

    #[error("invalid value for {element}: {reason}")]
    InvalidValue { element: String, reason: String },

    #[error("invalid sweep: {0}")]
    InvalidSweep(String),

    #[error("length mismatch: {what} has {actual} points, expected {expected}")]
    LengthMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// The simulation backend failed; carries the backend's own message.
    #[error("{backend} simulation failed: {message}")]
    Simulation { backend: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
