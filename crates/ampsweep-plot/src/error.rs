//! Error types for ampsweep-plot.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("nothing to plot: {0}")]
    Empty(String),

    #[error("trace {label} does not share the plot's frequency axis")]
    MismatchedAxis { label: String },

    #[error("cannot plot on a log axis: {0}")]
    InvalidAxis(String),

    /// Error raised by the drawing backend.
    #[error("drawing failed: {0}")]
    Drawing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
