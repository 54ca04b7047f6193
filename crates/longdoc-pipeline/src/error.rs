//! Pipeline error types.
//!
//! Every variant is fatal for the current document only; the caller
//! decides whether to continue with the next document.

use thiserror::Error;

use longdoc_model::ModelError;
use longdoc_types::UnknownPoolingStrategy;

/// Errors that can occur while embedding a document.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid configuration, rejected before any model call
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Window planning failed to cover the subword range
    #[error("Window planning stalled: cursor stuck at subword {cursor}")]
    Planning {
        /// Cursor position at which planning could not advance
        cursor: usize,
    },

    /// A subword index received no raw embedding from any window
    #[error("Coverage violation: subword {subword_index} has no raw occurrence")]
    Coverage {
        /// Index with zero occurrences
        subword_index: usize,
    },

    /// Vector length disagrees with the model's hidden dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// External model call failed; propagated unchanged, never retried here
    #[error("Embedding model error: {0}")]
    Model(#[from] ModelError),
}

impl From<UnknownPoolingStrategy> for PipelineError {
    fn from(err: UnknownPoolingStrategy) -> Self {
        PipelineError::Config(err.to_string())
    }
}
