//! Model adapter error types.

use thiserror::Error;

/// Errors that can occur in the tokenizer and encoder adapters.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Candle model error
    #[error("Candle error: {0}")]
    Candle(#[from] candle_core::Error),

    /// Tokenizer error
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Model file not found
    #[error("Model file not found: {0}")]
    ModelNotFound(String),

    /// Download error
    #[error("Failed to download model: {0}")]
    Download(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input wider than the model supports
    #[error("Input width {width} exceeds model maximum {max}")]
    InputTooWide { width: usize, max: usize },
}
