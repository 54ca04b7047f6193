//! # longdoc-model
//!
//! External-collaborator adapters for the long-document embedding pipeline.
//!
//! The pipeline consumes two interfaces defined here:
//! - [`SubwordTokenizer`]: raw text to ordered subwords with byte offsets
//! - [`SequenceEncoder`]: padded id batches to per-position hidden states
//!
//! ## Features
//! - Local inference via Candle (no Python, no API)
//! - Offset-mapped tokenization via the HuggingFace `tokenizers` crate
//! - Model file resolution with on-demand fetching from HuggingFace Hub
//! - Deterministic mock encoder and tokenizer for tests

pub mod encoder;
pub mod error;
pub mod mock;
pub mod source;
pub mod tokenizer;

pub use encoder::{BertEncoder, EncoderInfo, SequenceEncoder};
pub use error::ModelError;
pub use mock::{MockEncoder, MockTokenizer};
pub use source::{ModelPaths, ModelSource, DEFAULT_MODEL_REPO};
pub use tokenizer::{HfTokenizer, SubwordTokenizer};
