//! # longdoc-pipeline
//!
//! Produces one fixed-size vector per linguistic token for documents whose
//! subword length exceeds what the embedding model can process in a single
//! pass.
//!
//! The pipeline runs five stages in strict sequence per document:
//! 1. Align externally supplied tokens to the model tokenizer's subwords
//!    by byte offsets ([`align::align_tokens`])
//! 2. Partition the subword range into overlapping windows snapped to
//!    token boundaries ([`window::plan_windows`])
//! 3. Batch windows, pad, and run the encoder ([`batch::embed_windows`])
//! 4. Average the overlapping predictions per subword
//!    ([`reduce::merge_occurrences`])
//! 5. Pool subword vectors into one vector per token
//!    ([`pool::pool_tokens`])
//!
//! [`TokenEmbeddingPipeline`] composes all five; each intermediate
//! structure is owned by one invocation and discarded afterwards.

pub mod align;
pub mod batch;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod pool;
pub mod reduce;
pub mod window;

pub use align::align_tokens;
pub use batch::{embed_windows, RawOccurrence};
pub use config::{PipelineConfig, WindowSize};
pub use error::PipelineError;
pub use pipeline::TokenEmbeddingPipeline;
pub use pool::pool_tokens;
pub use reduce::merge_occurrences;
pub use window::plan_windows;
