//! # longdoc-types
//!
//! Shared domain types for the long-document token embedding pipeline.
//!
//! This crate defines the core data structures passed between pipeline
//! stages:
//! - Spans: linguistic tokens and subword units with byte offsets
//! - Windows: bounded runs of subword indices submitted per inference call
//! - Alignment: which subwords belong to which token
//! - Pooling: strategies for collapsing subword vectors into token vectors
//! - Output: the per-token embedding table handed downstream
//!
//! All spans are half-open byte ranges `[start, end)` over the same text.

pub mod alignment;
pub mod output;
pub mod pooling;
pub mod span;
pub mod window;

pub use alignment::Alignment;
pub use output::TokenEmbeddings;
pub use pooling::{PoolingStrategy, UnknownPoolingStrategy};
pub use span::{Subword, Token};
pub use window::Window;
