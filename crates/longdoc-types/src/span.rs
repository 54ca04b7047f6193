//! Token and subword spans.
//!
//! Both kinds of span are half-open byte ranges over the same document text.
//! Tokens come from the linguistic segmentation source; subwords come from
//! the embedding model's own tokenizer. The two segmentations are
//! independent and reconciled by the aligner.

use serde::{Deserialize, Serialize};

/// A linguistic token span supplied by the upstream segmentation source.
///
/// Tokens arrive in left-to-right, non-overlapping order with
/// `byte_start < byte_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Byte offset of the first byte of the token
    pub byte_start: usize,
    /// Byte offset one past the last byte of the token
    pub byte_end: usize,
}

impl Token {
    /// Create a new token span.
    pub fn new(byte_start: usize, byte_end: usize) -> Self {
        Self {
            byte_start,
            byte_end,
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.byte_end.saturating_sub(self.byte_start)
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.byte_end <= self.byte_start
    }

    /// Whether this token's byte range intersects the given half-open range.
    pub fn intersects(&self, start: usize, end: usize) -> bool {
        start < self.byte_end && end > self.byte_start
    }
}

/// A subword unit produced by the embedding model's tokenizer.
///
/// Subwords are produced in order; their positions in the tokenizer output
/// form the dense index space `0..S` the window planner operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subword {
    /// Vocabulary id of the subword
    pub id: u32,
    /// Byte offset of the first byte of the subword
    pub byte_start: usize,
    /// Byte offset one past the last byte of the subword
    pub byte_end: usize,
}

impl Subword {
    /// Create a new subword.
    pub fn new(id: u32, byte_start: usize, byte_end: usize) -> Self {
        Self {
            id,
            byte_start,
            byte_end,
        }
    }

    /// Whether this subword's byte range intersects the given token.
    pub fn intersects(&self, token: &Token) -> bool {
        self.byte_start < token.byte_end && self.byte_end > token.byte_start
    }
}
