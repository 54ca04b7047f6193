//! Token-to-subword alignment table.
//!
//! Stores, for each token, the ordered set of subword indices whose byte
//! range intersects the token's byte range. Backed by a single index arena
//! with per-token `(offset, len)` ranges rather than a vector of vectors,
//! so a document's whole alignment lives in two flat allocations.

use serde::{Deserialize, Serialize};

/// Alignment from token index to ordered subword indices.
///
/// A token may map to zero subwords (degenerate or whitespace-only span)
/// or to many (multi-subword word). A subword spanning several tokens
/// appears in the range of every token it intersects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    /// Flat arena of subword indices, token ranges concatenated in order
    indices: Vec<usize>,
    /// Per-token `(offset, len)` into the arena
    ranges: Vec<(usize, usize)>,
}

impl Alignment {
    /// Create an empty alignment with capacity for `token_count` tokens.
    pub fn with_capacity(token_count: usize) -> Self {
        Self {
            indices: Vec::new(),
            ranges: Vec::with_capacity(token_count),
        }
    }

    /// Append the subword indices for the next token.
    ///
    /// Tokens must be pushed in token order; an empty slice records a token
    /// with no aligned subwords.
    pub fn push_token(&mut self, subword_indices: &[usize]) {
        let offset = self.indices.len();
        self.indices.extend_from_slice(subword_indices);
        self.ranges.push((offset, subword_indices.len()));
    }

    /// Number of tokens in the alignment.
    pub fn token_count(&self) -> usize {
        self.ranges.len()
    }

    /// Whether the alignment holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The ordered subword indices aligned to the given token.
    ///
    /// Returns an empty slice for tokens with no aligned subwords and for
    /// out-of-range token indices.
    pub fn subwords_for(&self, token_index: usize) -> &[usize] {
        match self.ranges.get(token_index) {
            Some(&(offset, len)) => &self.indices[offset..offset + len],
            None => &[],
        }
    }

    /// Iterate over per-token subword index slices in token order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.ranges
            .iter()
            .map(move |&(offset, len)| &self.indices[offset..offset + len])
    }

    /// Total number of (token, subword) pairs in the table.
    pub fn pair_count(&self) -> usize {
        self.indices.len()
    }
}
