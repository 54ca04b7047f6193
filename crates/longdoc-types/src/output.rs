//! Pipeline output: one vector per token.

use serde::{Deserialize, Serialize};

/// Per-token embedding table produced by the pipeline.
///
/// Holds exactly one vector per input token, in token order. Tokens that
/// aligned to no subwords carry a zero vector of the model's hidden
/// dimension. The table is immutable once produced and is the only
/// structure that outlives the pipeline invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenEmbeddings {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

impl TokenEmbeddings {
    /// Create a new table from per-token vectors.
    ///
    /// Every vector must have length `dim`; callers construct this via the
    /// pooler, which guarantees it.
    pub fn new(dim: usize, vectors: Vec<Vec<f32>>) -> Self {
        debug_assert!(vectors.iter().all(|v| v.len() == dim));
        Self { dim, vectors }
    }

    /// Embedding dimension of every vector in the table.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the table holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// The vector for the given token index, if in range.
    pub fn get(&self, token_index: usize) -> Option<&[f32]> {
        self.vectors.get(token_index).map(|v| v.as_slice())
    }

    /// Iterate over token vectors in token order.
    pub fn iter(&self) -> impl Iterator<Item = &[f32]> {
        self.vectors.iter().map(|v| v.as_slice())
    }

    /// Consume the table, yielding the raw vectors.
    pub fn into_vectors(self) -> Vec<Vec<f32>> {
        self.vectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_access() {
        let table = TokenEmbeddings::new(2, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.dim(), 2);
        assert_eq!(table.get(1), Some(&[3.0, 4.0][..]));
        assert_eq!(table.get(2), None);
    }

    #[test]
    fn test_empty_table() {
        let table = TokenEmbeddings::new(384, vec![]);
        assert!(table.is_empty());
        assert_eq!(table.dim(), 384);
    }

    #[test]
    fn test_into_vectors() {
        let table = TokenEmbeddings::new(1, vec![vec![0.5]]);
        assert_eq!(table.into_vectors(), vec![vec![0.5]]);
    }
}
