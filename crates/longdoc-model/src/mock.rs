//! Mock tokenizer and encoder for testing.

use tracing::trace;

use longdoc_types::Subword;

use crate::encoder::{EncoderInfo, SequenceEncoder};
use crate::error::ModelError;
use crate::tokenizer::SubwordTokenizer;

/// Mock tokenizer that emits one subword per whitespace-separated word.
///
/// Ids are derived from the word bytes, so the same text always produces
/// the same subword sequence. Useful for exercising the pipeline without
/// loading tokenizer files.
pub struct MockTokenizer {
    padding_id: u32,
    max_length: Option<usize>,
}

impl MockTokenizer {
    /// Create a mock tokenizer with padding id 0 and no length limit.
    pub fn new() -> Self {
        Self {
            padding_id: 0,
            max_length: None,
        }
    }

    /// Set the advertised model max length.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

impl Default for MockTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SubwordTokenizer for MockTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Subword>, ModelError> {
        let mut subwords = Vec::new();
        let mut cursor = 0;

        for word in text.split_whitespace() {
            // split_whitespace loses offsets; recover them by searching
            // forward from the cursor (words appear in order)
            let start = match text[cursor..].find(word) {
                Some(rel) => cursor + rel,
                None => continue,
            };
            let end = start + word.len();

            // id 0 is reserved for padding
            let id = word
                .bytes()
                .fold(1u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32))
                | 1;
            subwords.push(Subword::new(id, start, end));
            cursor = end;
        }

        trace!(subwords = subwords.len(), "Mock tokenization");
        Ok(subwords)
    }

    fn padding_id(&self) -> u32 {
        self.padding_id
    }

    fn model_max_length(&self) -> Option<usize> {
        self.max_length
    }
}

/// Mock encoder producing deterministic per-position vectors.
///
/// The vector for a position depends only on the subword id at that
/// position, so the same subword seen through two overlapping windows
/// yields identical raw vectors. Component `k` of the vector for id `n`
/// is `n as f32 + k as f32 * 0.5`.
pub struct MockEncoder {
    info: EncoderInfo,
    fail: bool,
}

impl MockEncoder {
    /// Create a mock encoder with the given hidden dimension.
    pub fn new(hidden_dim: usize) -> Self {
        Self {
            info: EncoderInfo {
                name: "mock-encoder".to_string(),
                hidden_dim,
                max_input_len: 512,
            },
            fail: false,
        }
    }

    /// Override the maximum input width.
    pub fn with_max_input_len(mut self, max_input_len: usize) -> Self {
        self.info.max_input_len = max_input_len;
        self
    }

    /// Make every encode call fail, for exercising error propagation
    /// (stands in for backend failures like resource exhaustion).
    pub fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    /// The vector the encoder emits for a given subword id.
    pub fn vector_for(&self, id: u32) -> Vec<f32> {
        (0..self.info.hidden_dim)
            .map(|k| id as f32 + k as f32 * 0.5)
            .collect()
    }
}

impl SequenceEncoder for MockEncoder {
    fn info(&self) -> &EncoderInfo {
        &self.info
    }

    fn encode(
        &self,
        input_ids: &[Vec<u32>],
        attention_mask: &[Vec<u32>],
    ) -> Result<Vec<Vec<Vec<f32>>>, ModelError> {
        if self.fail {
            return Err(ModelError::Candle(candle_core::Error::Msg(
                "simulated encoder failure".to_string(),
            )));
        }
        if input_ids.len() != attention_mask.len() {
            return Err(ModelError::InvalidInput(
                "id and mask batch sizes differ".to_string(),
            ));
        }

        let hidden = input_ids
            .iter()
            .map(|row| row.iter().map(|&id| self.vector_for(id)).collect())
            .collect();
        Ok(hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_tokenizer_offsets() {
        let tokenizer = MockTokenizer::new();
        let subwords = tokenizer.tokenize("le chat dort").unwrap();

        assert_eq!(subwords.len(), 3);
        assert_eq!((subwords[0].byte_start, subwords[0].byte_end), (0, 2));
        assert_eq!((subwords[1].byte_start, subwords[1].byte_end), (3, 7));
        assert_eq!((subwords[2].byte_start, subwords[2].byte_end), (8, 12));
    }

    #[test]
    fn test_mock_tokenizer_deterministic() {
        let tokenizer = MockTokenizer::new();
        let first = tokenizer.tokenize("un deux trois").unwrap();
        let second = tokenizer.tokenize("un deux trois").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mock_tokenizer_never_emits_padding_id() {
        let tokenizer = MockTokenizer::new();
        let subwords = tokenizer.tokenize("a b c d e").unwrap();
        assert!(subwords.iter().all(|s| s.id != tokenizer.padding_id()));
    }

    #[test]
    fn test_mock_encoder_shapes() {
        let encoder = MockEncoder::new(4);
        let hidden = encoder
            .encode(&[vec![1, 2, 3]], &[vec![1, 1, 1]])
            .unwrap();
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].len(), 3);
        assert_eq!(hidden[0][0].len(), 4);
    }

    #[test]
    fn test_mock_encoder_id_determines_vector() {
        let encoder = MockEncoder::new(2);
        let hidden = encoder
            .encode(&[vec![7, 7], vec![7, 9]], &[vec![1, 1], vec![1, 1]])
            .unwrap();
        assert_eq!(hidden[0][0], hidden[0][1]);
        assert_eq!(hidden[0][0], hidden[1][0]);
        assert_ne!(hidden[0][0], hidden[1][1]);
        assert_eq!(hidden[0][0], vec![7.0, 7.5]);
    }

    #[test]
    fn test_mock_encoder_failure_switch() {
        let encoder = MockEncoder::new(2).with_failure();
        let result = encoder.encode(&[vec![1, 2]], &[vec![1, 1]]);
        assert!(matches!(result, Err(ModelError::Candle(_))));
    }
}
