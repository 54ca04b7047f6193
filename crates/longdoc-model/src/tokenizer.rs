//! Subword tokenization with byte offsets.
//!
//! Wraps the HuggingFace `tokenizers` crate behind a small trait so the
//! pipeline can be exercised with a mock tokenizer in tests.

use tokenizers::Tokenizer;
use tracing::debug;

use longdoc_types::Subword;

use crate::error::ModelError;

/// Turns raw text into an ordered sequence of subwords with half-open
/// byte-offset ranges over the input text.
///
/// Implementations must be thread-safe (Send + Sync) for concurrent use
/// by independent pipeline invocations.
pub trait SubwordTokenizer: Send + Sync {
    /// Tokenize text into subwords, in order, with byte offsets.
    fn tokenize(&self, text: &str) -> Result<Vec<Subword>, ModelError>;

    /// Vocabulary id used for padding.
    fn padding_id(&self) -> u32;

    /// Maximum sequence length the paired model supports, if known.
    fn model_max_length(&self) -> Option<usize>;
}

/// HuggingFace tokenizer adapter.
///
/// Special tokens are disabled so that every emitted subword corresponds
/// to a span of the input text and indices stay dense.
pub struct HfTokenizer {
    inner: Tokenizer,
    padding_id: u32,
    max_length: Option<usize>,
}

impl HfTokenizer {
    /// Wrap an already-loaded tokenizer.
    ///
    /// The padding id is read from the tokenizer's padding params when
    /// present, falling back to 0.
    pub fn new(inner: Tokenizer) -> Self {
        let padding_id = inner.get_padding().map(|p| p.pad_id).unwrap_or(0);
        let max_length = inner.get_truncation().map(|t| t.max_length);
        Self {
            inner,
            padding_id,
            max_length,
        }
    }

    /// Load a tokenizer from a `tokenizer.json` file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ModelError> {
        let inner =
            Tokenizer::from_file(path).map_err(|e| ModelError::Tokenizer(e.to_string()))?;
        debug!(path = ?path, "Loaded tokenizer");
        Ok(Self::new(inner))
    }

    /// Override the padding id (e.g. from the model config).
    pub fn with_padding_id(mut self, padding_id: u32) -> Self {
        self.padding_id = padding_id;
        self
    }

    /// Override the maximum model length (e.g. from the model config).
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

impl SubwordTokenizer for HfTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Subword>, ModelError> {
        // add_special_tokens = false: offsets must map 1:1 onto the text
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| ModelError::Tokenizer(e.to_string()))?;

        let subwords: Vec<Subword> = encoding
            .get_ids()
            .iter()
            .zip(encoding.get_offsets())
            .map(|(&id, &(start, end))| Subword::new(id, start, end))
            .collect();

        debug!(subwords = subwords.len(), "Tokenized document");
        Ok(subwords)
    }

    fn padding_id(&self) -> u32 {
        self.padding_id
    }

    fn model_max_length(&self) -> Option<usize> {
        self.max_length
    }
}
