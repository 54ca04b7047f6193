//! The document embedding pipeline.
//!
//! Composes the five stages in strict sequence. All intermediate
//! structures (subwords, alignment, windows, raw and merged occurrences)
//! are owned by one `embed_document` call and dropped before it returns;
//! only the per-token table survives.

use tracing::{debug, info};

use longdoc_model::{SequenceEncoder, SubwordTokenizer};
use longdoc_types::{Token, TokenEmbeddings};

use crate::align::align_tokens;
use crate::batch::embed_windows;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pool::pool_tokens;
use crate::reduce::merge_occurrences;
use crate::window::plan_windows;

/// Per-document token embedding pipeline.
///
/// Construction validates the configuration and resolves the effective
/// window size and padding id, so a built pipeline can no longer fail on
/// configuration. The pipeline holds no mutable state; independent
/// documents may be processed by separate invocations in parallel as long
/// as the encoder itself is safe to share.
pub struct TokenEmbeddingPipeline<T, E> {
    tokenizer: T,
    encoder: E,
    config: PipelineConfig,
    window_size: usize,
    padding_id: u32,
}

impl<T: SubwordTokenizer, E: SequenceEncoder> TokenEmbeddingPipeline<T, E> {
    /// Build a pipeline, rejecting invalid configurations before any
    /// model call.
    pub fn new(tokenizer: T, encoder: E, config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;

        let window_size = config.resolve_window_size(
            tokenizer.model_max_length(),
            encoder.info().max_input_len,
        )?;
        let padding_id = config.padding_id.unwrap_or_else(|| tokenizer.padding_id());

        info!(
            window_size = window_size,
            overlap = config.overlap,
            mini_batch = config.mini_batch_size,
            pooling = %config.pooling,
            "Pipeline configured"
        );

        Ok(Self {
            tokenizer,
            encoder,
            config,
            window_size,
            padding_id,
        })
    }

    /// Effective maximum window size in subwords.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Hidden dimension of the output vectors.
    pub fn hidden_dim(&self) -> usize {
        self.encoder.info().hidden_dim
    }

    /// Embed one document: one vector per supplied token.
    ///
    /// `tokens` are the upstream segmentation's byte spans over `text`,
    /// in left-to-right non-overlapping order. Any failure aborts this
    /// document only.
    pub fn embed_document(
        &self,
        text: &str,
        tokens: &[Token],
    ) -> Result<TokenEmbeddings, PipelineError> {
        let hidden_dim = self.encoder.info().hidden_dim;

        let subwords = self.tokenizer.tokenize(text)?;
        debug!(
            tokens = tokens.len(),
            subwords = subwords.len(),
            "Embedding document"
        );

        let alignment = align_tokens(tokens, &subwords);

        let windows = plan_windows(&subwords, tokens, self.window_size, self.config.overlap)?;

        let subword_ids: Vec<u32> = subwords.iter().map(|s| s.id).collect();
        let occurrences = embed_windows(
            &windows,
            &subword_ids,
            &self.encoder,
            self.window_size,
            self.config.mini_batch_size,
            self.padding_id,
        )?;

        let merged = merge_occurrences(&occurrences, subwords.len(), hidden_dim)?;

        Ok(pool_tokens(&alignment, &merged, self.config.pooling, hidden_dim))
    }
}
