//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use longdoc_types::PoolingStrategy;

use crate::error::PipelineError;

/// Models advertising absurd max lengths get this window size instead
const FALLBACK_WINDOW_SIZE: usize = 512;

/// Threshold above which an advertised model max length is not trusted
const MAX_TRUSTED_MODEL_LENGTH: usize = 100_000;

/// How the maximum window size is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowSize {
    /// Use the model's maximum supported input width
    FromModel,
    /// Use a fixed number of subwords
    Fixed(usize),
}

/// Configuration for one embedding pipeline.
///
/// Validated once, before any model call; invalid combinations never reach
/// the planner or the encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum window size in subwords
    pub window_size: WindowSize,

    /// Fraction of a window's length reused as the start of the next
    /// window, in `[0, 1)`
    pub overlap: f32,

    /// Number of windows per encoder call
    pub mini_batch_size: usize,

    /// Padding id override; `None` takes the tokenizer's padding id
    pub padding_id: Option<u32>,

    /// Rule for collapsing subword vectors into token vectors
    pub pooling: PoolingStrategy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_size: WindowSize::FromModel,
            overlap: 0.5,
            mini_batch_size: 12,
            padding_id: None,
            pooling: PoolingStrategy::Average,
        }
    }
}

impl PipelineConfig {
    /// Check that all parameters are usable.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if let WindowSize::Fixed(0) = self.window_size {
            return Err(PipelineError::Config(
                "window size must be at least 1 subword".to_string(),
            ));
        }
        if !self.overlap.is_finite() || self.overlap < 0.0 || self.overlap >= 1.0 {
            return Err(PipelineError::Config(format!(
                "overlap fraction must be in [0, 1), got {}",
                self.overlap
            )));
        }
        if self.mini_batch_size == 0 {
            return Err(PipelineError::Config(
                "mini-batch size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the window size against what the model actually supports.
    ///
    /// `FromModel` prefers the tokenizer's advertised max length, falling
    /// back to the encoder's input width. Tokenizers shipping a sentinel
    /// "unlimited" value are capped at [`FALLBACK_WINDOW_SIZE`].
    pub fn resolve_window_size(
        &self,
        tokenizer_max: Option<usize>,
        encoder_max: usize,
    ) -> Result<usize, PipelineError> {
        let size = match self.window_size {
            WindowSize::Fixed(w) => w,
            WindowSize::FromModel => {
                let advertised = tokenizer_max.unwrap_or(encoder_max);
                if advertised == 0 || advertised > MAX_TRUSTED_MODEL_LENGTH {
                    FALLBACK_WINDOW_SIZE
                } else {
                    advertised
                }
            }
        };

        if size == 0 {
            return Err(PipelineError::Config(
                "resolved window size is 0".to_string(),
            ));
        }
        if size > encoder_max {
            return Err(PipelineError::Config(format!(
                "window size {} exceeds encoder maximum {}",
                size, encoder_max
            )));
        }
        Ok(size)
    }
}
