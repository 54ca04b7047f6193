//! Candle-based sequence encoder.
//!
//! Exposes per-position hidden states rather than a pooled sentence vector:
//! the pipeline pools per token itself, after merging overlapping windows.

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tracing::{debug, info};

use crate::error::ModelError;
use crate::source::ModelSource;

/// Static information about a loaded encoder.
#[derive(Debug, Clone)]
pub struct EncoderInfo {
    /// Model name (e.g. "almanach/camembert-large")
    pub name: String,
    /// Hidden-state dimension of every output vector
    pub hidden_dim: usize,
    /// Maximum input width the model accepts in one call
    pub max_input_len: usize,
}

/// Embedding model interface consumed by the batch embedder.
///
/// `encode` takes a padded id matrix plus an attention mask (1 = real
/// subword, 0 = padding) and returns one hidden-state vector per position,
/// padding positions included. Implementations must be deterministic for
/// identical input, and thread-safe (Send + Sync) so independent pipeline
/// invocations can share one loaded model.
pub trait SequenceEncoder: Send + Sync {
    /// Get encoder information.
    fn info(&self) -> &EncoderInfo;

    /// Encode a batch of equal-width padded windows.
    ///
    /// Returns hidden states shaped `[batch][width][hidden_dim]`.
    fn encode(
        &self,
        input_ids: &[Vec<u32>],
        attention_mask: &[Vec<u32>],
    ) -> Result<Vec<Vec<Vec<f32>>>, ModelError>;
}

/// BERT-family encoder running locally via Candle.
pub struct BertEncoder {
    model: BertModel,
    device: Device,
    info: EncoderInfo,
}

impl BertEncoder {
    /// Load the encoder from a model source (fetching files if needed).
    pub fn load(source: &ModelSource) -> Result<Self, ModelError> {
        let paths = source.locate()?;
        Self::load_from_paths(&paths.config, &paths.weights, source.repo_id())
    }

    /// Load the default model from the default source.
    pub fn load_default() -> Result<Self, ModelError> {
        Self::load(&ModelSource::default())
    }

    /// Load from explicit config and weight files.
    pub fn load_from_paths(
        config_path: &std::path::Path,
        weights_path: &std::path::Path,
        name: &str,
    ) -> Result<Self, ModelError> {
        info!(model = name, "Loading encoder model...");

        // CPU by default; the device is an explicit handle, never a global
        let device = Device::Cpu;

        let config_str = std::fs::read_to_string(config_path)?;
        let config: BertConfig = serde_json::from_str(&config_str)
            .map_err(|e| ModelError::ModelNotFound(format!("Invalid config: {}", e)))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.to_path_buf()], DType::F32, &device)?
        };
        let model = BertModel::load(vb, &config)?;

        let info = EncoderInfo {
            name: name.to_string(),
            hidden_dim: config.hidden_size,
            max_input_len: config.max_position_embeddings,
        };

        info!(
            dim = info.hidden_dim,
            max_seq = info.max_input_len,
            "Encoder loaded successfully"
        );

        Ok(Self {
            model,
            device,
            info,
        })
    }
}

impl SequenceEncoder for BertEncoder {
    fn info(&self) -> &EncoderInfo {
        &self.info
    }

    fn encode(
        &self,
        input_ids: &[Vec<u32>],
        attention_mask: &[Vec<u32>],
    ) -> Result<Vec<Vec<Vec<f32>>>, ModelError> {
        let batch_size = input_ids.len();
        if batch_size == 0 {
            return Ok(vec![]);
        }

        let width = input_ids[0].len();
        if width == 0 {
            return Err(ModelError::InvalidInput("empty input row".to_string()));
        }
        if width > self.info.max_input_len {
            return Err(ModelError::InputTooWide {
                width,
                max: self.info.max_input_len,
            });
        }
        if input_ids.iter().any(|row| row.len() != width)
            || attention_mask.len() != batch_size
            || attention_mask.iter().any(|row| row.len() != width)
        {
            return Err(ModelError::InvalidInput(
                "ragged batch: all id and mask rows must share one width".to_string(),
            ));
        }

        debug!(batch = batch_size, width = width, "Encoding batch");

        let ids_flat: Vec<u32> = input_ids.iter().flatten().copied().collect();
        let mask_flat: Vec<u32> = attention_mask.iter().flatten().copied().collect();

        let input_ids = Tensor::from_vec(ids_flat, (batch_size, width), &self.device)?;
        let attention_mask = Tensor::from_vec(mask_flat, (batch_size, width), &self.device)?;
        let token_type_ids = Tensor::zeros_like(&input_ids)?;

        // Last hidden state, shape (batch, width, hidden_dim)
        let output = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        let hidden: Vec<Vec<Vec<f32>>> = output.to_vec3()?;
        Ok(hidden)
    }
}
