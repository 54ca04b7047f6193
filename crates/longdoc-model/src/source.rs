//! Model file resolution.
//!
//! The encoder needs three files: the model config, the tokenizer, and the
//! safetensors weights. A [`ModelSource`] resolves all three against a
//! local directory, fetching only what is missing from HuggingFace Hub on
//! first use.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ModelError;

/// Default model repository on HuggingFace
pub const DEFAULT_MODEL_REPO: &str = "almanach/camembert-large";

/// Resolved locations of the three files a loaded pipeline needs.
#[derive(Debug, Clone)]
pub struct ModelPaths {
    /// Model config (hidden size, max positions)
    pub config: PathBuf,
    /// `tokenizer.json` with offset mapping
    pub tokenizer: PathBuf,
    /// Safetensors weights
    pub weights: PathBuf,
}

impl ModelPaths {
    /// Expected layout inside a model directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            config: dir.join("config.json"),
            tokenizer: dir.join("tokenizer.json"),
            weights: dir.join("model.safetensors"),
        }
    }

    /// File names not present on disk yet, in layout order.
    pub fn missing(&self) -> Vec<String> {
        [&self.config, &self.tokenizer, &self.weights]
            .into_iter()
            .filter(|path| !path.exists())
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect()
    }
}

/// Where model files come from: a HuggingFace repo mirrored into a local
/// directory, one subdirectory per repo.
#[derive(Debug, Clone)]
pub struct ModelSource {
    repo_id: String,
    root: PathBuf,
}

impl Default for ModelSource {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_REPO)
    }
}

impl ModelSource {
    /// Source for the given repo under the default local root.
    pub fn new(repo_id: impl Into<String>) -> Self {
        let root = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("longdoc-embed")
            .join("models");
        Self {
            repo_id: repo_id.into(),
            root,
        }
    }

    /// Override the local root directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// The HuggingFace repo id this source resolves.
    pub fn repo_id(&self) -> &str {
        &self.repo_id
    }

    /// Local directory holding this repo's files.
    pub fn model_dir(&self) -> PathBuf {
        self.root.join(self.repo_id.replace('/', "_"))
    }

    /// Resolve all three model files, fetching any that are missing.
    pub fn locate(&self) -> Result<ModelPaths, ModelError> {
        let dir = self.model_dir();
        let paths = ModelPaths::in_dir(&dir);

        let missing = paths.missing();
        if missing.is_empty() {
            debug!(path = ?dir, "All model files present");
            return Ok(paths);
        }

        info!(repo = %self.repo_id, files = ?missing, "Fetching model files");
        self.fetch(&dir, &missing)?;

        // A fetch that reported success but left a file missing would
        // surface later as a confusing loader error; reject it here
        if let Some(name) = paths.missing().into_iter().next() {
            return Err(ModelError::ModelNotFound(format!(
                "{} still missing after fetch from {}",
                name, self.repo_id
            )));
        }

        Ok(paths)
    }

    /// Fetch the named files from HuggingFace Hub into `dir`.
    fn fetch(&self, dir: &Path, files: &[String]) -> Result<(), ModelError> {
        use hf_hub::api::sync::Api;

        std::fs::create_dir_all(dir)?;

        let api = Api::new().map_err(|e| ModelError::Download(e.to_string()))?;
        let repo = api.model(self.repo_id.clone());

        for name in files {
            let fetched = repo
                .get(name)
                .map_err(|e| ModelError::Download(format!("{}: {}", name, e)))?;
            std::fs::copy(&fetched, dir.join(name))?;
            debug!(file = %name, "Fetched");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_source() {
        let source = ModelSource::default();
        assert_eq!(source.repo_id(), DEFAULT_MODEL_REPO);
        assert!(source.model_dir().to_string_lossy().contains("longdoc-embed"));
    }

    #[test]
    fn test_model_dir_flattens_repo_id() {
        let source = ModelSource::new("org/model").with_root("/tmp/models");
        assert!(source.model_dir().ends_with("org_model"));
    }

    #[test]
    fn test_missing_lists_all_files_for_empty_dir() {
        let temp = TempDir::new().unwrap();
        let paths = ModelPaths::in_dir(temp.path());
        assert_eq!(
            paths.missing(),
            vec!["config.json", "tokenizer.json", "model.safetensors"]
        );
    }

    #[test]
    fn test_missing_shrinks_as_files_appear() {
        let temp = TempDir::new().unwrap();
        let paths = ModelPaths::in_dir(temp.path());

        std::fs::write(&paths.config, "{}").unwrap();
        std::fs::write(&paths.weights, "").unwrap();
        assert_eq!(paths.missing(), vec!["tokenizer.json"]);

        std::fs::write(&paths.tokenizer, "{}").unwrap();
        assert!(paths.missing().is_empty());
    }

    #[test]
    fn test_locate_skips_fetch_when_complete() {
        let temp = TempDir::new().unwrap();
        let source = ModelSource::new("test/model").with_root(temp.path());

        let dir = source.model_dir();
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["config.json", "tokenizer.json", "model.safetensors"] {
            std::fs::write(dir.join(name), "").unwrap();
        }

        // No network involved: everything is already on disk
        let paths = source.locate().unwrap();
        assert_eq!(paths.config, dir.join("config.json"));
    }
}
