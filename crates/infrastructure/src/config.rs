//! Workbench settings
//!
//! Settings live in one JSON document. Every field has a default, so a
//! missing file or a partial document is fine. `WORKBENCH_STORAGE_DIR`
//! overrides the storage directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use workbench_application::ports::{FileSystem, FileSystemError};
use workbench_application::{GeneratorConfigMap, RunnerConfig};

use crate::adapters::DEFAULT_TIMEOUT_MS;
use crate::import::ImportConfig;

/// Environment variable overriding [`WorkbenchSettings::storage_dir`].
pub const STORAGE_DIR_ENV: &str = "WORKBENCH_STORAGE_DIR";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings: {0}")]
    Read(#[from] FileSystemError),

    /// The settings file is not valid JSON for this shape.
    #[error("invalid settings in {path}: {message}")]
    Invalid {
        /// Settings file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

/// Result type alias for settings loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for storage, the runner, imports and dynamic variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkbenchSettings {
    /// Directory holding one JSON file per collection.
    pub storage_dir: PathBuf,
    /// Defaults for batch runs.
    pub runner: RunnerConfig,
    /// Import limits.
    pub import: ImportConfig,
    /// Dynamic variable constraints.
    pub generators: GeneratorConfigMap,
    /// Transport timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for WorkbenchSettings {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("./collections"),
            runner: RunnerConfig::default(),
            import: ImportConfig::default(),
            generators: GeneratorConfigMap::default(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl WorkbenchSettings {
    /// Loads settings from `path` and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load<F: FileSystem>(fs: &F, path: &Path) -> ConfigResult<Self> {
        let settings = Self::load_file(fs, path).await?;
        Ok(settings.with_overrides(|name| std::env::var(name).ok()))
    }

    /// Loads settings from `path` without looking at the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_file<F: FileSystem>(fs: &F, path: &Path) -> ConfigResult<Self> {
        let raw = match fs.read_file_string(path).await {
            Ok(raw) => raw,
            Err(error) if error.is_not_found() => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(error) => return Err(error.into()),
        };

        let settings: Self = serde_json::from_str(&raw).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Applies overrides read through `lookup` (normally the process environment).
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(STORAGE_DIR_ENV).filter(|dir| !dir.trim().is_empty()) {
            self.storage_dir = PathBuf::from(dir);
        }
        self
    }
}
