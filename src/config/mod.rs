//! Configuration management for venvpool

pub mod schema;

pub use schema::Config;

use crate::error::{VenvError, VenvResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("venvpool")
            .join("config.toml")
    }

    /// Load configuration, falling back to defaults if the file is missing
    pub async fn load(&self) -> VenvResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> VenvResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| VenvError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| VenvError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> VenvResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            VenvError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> VenvResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| VenvError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Command-line overrides for configured paths
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub interpreter: Option<PathBuf>,
    pub base_dir: Option<PathBuf>,
    pub registry: Option<PathBuf>,
}

/// Effective settings the venv manager runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base interpreter used to create venvs
    pub base_interpreter: PathBuf,

    /// Directory new venvs are created under
    pub base_dir: PathBuf,

    /// Registry document path
    pub registry_path: PathBuf,

    /// Extra arguments for every `pip install`
    pub pip_extra_args: Vec<String>,
}

impl Settings {
    /// Merge configuration with command-line overrides
    pub fn resolve(config: &Config, overrides: &Overrides) -> Self {
        let base_dir = overrides
            .base_dir
            .clone()
            .unwrap_or_else(|| config.storage.base_dir.clone());

        let registry_path = overrides
            .registry
            .clone()
            .or_else(|| config.storage.registry_path.clone())
            .unwrap_or_else(|| Self::default_registry_path(&base_dir));

        Self {
            base_interpreter: overrides
                .interpreter
                .clone()
                .unwrap_or_else(|| config.python.interpreter.clone()),
            base_dir,
            registry_path,
            pip_extra_args: config.python.pip_extra_args.clone(),
        }
    }

    /// Settings rooted at `base_dir` with the default registry location
    pub fn new(base_interpreter: PathBuf, base_dir: PathBuf) -> Self {
        let registry_path = Self::default_registry_path(&base_dir);
        Self {
            base_interpreter,
            base_dir,
            registry_path,
            pip_extra_args: vec![],
        }
    }

    /// Default registry location for a base directory
    pub fn default_registry_path(base_dir: &Path) -> PathBuf {
        base_dir.join(".venvpool").join("registry.json")
    }
}
