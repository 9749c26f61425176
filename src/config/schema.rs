//! Configuration schema for venvpool
//!
//! Configuration is stored at `~/.config/venvpool/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Base interpreter and pip settings
    pub python: PythonConfig,

    /// Where venvs and the registry live
    pub storage: StorageConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Python interpreter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonConfig {
    /// Base interpreter used to create venvs
    pub interpreter: PathBuf,

    /// Extra arguments for every `pip install` (e.g. "--no-index")
    pub pip_extra_args: Vec<String>,
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            pip_extra_args: vec![],
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory new venvs are created under
    pub base_dir: PathBuf,

    /// Registry document (defaults to `<base_dir>/.venvpool/registry.json`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            registry_path: None,
        }
    }
}

fn default_interpreter() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("C:/python-embed/python.exe")
    } else {
        PathBuf::from("/usr/bin/python3")
    }
}

fn default_base_dir() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("C:/venvs")
    } else {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("venvpool")
            .join("venvs")
    }
}
