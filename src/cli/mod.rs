//! Command-line interface

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};

use crate::config::{Config, ConfigManager, Overrides, Settings};
use crate::error::VenvResult;
use crate::fingerprint::RequirementSpec;
use crate::manager::VenvManager;
use crate::python::NativePython;
use args::RequirementArgs;

/// Everything a command needs besides its own arguments
pub struct CommandContext {
    pub config: Config,
    pub config_manager: ConfigManager,
    pub overrides: Overrides,
}

impl CommandContext {
    pub fn new(config: Config, config_manager: ConfigManager, overrides: Overrides) -> Self {
        Self {
            config,
            config_manager,
            overrides,
        }
    }

    /// Effective settings after applying command-line overrides
    pub fn settings(&self) -> Settings {
        Settings::resolve(&self.config, &self.overrides)
    }

    /// Open the venv pool backed by the system Python
    pub async fn open_manager(&self) -> VenvResult<VenvManager> {
        let settings = self.settings();
        let runtime = NativePython::new().with_pip_args(settings.pip_extra_args.clone());
        VenvManager::open(settings, Box::new(runtime)).await
    }
}

impl RequirementArgs {
    /// `-r FILE` becomes a file spec, `--spec TOKEN` a file or literal,
    /// bare requirements become lines
    pub fn to_spec(&self) -> Option<RequirementSpec> {
        if let Some(ref path) = self.requirements {
            return Some(RequirementSpec::File(path.clone()));
        }
        if let Some(ref token) = self.spec {
            return Some(RequirementSpec::from_token(token));
        }
        if self.packages.is_empty() {
            return None;
        }
        Some(RequirementSpec::lines(&self.packages))
    }
}
