//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::cli::CommandContext;
use crate::config::{Config, ConfigManager};
use crate::error::{VenvError, VenvResult};
use crate::ui::{self, UiContext};
use std::path::PathBuf;

const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "python.interpreter",
    "python.pip_extra_args",
    "storage.base_dir",
    "storage.registry_path",
];

/// Execute the config command
pub async fn execute(args: ConfigArgs, ctx: &CommandContext) -> VenvResult<()> {
    let manager = &ctx.config_manager;

    match args.action {
        None | Some(ConfigAction::Show) => show_config(&ctx.config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            set_value(manager, &ctx.config, &key, &value).await?
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> VenvResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> VenvResult<()> {
    let ui_ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ui_ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(
        &ui_ctx,
        "Configuration initialized",
        &path.display().to_string(),
    );
    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> VenvResult<()> {
    let ui_ctx = UiContext::detect();
    let mut config = config.clone();

    apply(&mut config, key, value)?;

    manager.save(&config).await?;
    ui::step_ok(&ui_ctx, &format!("Set {} = {}", key, value));
    Ok(())
}

/// Apply one dot-separated key to a config
fn apply(config: &mut Config, key: &str, value: &str) -> VenvResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => match value {
            "text" | "json" => config.general.log_format = value.to_string(),
            _ => {
                return Err(VenvError::User(format!(
                    "Invalid log format: {}. Use text or json",
                    value
                )))
            }
        },
        ["python", "interpreter"] => config.python.interpreter = PathBuf::from(value),
        ["python", "pip_extra_args"] => {
            config.python.pip_extra_args = value.split_whitespace().map(str::to_string).collect()
        }
        ["storage", "base_dir"] => config.storage.base_dir = PathBuf::from(value),
        ["storage", "registry_path"] => {
            config.storage.registry_path = (!value.is_empty()).then(|| PathBuf::from(value))
        }
        _ => {
            return Err(VenvError::User(format!(
                "Unknown config key: {}. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn apply_known_keys() {
        let mut config = Config::default();
        apply(&mut config, "python.interpreter", "/opt/py/bin/python3").unwrap();
        apply(&mut config, "python.pip_extra_args", "--no-index --find-links /w").unwrap();
        apply(&mut config, "storage.registry_path", "/srv/registry.json").unwrap();
        apply(&mut config, "general.log_format", "json").unwrap();

        assert_eq!(config.python.interpreter, PathBuf::from("/opt/py/bin/python3"));
        assert_eq!(
            config.python.pip_extra_args,
            vec!["--no-index", "--find-links", "/w"]
        );
        assert_eq!(
            config.storage.registry_path,
            Some(PathBuf::from("/srv/registry.json"))
        );
        assert_eq!(config.general.log_format, "json");
    }

    #[test]
    fn apply_empty_registry_path_resets_to_default() {
        let mut config = Config::default();
        config.storage.registry_path = Some(PathBuf::from("/x"));
        apply(&mut config, "storage.registry_path", "").unwrap();
        assert!(config.storage.registry_path.is_none());
    }

    #[test]
    fn apply_rejects_unknown_key_and_bad_format() {
        let mut config = Config::default();
        assert!(apply(&mut config, "vm.name", "x").is_err());
        assert!(apply(&mut config, "general.log_format", "yaml").is_err());
    }

    #[tokio::test]
    async fn set_value_persists() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("config.toml"));

        set_value(&manager, &Config::default(), "storage.base_dir", "/srv/venvs")
            .await
            .unwrap();

        let loaded = manager.load().await.unwrap();
        assert_eq!(loaded.storage.base_dir, PathBuf::from("/srv/venvs"));
    }
}
