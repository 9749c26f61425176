//! Read-only venv queries: freeze, python, find

use crate::cli::args::{FindArgs, OutputFormat, TargetArgs};
use crate::cli::CommandContext;
use crate::error::{VenvError, VenvResult};
use crate::registry::VenvTarget;
use crate::ui::{self, UiContext};

/// Execute the freeze command
pub async fn freeze(args: TargetArgs, ctx: &CommandContext) -> VenvResult<()> {
    let manager = ctx.open_manager().await?;
    let packages = manager
        .list_installed_packages(&VenvTarget::parse(&args.target))
        .await?;
    for package in packages {
        println!("{}", package);
    }
    Ok(())
}

/// Execute the python command
pub async fn python(args: TargetArgs, ctx: &CommandContext) -> VenvResult<()> {
    let manager = ctx.open_manager().await?;
    let python = manager
        .get_python_path(&VenvTarget::parse(&args.target))
        .await?;
    println!("{}", python.display());
    Ok(())
}

/// Execute the find command
pub async fn find(args: FindArgs, ctx: &CommandContext) -> VenvResult<()> {
    let spec = args.requirements.to_spec().ok_or_else(|| {
        VenvError::User("Nothing to match: pass requirements or -r FILE".to_string())
    })?;

    let manager = ctx.open_manager().await?;
    let locations = manager.find_venvs_by_requirements(&spec).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&locations)?),
        OutputFormat::Plain => {
            for location in &locations {
                println!("{}", location.display());
            }
        }
        OutputFormat::Table => {
            let ui_ctx = UiContext::detect();
            if locations.is_empty() {
                ui::step_info(&ui_ctx, "No matching venvs");
            }
            for location in &locations {
                ui::key_value(&ui_ctx, "match", &location.display().to_string());
            }
        }
    }
    Ok(())
}
