//! Install and wheels commands - add packages to a venv

use crate::cli::args::{InstallArgs, WheelsArgs};
use crate::cli::CommandContext;
use crate::error::{VenvError, VenvResult};
use crate::registry::VenvTarget;
use crate::ui::{self, InstallProgress, UiContext};

/// Execute the install command
pub async fn execute(args: InstallArgs, ctx: &CommandContext) -> VenvResult<()> {
    let ui_ctx = UiContext::detect();
    let spec = args.requirements.to_spec().ok_or_else(|| {
        VenvError::User("Nothing to install: pass requirements or -r FILE".to_string())
    })?;

    let manager = ctx.open_manager().await?;
    let venv_dir = manager.resolve(&VenvTarget::parse(&args.target)).await?;

    let progress = InstallProgress::new(&ui_ctx, "Installing");
    let result = manager
        .install_requirements_with_progress(&venv_dir, &spec, &|line: String| {
            progress.on_line(line)
        })
        .await;
    progress.finish();
    result?;

    ui::step_ok_detail(&ui_ctx, "Requirements installed", &args.target);
    Ok(())
}

/// Execute the wheels command
pub async fn wheels(args: WheelsArgs, ctx: &CommandContext) -> VenvResult<()> {
    let ui_ctx = UiContext::detect();
    let manager = ctx.open_manager().await?;
    let target = args.target.as_deref().map(VenvTarget::parse);

    let progress = InstallProgress::new(&ui_ctx, "Installing wheels");
    let result = manager
        .install_wheels_from_dir(&args.dir, target.as_ref(), &|line: String| {
            progress.on_line(line)
        })
        .await;
    progress.finish();
    let installed = result?;

    if installed.is_empty() {
        ui::step_warn_hint(
            &ui_ctx,
            &format!("No wheels found under {}", args.dir.display()),
            "Wheels are matched by the .whl extension",
        );
        return Ok(());
    }

    for wheel in &installed {
        if let Some(name) = wheel.file_name() {
            ui::step_ok(&ui_ctx, &name.to_string_lossy());
        }
    }
    let destination = match target {
        Some(ref t) => t.to_string(),
        None => "base interpreter".to_string(),
    };
    ui::outro_success(
        &ui_ctx,
        &format!("Installed {} wheel(s) into {}", installed.len(), destination),
    );
    Ok(())
}
