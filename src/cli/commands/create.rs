//! Create and ensure commands - make or reuse a venv

use crate::cli::args::CreateArgs;
use crate::cli::CommandContext;
use crate::error::VenvResult;
use crate::ui::{self, InstallProgress, UiContext};
use tracing::debug;

/// Execute the create command
pub async fn execute(args: CreateArgs, ctx: &CommandContext) -> VenvResult<()> {
    let ui_ctx = UiContext::detect();
    let manager = ctx.open_manager().await?;
    let spec = args.requirements.to_spec();

    ui::intro(&ui_ctx, &format!("Creating venv {}", args.name));

    let progress = InstallProgress::new(&ui_ctx, &args.name);
    let result = manager
        .create_venv(
            &args.name,
            args.path.as_deref(),
            spec.as_ref(),
            &|line: String| progress.on_line(line),
        )
        .await;
    progress.finish();

    let location = result?;
    ui::step_ok_detail(&ui_ctx, "Venv created", &location.display().to_string());
    ui::outro_success(&ui_ctx, &location.display().to_string());
    Ok(())
}

/// Execute the ensure command
///
/// Stdout carries only the venv location so scripts can capture it.
pub async fn ensure(args: CreateArgs, ctx: &CommandContext) -> VenvResult<()> {
    let ui_ctx = UiContext::detect().with_stdout_reserved();
    let manager = ctx.open_manager().await?;
    let spec = args.requirements.to_spec();

    let progress = InstallProgress::new(&ui_ctx, &args.name);
    let result = manager
        .ensure_venv(
            &args.name,
            args.path.as_deref(),
            spec.as_ref(),
            &|line: String| progress.on_line(line),
        )
        .await;
    progress.finish();

    let provisioned = result?;
    debug!("ensure {}: created={}", args.name, provisioned.was_created());

    if provisioned.was_created() {
        ui::step_ok_detail(&ui_ctx, "Venv created", &args.name);
    } else {
        ui::step_ok_detail(&ui_ctx, "Reusing venv", &args.name);
    }
    println!("{}", provisioned.location().display());
    Ok(())
}
