//! Logs command - view a venv's pip install log

use crate::cli::args::LogsArgs;
use crate::cli::CommandContext;
use crate::error::{VenvError, VenvResult};
use crate::registry::VenvTarget;
use crate::ui::{self, UiContext};
use tokio::fs;

/// Execute the logs command
pub async fn execute(args: LogsArgs, ctx: &CommandContext) -> VenvResult<()> {
    let ui_ctx = UiContext::detect();
    let manager = ctx.open_manager().await?;
    let target = VenvTarget::parse(&args.target);

    if let Some(ref output_dir) = args.copy_to {
        match manager.copy_pip_install_log(&target, output_dir).await? {
            Some(copied) => {
                ui::step_ok_detail(&ui_ctx, "Log copied", &copied.display().to_string())
            }
            None => ui::step_info(&ui_ctx, &format!("{} has no pip log yet", target)),
        }
        return Ok(());
    }

    let Some(log_path) = manager.pip_install_log(&target).await? else {
        ui::step_info(&ui_ctx, &format!("{} has no pip log yet", target));
        return Ok(());
    };

    let content = fs::read_to_string(&log_path)
        .await
        .map_err(|e| VenvError::io(format!("reading {}", log_path.display()), e))?;
    print!("{}", content);
    Ok(())
}
