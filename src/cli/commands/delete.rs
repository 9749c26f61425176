//! Delete and clear commands - unregister venvs

use crate::cli::args::{ClearArgs, DeleteArgs};
use crate::cli::CommandContext;
use crate::error::VenvResult;
use crate::registry::VenvTarget;
use crate::ui::{self, TaskSpinner, UiContext};

/// Execute the delete command
pub async fn execute(args: DeleteArgs, ctx: &CommandContext) -> VenvResult<()> {
    let ui_ctx = UiContext::detect();
    let manager = ctx.open_manager().await?;
    let target = VenvTarget::parse(&args.target);

    let mut spinner = TaskSpinner::new(&ui_ctx);
    spinner.start(&format!("Removing {}", target));
    let removed = match manager.delete_venv(&target, !args.keep_dir).await {
        Ok(removed) => {
            spinner.stop("Done");
            removed
        }
        Err(e) => {
            spinner.stop_error(&format!("Failed to remove {}", target));
            return Err(e);
        }
    };

    if removed {
        ui::step_ok_detail(&ui_ctx, "Venv removed", &target.to_string());
    } else {
        ui::step_warn_hint(
            &ui_ctx,
            &format!("{} was not registered", target),
            "Run `venvpool list` to see registered venvs",
        );
    }
    Ok(())
}

/// Execute the clear command
pub async fn clear(args: ClearArgs, ctx: &CommandContext) -> VenvResult<()> {
    let ui_ctx = UiContext::detect().with_auto_yes(args.yes);
    let manager = ctx.open_manager().await?;

    let count = manager.list_venvs().await?.len();
    if count == 0 {
        ui::step_info(&ui_ctx, "No venvs registered");
        return Ok(());
    }

    let prompt = if args.keep_dirs {
        format!("Unregister {} venv(s)?", count)
    } else {
        format!("Unregister and delete {} venv(s)?", count)
    };
    if !ui::confirm(&ui_ctx, &prompt, false).await? {
        ui::remark(&ui_ctx, "Aborted; use --yes to skip the prompt");
        return Ok(());
    }

    let removed = manager.clear_all_venvs(!args.keep_dirs).await?;
    for location in &removed {
        ui::step_ok(&ui_ctx, &location.display().to_string());
    }
    ui::outro_success(&ui_ctx, &format!("Cleared {} venv(s)", removed.len()));
    Ok(())
}
