//! List command - show registered venvs

use crate::cli::args::{ListArgs, OutputFormat};
use crate::cli::CommandContext;
use crate::error::VenvResult;
use crate::registry::EnvironmentRecord;
use crate::ui::{self, UiContext};
use console::style;

/// Execute the list command
pub async fn execute(args: ListArgs, ctx: &CommandContext) -> VenvResult<()> {
    let manager = ctx.open_manager().await?;
    let records = manager.list_venvs().await?;

    if records.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ui_ctx = UiContext::detect();
                ui::step_info(&ui_ctx, "No venvs registered");
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&records),
        OutputFormat::Json => print_json(&records)?,
        OutputFormat::Plain => print_plain(&records),
    }

    Ok(())
}

fn print_table(records: &[EnvironmentRecord]) {
    let ui_ctx = UiContext::detect();
    ui::intro(&ui_ctx, "Venvs");

    println!(
        "{:<20} {:<8} {:<14} {}",
        style("NAME").bold(),
        style("STATE").bold(),
        style("FINGERPRINT").bold(),
        style("PATH").bold()
    );
    println!("{}", "-".repeat(77));

    for record in records {
        let state = if record.path.exists() {
            style("ok").green()
        } else {
            style("missing").red()
        };
        let fingerprint = record
            .requirements_hash
            .as_ref()
            .map(|f| f.short().to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<20} {:<8} {:<14} {}",
            record.name,
            state,
            fingerprint,
            record.path.display()
        );
    }

    println!();
    println!("{} venv(s)", records.len());
}

fn print_json(records: &[EnvironmentRecord]) -> VenvResult<()> {
    let json = serde_json::to_string_pretty(records)?;
    println!("{}", json);
    Ok(())
}

fn print_plain(records: &[EnvironmentRecord]) {
    for record in records {
        println!("{}\t{}", record.name, record.path.display());
    }
}
