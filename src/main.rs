//! venvpool - reusable Python virtual environments
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use venvpool::cli::{commands, Cli, CommandContext, Commands};
use venvpool::config::{ConfigManager, Overrides};
use venvpool::error::VenvResult;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> VenvResult<()> {
    let cli = Cli::parse();

    // Completions need neither config nor logging
    if let Commands::Completions(args) = cli.command {
        return commands::completions(args);
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config.general.log_format);
    venvpool::ui::init_theme(&venvpool::ui::UiContext::detect());

    let ctx = CommandContext::new(
        config,
        config_manager,
        Overrides {
            interpreter: cli.interpreter,
            base_dir: cli.base_dir,
            registry: cli.registry,
        },
    );

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::Create(args) => commands::create(args, &ctx).await,
        Commands::Ensure(args) => commands::ensure(args, &ctx).await,
        Commands::List(args) => commands::list(args, &ctx).await,
        Commands::Delete(args) => commands::delete(args, &ctx).await,
        Commands::Clear(args) => commands::clear(args, &ctx).await,
        Commands::Install(args) => commands::install(args, &ctx).await,
        Commands::Wheels(args) => commands::wheels(args, &ctx).await,
        Commands::Freeze(args) => commands::freeze(args, &ctx).await,
        Commands::Python(args) => commands::python(args, &ctx).await,
        Commands::Find(args) => commands::find(args, &ctx).await,
        Commands::Fingerprint(args) => commands::fingerprint(args, &ctx).await,
        Commands::Logs(args) => commands::logs(args, &ctx).await,
        Commands::Config(args) => commands::config(args, &ctx).await,
    }
}

/// 0 = warn (spinners only), 1 = info, 2+ = debug
fn init_logging(verbose: u8, log_format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("venvpool=warn"),
        1 => EnvFilter::new("venvpool=info"),
        _ => EnvFilter::new("venvpool=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
