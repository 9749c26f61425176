//! Completions command - print a shell completion script

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::VenvResult;
use clap::CommandFactory;

/// Execute the completions command
pub fn execute(args: CompletionsArgs) -> VenvResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(args.shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
