//! Fingerprint command - hash a requirement set or a live venv

use crate::cli::args::FingerprintArgs;
use crate::cli::CommandContext;
use crate::error::VenvResult;
use crate::fingerprint::{Fingerprint, RequirementSpec};
use crate::registry::VenvTarget;

/// Execute the fingerprint command
///
/// With `--venv` the installed packages are hashed; otherwise the given
/// requirements, or the empty set when none are given.
pub async fn execute(args: FingerprintArgs, ctx: &CommandContext) -> VenvResult<()> {
    let fingerprint = match args.venv {
        Some(ref venv) => {
            let manager = ctx.open_manager().await?;
            manager
                .fingerprint_installed(&VenvTarget::parse(venv))
                .await?
        }
        None => requested(args.requirements.to_spec()).await?,
    };

    println!("{}", fingerprint);
    Ok(())
}

async fn requested(spec: Option<RequirementSpec>) -> VenvResult<Fingerprint> {
    match spec {
        Some(spec) => spec.fingerprint().await,
        None => Ok(Fingerprint::of_lines(Vec::<String>::new())),
    }
}
