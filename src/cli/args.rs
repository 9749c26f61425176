//! CLI argument definitions using clap derive

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// venvpool - reusable Python virtual environments
///
/// Creates venvs from a base interpreter, records them in a registry and
/// hands back an existing venv when the same requirements are asked for
/// again.
#[derive(Parser, Debug)]
#[command(name = "venvpool")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "VENVPOOL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base Python interpreter (overrides python.interpreter)
    #[arg(long, global = true, env = "VENVPOOL_PYTHON")]
    pub interpreter: Option<PathBuf>,

    /// Directory venvs are created under (overrides storage.base_dir)
    #[arg(long, global = true, env = "VENVPOOL_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Registry file (overrides storage.registry_path)
    #[arg(long, global = true, env = "VENVPOOL_REGISTRY")]
    pub registry: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new venv
    Create(CreateArgs),

    /// Reuse a venv with matching requirements, or create one
    Ensure(CreateArgs),

    /// List registered venvs
    List(ListArgs),

    /// Unregister a venv and delete its directory
    Delete(DeleteArgs),

    /// Unregister every venv
    Clear(ClearArgs),

    /// Install requirements into a venv
    Install(InstallArgs),

    /// Install every wheel found in a directory
    Wheels(WheelsArgs),

    /// Show packages installed in a venv
    Freeze(TargetArgs),

    /// Print the interpreter path of a venv
    Python(TargetArgs),

    /// Find venvs whose requirements match
    Find(FindArgs),

    /// Print the fingerprint of a requirement set or a venv
    Fingerprint(FingerprintArgs),

    /// Show or copy a venv's pip install log
    Logs(LogsArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Requirement arguments shared by several commands
#[derive(Args, Debug, Clone, Default)]
pub struct RequirementArgs {
    /// Requirements file
    #[arg(short = 'r', long = "requirements", value_name = "FILE", conflicts_with = "packages")]
    pub requirements: Option<PathBuf>,

    /// A requirements file if one exists at TOKEN, else one requirement
    #[arg(long, value_name = "TOKEN", conflicts_with_all = ["requirements", "packages"])]
    pub spec: Option<String>,

    /// Requirement lines (e.g. "flask==2.0")
    #[arg(value_name = "REQ")]
    pub packages: Vec<String>,
}

/// Arguments for the create and ensure commands
#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Venv name
    pub name: String,

    /// Explicit location (defaults to <base-dir>/<name>)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    #[command(flatten)]
    pub requirements: RequirementArgs,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the delete command
#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Venv name or path
    pub target: String,

    /// Only unregister, leave the directory in place
    #[arg(long)]
    pub keep_dir: bool,
}

/// Arguments for the clear command
#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Only unregister, leave directories in place
    #[arg(long)]
    pub keep_dirs: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the install command
#[derive(Parser, Debug)]
pub struct InstallArgs {
    /// Venv name or path
    pub target: String,

    #[command(flatten)]
    pub requirements: RequirementArgs,
}

/// Arguments for the wheels command
#[derive(Parser, Debug)]
pub struct WheelsArgs {
    /// Directory searched recursively for *.whl files
    pub dir: PathBuf,

    /// Venv to install into (defaults to the base interpreter)
    #[arg(short, long)]
    pub target: Option<String>,
}

/// A single venv name or path
#[derive(Parser, Debug)]
pub struct TargetArgs {
    /// Venv name or path
    pub target: String,
}

/// Arguments for the find command
#[derive(Parser, Debug)]
pub struct FindArgs {
    #[command(flatten)]
    pub requirements: RequirementArgs,

    /// Output format
    #[arg(short, long, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments for the fingerprint command
#[derive(Parser, Debug)]
pub struct FingerprintArgs {
    #[command(flatten)]
    pub requirements: RequirementArgs,

    /// Fingerprint the packages installed in this venv instead
    #[arg(long, value_name = "TARGET", conflicts_with_all = ["requirements", "packages"])]
    pub venv: Option<String>,
}

/// Arguments for the logs command
#[derive(Parser, Debug)]
pub struct LogsArgs {
    /// Venv name or path
    pub target: String,

    /// Copy the log into this directory instead of printing it
    #[arg(long, value_name = "DIR")]
    pub copy_to: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., python.interpreter)
        key: String,
        /// Value to set
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: Shell,
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
