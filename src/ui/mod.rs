//! Terminal UI helpers
//!
//! Uses `cliclack` for framed output and prompts and `indicatif` for pip
//! progress, falling back to plain lines when stdout is not a terminal or a
//! CI environment is detected.

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, outro_success, remark, step_info, step_ok, step_ok_detail, step_warn_hint,
};
pub use progress::{InstallProgress, TaskSpinner};
pub use prompts::confirm;
pub use theme::{init_theme, PoolTheme};
