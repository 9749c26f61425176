//! CLI command implementations

pub mod completions;
pub mod config;
pub mod create;
pub mod delete;
pub mod fingerprint;
pub mod install;
pub mod list;
pub mod logs;
pub mod query;

pub use completions::execute as completions;
pub use config::execute as config;
pub use create::ensure;
pub use create::execute as create;
pub use delete::clear;
pub use delete::execute as delete;
pub use fingerprint::execute as fingerprint;
pub use install::execute as install;
pub use install::wheels;
pub use list::execute as list;
pub use logs::execute as logs;
pub use query::{find, freeze, python};
