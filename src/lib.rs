//! venvpool - reusable Python virtual environments
//!
//! Creates venvs from a base interpreter, keeps a registry of them and
//! reuses an existing venv when its requirement fingerprint matches.

pub mod cli;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod manager;
pub mod python;
pub mod registry;
pub mod ui;

pub use error::{VenvError, VenvResult};
pub use manager::VenvManager;
