//! Error types for venvpool
//!
//! All modules use `VenvResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for venvpool operations
pub type VenvResult<T> = Result<T, VenvError>;

/// Broad failure categories surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required interpreter, file or directory is missing
    NotFound,
    /// The target location is already populated
    AlreadyExists,
    /// An external process failed to start or exited non-zero
    ProcessFailure,
    /// Persisted state is present but unreadable
    ParseError,
    /// Anything else (IO, serialization, user input)
    Other,
}

/// All errors that can occur in venvpool
#[derive(Error, Debug)]
pub enum VenvError {
    // Lookup errors
    #[error("Base interpreter not found: {0}")]
    InterpreterNotFound(PathBuf),

    #[error("Requirements file not found: {0}")]
    RequirementsNotFound(PathBuf),

    #[error("Wheels directory not found: {0}")]
    WheelsDirNotFound(PathBuf),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Environment errors
    #[error("Venv already exists at: {0}")]
    VenvExists(PathBuf),

    // Registry errors
    #[error("Registry at {path} is corrupt: {reason}")]
    RegistryCorrupt { path: PathBuf, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed to start: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command exited with {}: {command}", exit_label(.code))]
    ProcessFailed {
        command: String,
        code: Option<i32>,
        log: Option<PathBuf>,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

impl VenvError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a non-zero exit error, optionally pointing at the captured log
    pub fn process_failed(
        command: impl Into<String>,
        code: Option<i32>,
        log: Option<PathBuf>,
    ) -> Self {
        Self::ProcessFailed {
            command: command.into(),
            code,
            log,
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InterpreterNotFound(_)
            | Self::RequirementsNotFound(_)
            | Self::WheelsDirNotFound(_)
            | Self::PathNotFound(_) => ErrorKind::NotFound,
            Self::VenvExists(_) => ErrorKind::AlreadyExists,
            Self::CommandFailed { .. } | Self::ProcessFailed { .. } => ErrorKind::ProcessFailure,
            Self::RegistryCorrupt { .. } | Self::ConfigInvalid { .. } => ErrorKind::ParseError,
            _ => ErrorKind::Other,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::InterpreterNotFound(_) => {
                Some("Pass --interpreter or run: venvpool config set python.interpreter <path>".to_string())
            }
            Self::VenvExists(path) => Some(format!(
                "Use `venvpool ensure` to reuse a matching venv, or remove a leftover with `venvpool delete {}`",
                path.display()
            )),
            Self::ProcessFailed { log: Some(log), .. } => {
                Some(format!("See the install log at {}", log.display()))
            }
            Self::RegistryCorrupt { path, .. } => Some(format!(
                "Fix or remove {} (all tracked venvs are listed there)",
                path.display()
            )),
            _ => None,
        }
    }
}
