//! Name-or-path venv references

use std::fmt;
use std::path::{Path, PathBuf};

/// How a caller refers to a venv
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VenvTarget {
    /// A registry name, falling back to `<base_dir>/<name>`
    ByName(String),
    /// An explicit filesystem location
    ByPath(PathBuf),
}

impl VenvTarget {
    /// Decide once whether a user token is a path or a name
    ///
    /// Absolute tokens and tokens that exist on disk are paths; anything
    /// else is looked up as a name.
    pub fn parse(token: &str) -> Self {
        let path = Path::new(token);
        if path.is_absolute() || path.exists() {
            Self::ByPath(path.to_path_buf())
        } else {
            Self::ByName(token.to_string())
        }
    }
}

impl fmt::Display for VenvTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByName(name) => write!(f, "{}", name),
            Self::ByPath(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<PathBuf> for VenvTarget {
    fn from(path: PathBuf) -> Self {
        Self::ByPath(path)
    }
}
