//! Registry records and location handling

use crate::fingerprint::Fingerprint;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One tracked environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentRecord {
    /// Human-readable venv name
    pub name: String,

    /// Venv root directory
    pub path: PathBuf,

    /// Fingerprint of the venv's requirements, if known yet
    pub requirements_hash: Option<Fingerprint>,
}

impl EnvironmentRecord {
    /// Create a new record
    pub fn new(name: impl Into<String>, path: PathBuf, requirements_hash: Option<Fingerprint>) -> Self {
        Self {
            name: name.into(),
            path,
            requirements_hash,
        }
    }

    /// Whether this record points at `location` once both are resolved
    pub fn is_at(&self, location: &Path) -> bool {
        resolve_location(&self.path) == resolve_location(location)
    }
}

/// Resolve a venv location to an absolute, symlink-free path
///
/// The venv itself may not exist yet, in which case the nearest existing
/// parent is canonicalized and the remaining name appended.
pub fn resolve_location(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    if let Ok(canonical) = absolute.canonicalize() {
        return canonical;
    }

    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => resolve_location(parent).join(name),
        _ => absolute,
    }
}
