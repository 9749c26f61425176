//! Dependency specifications accepted by create, install and lookup

use crate::error::{VenvError, VenvResult};
use crate::fingerprint::Fingerprint;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A dependency set, given as lines, a requirements file or one literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementSpec {
    /// Explicit requirement lines
    Lines(Vec<String>),
    /// Requirements file read as newline-separated lines
    File(PathBuf),
    /// A single requirement string used verbatim
    Literal(String),
}

impl RequirementSpec {
    /// Interpret a single token: a requirements file if one exists at
    /// that path, otherwise a literal requirement
    pub fn from_token(token: &str) -> Self {
        let path = Path::new(token);
        if path.is_file() {
            Self::File(path.to_path_buf())
        } else {
            Self::Literal(token.to_string())
        }
    }

    /// Build from explicit lines
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Lines(lines.into_iter().map(Into::into).collect())
    }

    /// Whether the spec carries no requirements at all
    ///
    /// Only an empty line list counts; a file or literal is never empty
    /// before it is read.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Lines(lines) if lines.is_empty())
    }

    /// Read the raw requirement lines
    pub async fn read_lines(&self) -> VenvResult<Vec<String>> {
        match self {
            Self::Lines(lines) => Ok(lines.clone()),
            Self::Literal(req) => Ok(vec![req.clone()]),
            Self::File(path) => {
                if !path.exists() {
                    return Err(VenvError::RequirementsNotFound(path.clone()));
                }
                let content = fs::read_to_string(path).await.map_err(|e| {
                    VenvError::io(format!("reading requirements {}", path.display()), e)
                })?;
                Ok(content.lines().map(str::to_string).collect())
            }
        }
    }

    /// Fingerprint the requested dependency set
    pub async fn fingerprint(&self) -> VenvResult<Fingerprint> {
        let lines = self.read_lines().await?;
        Ok(Fingerprint::of_lines(&lines))
    }
}
