//! Durable registry of known venvs
//!
//! The registry is a single pretty-printed JSON array. Every mutation is a
//! whole-document load, modify, save; there is no locking, so two writers
//! racing on the same file can lose updates (last writer wins).

pub mod record;
pub mod target;

pub use record::{resolve_location, EnvironmentRecord};
pub use target::VenvTarget;

use crate::error::{VenvError, VenvResult};
use crate::fingerprint::Fingerprint;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Source of the installed package list for a live venv
///
/// Used to backfill fingerprints for records that were created without one.
#[async_trait]
pub trait PackageInspector: Send + Sync {
    /// Return the `pip freeze` style package lines of the venv rooted at `venv_dir`
    async fn installed_packages(&self, venv_dir: &Path) -> VenvResult<Vec<String>>;
}

/// Result of a fingerprint lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintMatches {
    /// Matching venv locations in registry order
    pub locations: Vec<PathBuf>,

    /// Number of records whose fingerprint was computed and persisted
    pub backfilled: usize,
}

impl FingerprintMatches {
    /// The preferred match, if any
    pub fn first(&self) -> Option<&PathBuf> {
        self.locations.first()
    }
}

/// Handle to the registry document
#[derive(Debug, Clone)]
pub struct Registry {
    path: PathBuf,
}

impl Registry {
    /// Create a registry handle for the given document path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the registry document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the document (as an empty list) if it does not exist yet
    pub async fn ensure_exists(&self) -> VenvResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                VenvError::io(format!("creating registry directory {}", parent.display()), e)
            })?;
        }

        if !self.path.exists() {
            debug!("Initializing empty registry at {}", self.path.display());
            self.save(&[]).await?;
        }
        Ok(())
    }

    /// Load all records
    ///
    /// A missing or blank document is an empty registry. Anything else that
    /// fails to parse is reported, never treated as empty.
    pub async fn load(&self) -> VenvResult<Vec<EnvironmentRecord>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => {
                return Err(VenvError::io(
                    format!("reading registry {}", self.path.display()),
                    e,
                ))
            }
        };

        if content.trim().is_empty() {
            return Ok(vec![]);
        }

        serde_json::from_str(&content).map_err(|e| VenvError::RegistryCorrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Replace the whole document with `records`
    pub async fn save(&self, records: &[EnvironmentRecord]) -> VenvResult<()> {
        let mut content = serde_json::to_string_pretty(records)?;
        content.push('\n');

        // Write next to the target and rename so readers never see a torn file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .await
            .map_err(|e| VenvError::io(format!("writing registry {}", tmp.display()), e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| VenvError::io(format!("replacing registry {}", self.path.display()), e))?;

        debug!("Saved {} registry record(s)", records.len());
        Ok(())
    }

    /// Append a record, replacing any stale record at the same location
    pub async fn append(&self, record: EnvironmentRecord) -> VenvResult<()> {
        let mut records = self.load().await?;

        let before = records.len();
        records.retain(|existing| !existing.is_at(&record.path));
        if records.len() != before {
            warn!(
                "Replacing stale registry entry for {}",
                record.path.display()
            );
        }

        info!("Registered venv {} at {}", record.name, record.path.display());
        records.push(record);
        self.save(&records).await
    }

    /// Remove every record at `location`; returns whether anything was removed
    pub async fn remove_location(&self, location: &Path) -> VenvResult<bool> {
        let records = self.load().await?;
        let before = records.len();

        let kept: Vec<EnvironmentRecord> = records
            .into_iter()
            .filter(|record| !record.is_at(location))
            .collect();

        if kept.len() == before {
            return Ok(false);
        }

        self.save(&kept).await?;
        info!("Unregistered venv at {}", location.display());
        Ok(true)
    }

    /// Empty the registry, returning the records that were dropped
    pub async fn clear(&self) -> VenvResult<Vec<EnvironmentRecord>> {
        let records = self.load().await?;
        self.save(&[]).await?;
        info!("Cleared {} registry record(s)", records.len());
        Ok(records)
    }

    /// Find venvs whose fingerprint equals `target`
    ///
    /// Records without a fingerprint whose venv still exists are introspected
    /// through `inspector` first. Backfilled fingerprints are persisted in a
    /// single save, and only when at least one record changed.
    pub async fn find_by_fingerprint<I>(
        &self,
        target: &Fingerprint,
        inspector: &I,
    ) -> VenvResult<FingerprintMatches>
    where
        I: PackageInspector + ?Sized,
    {
        let mut records = self.load().await?;
        let mut matches = FingerprintMatches::default();

        for record in &mut records {
            if record.requirements_hash.is_none() && record.path.exists() {
                debug!("Backfilling fingerprint for {}", record.path.display());
                let packages = inspector.installed_packages(&record.path).await?;
                record.requirements_hash = Some(Fingerprint::of_installed(&packages));
                matches.backfilled += 1;
            }

            if record.requirements_hash.as_ref() == Some(target) {
                matches.locations.push(record.path.clone());
            }
        }

        if matches.backfilled > 0 {
            self.save(&records).await?;
            info!("Backfilled {} fingerprint(s)", matches.backfilled);
        }

        debug!(
            "Fingerprint {} matched {} venv(s)",
            target.short(),
            matches.locations.len()
        );
        Ok(matches)
    }

    /// Turn a venv reference into a location
    ///
    /// Paths are returned unchanged. Names resolve to the first registry
    /// record with that name, else to `<base_dir>/<name>`; existence is not
    /// checked.
    pub async fn resolve(&self, target: &VenvTarget, base_dir: &Path) -> VenvResult<PathBuf> {
        match target {
            VenvTarget::ByPath(path) => Ok(path.clone()),
            VenvTarget::ByName(name) => {
                let records = self.load().await?;
                if let Some(record) = records.iter().find(|r| &r.name == name) {
                    return Ok(record.path.clone());
                }
                Ok(resolve_location(&base_dir.join(name)))
            }
        }
    }

    /// Resolve a raw user token, checking the filesystem to tell names from paths
    pub async fn resolve_name_or_location(
        &self,
        token: &str,
        base_dir: &Path,
    ) -> VenvResult<PathBuf> {
        self.resolve(&VenvTarget::parse(token), base_dir).await
    }
}
