//! Venv lifecycle management
//!
//! `VenvManager` ties the registry, the fingerprint engine and a
//! `PythonRuntime` together. Every operation runs its steps in order and
//! returns once the last subprocess or file write has finished.

use crate::config::Settings;
use crate::error::{VenvError, VenvResult};
use crate::fingerprint::{install_args, Fingerprint, RequirementSpec};
use crate::python::{pip_log_path, venv_python, PythonRuntime, BASE_PIP_LOG_NAME};
use crate::registry::{resolve_location, EnvironmentRecord, Registry, VenvTarget};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Outcome of [`VenvManager::ensure_venv`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provisioned {
    /// A registered venv with matching requirements was handed back
    Reused(PathBuf),
    /// A new venv was created and registered
    Created(PathBuf),
}

impl Provisioned {
    pub fn location(&self) -> &Path {
        match self {
            Self::Reused(location) | Self::Created(location) => location,
        }
    }

    pub fn into_location(self) -> PathBuf {
        match self {
            Self::Reused(location) | Self::Created(location) => location,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Manages venvs created from one base interpreter
pub struct VenvManager {
    settings: Settings,
    registry: Registry,
    runtime: Box<dyn PythonRuntime>,
}

impl VenvManager {
    /// Open the pool described by `settings`
    ///
    /// Fails if the base interpreter is missing. Creates the base directory
    /// and an empty registry on first use.
    pub async fn open(settings: Settings, runtime: Box<dyn PythonRuntime>) -> VenvResult<Self> {
        if !settings.base_interpreter.is_file() {
            return Err(VenvError::InterpreterNotFound(
                settings.base_interpreter.clone(),
            ));
        }

        fs::create_dir_all(&settings.base_dir).await.map_err(|e| {
            VenvError::io(
                format!("creating base directory {}", settings.base_dir.display()),
                e,
            )
        })?;

        let registry = Registry::new(settings.registry_path.clone());
        registry.ensure_exists().await?;

        debug!(
            "Opened venv pool at {} ({} runtime)",
            settings.base_dir.display(),
            runtime.runtime_name()
        );

        Ok(Self {
            settings,
            registry,
            runtime,
        })
    }

    /// Effective settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The registry backing this pool
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Create a new venv and register it
    ///
    /// The location is `path` or `<base_dir>/<name>`. A non-empty spec is
    /// installed and its fingerprint recorded.
    pub async fn create_venv(
        &self,
        name: &str,
        path: Option<&Path>,
        requirements: Option<&RequirementSpec>,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> VenvResult<PathBuf> {
        let location = match path {
            Some(path) => resolve_location(path),
            None => resolve_location(&self.settings.base_dir.join(name)),
        };

        if location.exists() {
            return Err(VenvError::VenvExists(location));
        }

        let requirements = requirements.filter(|spec| !spec.is_empty());
        let requirements_hash = self
            .provision(&location, requirements, on_output)
            .await
            .inspect_err(|_| {
                if location.exists() {
                    warn!(
                        "Left unregistered directory {} behind; remove it before retrying",
                        location.display()
                    );
                }
            })?;

        self.registry
            .append(EnvironmentRecord::new(
                name,
                location.clone(),
                requirements_hash,
            ))
            .await?;

        info!("Created venv {} at {}", name, location.display());
        Ok(location)
    }

    /// Create the venv and install `requirements`, returning their fingerprint
    async fn provision(
        &self,
        location: &Path,
        requirements: Option<&RequirementSpec>,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> VenvResult<Option<Fingerprint>> {
        self.runtime
            .create_venv(&self.settings.base_interpreter, location)
            .await?;

        match requirements {
            Some(spec) => {
                self.install_requirements_with_progress(location, spec, on_output)
                    .await?;
                Ok(Some(spec.fingerprint().await?))
            }
            None => Ok(None),
        }
    }

    /// Return an existing venv matching `requirements`, or create one
    ///
    /// Reuse only happens for a non-empty spec; the first matching venv that
    /// still exists on disk wins.
    pub async fn get_or_create_venv(
        &self,
        name: &str,
        path: Option<&Path>,
        requirements: Option<&RequirementSpec>,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> VenvResult<PathBuf> {
        Ok(self
            .ensure_venv(name, path, requirements, on_output)
            .await?
            .into_location())
    }

    /// Like [`get_or_create_venv`](Self::get_or_create_venv), reporting
    /// whether the venv was reused or created
    pub async fn ensure_venv(
        &self,
        name: &str,
        path: Option<&Path>,
        requirements: Option<&RequirementSpec>,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> VenvResult<Provisioned> {
        if let Some(spec) = requirements.filter(|spec| !spec.is_empty()) {
            let existing = self.find_venvs_by_requirements(spec).await?;
            if let Some(location) = existing.into_iter().find(|p| p.exists()) {
                info!("Reusing venv at {}", location.display());
                return Ok(Provisioned::Reused(location));
            }
        }

        let location = self.create_venv(name, path, requirements, on_output).await?;
        Ok(Provisioned::Created(location))
    }

    /// All registered venvs in registry order
    pub async fn list_venvs(&self) -> VenvResult<Vec<EnvironmentRecord>> {
        self.registry.load().await
    }

    /// Unregister a venv and optionally delete its directory
    ///
    /// Returns whether a registry record was removed.
    pub async fn delete_venv(&self, target: &VenvTarget, remove_dir: bool) -> VenvResult<bool> {
        let location = resolve_location(&self.resolve(target).await?);

        let removed = self.registry.remove_location(&location).await?;

        if remove_dir && location.exists() {
            remove_venv_dir(&location).await?;
        }

        Ok(removed)
    }

    /// Unregister every venv, optionally deleting their directories
    pub async fn clear_all_venvs(&self, remove_dirs: bool) -> VenvResult<Vec<PathBuf>> {
        let removed: Vec<PathBuf> = self
            .registry
            .clear()
            .await?
            .into_iter()
            .map(|record| record.path)
            .collect();

        if remove_dirs {
            for location in &removed {
                if location.exists() {
                    remove_venv_dir(location).await?;
                }
            }
        }

        Ok(removed)
    }

    /// Install a dependency spec into the venv at `venv_dir`
    pub async fn install_requirements(
        &self,
        venv_dir: &Path,
        requirements: &RequirementSpec,
    ) -> VenvResult<()> {
        self.install_requirements_with_progress(venv_dir, requirements, &|_line: String| {})
            .await
    }

    /// Install a dependency spec, streaming pip output to `on_output`
    pub async fn install_requirements_with_progress(
        &self,
        venv_dir: &Path,
        requirements: &RequirementSpec,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> VenvResult<()> {
        let args = match requirements {
            RequirementSpec::File(path) => {
                if !path.exists() {
                    return Err(VenvError::RequirementsNotFound(path.clone()));
                }
                vec!["-r".to_string(), path.display().to_string()]
            }
            RequirementSpec::Lines(lines) => install_args(lines),
            RequirementSpec::Literal(req) => vec![req.clone()],
        };

        if args.is_empty() {
            debug!("Nothing to install into {}", venv_dir.display());
            return Ok(());
        }

        self.runtime
            .pip_install_with_progress(
                &venv_python(venv_dir),
                &args,
                &pip_log_path(venv_dir),
                on_output,
            )
            .await
    }

    /// Install every wheel found under `wheels_dir`
    ///
    /// Installs into the target venv, or into the base interpreter when no
    /// target is given. Returns the wheels that were installed.
    pub async fn install_wheels_from_dir(
        &self,
        wheels_dir: &Path,
        target: Option<&VenvTarget>,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> VenvResult<Vec<PathBuf>> {
        if !wheels_dir.exists() {
            return Err(VenvError::WheelsDirNotFound(wheels_dir.to_path_buf()));
        }

        let wheels = find_wheels(wheels_dir)?;
        if wheels.is_empty() {
            warn!("No wheels found under {}", wheels_dir.display());
            return Ok(wheels);
        }

        let (python, log_path) = match target {
            None => (
                self.settings.base_interpreter.clone(),
                self.settings.base_dir.join(BASE_PIP_LOG_NAME),
            ),
            Some(target) => {
                let venv_dir = self.resolve(target).await?;
                (venv_python(&venv_dir), pip_log_path(&venv_dir))
            }
        };

        let args: Vec<String> = wheels.iter().map(|w| w.display().to_string()).collect();
        self.runtime
            .pip_install_with_progress(&python, &args, &log_path, on_output)
            .await?;

        info!("Installed {} wheel(s)", wheels.len());
        Ok(wheels)
    }

    /// Packages installed in a venv, as reported by `pip freeze`
    pub async fn list_installed_packages(&self, target: &VenvTarget) -> VenvResult<Vec<String>> {
        let venv_dir = self.resolve(target).await?;
        if !venv_dir.is_dir() {
            return Err(VenvError::PathNotFound(venv_dir));
        }
        self.runtime.pip_freeze(&venv_python(&venv_dir)).await
    }

    /// Interpreter path inside a venv
    pub async fn get_python_path(&self, target: &VenvTarget) -> VenvResult<PathBuf> {
        let venv_dir = self.resolve(target).await?;
        Ok(venv_python(&venv_dir))
    }

    /// Path of a venv's pip log, if one has been written
    pub async fn pip_install_log(&self, target: &VenvTarget) -> VenvResult<Option<PathBuf>> {
        let log_path = pip_log_path(&self.resolve(target).await?);
        Ok(log_path.exists().then_some(log_path))
    }

    /// Copy a venv's pip log into `output_dir`
    ///
    /// Returns `None` when the venv has no log yet.
    pub async fn copy_pip_install_log(
        &self,
        target: &VenvTarget,
        output_dir: &Path,
    ) -> VenvResult<Option<PathBuf>> {
        let Some(log_path) = self.pip_install_log(target).await? else {
            return Ok(None);
        };

        fs::create_dir_all(output_dir).await.map_err(|e| {
            VenvError::io(format!("creating directory {}", output_dir.display()), e)
        })?;

        let destination = output_dir.join(crate::python::PIP_LOG_NAME);
        fs::copy(&log_path, &destination).await.map_err(|e| {
            VenvError::io(
                format!(
                    "copying {} to {}",
                    log_path.display(),
                    destination.display()
                ),
                e,
            )
        })?;

        Ok(Some(destination))
    }

    /// Locations of venvs whose fingerprint matches `requirements`
    pub async fn find_venvs_by_requirements(
        &self,
        requirements: &RequirementSpec,
    ) -> VenvResult<Vec<PathBuf>> {
        let target = requirements.fingerprint().await?;
        let matches = self
            .registry
            .find_by_fingerprint(&target, self.runtime.as_ref())
            .await?;
        Ok(matches.locations)
    }

    /// Fingerprint the packages currently installed in a venv
    pub async fn fingerprint_installed(&self, target: &VenvTarget) -> VenvResult<Fingerprint> {
        let packages = self.list_installed_packages(target).await?;
        Ok(Fingerprint::of_installed(&packages))
    }

    /// Turn a venv reference into a location
    pub async fn resolve(&self, target: &VenvTarget) -> VenvResult<PathBuf> {
        self.registry.resolve(target, &self.settings.base_dir).await
    }
}

/// Every `*.whl` under `dir`, recursively, in sorted order
fn find_wheels(dir: &Path) -> VenvResult<Vec<PathBuf>> {
    let mut wheels = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| {
            VenvError::io(
                format!("scanning {}", dir.display()),
                std::io::Error::other(e),
            )
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "whl") {
            wheels.push(path.to_path_buf());
        }
    }
    wheels.sort();
    Ok(wheels)
}

async fn remove_venv_dir(location: &Path) -> VenvResult<()> {
    fs::remove_dir_all(location)
        .await
        .map_err(|e| VenvError::io(format!("removing venv {}", location.display()), e))?;
    info!("Removed venv directory {}", location.display());
    Ok(())
}
