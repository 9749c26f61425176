//! In-process Python runtime double
//!
//! Creates venv directories (with a placeholder interpreter) and records what
//! was installed into each one, so `pip freeze` reports it back.

use crate::error::{VenvError, VenvResult};
use crate::python::runtime::PythonRuntime;
use crate::python::{append_log, display_command, venv_python};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Runtime that simulates venv and pip without spawning processes
#[derive(Debug, Default)]
pub struct MockPython {
    installed: Mutex<HashMap<PathBuf, Vec<String>>>,
    venvs_created: Mutex<Vec<PathBuf>>,
    failing_packages: Vec<String>,
}

impl MockPython {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make any install that mentions `package` exit non-zero
    pub fn failing_on(mut self, package: &str) -> Self {
        self.failing_packages.push(package.to_string());
        self
    }

    /// Venvs created so far, in creation order
    pub fn venvs_created(&self) -> VenvResult<Vec<PathBuf>> {
        Ok(self.lock_created()?.clone())
    }

    /// Pretend `packages` are installed in the venv at `venv_dir`
    pub fn seed_packages(&self, venv_dir: &Path, packages: &[&str]) -> VenvResult<()> {
        self.lock_installed()?.insert(
            venv_python(venv_dir),
            packages.iter().map(|p| p.to_string()).collect(),
        );
        Ok(())
    }

    fn lock_installed(&self) -> VenvResult<std::sync::MutexGuard<'_, HashMap<PathBuf, Vec<String>>>> {
        self.installed
            .lock()
            .map_err(|e| VenvError::Internal(format!("mutex poisoned: {e}")))
    }

    fn lock_created(&self) -> VenvResult<std::sync::MutexGuard<'_, Vec<PathBuf>>> {
        self.venvs_created
            .lock()
            .map_err(|e| VenvError::Internal(format!("mutex poisoned: {e}")))
    }

    /// Packages named by install args; `-r <file>` entries are read
    fn expand_args(args: &[String]) -> VenvResult<Vec<String>> {
        let mut packages = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if arg == "-r" {
                let Some(file) = iter.next() else { break };
                let content = std::fs::read_to_string(file)
                    .map_err(|e| VenvError::io(format!("reading {}", file), e))?;
                packages.extend(crate::fingerprint::install_args(
                    &content.lines().collect::<Vec<_>>(),
                ));
            } else if !arg.starts_with('-') {
                packages.push(arg.clone());
            }
        }
        Ok(packages)
    }
}

#[async_trait]
impl PythonRuntime for MockPython {
    async fn create_venv(&self, interpreter: &Path, venv_dir: &Path) -> VenvResult<()> {
        if !interpreter.exists() {
            return Err(VenvError::InterpreterNotFound(interpreter.to_path_buf()));
        }

        let python = venv_python(venv_dir);
        if let Some(bin_dir) = python.parent() {
            std::fs::create_dir_all(bin_dir)
                .map_err(|e| VenvError::io(format!("creating {}", bin_dir.display()), e))?;
        }
        std::fs::write(&python, "")
            .map_err(|e| VenvError::io(format!("writing {}", python.display()), e))?;

        self.lock_created()?.push(venv_dir.to_path_buf());
        self.lock_installed()?.entry(python).or_default();
        Ok(())
    }

    async fn pip_install_with_progress(
        &self,
        python: &Path,
        args: &[String],
        log_path: &Path,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> VenvResult<()> {
        let packages = Self::expand_args(args)?;
        let command = display_command(python, args);

        let mut output = Vec::new();
        for package in &packages {
            let line = format!("Collecting {}", package);
            on_output(line.clone());
            output.push(line);
        }

        let failed = packages
            .iter()
            .any(|p| self.failing_packages.iter().any(|f| p.contains(f.as_str())));
        if failed {
            output.push("ERROR: simulated install failure".to_string());
        } else {
            output.push(format!("Successfully installed {}", packages.join(" ")));
        }

        append_log(log_path, &command, &output).await?;

        if failed {
            return Err(VenvError::process_failed(
                command,
                Some(1),
                Some(log_path.to_path_buf()),
            ));
        }

        self.lock_installed()?
            .entry(python.to_path_buf())
            .or_default()
            .extend(packages);
        Ok(())
    }

    async fn pip_freeze(&self, python: &Path) -> VenvResult<Vec<String>> {
        Ok(self
            .lock_installed()?
            .get(python)
            .cloned()
            .unwrap_or_default())
    }

    fn runtime_name(&self) -> &'static str {
        "mock"
    }
}
