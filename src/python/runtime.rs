//! Python runtime abstraction
//!
//! Provides a trait for the external processes venvpool drives, so the
//! manager can run against real interpreters or an in-process double.

use crate::error::VenvResult;
use crate::python::venv_python;
use crate::registry::PackageInspector;
use async_trait::async_trait;
use std::path::Path;

/// Abstract interface to the base interpreter, `venv` and `pip`
#[async_trait]
pub trait PythonRuntime: Send + Sync {
    /// Create a venv at `venv_dir` using `interpreter -m venv`
    async fn create_venv(&self, interpreter: &Path, venv_dir: &Path) -> VenvResult<()>;

    /// Run `python -m pip install <args>`, appending all output to `log_path`
    ///
    /// The log is written before a non-zero exit is reported.
    async fn pip_install(&self, python: &Path, args: &[String], log_path: &Path) -> VenvResult<()> {
        self.pip_install_with_progress(python, args, log_path, &|_line: String| {})
            .await
    }

    /// Like [`pip_install`](Self::pip_install), calling `on_output` for each output line
    async fn pip_install_with_progress(
        &self,
        python: &Path,
        args: &[String],
        log_path: &Path,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> VenvResult<()>;

    /// Run `python -m pip freeze` and return the non-empty, trimmed lines
    async fn pip_freeze(&self, python: &Path) -> VenvResult<Vec<String>>;

    /// Get the human-readable runtime name for display
    fn runtime_name(&self) -> &'static str;
}

#[async_trait]
impl<R> PackageInspector for R
where
    R: PythonRuntime + ?Sized,
{
    async fn installed_packages(&self, venv_dir: &Path) -> VenvResult<Vec<String>> {
        self.pip_freeze(&venv_python(venv_dir)).await
    }
}
