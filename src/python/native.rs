//! Native Python runtime
//!
//! Implements the PythonRuntime trait by spawning the base interpreter and
//! venv interpreters directly.

use crate::error::{VenvError, VenvResult};
use crate::python::runtime::PythonRuntime;
use crate::python::{append_log, display_command, pip_log_path, stream_child_output};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Runtime that executes real Python processes
#[derive(Debug, Clone, Default)]
pub struct NativePython {
    /// Extra arguments inserted after `pip install`
    pip_extra_args: Vec<String>,
}

impl NativePython {
    /// Create a new native runtime
    pub fn new() -> Self {
        Self::default()
    }

    /// Add arguments passed to every `pip install` (e.g. `--no-index`)
    pub fn with_pip_args(mut self, args: Vec<String>) -> Self {
        self.pip_extra_args = args;
        self
    }

    /// Execute a command to completion and capture its output
    async fn exec(&self, program: &Path, args: &[String]) -> VenvResult<std::process::Output> {
        let command = display_command(program, args);
        debug!("Executing: {}", command);

        Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| VenvError::command_failed(command, e))
    }
}

/// Captured stdout then stderr, one entry per line
fn output_lines(output: &std::process::Output) -> Vec<String> {
    let mut lines = Vec::new();
    for stream in [&output.stdout, &output.stderr] {
        lines.extend(String::from_utf8_lossy(stream).lines().map(str::to_string));
    }
    lines
}

#[async_trait]
impl PythonRuntime for NativePython {
    async fn create_venv(&self, interpreter: &Path, venv_dir: &Path) -> VenvResult<()> {
        let args = vec![
            "-m".to_string(),
            "venv".to_string(),
            venv_dir.display().to_string(),
        ];
        let command = display_command(interpreter, &args);
        info!("Creating venv at {}", venv_dir.display());

        let output = self.exec(interpreter, &args).await?;

        let log_path = pip_log_path(venv_dir);
        let lines = output_lines(&output);
        if !lines.is_empty() || !output.status.success() {
            append_log(&log_path, &command, &lines).await?;
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(VenvError::process_failed(
                command,
                output.status.code(),
                Some(log_path),
            ))
        }
    }

    async fn pip_install_with_progress(
        &self,
        python: &Path,
        args: &[String],
        log_path: &Path,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> VenvResult<()> {
        let mut full_args = vec!["-m".to_string(), "pip".to_string(), "install".to_string()];
        full_args.extend(self.pip_extra_args.iter().cloned());
        full_args.extend(args.iter().cloned());
        let command = display_command(python, &full_args);
        info!("Running: {}", command);

        let mut child = Command::new(python)
            .args(&full_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| VenvError::command_failed(command.clone(), e))?;

        let all_output = stream_child_output(&mut child, on_output).await?;

        let status = child
            .wait()
            .await
            .map_err(|e| VenvError::command_failed(command.clone(), e));

        // Persist whatever pip printed before reporting any failure
        append_log(log_path, &command, &all_output).await?;
        let status = status?;

        if status.success() {
            Ok(())
        } else {
            Err(VenvError::process_failed(
                command,
                status.code(),
                Some(log_path.to_path_buf()),
            ))
        }
    }

    async fn pip_freeze(&self, python: &Path) -> VenvResult<Vec<String>> {
        let args = vec!["-m".to_string(), "pip".to_string(), "freeze".to_string()];
        let output = self.exec(python, &args).await?;

        if !output.status.success() {
            return Err(VenvError::process_failed(
                display_command(python, &args),
                output.status.code(),
                None,
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn runtime_name(&self) -> &'static str {
        "native"
    }
}
