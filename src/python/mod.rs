//! Python process layer
//!
//! Everything that spawns the base interpreter, `venv` or `pip` lives here:
//! - `NativePython` drives real interpreters through `tokio::process`
//! - `MockPython` simulates them in-process for tests and dry runs

pub mod mock;
mod native;
mod runtime;

pub use mock::MockPython;
pub use native::NativePython;
pub use runtime::PythonRuntime;

use crate::error::{VenvError, VenvResult};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// File name of the per-venv pip log
pub const PIP_LOG_NAME: &str = "pip-install.log";

/// File name of the pip log for installs into the base interpreter
pub const BASE_PIP_LOG_NAME: &str = "base-pip-install.log";

/// Interpreter path inside a venv
pub fn venv_python(venv_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_dir.join("Scripts").join("python.exe")
    } else {
        venv_dir.join("bin").join("python")
    }
}

/// Path of the pip log for a venv
pub fn pip_log_path(venv_dir: &Path) -> PathBuf {
    venv_dir.join(PIP_LOG_NAME)
}

/// Render a command line for logs and error messages
pub(crate) fn display_command(program: &Path, args: &[String]) -> String {
    let mut rendered = program.display().to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

/// Append captured process output to a log file under a timestamped header
///
/// Creates the log's parent directory if needed and flushes before returning.
pub(crate) async fn append_log(log_path: &Path, command: &str, lines: &[String]) -> VenvResult<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| VenvError::io(format!("creating log directory {}", parent.display()), e))?;
    }

    let mut content = format!("==> {} {}\n", Utc::now().to_rfc3339(), command);
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .await
        .map_err(|e| VenvError::io(format!("opening log {}", log_path.display()), e))?;

    file.write_all(content.as_bytes())
        .await
        .map_err(|e| VenvError::io(format!("writing log {}", log_path.display()), e))?;
    file.flush()
        .await
        .map_err(|e| VenvError::io(format!("flushing log {}", log_path.display()), e))?;
    Ok(())
}

/// Stream stdout+stderr from a child process, calling `on_output` for each line.
///
/// Returns all collected output lines in arrival order so they can be
/// written to the install log. Both pipes must have been requested. Lines
/// are split on raw bytes and decoded lossily, so a non-UTF-8 byte never
/// stops a pipe from being drained.
pub(crate) async fn stream_child_output(
    child: &mut tokio::process::Child,
    on_output: &(dyn Fn(String) + Send + Sync),
) -> VenvResult<Vec<String>> {
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| VenvError::Internal("child stderr not piped".to_string()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| VenvError::Internal("child stdout not piped".to_string()))?;

    let mut stderr_reader = BufReader::new(stderr).split(b'\n');
    let mut stdout_reader = BufReader::new(stdout).split(b'\n');

    let mut all_output = Vec::new();
    let mut stderr_done = false;
    let mut stdout_done = false;

    while !stderr_done || !stdout_done {
        let segment = tokio::select! {
            segment = stderr_reader.next_segment(), if !stderr_done => match segment {
                Ok(Some(bytes)) => Some(bytes),
                Ok(None) => {
                    stderr_done = true;
                    None
                }
                Err(e) => return Err(VenvError::io("reading process stderr", e)),
            },
            segment = stdout_reader.next_segment(), if !stdout_done => match segment {
                Ok(Some(bytes)) => Some(bytes),
                Ok(None) => {
                    stdout_done = true;
                    None
                }
                Err(e) => return Err(VenvError::io("reading process stdout", e)),
            },
        };

        if let Some(bytes) = segment {
            let line = decode_line(&bytes);
            on_output(line.clone());
            all_output.push(line);
        }
    }

    Ok(all_output)
}

/// Decode one output line, replacing invalid UTF-8 and dropping a trailing `\r`
fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn venv_python_layout() {
        let python = venv_python(Path::new("venvs").join("e1").as_path());
        if cfg!(windows) {
            assert!(python.ends_with("Scripts/python.exe"));
        } else {
            assert!(python.ends_with("bin/python"));
        }
    }

    #[test]
    fn display_command_joins_args() {
        let rendered = display_command(
            Path::new("/v/bin/python"),
            &["-m".to_string(), "pip".to_string(), "freeze".to_string()],
        );
        assert_eq!(rendered, "/v/bin/python -m pip freeze");
    }

    #[test]
    fn decode_line_is_lossy() {
        assert_eq!(decode_line(b"Collecting caf\xe9\r"), "Collecting caf\u{fffd}");
        assert_eq!(decode_line(b"plain"), "plain");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stream_keeps_reading_after_invalid_utf8() {
        use std::process::Stdio;

        // A non-UTF-8 byte followed by more than a pipe buffer of output
        let mut child = tokio::process::Command::new("sh")
            .arg("-c")
            .arg("printf 'Collecting caf\\351\\n'; i=0; while [ $i -lt 5000 ]; do echo \"line $i padding padding padding padding padding\"; i=$((i+1)); done; echo 'tail-line' >&2")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        let lines = tokio::time::timeout(
            std::time::Duration::from_secs(30),
            stream_child_output(&mut child, &|_line: String| {}),
        )
        .await
        .expect("output stream stalled")
        .unwrap();
        child.wait().await.unwrap();

        assert_eq!(lines[0], "Collecting caf\u{fffd}");
        assert!(lines.iter().any(|l| l == "line 4999 padding padding padding padding padding"));
        assert!(lines.iter().any(|l| l == "tail-line"));
        assert_eq!(lines.len(), 5002);
    }

    #[tokio::test]
    async fn append_log_accumulates_runs() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("nested").join(PIP_LOG_NAME);

        append_log(&log, "pip install a", &["Collecting a".to_string()])
            .await
            .unwrap();
        append_log(&log, "pip install b", &["Collecting b".to_string()])
            .await
            .unwrap();

        let content = std::fs::read_to_string(&log).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("==> ") && lines[0].ends_with("pip install a"));
        assert_eq!(lines[1], "Collecting a");
        assert_eq!(lines[3], "Collecting b");
    }
}
