//! Standard shell adapter implementation.
//!
//! This module provides a concrete implementation of the `ShellAdapter` trait
//! using `std::process::Command` to execute external tools.

use crate::error::{Result, ShipError};
use crate::tools::shell::{CommandOutput, ShellAdapter, command_line};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Standard shell adapter using `std::process::Command`.
///
/// In verbose mode every command line and its captured output are echoed.
/// Stderr of a failed command is echoed as a warning regardless.
#[derive(Debug, Default)]
pub struct StdShellAdapter {
    verbose: bool,
}

impl StdShellAdapter {
    /// Creates a new standard shell adapter.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn echo(&self, line: &str, output: &CommandOutput) {
        if self.verbose {
            let stdout = output.stdout.trim();
            if !stdout.is_empty() {
                tracing::info!("output: {}", stdout);
            }
        }

        let stderr = output.stderr.trim();
        if !stderr.is_empty() && (self.verbose || !output.success()) {
            tracing::warn!(command = %line, "error output: {}", stderr);
        }
    }
}

impl ShellAdapter for StdShellAdapter {
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput> {
        let line = command_line(program, args);
        if self.verbose {
            tracing::info!("running: {}", line);
        } else {
            tracing::debug!("running: {}", line);
        }

        let mut command = Command::new(program);
        command.args(args);

        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => ShipError::ToolNotFound(program.to_string()),
            _ => ShipError::ToolExecutionError(format!("failed to execute {}: {}", line, e)),
        })?;

        let output = CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        self.echo(&line, &output);

        Ok(output)
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_run_simple_command() {
        let adapter = StdShellAdapter::new(false);
        let output = adapter.run("echo", &["hello"], None).unwrap();

        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_with_cwd() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let adapter = StdShellAdapter::new(true);
        let output = adapter.run("pwd", &[], Some(temp_dir.path())).unwrap();

        assert!(output.success());
        let name = temp_dir.path().file_name().unwrap().to_str().unwrap();
        assert!(output.stdout.trim().ends_with(name));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_not_an_error() {
        let adapter = StdShellAdapter::new(false);
        let output = adapter.run("sh", &["-c", "echo oops >&2; exit 3"], None).unwrap();

        assert!(!output.success());
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.error_text(), "oops");
    }

    #[test]
    fn test_missing_tool_is_reported_distinctly() {
        let adapter = StdShellAdapter::new(false);
        let result = adapter.run("shipflow-definitely-missing-tool", &[], None);

        assert!(matches!(result, Err(ShipError::ToolNotFound(name)) if name == "shipflow-definitely-missing-tool"));
    }

    #[test]
    fn test_which_missing_tool() {
        let adapter = StdShellAdapter::new(false);
        assert!(adapter.which("shipflow-definitely-missing-tool").is_none());
    }
}
