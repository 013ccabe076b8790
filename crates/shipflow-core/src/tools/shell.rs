//! Shell adapter trait and operations.
//!
//! This module defines the `ShellAdapter` trait for executing external
//! commands, allowing for both real process execution and mock implementations
//! for testing.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Shell command output.
///
/// Contains the result of a command execution, including exit code, stdout,
/// and stderr.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code from the command (0 typically indicates success).
    pub exit_code: i32,

    /// Standard output from the command.
    pub stdout: String,

    /// Standard error output from the command.
    pub stderr: String,
}

impl CommandOutput {
    /// Creates a successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Creates a failed output with the given exit code and stderr.
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Checks if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Trimmed stderr, the text surfaced in error messages.
    pub fn error_text(&self) -> String {
        self.stderr.trim().to_string()
    }
}

/// Renders a program and its arguments as a single command line.
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shell adapter trait.
///
/// Defines the interface for running the external tools the pipeline drives.
/// A nonzero exit is a normal result, not an error.
pub trait ShellAdapter: Send + Sync {
    /// Executes a program with arguments and waits for completion.
    ///
    /// # Arguments
    ///
    /// * `program` - Executable name or path.
    /// * `args` - Arguments passed as-is, without shell interpretation.
    /// * `cwd` - Working directory for the command (optional).
    ///
    /// # Errors
    ///
    /// Returns `ShipError::ToolNotFound` if the executable cannot be located,
    /// or `ShipError::ToolExecutionError` if it cannot be started. A nonzero
    /// exit code is reported through `CommandOutput::success()`.
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput>;

    /// Looks a program up on the execution path.
    ///
    /// # Returns
    ///
    /// The resolved path, or `None` if the program is not installed.
    fn which(&self, program: &str) -> Option<PathBuf>;

    /// Checks whether a file exists.
    ///
    /// Used for absolute-path probes of tool installations.
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}
