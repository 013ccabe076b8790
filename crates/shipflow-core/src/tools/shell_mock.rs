//! Mock shell adapter for testing.
//!
//! This module provides a mock implementation of the `ShellAdapter` trait
//! for use in tests. The mock allows predefined command outputs, simulates
//! missing tools, and tracks executed commands.

use crate::error::{Result, ShipError};
use crate::tools::shell::{CommandOutput, ShellAdapter, command_line};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program that was run.
    pub program: String,
    /// Arguments passed to it.
    pub args: Vec<String>,
    /// Working directory, if one was given.
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    /// Full command line, program and arguments joined by spaces.
    pub fn line(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        command_line(&self.program, &args)
    }
}

/// Mock shell adapter for testing.
///
/// Outputs are keyed by the full command line (`"git checkout develop"`).
/// Clones share state, so a test can keep a handle while the pipeline owns
/// another.
///
/// # Examples
///
/// ```
/// use shipflow_core::tools::shell_mock::MockShellAdapter;
/// use shipflow_core::tools::shell::{ShellAdapter, CommandOutput};
///
/// let shell = MockShellAdapter::new();
/// shell.set_output("npm test", CommandOutput::ok("5 passing"));
///
/// let output = shell.run("npm", &["test"], None).unwrap();
/// assert_eq!(output.stdout, "5 passing");
/// assert!(shell.was_run("npm test"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockShellAdapter {
    /// Pre-programmed command outputs (command line -> output)
    outputs: Arc<Mutex<HashMap<String, CommandOutput>>>,
    /// History of executed commands
    history: Arc<Mutex<Vec<Invocation>>>,
    /// Default output for unknown commands
    default_output: Arc<Mutex<Option<CommandOutput>>>,
    /// Programs that are not installed
    missing: Arc<Mutex<HashSet<String>>>,
    /// Files reported as existing by `file_exists`
    files: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockShellAdapter {
    /// Creates a new mock shell adapter with no pre-programmed outputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that returns success with empty output for all commands.
    pub fn with_success() -> Self {
        let adapter = Self::new();
        adapter.set_default_output(CommandOutput::ok(""));
        adapter
    }

    /// Sets the output for a specific command line.
    pub fn set_output(&self, line: &str, output: CommandOutput) {
        self.outputs.lock().unwrap().insert(line.to_string(), output);
    }

    /// Sets the default output for unknown commands.
    pub fn set_default_output(&self, output: CommandOutput) {
        *self.default_output.lock().unwrap() = Some(output);
    }

    /// Marks a program as not installed.
    ///
    /// `which` returns `None` for it and `run` fails with `ToolNotFound`.
    pub fn mark_missing(&self, program: &str) {
        self.missing.lock().unwrap().insert(program.to_string());
    }

    /// Makes `file_exists` report `path` as present.
    pub fn add_file(&self, path: impl Into<PathBuf>) {
        self.files.lock().unwrap().insert(path.into());
    }

    /// Returns the history of executed commands.
    pub fn get_history(&self) -> Vec<Invocation> {
        self.history.lock().unwrap().clone()
    }

    /// Returns the executed command lines in order.
    pub fn lines(&self) -> Vec<String> {
        self.history.lock().unwrap().iter().map(Invocation::line).collect()
    }

    /// Returns the number of times a command line was executed.
    pub fn command_count(&self, line: &str) -> usize {
        self.history
            .lock()
            .unwrap()
            .iter()
            .filter(|invocation| invocation.line() == line)
            .count()
    }

    /// Checks whether a command line was executed at least once.
    pub fn was_run(&self, line: &str) -> bool {
        self.command_count(line) > 0
    }

    /// Checks whether any command of the given program was executed.
    pub fn ran_program(&self, program: &str) -> bool {
        self.history
            .lock()
            .unwrap()
            .iter()
            .any(|invocation| invocation.program == program)
    }

    /// Clears command history.
    pub fn clear_history(&self) {
        self.history.lock().unwrap().clear();
    }
}

impl ShellAdapter for MockShellAdapter {
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput> {
        let invocation = Invocation {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.map(Path::to_path_buf),
        };
        let line = invocation.line();
        self.history.lock().unwrap().push(invocation);

        if self.missing.lock().unwrap().contains(program) {
            return Err(ShipError::ToolNotFound(program.to_string()));
        }

        let outputs = self.outputs.lock().unwrap();
        if let Some(output) = outputs.get(&line) {
            Ok(output.clone())
        } else if let Some(default) = self.default_output.lock().unwrap().clone() {
            Ok(default)
        } else {
            Err(ShipError::ToolExecutionError(format!(
                "no output configured for command: {}",
                line
            )))
        }
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        if self.missing.lock().unwrap().contains(program) {
            None
        } else {
            Some(PathBuf::from("/usr/bin").join(program))
        }
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains(path)
    }
}
