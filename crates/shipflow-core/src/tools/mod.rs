//! Tool adapters and registry for shipflow workflows.
//!
//! This module provides the tool registry that manages the adapters for the
//! external collaborators: the process executor, git, the package manager
//! and the operator's confirmation prompt. Each adapter trait has a real
//! implementation and, where useful, a mock for tests.

pub mod git;
pub mod git_impl;
pub mod package;
pub mod prompt;
pub mod prompt_mock;
pub mod shell;
pub mod shell_impl;
pub mod shell_mock;

use std::path::Path;
use std::sync::Arc;

/// Tool registry that manages all available adapters.
///
/// Adapters are trait objects so tests can swap in mocks.
pub struct ToolRegistry {
    /// Executor for arbitrary external commands.
    pub shell: Arc<dyn shell::ShellAdapter>,

    /// Git adapter for repository operations.
    pub git: Box<dyn git::GitAdapter>,

    /// Package manager for tests and builds.
    pub packages: Box<dyn package::PackageRunner>,

    /// Confirmation prompt.
    pub prompter: Box<dyn prompt::Prompter>,
}

impl ToolRegistry {
    /// Creates a new tool registry with the provided adapters.
    pub fn new(
        shell: Arc<dyn shell::ShellAdapter>,
        git: Box<dyn git::GitAdapter>,
        packages: Box<dyn package::PackageRunner>,
        prompter: Box<dyn prompt::Prompter>,
    ) -> Self {
        Self {
            shell,
            git,
            packages,
            prompter,
        }
    }

    /// Creates a registry of real adapters for `workdir`.
    ///
    /// The package manager launcher is resolved here, once, for the current
    /// platform.
    pub fn standard(workdir: &Path, verbose: bool) -> Self {
        let shell: Arc<dyn shell::ShellAdapter> = Arc::new(shell_impl::StdShellAdapter::new(verbose));

        Self {
            git: Box::new(git_impl::GitCli::new(shell.clone(), workdir)),
            packages: Box::new(package::NpmRunner::detect(
                shell.clone(),
                package::Platform::current(),
            )),
            prompter: Box::new(prompt::StdinPrompter::new()),
            shell,
        }
    }

    /// Creates a registry around a single shell adapter, for tests.
    ///
    /// Git and npm both run through `shell`; npm is launched directly as
    /// `npm` so command lines are predictable.
    pub fn with_shell(
        shell: Arc<dyn shell::ShellAdapter>,
        workdir: &Path,
        prompter: Box<dyn prompt::Prompter>,
    ) -> Self {
        Self {
            git: Box::new(git_impl::GitCli::new(shell.clone(), workdir)),
            packages: Box::new(package::NpmRunner::with_launcher(
                shell.clone(),
                package::Launcher::direct("npm"),
            )),
            prompter,
            shell,
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("shell", &"Arc<dyn ShellAdapter>")
            .field("git", &"Box<dyn GitAdapter>")
            .field("packages", &"Box<dyn PackageRunner>")
            .field("prompter", &"Box<dyn Prompter>")
            .finish()
    }
}
