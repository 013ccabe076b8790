//! Package manager adapter.
//!
//! The test and build gate runs `npm test` and `npm run build`. How npm is
//! launched depends on the platform; [`resolve_launcher`] picks the
//! invocation once at startup so the pipeline never branches on platform.

use crate::error::Result;
use crate::tools::shell::{CommandOutput, ShellAdapter};
use std::path::Path;
use std::sync::Arc;

/// Absolute path of the npm shim in a default Node.js install on Windows.
pub const WINDOWS_NPM_PATH: &str = r"C:\Program Files\nodejs\npm.cmd";

/// Package runner trait.
///
/// Runs the project's test suite and build. Nonzero exits are returned in
/// the output; the caller decides whether they are fatal.
pub trait PackageRunner: Send + Sync {
    /// Runs the test suite in `cwd`.
    fn test(&self, cwd: &Path) -> Result<CommandOutput>;

    /// Runs the build in `cwd`.
    fn build(&self, cwd: &Path) -> Result<CommandOutput>;
}

/// Target platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Windows, where npm ships as `.cmd` shims.
    Windows,
    /// Every other platform.
    Unix,
}

impl Platform {
    /// Platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Resolved way of invoking npm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    /// Executable to run.
    pub program: String,
    /// Arguments placed before the npm subcommand.
    pub prefix: Vec<String>,
}

impl Launcher {
    /// Launcher running `program` directly.
    pub fn direct(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            prefix: Vec::new(),
        }
    }
}

/// Picks the npm invocation for `platform`.
///
/// On Windows the `npx` launcher is preferred, then the absolute install
/// path, then the bare `npm` name. Every probe is allowed to fail; the bare
/// name is always the last resort.
pub fn resolve_launcher(shell: &dyn ShellAdapter, platform: Platform) -> Launcher {
    match platform {
        Platform::Unix => Launcher::direct("npm"),
        Platform::Windows => {
            match shell.run("npx", &["--version"], None) {
                Ok(output) if output.success() => {
                    return Launcher {
                        program: "npx.cmd".to_string(),
                        prefix: vec!["npm".to_string()],
                    };
                }
                Ok(output) => tracing::debug!(exit_code = output.exit_code, "npx probe failed"),
                Err(e) => tracing::debug!("npx probe failed: {}", e),
            }

            if shell.file_exists(Path::new(WINDOWS_NPM_PATH)) {
                return Launcher::direct(WINDOWS_NPM_PATH);
            }

            Launcher::direct("npm")
        }
    }
}

/// npm-backed package runner.
pub struct NpmRunner {
    shell: Arc<dyn ShellAdapter>,
    launcher: Launcher,
}

impl NpmRunner {
    /// Creates a runner with the launcher resolved for `platform`.
    pub fn detect(shell: Arc<dyn ShellAdapter>, platform: Platform) -> Self {
        let launcher = resolve_launcher(shell.as_ref(), platform);
        tracing::debug!(program = %launcher.program, "resolved package manager");
        Self { shell, launcher }
    }

    /// Creates a runner with an explicit launcher.
    pub fn with_launcher(shell: Arc<dyn ShellAdapter>, launcher: Launcher) -> Self {
        Self { shell, launcher }
    }

    fn npm(&self, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
        let full: Vec<&str> = self
            .launcher
            .prefix
            .iter()
            .map(String::as_str)
            .chain(args.iter().copied())
            .collect();
        self.shell.run(&self.launcher.program, &full, Some(cwd))
    }
}

impl std::fmt::Debug for NpmRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NpmRunner")
            .field("shell", &"Arc<dyn ShellAdapter>")
            .field("launcher", &self.launcher)
            .finish()
    }
}

impl PackageRunner for NpmRunner {
    fn test(&self, cwd: &Path) -> Result<CommandOutput> {
        self.npm(&["test"], cwd)
    }

    fn build(&self, cwd: &Path) -> Result<CommandOutput> {
        self.npm(&["run", "build"], cwd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::shell_mock::MockShellAdapter;

    #[test]
    fn test_unix_uses_npm_without_probing() {
        let shell = MockShellAdapter::new();
        let launcher = resolve_launcher(&shell, Platform::Unix);

        assert_eq!(launcher, Launcher::direct("npm"));
        assert!(shell.get_history().is_empty());
    }

    #[test]
    fn test_windows_prefers_npx() {
        let shell = MockShellAdapter::new();
        shell.set_output("npx --version", CommandOutput::ok("10.2.0"));

        let launcher = resolve_launcher(&shell, Platform::Windows);
        assert_eq!(launcher.program, "npx.cmd");
        assert_eq!(launcher.prefix, vec!["npm"]);
    }

    #[test]
    fn test_windows_falls_back_to_absolute_path() {
        let shell = MockShellAdapter::new();
        shell.mark_missing("npx");
        shell.add_file(WINDOWS_NPM_PATH);

        let launcher = resolve_launcher(&shell, Platform::Windows);
        assert_eq!(launcher, Launcher::direct(WINDOWS_NPM_PATH));
    }

    #[test]
    fn test_windows_falls_back_to_bare_name() {
        let shell = MockShellAdapter::new();
        shell.set_output("npx --version", CommandOutput::failed(1, "broken"));

        let launcher = resolve_launcher(&shell, Platform::Windows);
        assert_eq!(launcher, Launcher::direct("npm"));
    }

    #[test]
    fn test_runner_invocations() {
        let shell = MockShellAdapter::with_success();
        let runner = NpmRunner::with_launcher(
            Arc::new(shell.clone()),
            Launcher {
                program: "npx.cmd".to_string(),
                prefix: vec!["npm".to_string()],
            },
        );

        runner.test(Path::new("/project")).unwrap();
        runner.build(Path::new("/project")).unwrap();

        assert_eq!(shell.lines(), vec!["npx.cmd npm test", "npx.cmd npm run build"]);
        assert_eq!(shell.get_history()[0].cwd.as_deref(), Some(Path::new("/project")));
    }
}
