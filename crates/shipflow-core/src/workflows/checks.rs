//! Test and build gate.

use crate::error::{Result, ShipError};
use crate::state::StepName;
use crate::tools::package::PackageRunner;
use crate::workflows::pipeline::{Step, StepOutcome, WorkflowContext};
use std::path::Path;

/// Runs the test suite and then the build.
///
/// The manifest must exist in `workdir` before the package manager is
/// invoked at all.
///
/// # Errors
///
/// Returns:
/// - `ShipError::ManifestNotFound` if `manifest` is missing
/// - `ShipError::TestsFailed` with the test run's error output
/// - `ShipError::BuildFailed` with the build's error output
/// - `ShipError::ToolNotFound` if the package manager is not installed
#[tracing::instrument(skip_all)]
pub fn run_tests_and_build(packages: &dyn PackageRunner, workdir: &Path, manifest: &str) -> Result<()> {
    tracing::info!("running tests and build");

    let manifest_path = workdir.join(manifest);
    if !manifest_path.exists() {
        return Err(ShipError::ManifestNotFound(manifest_path));
    }

    tracing::info!("running unit tests");
    let output = packages.test(workdir)?;
    if !output.success() {
        return Err(ShipError::TestsFailed(output.error_text()));
    }
    tracing::info!("unit tests passed");

    tracing::info!("running build");
    let output = packages.build(workdir)?;
    if !output.success() {
        return Err(ShipError::BuildFailed(output.error_text()));
    }
    tracing::info!("build completed");

    Ok(())
}

/// Test and build step; skipped entirely with `--skip-tests`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestAndBuild;

impl Step for TestAndBuild {
    fn name(&self) -> StepName {
        StepName::TestAndBuild
    }

    fn run(&self, ctx: &mut WorkflowContext<'_>) -> Result<StepOutcome> {
        if ctx.run.skip_tests() {
            tracing::warn!("skipping tests and build");
            return Ok(StepOutcome::Skipped);
        }

        run_tests_and_build(
            ctx.tools.packages.as_ref(),
            ctx.workdir,
            &ctx.settings.package.manifest,
        )?;
        ctx.summary.tests_run = true;
        Ok(StepOutcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::package::{Launcher, NpmRunner};
    use crate::tools::shell::CommandOutput;
    use crate::tools::shell_mock::MockShellAdapter;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();
        dir
    }

    fn npm(shell: &MockShellAdapter) -> NpmRunner {
        NpmRunner::with_launcher(Arc::new(shell.clone()), Launcher::direct("npm"))
    }

    #[test]
    fn test_runs_tests_then_build() {
        let dir = project();
        let shell = MockShellAdapter::with_success();

        run_tests_and_build(&npm(&shell), dir.path(), "package.json").unwrap();
        assert_eq!(shell.lines(), vec!["npm test", "npm run build"]);
    }

    #[test]
    fn test_missing_manifest_runs_nothing() {
        let dir = TempDir::new().unwrap();
        let shell = MockShellAdapter::with_success();

        let result = run_tests_and_build(&npm(&shell), dir.path(), "package.json");
        assert!(matches!(result, Err(ShipError::ManifestNotFound(path)) if path.ends_with("package.json")));
        assert!(shell.get_history().is_empty());
    }

    #[test]
    fn test_failing_tests_stop_before_build() {
        let dir = project();
        let shell = MockShellAdapter::with_success();
        shell.set_output("npm test", CommandOutput::failed(1, "1 failing\n"));

        let result = run_tests_and_build(&npm(&shell), dir.path(), "package.json");
        assert!(matches!(result, Err(ShipError::TestsFailed(msg)) if msg == "1 failing"));
        assert!(!shell.was_run("npm run build"));
    }

    #[test]
    fn test_failing_build() {
        let dir = project();
        let shell = MockShellAdapter::with_success();
        shell.set_output("npm run build", CommandOutput::failed(2, "Type error"));

        let result = run_tests_and_build(&npm(&shell), dir.path(), "package.json");
        assert!(matches!(result, Err(ShipError::BuildFailed(msg)) if msg == "Type error"));
    }

    #[test]
    fn test_missing_package_manager() {
        let dir = project();
        let shell = MockShellAdapter::with_success();
        shell.mark_missing("npm");

        let result = run_tests_and_build(&npm(&shell), dir.path(), "package.json");
        assert!(matches!(result, Err(ShipError::ToolNotFound(tool)) if tool == "npm"));
    }
}
