//! Deployment trigger with fallback.
//!
//! Deployment problems are never fatal. When the deployment tool is missing
//! or fails, the release is rebuilt and the release branch pushed again so a
//! CI/CD platform watching the branch can pick it up.

use crate::config::{DeploySettings, RELEASE_BRANCH};
use crate::error::{Result, ShipError};
use crate::state::{DeployStatus, StepName};
use crate::tools::git::GitAdapter;
use crate::tools::package::PackageRunner;
use crate::tools::shell::ShellAdapter;
use crate::workflows::pipeline::{Step, StepOutcome, WorkflowContext};
use std::path::Path;

/// Runs the deployment tool in production mode.
#[tracing::instrument(skip_all, fields(tool = %settings.tool))]
pub fn deploy(shell: &dyn ShellAdapter, settings: &DeploySettings, workdir: &Path) -> DeployStatus {
    tracing::info!("attempting deployment with {}", settings.tool);

    if shell.which(&settings.tool).is_none() {
        tracing::warn!("{} is not installed, using fallback", settings.tool);
        return DeployStatus::ToolMissing;
    }

    let args: Vec<&str> = settings.args.iter().map(String::as_str).collect();
    match shell.run(&settings.tool, &args, Some(workdir)) {
        Ok(output) if output.success() => {
            tracing::info!("deployment completed");
            DeployStatus::Deployed
        }
        Ok(output) => {
            tracing::warn!("deployment failed: {}", output.error_text());
            DeployStatus::Failed(output.error_text())
        }
        Err(ShipError::ToolNotFound(tool)) => {
            tracing::warn!("{} is not installed, using fallback", tool);
            DeployStatus::ToolMissing
        }
        Err(e) => {
            tracing::warn!("deployment failed: {}", e);
            DeployStatus::Failed(e.to_string())
        }
    }
}

/// Rebuilds and pushes the release branch again. Failures are only logged.
#[tracing::instrument(skip_all)]
pub fn run_fallback(packages: &dyn PackageRunner, git: &dyn GitAdapter, remote: &str, workdir: &Path) {
    tracing::info!("fallback: running build and pushing {}", RELEASE_BRANCH);

    match packages.build(workdir) {
        Ok(output) if output.success() => tracing::info!("fallback build completed"),
        Ok(output) => tracing::warn!("fallback build failed: {}", output.error_text()),
        Err(e) => tracing::warn!("fallback build failed: {}", e),
    }

    match git.push(remote, RELEASE_BRANCH, false) {
        Ok(()) => tracing::info!("'{}' pushed to {}", RELEASE_BRANCH, remote),
        Err(e) => tracing::warn!("fallback push failed: {}", e),
    }
}

/// Deployment step.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deploy;

impl Step for Deploy {
    fn name(&self) -> StepName {
        StepName::Deploy
    }

    fn run(&self, ctx: &mut WorkflowContext<'_>) -> Result<StepOutcome> {
        let status = deploy(ctx.tools.shell.as_ref(), &ctx.settings.deploy, ctx.workdir);

        if status != DeployStatus::Deployed {
            run_fallback(
                ctx.tools.packages.as_ref(),
                ctx.tools.git.as_ref(),
                &ctx.settings.git.remote,
                ctx.workdir,
            );
            ctx.summary.fallback_used = true;
        }

        ctx.summary.deployment = Some(status);
        Ok(StepOutcome::Continue)
    }
}
