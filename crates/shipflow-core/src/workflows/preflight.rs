//! Repository preflight check.

use crate::error::{Result, ShipError};
use crate::state::StepName;
use crate::tools::git::GitAdapter;
use crate::workflows::pipeline::{Step, StepOutcome, WorkflowContext};
use std::path::Path;

/// Checks that `workdir` is a git repository and reports whether the working
/// tree is clean.
///
/// A dirty tree is not an error here; pending changes are listed and the
/// caller decides what to do.
///
/// # Errors
///
/// Returns `ShipError::NotGitRepository` if no repository is found and
/// `ShipError::GitStatusFailed` if the status cannot be queried.
#[tracing::instrument(skip_all)]
pub fn check_repository(git: &dyn GitAdapter, workdir: &Path) -> Result<bool> {
    tracing::info!("checking git repository status");

    if !git.is_repository()? {
        return Err(ShipError::NotGitRepository(workdir.to_path_buf()));
    }

    let status = git.status()?;
    if !status.is_empty() {
        tracing::warn!("working tree has uncommitted changes:");
        for line in status.lines() {
            tracing::warn!("  {}", line);
        }
        return Ok(false);
    }

    tracing::info!("working tree is clean");
    Ok(true)
}

/// Preflight step: a dirty tree needs the operator's go-ahead.
///
/// Uncommitted changes are carried as-is into the feature branch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preflight;

impl Step for Preflight {
    fn name(&self) -> StepName {
        StepName::Preflight
    }

    fn run(&self, ctx: &mut WorkflowContext<'_>) -> Result<StepOutcome> {
        if check_repository(ctx.tools.git.as_ref(), ctx.workdir)? {
            return Ok(StepOutcome::Continue);
        }

        if !ctx
            .tools
            .prompter
            .confirm("Continue with uncommitted changes?")?
        {
            return Ok(StepOutcome::Cancelled);
        }

        Ok(StepOutcome::Continue)
    }
}
