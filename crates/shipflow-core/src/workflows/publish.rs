//! Commit and publish of the feature branch.

use crate::config::RunConfig;
use crate::error::Result;
use crate::state::StepName;
use crate::tools::git::GitAdapter;
use crate::workflows::pipeline::{Step, StepOutcome, WorkflowContext};

/// What the publish step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishResult {
    /// A commit was created and the branch pushed.
    Committed {
        /// Files included in the commit.
        files: Vec<String>,
    },

    /// Nothing was staged; no commit, no push.
    NothingToCommit,
}

/// Stages everything, commits with the feature message and pushes the
/// feature branch with upstream tracking.
///
/// # Errors
///
/// Returns `ShipError::StageFailed`, `ShipError::StagedDiffFailed`,
/// `ShipError::CommitFailed` or `ShipError::PushFailed` with git's output.
#[tracing::instrument(skip_all, fields(feature = run.feature_name()))]
pub fn commit_and_push(git: &dyn GitAdapter, run: &RunConfig, remote: &str) -> Result<PublishResult> {
    tracing::info!("creating commit and pushing feature branch");

    git.add_all()?;

    let files = git.staged_files()?;
    if files.is_empty() {
        tracing::warn!("no changes to commit");
        return Ok(PublishResult::NothingToCommit);
    }

    let message = run.commit_message();
    git.commit(&message)?;
    tracing::info!(files = files.len(), "commit created: {}", message);

    let branch = run.feature_branch();
    git.push(remote, &branch, true)?;
    tracing::info!("branch '{}' pushed to {}", branch, remote);

    Ok(PublishResult::Committed { files })
}

/// Commit and publish step.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitAndPush;

impl Step for CommitAndPush {
    fn name(&self) -> StepName {
        StepName::CommitAndPush
    }

    fn run(&self, ctx: &mut WorkflowContext<'_>) -> Result<StepOutcome> {
        match commit_and_push(ctx.tools.git.as_ref(), ctx.run, &ctx.settings.git.remote)? {
            PublishResult::Committed { .. } => {
                ctx.summary.committed = true;
                Ok(StepOutcome::Continue)
            }
            PublishResult::NothingToCommit => Ok(StepOutcome::Skipped),
        }
    }
}
