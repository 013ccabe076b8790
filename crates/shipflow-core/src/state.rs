//! Run state for shipflow workflows.
//!
//! Nothing here is persisted: a [`Summary`] is filled in while the pipeline
//! runs and handed back in the final [`Outcome`].

use crate::config::{RELEASE_BRANCH, RunConfig};
use crate::error::ShipError;
use chrono::{DateTime, Local};
use std::fmt;

/// Pipeline step identifiers, in execution order.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepName {
    /// Repository and working tree check.
    Preflight,

    /// Feature branch creation from the base branch.
    CreateBranch,

    /// Test suite and build.
    TestAndBuild,

    /// Stage, commit and push the feature branch.
    CommitAndPush,

    /// Confirmation before merging into the base branch.
    ConfirmIntegration,

    /// Merge of the feature branch into the base branch.
    IntegrationMerge,

    /// Confirmation before merging into the release branch and deploying.
    ConfirmRelease,

    /// Merge of the base branch into the release branch.
    ReleaseMerge,

    /// Deployment, with fallback.
    Deploy,
}

impl StepName {
    /// Stable identifier used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepName::Preflight => "preflight",
            StepName::CreateBranch => "create-branch",
            StepName::TestAndBuild => "test-and-build",
            StepName::CommitAndPush => "commit-and-push",
            StepName::ConfirmIntegration => "confirm-integration",
            StepName::IntegrationMerge => "integration-merge",
            StepName::ConfirmRelease => "confirm-release",
            StepName::ReleaseMerge => "release-merge",
            StepName::Deploy => "deploy",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the deployment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployStatus {
    /// The deployment tool ran and succeeded.
    Deployed,

    /// The deployment tool is not installed.
    ToolMissing,

    /// The deployment tool exited nonzero, with its error output.
    Failed(String),
}

/// What a run did, reported at the end.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Feature branch created for the run.
    pub feature_branch: String,

    /// Base branch the feature was merged into.
    pub base_branch: String,

    /// Release branch the base was merged into.
    pub release_branch: String,

    /// Whether the test and build gate ran.
    pub tests_run: bool,

    /// Whether a feature commit was created and pushed.
    pub committed: bool,

    /// Deployment result, once the deploy step has run.
    pub deployment: Option<DeployStatus>,

    /// Whether the rebuild-and-repush fallback ran.
    pub fallback_used: bool,

    /// When the run started.
    pub started_at: DateTime<Local>,

    /// When the run finished.
    pub finished_at: Option<DateTime<Local>>,
}

impl Summary {
    /// Creates an empty summary for `run`, stamped with the current time.
    pub fn new(run: &RunConfig) -> Self {
        Self {
            feature_branch: run.feature_branch(),
            base_branch: run.base_branch().to_string(),
            release_branch: RELEASE_BRANCH.to_string(),
            tests_run: false,
            committed: false,
            deployment: None,
            fallback_used: false,
            started_at: Local::now(),
            finished_at: None,
        }
    }

    /// Marks the run as finished now.
    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    /// Wall-clock duration of the run, once finished.
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|end| end - self.started_at)
    }
}

/// Final result of a pipeline run.
#[derive(Debug)]
pub enum Outcome {
    /// Every step ran.
    Completed(Summary),

    /// The operator declined a confirmation gate.
    Cancelled {
        /// Step at which the run stopped.
        step: StepName,
    },

    /// A step failed fatally.
    Failed {
        /// Step that failed.
        step: StepName,
        /// What went wrong.
        error: ShipError,
    },
}

impl Outcome {
    /// Process exit code: 0 for completion or cancellation, 1 for failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Completed(_) | Outcome::Cancelled { .. } => 0,
            Outcome::Failed { .. } => 1,
        }
    }

    /// The failing error, if any.
    pub fn error(&self) -> Option<&ShipError> {
        match self {
            Outcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_name_display() {
        assert_eq!(StepName::Preflight.to_string(), "preflight");
        assert_eq!(StepName::ConfirmRelease.to_string(), "confirm-release");
        assert_eq!(StepName::Deploy.as_str(), "deploy");
    }

    #[test]
    fn test_summary_for_run() {
        let run = RunConfig::new("checkout", "staging", false, false).unwrap();
        let mut summary = Summary::new(&run);

        assert_eq!(summary.feature_branch, "feature/checkout");
        assert_eq!(summary.base_branch, "staging");
        assert_eq!(summary.release_branch, "main");
        assert!(summary.elapsed().is_none());

        summary.finish();
        assert!(summary.elapsed().unwrap() >= chrono::Duration::zero());
    }

    #[test]
    fn test_exit_codes() {
        let run = RunConfig::new("x", "develop", false, false).unwrap();

        assert_eq!(Outcome::Completed(Summary::new(&run)).exit_code(), 0);
        assert_eq!(
            Outcome::Cancelled {
                step: StepName::ConfirmIntegration
            }
            .exit_code(),
            0
        );
        let failed = Outcome::Failed {
            step: StepName::TestAndBuild,
            error: ShipError::TestsFailed("1 failing".to_string()),
        };
        assert_eq!(failed.exit_code(), 1);
        assert!(matches!(failed.error(), Some(ShipError::TestsFailed(_))));
    }
}
