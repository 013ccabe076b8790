//! Feature branch creation.

use crate::error::{Result, ShipError};
use crate::state::StepName;
use crate::tools::git::GitAdapter;
use crate::workflows::pipeline::{Step, StepOutcome, WorkflowContext};

/// Creates `feature_branch` from `base_branch` and switches to it.
///
/// # Errors
///
/// Returns:
/// - `ShipError::BaseBranchNotFound` if the base branch does not exist
/// - `ShipError::CheckoutFailed` if switching to the base branch fails
/// - `ShipError::BranchExists` if the feature branch already exists
/// - `ShipError::BranchCreateFailed` for any other creation failure
#[tracing::instrument(skip_all, fields(branch = feature_branch, base = base_branch))]
pub fn create_feature_branch(
    git: &dyn GitAdapter,
    feature_branch: &str,
    base_branch: &str,
) -> Result<()> {
    tracing::info!("creating feature branch {}", feature_branch);

    if !git.branch_exists(base_branch)? {
        return Err(ShipError::BaseBranchNotFound(base_branch.to_string()));
    }

    git.checkout(base_branch)?;
    git.create_branch(feature_branch)?;

    tracing::info!("branch '{}' created and checked out", feature_branch);
    Ok(())
}

/// Branch creation step.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateBranch;

impl Step for CreateBranch {
    fn name(&self) -> StepName {
        StepName::CreateBranch
    }

    fn run(&self, ctx: &mut WorkflowContext<'_>) -> Result<StepOutcome> {
        create_feature_branch(
            ctx.tools.git.as_ref(),
            &ctx.run.feature_branch(),
            ctx.run.base_branch(),
        )?;
        Ok(StepOutcome::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::git_impl::GitCli;
    use crate::tools::shell::CommandOutput;
    use crate::tools::shell_mock::MockShellAdapter;
    use std::sync::Arc;

    fn git_with(shell: &MockShellAdapter) -> GitCli {
        GitCli::new(Arc::new(shell.clone()), "/repo")
    }

    #[test]
    fn test_creates_from_base() {
        let shell = MockShellAdapter::with_success();

        create_feature_branch(&git_with(&shell), "feature/search", "develop").unwrap();
        assert_eq!(
            shell.lines(),
            vec![
                "git show-ref --verify --quiet refs/heads/develop",
                "git checkout develop",
                "git checkout -b feature/search",
            ]
        );
    }

    #[test]
    fn test_missing_base_branch() {
        let shell = MockShellAdapter::with_success();
        shell.set_output(
            "git show-ref --verify --quiet refs/heads/staging",
            CommandOutput::failed(1, ""),
        );

        let result = create_feature_branch(&git_with(&shell), "feature/search", "staging");
        assert!(matches!(result, Err(ShipError::BaseBranchNotFound(base)) if base == "staging"));
        assert_eq!(shell.lines().len(), 1);
    }

    #[test]
    fn test_checkout_failure() {
        let shell = MockShellAdapter::with_success();
        shell.set_output(
            "git checkout develop",
            CommandOutput::failed(1, "error: Your local changes would be overwritten by checkout"),
        );

        let result = create_feature_branch(&git_with(&shell), "feature/search", "develop");
        assert!(matches!(result, Err(ShipError::CheckoutFailed { branch, .. }) if branch == "develop"));
        assert!(!shell.was_run("git checkout -b feature/search"));
    }

    #[test]
    fn test_existing_feature_branch() {
        let shell = MockShellAdapter::with_success();
        shell.set_output(
            "git checkout -b feature/search",
            CommandOutput::failed(128, "fatal: a branch named 'feature/search' already exists"),
        );

        let result = create_feature_branch(&git_with(&shell), "feature/search", "develop");
        assert!(matches!(result, Err(ShipError::BranchExists(_))));
    }
}
