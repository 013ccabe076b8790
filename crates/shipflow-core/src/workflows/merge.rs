//! Cascading merges: feature into base, then base into the release branch.
//!
//! Both merges follow the same shape: switch to the target, pull it on a
//! best-effort basis, merge with `--no-ff` and push the target.

use crate::config::RELEASE_BRANCH;
use crate::error::{Result, ShipError};
use crate::state::StepName;
use crate::tools::git::GitAdapter;
use crate::workflows::pipeline::{Step, StepOutcome, WorkflowContext};

/// Pulls `branch`, logging a failure instead of returning it.
fn pull_best_effort(git: &dyn GitAdapter, remote: &str, branch: &str) {
    if let Err(e) = git.pull(remote, branch) {
        tracing::warn!("{}; continuing with the local branch", e);
    }
}

fn merge_and_push(git: &dyn GitAdapter, source: &str, target: &str, remote: &str) -> Result<()> {
    pull_best_effort(git, remote, target);

    git.merge_no_ff(source, target)?;
    tracing::info!("merged {} -> {}", source, target);

    git.push(remote, target, false)?;
    tracing::info!("'{}' pushed to {}", target, remote);

    Ok(())
}

/// Merges the feature branch into the base branch and pushes the base.
///
/// # Errors
///
/// Returns `ShipError::CheckoutFailed`, `ShipError::MergeConflict`,
/// `ShipError::MergeFailed` or `ShipError::PushFailed`. A failed pull is
/// only logged.
#[tracing::instrument(skip_all, fields(feature = feature_branch, base = base_branch))]
pub fn merge_feature_into_base(
    git: &dyn GitAdapter,
    feature_branch: &str,
    base_branch: &str,
    remote: &str,
) -> Result<()> {
    tracing::info!("merging {} into {}", feature_branch, base_branch);

    git.checkout(base_branch)?;
    merge_and_push(git, feature_branch, base_branch, remote)
}

/// Merges the base branch into the release branch and pushes it.
///
/// # Errors
///
/// Returns `ShipError::ReleaseBranchMissing` if there is no local release
/// branch, otherwise the same errors as [`merge_feature_into_base`].
#[tracing::instrument(skip_all, fields(base = base_branch))]
pub fn merge_base_into_release(git: &dyn GitAdapter, base_branch: &str, remote: &str) -> Result<()> {
    tracing::info!("merging {} into {}", base_branch, RELEASE_BRANCH);

    if !git.branch_exists(RELEASE_BRANCH)? {
        return Err(ShipError::ReleaseBranchMissing(RELEASE_BRANCH.to_string()));
    }

    git.checkout(RELEASE_BRANCH)?;

    merge_and_push(git, base_branch, RELEASE_BRANCH, remote)
}

/// Feature-into-base merge step.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegrationMerge;

impl Step for IntegrationMerge {
    fn name(&self) -> StepName {
        StepName::IntegrationMerge
    }

    fn run(&self, ctx: &mut WorkflowContext<'_>) -> Result<StepOutcome> {
        merge_feature_into_base(
            ctx.tools.git.as_ref(),
            &ctx.run.feature_branch(),
            ctx.run.base_branch(),
            &ctx.settings.git.remote,
        )?;
        Ok(StepOutcome::Continue)
    }
}

/// Base-into-release merge step.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseMerge;

impl Step for ReleaseMerge {
    fn name(&self) -> StepName {
        StepName::ReleaseMerge
    }

    fn run(&self, ctx: &mut WorkflowContext<'_>) -> Result<StepOutcome> {
        merge_base_into_release(
            ctx.tools.git.as_ref(),
            ctx.run.base_branch(),
            &ctx.settings.git.remote,
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

    fn setup() -> (MockShellAdapter, GitCli) {
        let shell = MockShellAdapter::with_success();
        let git = GitCli::new(Arc::new(shell.clone()), "/repo");
        (shell, git)
    }

    #[test]
    fn test_feature_into_base_sequence() {
        let (shell, git) = setup();

        merge_feature_into_base(&git, "feature/cart", "develop", "origin").unwrap();
        assert_eq!(
            shell.lines(),
            vec![
                "git checkout develop",
                "git pull origin develop",
                "git merge feature/cart --no-ff --no-edit",
                "git push origin develop",
            ]
        );
    }

    #[test]
    fn test_pull_failure_is_not_fatal() {
        let (shell, git) = setup();
        shell.set_output(
            "git pull origin develop",
            CommandOutput::failed(1, "fatal: couldn't find remote ref develop"),
        );

        merge_feature_into_base(&git, "feature/cart", "develop", "origin").unwrap();
        assert!(shell.was_run("git push origin develop"));
    }

    #[test]
    fn test_conflict_stops_before_push() {
        let (shell, git) = setup();
        shell.set_output(
            "git merge feature/cart --no-ff --no-edit",
            CommandOutput {
                exit_code: 1,
                stdout: "CONFLICT (content): Merge conflict in cart.ts".to_string(),
                stderr: String::new(),
            },
        );

        let result = merge_feature_into_base(&git, "feature/cart", "develop", "origin");
        assert!(matches!(result, Err(ShipError::MergeConflict { .. })));
        assert!(!shell.was_run("git push origin develop"));
    }

    #[test]
    fn test_base_into_release_sequence() {
        let (shell, git) = setup();

        merge_base_into_release(&git, "develop", "origin").unwrap();
        assert_eq!(
            shell.lines(),
            vec![
                "git show-ref --verify --quiet refs/heads/main",
                "git checkout main",
                "git pull origin main",
                "git merge develop --no-ff --no-edit",
                "git push origin main",
            ]
        );
    }

    #[test]
    fn test_missing_release_branch() {
        let (shell, git) = setup();
        shell.set_output(
            "git show-ref --verify --quiet refs/heads/main",
            CommandOutput::failed(1, ""),
        );

        let result = merge_base_into_release(&git, "develop", "origin");
        assert!(matches!(result, Err(ShipError::ReleaseBranchMissing(branch)) if branch == "main"));
        assert_eq!(shell.lines(), vec!["git show-ref --verify --quiet refs/heads/main"]);
    }

    #[test]
    fn test_release_checkout_failure_keeps_git_output() {
        let (shell, git) = setup();
        shell.set_output(
            "git checkout main",
            CommandOutput::failed(
                1,
                "error: Your local changes to the following files would be overwritten by checkout:\n\tREADME.md",
            ),
        );

        let result = merge_base_into_release(&git, "develop", "origin");
        assert!(matches!(
            result,
            Err(ShipError::CheckoutFailed { branch, stderr })
                if branch == "main" && stderr.contains("would be overwritten by checkout")
        ));
        assert!(!shell.lines().iter().any(|line| line.starts_with("git merge")));
    }

    #[test]
    fn test_release_generic_merge_failure() {
        let (shell, git) = setup();
        shell.set_output(
            "git merge develop --no-ff --no-edit",
            CommandOutput::failed(128, "fatal: refusing to merge unrelated histories"),
        );

        let result = merge_base_into_release(&git, "develop", "origin");
        assert!(matches!(
            result,
            Err(ShipError::MergeFailed { target, stderr, .. })
                if target == "main" && stderr.contains("unrelated histories")
        ));
    }
}
