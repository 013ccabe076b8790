//! Git adapter backed by the `git` command-line tool.
//!
//! Commands go through a `ShellAdapter`, so verbose echo and tool-not-found
//! reporting behave the same as for every other external tool.

use crate::error::{Result, ShipError};
use crate::tools::git::GitAdapter;
use crate::tools::shell::{CommandOutput, ShellAdapter};
use std::path::PathBuf;
use std::sync::Arc;

/// Git adapter that runs `git` in a fixed working directory.
pub struct GitCli {
    shell: Arc<dyn ShellAdapter>,
    workdir: PathBuf,
}

impl GitCli {
    /// Creates a git adapter for the repository at `workdir`.
    pub fn new(shell: Arc<dyn ShellAdapter>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            shell,
            workdir: workdir.into(),
        }
    }

    fn git(&self, args: &[&str]) -> Result<CommandOutput> {
        self.shell.run("git", args, Some(&self.workdir))
    }
}

impl std::fmt::Debug for GitCli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitCli")
            .field("shell", &"Arc<dyn ShellAdapter>")
            .field("workdir", &self.workdir)
            .finish()
    }
}

/// Whether merge output reports content conflicts.
///
/// Git prints `CONFLICT (content): ...` on stdout, so both streams are checked.
pub fn is_conflict(output: &CommandOutput) -> bool {
    [&output.stdout, &output.stderr]
        .iter()
        .any(|text| text.contains("CONFLICT") || text.contains("conflict"))
}

impl GitAdapter for GitCli {
    fn is_repository(&self) -> Result<bool> {
        Ok(self.git(&["rev-parse", "--git-dir"])?.success())
    }

    fn status(&self) -> Result<String> {
        let output = self.git(&["status", "--porcelain"])?;
        if !output.success() {
            return Err(ShipError::GitStatusFailed(output.error_text()));
        }

        Ok(output.stdout.trim_end().to_string())
    }

    fn branch_exists(&self, branch: &str) -> Result<bool> {
        let reference = format!("refs/heads/{}", branch);
        Ok(self
            .git(&["show-ref", "--verify", "--quiet", &reference])?
            .success())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        let output = self.git(&["checkout", branch])?;
        if !output.success() {
            return Err(ShipError::CheckoutFailed {
                branch: branch.to_string(),
                stderr: output.error_text(),
            });
        }

        Ok(())
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        let output = self.git(&["checkout", "-b", branch])?;
        if output.success() {
            return Ok(());
        }

        if output.stderr.contains("already exists") {
            Err(ShipError::BranchExists(branch.to_string()))
        } else {
            Err(ShipError::BranchCreateFailed {
                branch: branch.to_string(),
                stderr: output.error_text(),
            })
        }
    }

    fn add_all(&self) -> Result<()> {
        let output = self.git(&["add", "."])?;
        if !output.success() {
            return Err(ShipError::StageFailed(output.error_text()));
        }

        Ok(())
    }

    fn staged_files(&self) -> Result<Vec<String>> {
        let output = self.git(&["diff", "--cached", "--name-only"])?;
        if !output.success() {
            return Err(ShipError::StagedDiffFailed(output.error_text()));
        }

        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn commit(&self, message: &str) -> Result<()> {
        let output = self.git(&["commit", "-m", message])?;
        if !output.success() {
            return Err(ShipError::CommitFailed(output.error_text()));
        }

        Ok(())
    }

    fn push(&self, remote: &str, branch: &str, set_upstream: bool) -> Result<()> {
        let output = if set_upstream {
            self.git(&["push", "-u", remote, branch])?
        } else {
            self.git(&["push", remote, branch])?
        };

        if !output.success() {
            return Err(ShipError::PushFailed {
                branch: branch.to_string(),
                stderr: output.error_text(),
            });
        }

        Ok(())
    }

    fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        let output = self.git(&["pull", remote, branch])?;
        if !output.success() {
            return Err(ShipError::PullFailed {
                branch: branch.to_string(),
                stderr: output.error_text(),
            });
        }

        Ok(())
    }

    fn merge_no_ff(&self, branch: &str, into: &str) -> Result<()> {
        let output = self.git(&["merge", branch, "--no-ff", "--no-edit"])?;
        if output.success() {
            return Ok(());
        }

        if is_conflict(&output) {
            Err(ShipError::MergeConflict {
                source_branch: branch.to_string(),
                target: into.to_string(),
            })
        } else {
            Err(ShipError::MergeFailed {
                source_branch: branch.to_string(),
                target: into.to_string(),
                stderr: output.error_text(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::shell_mock::MockShellAdapter;

    fn mock_git() -> (MockShellAdapter, GitCli) {
        let shell = MockShellAdapter::with_success();
        let git = GitCli::new(Arc::new(shell.clone()), "/repo");
        (shell, git)
    }

    #[test]
    fn test_commands_run_in_workdir() {
        let (shell, git) = mock_git();
        git.checkout("develop").unwrap();

        let history = shell.get_history();
        assert_eq!(history[0].line(), "git checkout develop");
        assert_eq!(history[0].cwd, Some(PathBuf::from("/repo")));
    }

    #[test]
    fn test_not_a_repository() {
        let (shell, git) = mock_git();
        shell.set_output(
            "git rev-parse --git-dir",
            CommandOutput::failed(128, "fatal: not a git repository"),
        );

        assert!(!git.is_repository().unwrap());
    }

    #[test]
    fn test_branch_exists_uses_show_ref() {
        let (shell, git) = mock_git();
        shell.set_output(
            "git show-ref --verify --quiet refs/heads/staging",
            CommandOutput::failed(1, ""),
        );

        assert!(git.branch_exists("develop").unwrap());
        assert!(!git.branch_exists("staging").unwrap());
    }

    #[test]
    fn test_create_branch_already_exists() {
        let (shell, git) = mock_git();
        shell.set_output(
            "git checkout -b feature/login",
            CommandOutput::failed(128, "fatal: a branch named 'feature/login' already exists"),
        );

        let result = git.create_branch("feature/login");
        assert!(matches!(result, Err(ShipError::BranchExists(branch)) if branch == "feature/login"));
    }

    #[test]
    fn test_create_branch_other_failure() {
        let (shell, git) = mock_git();
        shell.set_output(
            "git checkout -b feature/login",
            CommandOutput::failed(128, "fatal: cannot lock ref"),
        );

        let result = git.create_branch("feature/login");
        assert!(matches!(
            result,
            Err(ShipError::BranchCreateFailed { stderr, .. }) if stderr == "fatal: cannot lock ref"
        ));
    }

    #[test]
    fn test_staged_files_parsing() {
        let (shell, git) = mock_git();
        shell.set_output(
            "git diff --cached --name-only",
            CommandOutput::ok("src/app.ts\n\nREADME.md\n"),
        );

        assert_eq!(git.staged_files().unwrap(), vec!["src/app.ts", "README.md"]);
    }

    #[test]
    fn test_push_with_upstream() {
        let (shell, git) = mock_git();
        git.push("origin", "feature/login", true).unwrap();
        git.push("origin", "develop", false).unwrap();

        assert_eq!(
            shell.lines(),
            vec!["git push -u origin feature/login", "git push origin develop"]
        );
    }

    #[test]
    fn test_merge_conflict_on_stdout() {
        let (shell, git) = mock_git();
        shell.set_output(
            "git merge feature/login --no-ff --no-edit",
            CommandOutput {
                exit_code: 1,
                stdout: "CONFLICT (content): Merge conflict in src/app.ts\nAutomatic merge failed; fix conflicts and then commit the result.".to_string(),
                stderr: String::new(),
            },
        );

        let result = git.merge_no_ff("feature/login", "develop");
        assert!(matches!(result, Err(ShipError::MergeConflict { target, .. }) if target == "develop"));
    }

    #[test]
    fn test_merge_generic_failure() {
        let (shell, git) = mock_git();
        shell.set_output(
            "git merge develop --no-ff --no-edit",
            CommandOutput::failed(128, "merge: develop - not something we can merge"),
        );

        let result = git.merge_no_ff("develop", "main");
        assert!(matches!(result, Err(ShipError::MergeFailed { .. })));
    }

    #[test]
    fn test_missing_git_propagates() {
        let (shell, git) = mock_git();
        shell.mark_missing("git");

        assert!(matches!(git.is_repository(), Err(ShipError::ToolNotFound(_))));
    }
}
