//! Git adapter trait and operations.
//!
//! This module defines the `GitAdapter` trait for the git operations the
//! pipeline issues. Implementations classify failures into `ShipError`
//! variants so steps never inspect raw git output themselves.

use crate::error::Result;

/// Git adapter trait.
///
/// All operations act on the repository the adapter was created for.
pub trait GitAdapter: Send + Sync {
    /// Checks whether the working directory is inside a git repository.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::ToolNotFound` if git itself is not installed.
    fn is_repository(&self) -> Result<bool>;

    /// Returns `git status --porcelain` output; empty means a clean tree.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::GitStatusFailed` if the query fails.
    fn status(&self) -> Result<String>;

    /// Checks whether a local branch exists.
    fn branch_exists(&self, branch: &str) -> Result<bool>;

    /// Switches the working tree to an existing branch.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::CheckoutFailed` with git's error output.
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Creates a branch from the current HEAD and switches to it.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::BranchExists` if the branch is already there, or
    /// `ShipError::BranchCreateFailed` for any other failure.
    fn create_branch(&self, branch: &str) -> Result<()>;

    /// Stages every change in the working tree.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::StageFailed`.
    fn add_all(&self) -> Result<()>;

    /// Lists the names of staged files.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::StagedDiffFailed`.
    fn staged_files(&self) -> Result<Vec<String>>;

    /// Commits the staged changes.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::CommitFailed`.
    fn commit(&self, message: &str) -> Result<()>;

    /// Pushes a branch, optionally setting it as upstream.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::PushFailed`.
    fn push(&self, remote: &str, branch: &str, set_upstream: bool) -> Result<()>;

    /// Pulls a branch from a remote into the current branch.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::PullFailed`.
    fn pull(&self, remote: &str, branch: &str) -> Result<()>;

    /// Merges `branch` into the current branch (`into`), always creating a
    /// merge commit.
    ///
    /// # Errors
    ///
    /// Returns `ShipError::MergeConflict` if git reports conflicts, or
    /// `ShipError::MergeFailed` for any other failure.
    fn merge_no_ff(&self, branch: &str, into: &str) -> Result<()>;
}
