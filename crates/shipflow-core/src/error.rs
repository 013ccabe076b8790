//! Error types for shipflow operations.
//!
//! Every fatal condition the pipeline can hit has its own variant, so callers
//! can tell "branch already exists" from "checkout failed" without matching on
//! the text git printed. Variants that originate from an external tool carry
//! that tool's captured error output verbatim.

use std::path::PathBuf;
use thiserror::Error;

/// Comprehensive error types for shipflow operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ShipError {
    // Input errors
    /// Feature name contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid feature name: {0:?} (use only letters, digits, hyphens and underscores)")]
    InvalidFeatureName(String),

    // Preflight errors
    /// The working directory is not inside a git repository.
    #[error("not a git repository: {0}")]
    NotGitRepository(PathBuf),

    /// `git status` could not be queried.
    #[error("failed to query git status: {0}")]
    GitStatusFailed(String),

    // Branch errors
    /// The base branch reference does not exist.
    #[error("base branch '{0}' does not exist")]
    BaseBranchNotFound(String),

    /// Switching branches failed.
    #[error("failed to switch to branch '{branch}': {stderr}")]
    CheckoutFailed {
        /// Branch that could not be checked out.
        branch: String,
        /// Captured git error output.
        stderr: String,
    },

    /// The feature branch already exists.
    #[error("branch already exists: {0}")]
    BranchExists(String),

    /// Creating the feature branch failed for a reason other than it existing.
    #[error("failed to create branch '{branch}': {stderr}")]
    BranchCreateFailed {
        /// Branch that could not be created.
        branch: String,
        /// Captured git error output.
        stderr: String,
    },

    /// The release branch could not be checked out.
    #[error("failed to switch to release branch '{0}', check that it exists")]
    ReleaseBranchMissing(String),

    // Test and build errors
    /// The project manifest is missing from the working directory.
    #[error("project manifest not found: {0} (run from the project directory)")]
    ManifestNotFound(PathBuf),

    /// The test suite exited nonzero.
    #[error("tests failed: {0}")]
    TestsFailed(String),

    /// The build exited nonzero.
    #[error("build failed: {0}")]
    BuildFailed(String),

    // Publish errors
    /// `git add` failed.
    #[error("failed to stage changes: {0}")]
    StageFailed(String),

    /// The staged diff could not be inspected.
    #[error("failed to inspect staged changes: {0}")]
    StagedDiffFailed(String),

    /// `git commit` failed.
    #[error("failed to create commit: {0}")]
    CommitFailed(String),

    /// `git push` failed.
    #[error("failed to push branch '{branch}': {stderr}")]
    PushFailed {
        /// Branch that could not be pushed.
        branch: String,
        /// Captured git error output.
        stderr: String,
    },

    /// `git pull` failed. Reported as a warning before merges.
    #[error("failed to pull '{branch}': {stderr}")]
    PullFailed {
        /// Branch that could not be pulled.
        branch: String,
        /// Captured git error output.
        stderr: String,
    },

    // Merge errors
    /// The merge stopped on content conflicts.
    #[error(
        "merge conflicts detected merging '{source_branch}' into '{target}'. Resolve them manually:\n  1. git status\n  2. edit the conflicting files\n  3. git add <files>\n  4. git commit"
    )]
    MergeConflict {
        /// Branch being merged.
        source_branch: String,
        /// Branch receiving the merge.
        target: String,
    },

    /// The merge failed without reporting conflicts.
    #[error("failed to merge '{source_branch}' into '{target}': {stderr}")]
    MergeFailed {
        /// Branch being merged.
        source_branch: String,
        /// Branch receiving the merge.
        target: String,
        /// Captured git error output.
        stderr: String,
    },

    // Tool errors
    /// The executable could not be located.
    #[error("command not found: {0}")]
    ToolNotFound(String),

    /// The executable was found but could not be started.
    #[error("tool execution error: {0}")]
    ToolExecutionError(String),

    // Config errors
    /// An explicitly named settings file does not exist.
    #[error("settings file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// The settings file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParseError(String),

    // IO and system errors
    /// Standard IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context from anyhow.
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for shipflow operations.
pub type Result<T> = std::result::Result<T, ShipError>;
