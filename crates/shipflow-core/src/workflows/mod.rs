//! Workflow steps for shipflow.
//!
//! Each module holds one stage of the pipeline as a plain function plus the
//! [`Step`](pipeline::Step) wrapping it:
//! - `preflight`: repository and working tree check
//! - `branch`: feature branch creation
//! - `checks`: test and build gate
//! - `publish`: commit and push of the feature branch
//! - `confirm`: confirmation gates
//! - `merge`: feature → base and base → release merges
//! - `deploy`: deployment with fallback
//! - `pipeline`: the driver loop

pub mod branch;
pub mod checks;
pub mod confirm;
pub mod deploy;
pub mod merge;
pub mod pipeline;
pub mod preflight;
pub mod publish;

// Re-export workflow functions
pub use branch::create_feature_branch;
pub use checks::run_tests_and_build;
pub use deploy::{deploy, run_fallback};
pub use merge::{merge_base_into_release, merge_feature_into_base};
pub use pipeline::{Pipeline, Step, StepOutcome, WorkflowContext};
pub use preflight::check_repository;
pub use publish::{PublishResult, commit_and_push};
