//! shipflow core - feature-to-production workflow engine.
//!
//! This crate drives a linear git release workflow: create a feature branch,
//! gate it on tests and a build, commit and push it, merge it into the
//! integration branch, merge that into `main`, and deploy. Every step shells
//! out to an external tool (git, npm, a deployment CLI) through an adapter
//! trait, so the whole pipeline can run against mocks.
//!
//! # Architecture
//!
//! - [`error`]: Error types and result type alias
//! - [`config`]: Run parameters and project settings
//! - [`state`]: Step names, run summary and final outcome
//! - [`tools`]: Tool registry and adapter traits
//! - [`workflows`]: Pipeline steps and the driver loop
//! - [`runtime`]: The `Orchestrator` tying it together
//!
//! # Example
//!
//! ```rust
//! use shipflow_core::{Pipeline, RunConfig, StepName};
//!
//! let run = RunConfig::new("user-auth", "develop", false, false).unwrap();
//! assert_eq!(run.feature_branch(), "feature/user-auth");
//!
//! let steps = Pipeline::standard().step_names();
//! assert_eq!(steps.first(), Some(&StepName::Preflight));
//! assert_eq!(steps.last(), Some(&StepName::Deploy));
//! ```

pub mod config;
pub mod error;
pub mod runtime;
pub mod state;
pub mod tools;
pub mod workflows;

// Re-export core types for convenience
pub use config::{
    CONFIG_FILE_NAME, DEFAULT_BASE_BRANCH, DeploySettings, GitSettings, PackageSettings,
    RELEASE_BRANCH, RunConfig, ShipConfig,
};
pub use error::{Result, ShipError};
pub use runtime::Orchestrator;
pub use state::{DeployStatus, Outcome, StepName, Summary};
pub use tools::ToolRegistry;
pub use workflows::{Pipeline, Step, StepOutcome, WorkflowContext};
