//! Runtime for shipflow runs.
//!
//! This module provides the `Orchestrator`, which owns the run parameters,
//! project settings and tool adapters, and drives the standard pipeline.

use crate::config::{RunConfig, ShipConfig};
use crate::state::Outcome;
use crate::tools::ToolRegistry;
use crate::workflows::{Pipeline, WorkflowContext};
use std::path::PathBuf;

/// Orchestrator for one feature-to-production run.
///
/// # Examples
///
/// ```no_run
/// use shipflow_core::{Orchestrator, RunConfig, ShipConfig};
/// use std::path::PathBuf;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let run = RunConfig::new("user-auth", "develop", false, false)?;
/// let orchestrator = Orchestrator::new(run, ShipConfig::default(), PathBuf::from("."));
///
/// let outcome = orchestrator.execute();
/// std::process::exit(outcome.exit_code());
/// # }
/// ```
#[derive(Debug)]
pub struct Orchestrator {
    /// Parameters of this run.
    pub run: RunConfig,

    /// Project settings.
    pub settings: ShipConfig,

    /// Project working directory.
    pub workdir: PathBuf,

    /// Tool registry for shell, git, package manager and prompt.
    pub tools: ToolRegistry,

    pipeline: Pipeline,
}

impl Orchestrator {
    /// Creates an orchestrator with the real tool adapters.
    pub fn new(run: RunConfig, settings: ShipConfig, workdir: PathBuf) -> Self {
        let tools = ToolRegistry::standard(&workdir, run.verbose());
        Self::with_tools(run, settings, workdir, tools)
    }

    /// Creates an orchestrator with the given tool adapters.
    pub fn with_tools(run: RunConfig, settings: ShipConfig, workdir: PathBuf, tools: ToolRegistry) -> Self {
        Self {
            run,
            settings,
            workdir,
            tools,
            pipeline: Pipeline::standard(),
        }
    }

    /// Runs the pipeline to completion, cancellation or the first failure.
    #[tracing::instrument(skip_all, fields(feature = self.run.feature_name()))]
    pub fn execute(&self) -> Outcome {
        tracing::info!(
            base = self.run.base_branch(),
            verbose = self.run.verbose(),
            skip_tests = self.run.skip_tests(),
            "starting automated development flow"
        );

        let ctx = WorkflowContext::new(&self.run, &self.settings, &self.tools, &self.workdir);
        self.pipeline.run(ctx)
    }
}
