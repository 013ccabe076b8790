//! Step abstraction and the driver loop.
//!
//! A pipeline is an ordered list of [`Step`]s. The driver runs them one after
//! another and stops at the first failure or cancellation.

use crate::config::{RunConfig, ShipConfig};
use crate::error::Result;
use crate::state::{Outcome, StepName, Summary};
use crate::tools::ToolRegistry;
use std::path::Path;

/// Everything a step can see while running.
pub struct WorkflowContext<'a> {
    /// Parameters of this run.
    pub run: &'a RunConfig,

    /// Project settings.
    pub settings: &'a ShipConfig,

    /// External tool adapters.
    pub tools: &'a ToolRegistry,

    /// Project working directory.
    pub workdir: &'a Path,

    /// Facts collected for the final report.
    pub summary: Summary,
}

impl<'a> WorkflowContext<'a> {
    /// Creates a context with a fresh summary.
    pub fn new(
        run: &'a RunConfig,
        settings: &'a ShipConfig,
        tools: &'a ToolRegistry,
        workdir: &'a Path,
    ) -> Self {
        Self {
            run,
            settings,
            tools,
            workdir,
            summary: Summary::new(run),
        }
    }
}

/// How a step ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Proceed to the next step.
    Continue,

    /// The step had nothing to do; proceed.
    Skipped,

    /// The operator declined; stop with a clean exit.
    Cancelled,
}

/// A single pipeline step.
pub trait Step {
    /// Identifier reported on failure or cancellation.
    fn name(&self) -> StepName;

    /// Runs the step.
    ///
    /// # Errors
    ///
    /// Any error is fatal and stops the pipeline.
    fn run(&self, ctx: &mut WorkflowContext<'_>) -> Result<StepOutcome>;
}

/// Ordered list of steps.
pub struct Pipeline {
    steps: Vec<Box<dyn Step>>,
}

impl Pipeline {
    /// Creates a pipeline from explicit steps.
    pub fn new(steps: Vec<Box<dyn Step>>) -> Self {
        Self { steps }
    }

    /// The full feature-to-production pipeline.
    pub fn standard() -> Self {
        use super::{branch, checks, confirm, deploy, merge, preflight, publish};

        Self::new(vec![
            Box::new(preflight::Preflight),
            Box::new(branch::CreateBranch),
            Box::new(checks::TestAndBuild),
            Box::new(publish::CommitAndPush),
            Box::new(confirm::Confirm::integration()),
            Box::new(merge::IntegrationMerge),
            Box::new(confirm::Confirm::release()),
            Box::new(merge::ReleaseMerge),
            Box::new(deploy::Deploy),
        ])
    }

    /// Step names in execution order.
    pub fn step_names(&self) -> Vec<StepName> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Runs every step in order.
    pub fn run(&self, mut ctx: WorkflowContext<'_>) -> Outcome {
        for step in &self.steps {
            let name = step.name();
            tracing::debug!(step = %name, "starting step");

            match step.run(&mut ctx) {
                Ok(StepOutcome::Continue) => tracing::debug!(step = %name, "step completed"),
                Ok(StepOutcome::Skipped) => tracing::debug!(step = %name, "step skipped"),
                Ok(StepOutcome::Cancelled) => {
                    tracing::info!(step = %name, "operation cancelled by user");
                    return Outcome::Cancelled { step: name };
                }
                Err(error) => {
                    tracing::error!(step = %name, "{}", error);
                    return Outcome::Failed { step: name, error };
                }
            }
        }

        ctx.summary.finish();
        Outcome::Completed(ctx.summary)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.step_names())
            .finish()
    }
}
