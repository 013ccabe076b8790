//! Confirmation gates between pipeline stages.

use crate::config::RELEASE_BRANCH;
use crate::error::Result;
use crate::state::StepName;
use crate::workflows::pipeline::{Step, StepOutcome, WorkflowContext};

/// A yes/no gate; declining cancels the rest of the pipeline.
#[derive(Clone, Copy)]
pub struct Confirm {
    name: StepName,
    question: fn(&WorkflowContext<'_>) -> String,
}

impl Confirm {
    /// Creates a gate asking the question built by `question`.
    pub fn new(name: StepName, question: fn(&WorkflowContext<'_>) -> String) -> Self {
        Self { name, question }
    }

    /// Gate before merging the feature into the base branch.
    pub fn integration() -> Self {
        Self::new(StepName::ConfirmIntegration, |ctx| {
            format!(
                "Merge {} into {}?",
                ctx.run.feature_branch(),
                ctx.run.base_branch()
            )
        })
    }

    /// Gate before merging into the release branch and deploying.
    pub fn release() -> Self {
        Self::new(StepName::ConfirmRelease, |ctx| {
            format!(
                "Merge {} into {} and deploy?",
                ctx.run.base_branch(),
                RELEASE_BRANCH
            )
        })
    }
}

impl std::fmt::Debug for Confirm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Confirm").field("name", &self.name).finish()
    }
}

impl Step for Confirm {
    fn name(&self) -> StepName {
        self.name
    }

    fn run(&self, ctx: &mut WorkflowContext<'_>) -> Result<StepOutcome> {
        let question = (self.question)(&*ctx);
        if ctx.tools.prompter.confirm(&question)? {
            Ok(StepOutcome::Continue)
        } else {
            Ok(StepOutcome::Cancelled)
        }
    }
}
