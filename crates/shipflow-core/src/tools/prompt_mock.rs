//! Scripted prompter for testing.

use crate::error::Result;
use crate::tools::prompt::Prompter;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Prompter that replays queued answers and records the questions asked.
///
/// Once the queue is empty every further question is declined.
///
/// # Examples
///
/// ```
/// use shipflow_core::tools::prompt::Prompter;
/// use shipflow_core::tools::prompt_mock::ScriptedPrompter;
///
/// let prompter = ScriptedPrompter::new([true]);
/// assert!(prompter.confirm("Merge?").unwrap());
/// assert!(!prompter.confirm("Deploy?").unwrap());
/// assert_eq!(prompter.questions(), vec!["Merge?", "Deploy?"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: Arc<Mutex<VecDeque<bool>>>,
    questions: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPrompter {
    /// Creates a prompter answering with `answers` in order.
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            questions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Questions asked so far.
    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str) -> Result<bool> {
        self.questions.lock().unwrap().push(message.to_string());
        Ok(self.answers.lock().unwrap().pop_front().unwrap_or(false))
    }
}
