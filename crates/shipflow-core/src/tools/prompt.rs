//! Confirmation prompt adapter.
//!
//! Gates before risky steps ask a yes/no question and block until the
//! operator answers.

use crate::error::Result;
use std::io::{BufRead, Write};

/// Answer classification for one line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// `y` or `yes`.
    Yes,
    /// Empty, `n` or `no`.
    No,
    /// Anything else; the question is asked again.
    Unrecognized,
}

/// Classifies an answer, ignoring case and surrounding whitespace.
pub fn classify(input: &str) -> Answer {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Answer::Yes,
        "" | "n" | "no" => Answer::No,
        _ => Answer::Unrecognized,
    }
}

/// Prompter trait.
pub trait Prompter: Send + Sync {
    /// Asks `message` and returns whether the operator confirmed.
    fn confirm(&self, message: &str) -> Result<bool>;
}

/// Asks on `output` and reads answers from `input` until one is recognized.
///
/// End of input counts as a decline.
pub fn confirm_with<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> Result<bool> {
    loop {
        write!(output, "? {} (y/N): ", message)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }

        match classify(&line) {
            Answer::Yes => return Ok(true),
            Answer::No => return Ok(false),
            Answer::Unrecognized => writeln!(output, "Please answer 'y' for yes or 'n' for no")?,
        }
    }
}

/// Prompter reading from the process's stdin.
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl StdinPrompter {
    /// Creates a new stdin prompter.
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for StdinPrompter {
    fn confirm(&self, message: &str) -> Result<bool> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        confirm_with(&mut stdin.lock(), &mut stdout.lock(), message)
    }
}
