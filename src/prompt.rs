//! Operator confirmation prompts.
//!
//! Questions go to standard output; the answer is the first
//! whitespace-delimited token of one line read from standard input,
//! lowercased. Only `y` is affirmative.

use std::io::{self, BufRead, Write};

use crate::error::DevstrapError;

/// Asks the operator a yes/no question.
pub trait Prompter {
    /// Returns `true` when the operator answered affirmatively.
    fn confirm(&self, question: &str) -> Result<bool, DevstrapError>;
}

/// Interprets one line of operator input.
pub fn parse_answer(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|token| token.to_lowercase() == "y")
}

/// Reads one answer line from `reader`. End of input counts as "no".
pub fn read_answer<R: BufRead>(reader: &mut R) -> io::Result<bool> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(parse_answer(&line))
}

/// Prompts on the controlling terminal's standard streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdioPrompter;

impl Prompter for StdioPrompter {
    fn confirm(&self, question: &str) -> Result<bool, DevstrapError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", question)
            .and_then(|()| stdout.flush())
            .map_err(|e| DevstrapError::Prompt(format!("failed to write prompt: {}", e)))?;
        drop(stdout);

        read_answer(&mut io::stdin().lock())
            .map_err(|e| DevstrapError::Prompt(format!("failed to read answer: {}", e)))
    }
}

/// Answers every question with a fixed value, for unattended runs.
#[derive(Debug, Clone, Copy)]
pub struct AssumeAnswer(pub bool);

impl Prompter for AssumeAnswer {
    fn confirm(&self, question: &str) -> Result<bool, DevstrapError> {
        tracing::info!(answer = self.0, "assumed answer: {}", question.trim_end());
        Ok(self.0)
    }
}
