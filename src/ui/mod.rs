//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_dirty_tree, display_error, display_manual_push_instruction,
    display_plan_context, display_proposed_tag, display_skip, display_status, display_success,
    display_tag_listing,
};

/// Source of yes/no answers for the tagging workflow
pub trait Prompt {
    /// Ask a yes/no question. Anything other than an explicit yes is a no.
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Whether a typed answer counts as "yes"
pub fn is_affirmative(input: &str) -> bool {
    let response = input.trim().to_lowercase();
    response == "y" || response == "yes"
}

/// Blocking prompt on stdin/stdout.
///
/// Default is "no" if the user presses Enter or stdin is closed.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        print!("\n{} (y/N): ", question);
        io::stdout().flush()?;

        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Ok(false);
        }

        Ok(is_affirmative(&input))
    }
}

/// Prompt that replays canned answers and records the questions asked.
///
/// Runs out of answers as "no".
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[bool]) -> Self {
        ScriptedPrompt {
            answers: answers.iter().copied().collect(),
            asked: Vec::new(),
        }
    }

    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or(false))
    }
}
