//! Confirmation prompts used before destructive store operations

use std::io::{self, BufRead, Write};

use tracing::warn;

/// Asks the user a yes/no question
pub trait ConfirmPrompt: Send {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Prompts on stdout and reads the answer from stdin
pub struct StdinPrompt;

impl ConfirmPrompt for StdinPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if let Err(e) = io::stdout().flush() {
            warn!(error = %e, "Failed to flush prompt");
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                warn!(error = %e, "Failed to read confirmation, treating as no");
                false
            }
        }
    }
}

/// Confirms everything (for `--yes`)
pub struct AssumeYes;

impl ConfirmPrompt for AssumeYes {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
