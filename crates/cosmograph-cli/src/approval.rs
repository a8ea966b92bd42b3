//! Interactive cost confirmation for language-model extraction.

use crate::output::Formatter;
use cosmograph_extractor::{ApprovalGate, ApprovalRequest};
use rustyline::DefaultEditor;

const PROMPT: &str = "Proceed? [y/N] ";

/// Asks the operator on the terminal before any document is sent.
pub struct PromptApproval {
    formatter: Formatter,
}

impl PromptApproval {
    /// Create a prompt gate.
    pub fn new(color_enabled: bool) -> Self {
        Self {
            formatter: Formatter::new(color_enabled),
        }
    }
}

impl ApprovalGate for PromptApproval {
    fn approve(&self, request: &ApprovalRequest) -> bool {
        println!();
        println!("{}", self.formatter.heading("LLM extraction"));
        println!("{}", request.summary());
        println!(
            "{}",
            self.formatter
                .warning("The document will be sent to an external language-model service.")
        );

        // Anything but an explicit yes, including a terminal error, declines
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                eprintln!("{}", self.formatter.error(&format!("Cannot read from terminal: {}", e)));
                return false;
            }
        };
        match editor.readline(PROMPT) {
            Ok(answer) => is_affirmative(&answer),
            Err(_) => false,
        }
    }
}

/// Whether an answer to the prompt approves.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
