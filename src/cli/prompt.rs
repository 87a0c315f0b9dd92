use async_trait::async_trait;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::prompt::Prompter;

/// Stdin lines, shared between the shell loop and blocking dialogs
pub type InputLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

pub fn stdin_lines() -> InputLines {
    Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()))
}

/// Print `message` without a newline and wait for one line of input.
/// `None` on end of input.
pub async fn ask(input: &InputLines, message: &str) -> Option<String> {
    print!("{}", message);
    let _ = std::io::stdout().flush();

    match input.lock().await.next_line().await {
        Ok(line) => line,
        Err(e) => {
            tracing::error!("Failed to read input: {}", e);
            None
        }
    }
}

/// Dialogs on the terminal
pub struct TerminalPrompter {
    input: InputLines,
}

impl TerminalPrompter {
    pub fn new(input: InputLines) -> Self {
        Self { input }
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn confirm(&self, message: &str) -> bool {
        ask(&self.input, &format!("{} [y/N] ", message))
            .await
            .is_some_and(|answer| is_yes(&answer))
    }

    async fn alert(&self, message: &str) {
        println!("!! {}", message);
        ask(&self.input, "Press Enter to continue ").await;
    }
}
