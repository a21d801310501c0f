//! Console interaction channel.
//!
//! Prints each Investigator question and reads the patient's answer from
//! stdin (or any reader, for tests):
//!
//! ```text
//! ── Question ──
//! Is the vision loss sudden or gradual?
//! patient> gradual
//! ```
//!
//! End of input (Ctrl-D) closes the channel, which abandons the session.

use async_trait::async_trait;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};
use visionlink_application::{InteractionChannel, InteractionError};

type SharedReader = Arc<Mutex<Box<dyn BufRead + Send>>>;

/// Terminal-based interaction channel.
///
/// Reads happen on the blocking pool so the runtime stays free to observe
/// timeouts and Ctrl-C while the patient is typing.
pub struct ConsoleInteraction {
    reader: SharedReader,
    echo: bool,
}

impl ConsoleInteraction {
    /// Read answers from stdin
    pub fn new() -> Self {
        Self::with_reader(io::BufReader::new(io::stdin()))
    }

    /// Read answers from `reader`
    pub fn with_reader(reader: impl BufRead + Send + 'static) -> Self {
        Self {
            reader: Arc::new(Mutex::new(Box::new(reader))),
            echo: true,
        }
    }

    /// Do not print questions or the prompt
    pub fn silent(mut self) -> Self {
        self.echo = false;
        self
    }

    fn display_question(&self, question: &str) -> Result<(), InteractionError> {
        if !self.echo {
            return Ok(());
        }
        println!();
        println!("{}", "── Question ──".cyan().bold());
        println!("{}", question);
        print!("{} ", "patient>".magenta().bold());
        io::stdout()
            .flush()
            .map_err(|e| InteractionError::Io(format!("Failed to flush stdout: {}", e)))
    }
}

impl Default for ConsoleInteraction {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InteractionChannel for ConsoleInteraction {
    async fn ask(&self, question: &str) -> Result<String, InteractionError> {
        self.display_question(question)?;

        let reader = Arc::clone(&self.reader);
        let line = tokio::task::spawn_blocking(move || {
            let mut reader = reader
                .lock()
                .map_err(|_| InteractionError::Io("input reader poisoned".to_string()))?;
            let mut input = String::new();
            let read = reader
                .read_line(&mut input)
                .map_err(|e| InteractionError::Io(format!("Failed to read input: {}", e)))?;
            if read == 0 {
                return Err(InteractionError::Closed);
            }
            Ok(input)
        })
        .await
        .map_err(|e| InteractionError::Io(format!("input task failed: {}", e)))??;

        Ok(line.trim().to_string())
    }

    fn on_empty_answer(&self) {
        if self.echo {
            println!("{}", "Please type an answer (Ctrl-D to stop).".yellow());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_reads_answers_in_order() {
        let channel = ConsoleInteraction::with_reader(Cursor::new("gradual\n3 months\n")).silent();
        assert_eq!(channel.ask("sudden or gradual?").await.unwrap(), "gradual");
        assert_eq!(channel.ask("how long?").await.unwrap(), "3 months");
    }

    #[tokio::test]
    async fn test_blank_line_is_returned_empty() {
        let channel = ConsoleInteraction::with_reader(Cursor::new("   \nyes\n")).silent();
        assert_eq!(channel.ask("pain?").await.unwrap(), "");
        assert_eq!(channel.ask("pain?").await.unwrap(), "yes");
    }

    #[tokio::test]
    async fn test_end_of_input_closes_channel() {
        let channel = ConsoleInteraction::with_reader(Cursor::new("only\n")).silent();
        channel.ask("q1?").await.unwrap();
        assert!(matches!(
            channel.ask("q2?").await,
            Err(InteractionError::Closed)
        ));
    }
}
