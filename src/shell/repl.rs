// Interactive read loop
//
// Reads one line at a time. exit/quit/bye end the session, help/status are
// answered here, everything else goes through the router.

use crate::actions::ActionHandlers;
use crate::core::Router;
use crate::error::Result;
use std::io::{BufRead, Write};

/// How many past interactions `status` shows
const STATUS_HISTORY: usize = 5;

/// What a line of input means to the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    Exit,
    Help,
    Status,
    Empty,
    Route(String),
}

/// Classify a raw line at the shell level (before the router sees it)
pub fn parse_line(line: &str) -> ShellInput {
    let trimmed = line.trim();

    match trimmed.to_lowercase().as_str() {
        "" => ShellInput::Empty,
        "exit" | "quit" | "bye" => ShellInput::Exit,
        "help" => ShellInput::Help,
        "status" => ShellInput::Status,
        _ => ShellInput::Route(trimmed.to_string()),
    }
}

pub struct Shell {
    router: Router<ActionHandlers>,
}

impl Shell {
    pub fn new(router: Router<ActionHandlers>) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &Router<ActionHandlers> {
        &self.router
    }

    /// Run until exit or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        writeln!(out, "Task Agent ready! Type 'help' for examples or 'exit' to quit.\n")?;

        let mut lines = input.lines();
        loop {
            write!(out, "You: ")?;
            out.flush()?;

            let line = match lines.next() {
                Some(line) => line?,
                None => {
                    // EOF (ctrl-d) ends the session like `exit`
                    writeln!(out)?;
                    break;
                }
            };

            match parse_line(&line) {
                ShellInput::Exit => break,
                ShellInput::Empty => continue,
                ShellInput::Help => writeln!(out, "{}", help_text())?,
                ShellInput::Status => writeln!(out, "{}", self.status_text())?,
                ShellInput::Route(text) => {
                    let reply = self.router.route(&text);
                    writeln!(out, "Agent: {}\n", reply)?;
                }
            }
        }

        writeln!(out, "Goodbye!")?;
        Ok(())
    }

    pub fn status_text(&self) -> String {
        let session = self.router.session();
        let store = self.router.handlers().store();
        let config = store.config();

        let mut lines = vec![
            "Agent Status".to_string(),
            "=".repeat(40),
            format!("Interactions this session: {}", session.count()),
        ];

        let recent = session.recent(STATUS_HISTORY);
        if !recent.is_empty() {
            lines.push("Recent:".to_string());
            for record in recent {
                lines.push(format!(
                    "  [{}] {} -> {} ({:.0}%)",
                    record.recorded_at.format("%H:%M:%S"),
                    record.input,
                    record.intent,
                    record.confidence * 100.0
                ));
            }
        }

        lines.push(format!("Notes saved: {}", store.notes().len()));
        lines.push(format!("Active reminders: {}", store.active_reminders().len()));
        lines.push(format!(
            "Weather API key: {}",
            if config.has_weather_key() { "Set" } else { "Not set" }
        ));
        lines.push(format!("Default city: {}", config.default_city));
        lines.push("=".repeat(40));

        lines.join("\n")
    }
}

pub fn help_text() -> String {
    r#"Things you can ask:
  Weather     "what's the weather in Paris", "weather"
  Notes       "add note buy milk", "show notes"
  Math        "calculate 15 * 4", "what is (2 + 3) ** 2"
  Reminders   "remind me to call mom at 5pm", "show reminders"
  Search      "search for rust lifetimes" (coming soon)
  Files       "open file report.txt" (coming soon)

Shell commands:
  help        Show this help
  status      Show session and data stats
  exit        Quit (also: quit, bye)"#
        .to_string()
}
