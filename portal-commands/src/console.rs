//! Console collaborator used by handlers for output and interactive prompts.
//!
//! The CLI provides a terminal implementation; `ScriptedConsole` replays
//! canned answers for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

/// Narrow I/O surface handlers are allowed to touch.
pub trait Console: Send + Sync {
    /// Print a message line.
    fn display(&self, message: &str);

    /// Ask for a value. An empty answer falls back to `default` when given.
    fn prompt(&self, message: &str, default: Option<&str>) -> String;

    /// Clear the visible screen.
    fn clear_screen(&self);
}

/// Apply prompt defaulting to a raw answer.
pub fn resolve_answer(raw: &str, default: Option<&str>) -> String {
    let answer = raw.trim();
    match default {
        Some(default) if answer.is_empty() => default.to_string(),
        _ => answer.to_string(),
    }
}

/// Format the prompt label the way the terminal shows it.
pub fn prompt_label(message: &str, default: Option<&str>) -> String {
    match default {
        Some(default) if !default.is_empty() => format!("  {message} [{default}]: "),
        _ => format!("  {message}: "),
    }
}

/// A console that answers prompts from a queue and records everything shown.
#[derive(Default)]
pub struct ScriptedConsole {
    answers: Mutex<VecDeque<String>>,
    output: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
    clears: Mutex<usize>,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a console that will answer prompts with `answers`, in order.
    /// Once exhausted, every prompt receives an empty answer.
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let console = Self::new();
        if let Ok(mut queue) = console.answers.lock() {
            queue.extend(answers.into_iter().map(Into::into));
        }
        console
    }

    pub fn output(&self) -> Vec<String> {
        self.output.lock().map(|o| o.clone()).unwrap_or_default()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn clear_count(&self) -> usize {
        self.clears.lock().map(|c| *c).unwrap_or(0)
    }
}

impl Console for ScriptedConsole {
    fn display(&self, message: &str) {
        if let Ok(mut output) = self.output.lock() {
            output.push(message.to_string());
        }
    }

    fn prompt(&self, message: &str, default: Option<&str>) -> String {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(message.to_string());
        }
        let raw = self
            .answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or_default();
        resolve_answer(&raw, default)
    }

    fn clear_screen(&self) {
        if let Ok(mut clears) = self.clears.lock() {
            *clears += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_answer_uses_default_on_empty() {
        assert_eq!(resolve_answer("   ", Some("Human")), "Human");
        assert_eq!(resolve_answer(" Alien ", Some("Human")), "Alien");
        assert_eq!(resolve_answer("", None), "");
    }

    #[test]
    fn test_prompt_label() {
        assert_eq!(prompt_label("Species", Some("Human")), "  Species [Human]: ");
        assert_eq!(prompt_label("Name", None), "  Name: ");
    }

    #[test]
    fn test_scripted_console_replays_answers() {
        let console = ScriptedConsole::with_answers(["Summer", ""]);
        assert_eq!(console.prompt("Name", None), "Summer");
        assert_eq!(console.prompt("Species", Some("Human")), "Human");
        assert_eq!(console.prompt("Origin", Some("Unknown")), "Unknown");
        assert_eq!(console.prompts(), vec!["Name", "Species", "Origin"]);

        console.display("hello");
        console.clear_screen();
        assert_eq!(console.output(), vec!["hello"]);
        assert_eq!(console.clear_count(), 1);
    }
}
