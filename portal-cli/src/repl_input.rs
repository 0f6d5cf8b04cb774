//! Raw-mode line editor for the interactive console.
//!
//! Used when stdin is a terminal. Supports:
//! - Up/Down history recall, keeping the unfinished line as a draft
//! - command name completion shown under the input, accepted with Tab
//! - Ctrl-C reported as an interrupt, Ctrl-D on an empty line as EOF
//!
//! History is kept in `.portal/history` under the workspace.

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};
use portal_commands::CommandSummary;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

use crate::repl::{LineSource, ReadOutcome};

const MAX_HISTORY: usize = 500;
const MAX_SUGGESTIONS: usize = 6;
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Command history persisted one line per entry.
pub struct InputHistory {
    entries: Vec<String>,
    cursor: Option<usize>,
    draft: Option<String>,
    path: PathBuf,
}

impl InputHistory {
    pub fn open(workspace: &Path) -> Self {
        let path = workspace.join(".portal").join("history");
        let entries = std::fs::read_to_string(&path)
            .unwrap_or_default()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
        Self {
            entries,
            cursor: None,
            draft: None,
            path,
        }
    }

    #[cfg(test)]
    fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Record a submitted line. Blank lines and immediate repeats are skipped.
    pub fn record(&mut self, line: &str) {
        self.rewind();
        let line = line.trim();
        if line.is_empty() || self.entries.last().is_some_and(|last| last == line) {
            return;
        }
        self.entries.push(line.to_string());
        if self.entries.len() > MAX_HISTORY {
            let excess = self.entries.len() - MAX_HISTORY;
            self.entries.drain(..excess);
        }
        if let Err(e) = self.save() {
            tracing::debug!(path = %self.path.display(), error = %e, "History not saved");
        }
    }

    fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut body = self.entries.join("\n");
        body.push('\n');
        std::fs::write(&self.path, body)
    }

    /// Step to an older entry, stashing `current` the first time.
    pub fn older(&mut self, current: &str) -> Option<&str> {
        let next = match self.cursor {
            None if self.entries.is_empty() => return None,
            None => {
                self.draft = Some(current.to_string());
                self.entries.len() - 1
            }
            Some(idx) => idx.saturating_sub(1),
        };
        self.cursor = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    /// Step to a newer entry. Past the newest, the stashed draft comes back.
    pub fn newer(&mut self) -> Option<String> {
        let idx = self.cursor?;
        if idx + 1 < self.entries.len() {
            self.cursor = Some(idx + 1);
            return self.entries.get(idx + 1).cloned();
        }
        self.cursor = None;
        Some(self.draft.take().unwrap_or_default())
    }

    fn rewind(&mut self) {
        self.cursor = None;
        self.draft = None;
    }
}

/// Commands whose name starts with the typed word.
///
/// Only the first word completes; a line that already holds an exact
/// command name offers nothing.
pub fn complete<'a>(buffer: &str, commands: &'a [CommandSummary]) -> Vec<&'a CommandSummary> {
    if buffer.is_empty() || buffer.contains(char::is_whitespace) {
        return Vec::new();
    }
    let typed = buffer.to_lowercase();
    let matches: Vec<&CommandSummary> = commands
        .iter()
        .filter(|c| c.name.starts_with(&typed))
        .collect();
    if matches.len() == 1 && matches[0].name == typed {
        return Vec::new();
    }
    matches
}

/// Line editor bound to the terminal.
pub struct ReplInput {
    history: InputHistory,
    commands: Vec<CommandSummary>,
    shown_below: usize,
}

impl ReplInput {
    pub fn new(workspace: &Path, commands: Vec<CommandSummary>) -> Self {
        Self {
            history: InputHistory::open(workspace),
            commands,
            shown_below: 0,
        }
    }

    fn read_raw(&mut self, prompt: &str) -> io::Result<ReadOutcome> {
        let mut line: Vec<char> = Vec::new();
        let mut pos = 0usize;
        let mut selected = 0usize;

        loop {
            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            else {
                continue;
            };
            if kind == KeyEventKind::Release {
                continue;
            }

            let text: String = line.iter().collect();
            let candidates: Vec<String> = complete(&text, &self.commands)
                .into_iter()
                .map(|c| c.name.clone())
                .collect();

            match (code, modifiers) {
                (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Ok(ReadOutcome::Interrupted),
                (KeyCode::Char('d'), KeyModifiers::CONTROL) if line.is_empty() => {
                    return Ok(ReadOutcome::Eof);
                }
                (KeyCode::Enter, _) => {
                    self.history.record(&text);
                    return Ok(ReadOutcome::Line(text.trim().to_string()));
                }
                (KeyCode::Tab, _) => {
                    if let Some(name) = candidates.get(selected) {
                        line = format!("{name} ").chars().collect();
                        pos = line.len();
                    }
                }
                (KeyCode::Up, _) if candidates.len() > 1 => {
                    selected = selected.saturating_sub(1);
                }
                (KeyCode::Down, _) if candidates.len() > 1 => {
                    selected = (selected + 1).min(candidates.len() - 1);
                }
                (KeyCode::Up, _) => {
                    if let Some(entry) = self.history.older(&text) {
                        line = entry.chars().collect();
                        pos = line.len();
                    }
                }
                (KeyCode::Down, _) => {
                    if let Some(entry) = self.history.newer() {
                        line = entry.chars().collect();
                        pos = line.len();
                    }
                }
                (KeyCode::Left, _) => pos = pos.saturating_sub(1),
                (KeyCode::Right, _) => pos = (pos + 1).min(line.len()),
                (KeyCode::Home, _) => pos = 0,
                (KeyCode::End, _) => pos = line.len(),
                (KeyCode::Backspace, _) if pos > 0 => {
                    pos -= 1;
                    line.remove(pos);
                    selected = 0;
                }
                (KeyCode::Delete, _) if pos < line.len() => {
                    line.remove(pos);
                    selected = 0;
                }
                (KeyCode::Esc, _) => selected = 0,
                (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                    line.insert(pos, c);
                    pos += 1;
                    selected = 0;
                }
                _ => continue,
            }

            self.redraw(prompt, &line, pos, selected)?;
        }
    }

    fn redraw(&mut self, prompt: &str, line: &[char], pos: usize, selected: usize) -> io::Result<()> {
        let mut out = io::stdout();
        self.clear_below(&mut out)?;

        let text: String = line.iter().collect();
        write!(out, "\r\x1b[2K{prompt}{text}")?;

        let matches = complete(&text, &self.commands);
        let width = terminal::size().map(|(w, _)| w as usize).unwrap_or(80);
        for (i, summary) in matches.iter().take(MAX_SUGGESTIONS).enumerate() {
            let row = format!("  {:<10} {}", summary.name, summary.description);
            let row = portal_commands::render::truncate_to_width(&row, width.saturating_sub(1));
            if i == selected {
                write!(out, "\r\n\x1b[2K\x1b[7m{row}\x1b[0m")?;
            } else {
                write!(out, "\r\n\x1b[2K\x1b[90m{row}\x1b[0m")?;
            }
        }
        self.shown_below = matches.len().min(MAX_SUGGESTIONS);
        if self.shown_below > 0 {
            write!(out, "{}", cursor::MoveUp(self.shown_below as u16))?;
        }

        let before: String = line[..pos].iter().collect();
        let column = visible_width(prompt) + before.width();
        write!(out, "\r")?;
        // MoveRight(0) would still advance one column.
        if column > 0 {
            write!(out, "{}", cursor::MoveRight(column as u16))?;
        }
        out.flush()
    }

    fn clear_below(&mut self, out: &mut io::Stdout) -> io::Result<()> {
        if self.shown_below == 0 {
            return Ok(());
        }
        for _ in 0..self.shown_below {
            write!(out, "\r\n\x1b[2K")?;
        }
        write!(out, "{}", cursor::MoveUp(self.shown_below as u16))?;
        self.shown_below = 0;
        Ok(())
    }
}

impl LineSource for ReplInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome> {
        print!("{prompt}");
        io::stdout().flush()?;

        terminal::enable_raw_mode()?;
        let outcome = self.read_raw(prompt);
        let mut out = io::stdout();
        let cleared = self.clear_below(&mut out);
        terminal::disable_raw_mode()?;

        print!("\r\n");
        io::stdout().flush()?;
        cleared?;
        outcome
    }
}

/// Display width of a prompt, ignoring ANSI colour sequences.
fn visible_width(prompt: &str) -> usize {
    let mut plain = String::with_capacity(prompt.len());
    let mut chars = prompt.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            plain.push(c);
        }
    }
    plain.width()
}
