//! Plain-text renderers for catalog entries, lists, tables, and help.

use portal_core::{CatalogEntry, Status};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::registry::CommandSummary;

/// Inner width of the list box.
const LIST_WIDTH: usize = 48;
/// Inner width of the help box.
const HELP_BOX_WIDTH: usize = 58;
/// Maximum display width of one help line before truncation.
pub const HELP_LINE_WIDTH: usize = 56;

/// Presentation glyph for a status.
pub fn status_glyph(status: Status) -> &'static str {
    match status {
        Status::Alive => "🟢",
        Status::Dead => "🔴",
        Status::Unknown => "⚪",
    }
}

/// Cut `text` to at most `width` display columns, ending in `...` if cut.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let budget = width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str("...");
    out
}

/// Right-pad `text` with spaces to `width` display columns.
fn pad_to_width(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(pad))
}

/// Detail card for one entry.
pub fn render_entry(entry: &CatalogEntry) -> String {
    let rule = "═".repeat(50);
    let mut lines = vec![
        rule.clone(),
        format!("  {} {}", status_glyph(entry.status), entry.name),
        rule.clone(),
        format!("  ID:        {}", entry.id),
        format!("  Status:    {}", entry.status),
        format!("  Species:   {}", entry.species),
        format!("  Gender:    {}", entry.gender),
        format!("  Origin:    {}", entry.origin),
        format!("  Location:  {}", entry.location),
        format!("  Episodes:  {}", entry.episode_count),
        format!("  Image:     {}", entry.image_url),
    ];
    if entry.created_by_user {
        lines.push("  [Created by you]".to_string());
    }
    lines.push(rule);
    lines.join("\n")
}

/// Boxed list of entries with a total line. User entries are starred.
pub fn render_entry_list<'a>(entries: impl IntoIterator<Item = &'a CatalogEntry>) -> String {
    let entries: Vec<&CatalogEntry> = entries.into_iter().collect();
    if entries.is_empty() {
        return "  No characters found.".to_string();
    }

    let mut lines = vec![
        String::new(),
        format!("┌{}┐", "─".repeat(LIST_WIDTH)),
        format!("│{}│", pad_to_width(" CHARACTERS", LIST_WIDTH)),
        format!("├{}┤", "─".repeat(LIST_WIDTH)),
    ];
    for entry in &entries {
        let mark = if entry.created_by_user { " *" } else { "" };
        let row = format!(
            " {} [{:>5}] {}{:>3}",
            status_glyph(entry.status),
            entry.id,
            pad_to_width(&truncate_to_width(&entry.name, 30), 30),
            mark
        );
        lines.push(format!("│{}│", pad_to_width(&row, LIST_WIDTH)));
    }
    lines.push(format!("└{}┘", "─".repeat(LIST_WIDTH)));
    lines.push(format!("  Total: {} characters", entries.len()));
    lines.push("  (* - created by you)".to_string());
    lines.join("\n")
}

/// Aligned `key : value` rows.
pub fn render_table(rows: &[(&str, String)]) -> String {
    let key_width = rows.iter().map(|(k, _)| k.width()).max().unwrap_or(10);
    let mut lines = vec![String::new()];
    for (key, value) in rows {
        lines.push(format!("  {} : {}", pad_to_width(key, key_width), value));
    }
    lines.join("\n")
}

/// Boxed command listing. Each line is cut to [`HELP_LINE_WIDTH`].
pub fn render_help(commands: &[CommandSummary]) -> String {
    let mut lines = vec![
        String::new(),
        format!("╔{}╗", "═".repeat(HELP_BOX_WIDTH)),
        format!("║{}║", pad_to_width(" AVAILABLE COMMANDS", HELP_BOX_WIDTH)),
        format!("╠{}╣", "═".repeat(HELP_BOX_WIDTH)),
    ];
    for cmd in commands {
        let line = format!("  {:<12} - {}", cmd.name, cmd.description);
        let line = truncate_to_width(&line, HELP_LINE_WIDTH);
        lines.push(format!("║ {}║", pad_to_width(&line, HELP_BOX_WIDTH - 1)));
    }
    lines.push(format!("╚{}╝", "═".repeat(HELP_BOX_WIDTH)));
    lines.join("\n")
}
