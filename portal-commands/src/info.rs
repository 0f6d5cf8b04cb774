//! Read-only catalog commands: list, show, search, stats.

use async_trait::async_trait;
use std::sync::Arc;

use crate::SharedStorage;
use crate::registry::{Command, CommandContext, CommandPayload, CommandResult, CommandStrategy};
use crate::render;

/// Groups the read-only commands.
pub struct InfoStrategy {
    storage: SharedStorage,
}

impl InfoStrategy {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }
}

impl CommandStrategy for InfoStrategy {
    fn name(&self) -> &str {
        "info"
    }

    fn commands(&self) -> Vec<Arc<dyn Command>> {
        vec![
            Arc::new(ListCommand::new(self.storage.clone())),
            Arc::new(ShowCommand::new(self.storage.clone())),
            Arc::new(SearchCommand::new(self.storage.clone())),
            Arc::new(StatsCommand::new(self.storage.clone())),
        ]
    }
}

/// List every entry in the catalog.
pub struct ListCommand {
    storage: SharedStorage,
}

impl ListCommand {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl Command for ListCommand {
    fn name(&self) -> &str {
        "list"
    }

    fn description(&self) -> &str {
        "Show every character in the catalog"
    }

    async fn execute(&self, _args: &[String], _ctx: &CommandContext<'_>) -> CommandResult {
        let storage = self.storage.lock().await;
        let entries = storage.all();
        if entries.is_empty() {
            return CommandResult::fail("The catalog is empty. Use 'fetch' to load characters.");
        }

        let output = render::render_entry_list(entries.iter().copied());
        let payload = entries.into_iter().cloned().collect();
        CommandResult::ok(output).with_payload(CommandPayload::Entries(payload))
    }
}

/// Show one entry by id.
pub struct ShowCommand {
    storage: SharedStorage,
}

impl ShowCommand {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl Command for ShowCommand {
    fn name(&self) -> &str {
        "show"
    }

    fn description(&self) -> &str {
        "Show a character by ID. Example: show 1"
    }

    async fn execute(&self, args: &[String], _ctx: &CommandContext<'_>) -> CommandResult {
        let Some(raw_id) = args.first() else {
            return CommandResult::fail("Specify a character ID. Example: show 1");
        };
        let Ok(id) = raw_id.parse::<u64>() else {
            return CommandResult::fail("ID must be a number.");
        };

        let storage = self.storage.lock().await;
        match storage.get_by_id(id) {
            Some(entry) => CommandResult::ok(render::render_entry(entry))
                .with_payload(CommandPayload::Entry(entry.clone())),
            None => CommandResult::fail(format!("No character with ID {id}.")),
        }
    }
}

/// Case-insensitive name search.
pub struct SearchCommand {
    storage: SharedStorage,
}

impl SearchCommand {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl Command for SearchCommand {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search by name. Example: search Rick"
    }

    async fn execute(&self, args: &[String], _ctx: &CommandContext<'_>) -> CommandResult {
        if args.is_empty() {
            return CommandResult::fail("Specify a name to search for.");
        }

        let query = args.join(" ");
        let storage = self.storage.lock().await;
        let matches = storage.search(&query);
        if matches.is_empty() {
            return CommandResult::fail(format!("Nothing found for '{query}'."));
        }

        let output = render::render_entry_list(matches.iter().copied());
        let payload = matches.into_iter().cloned().collect();
        CommandResult::ok(format!("Found for '{query}':\n{output}"))
            .with_payload(CommandPayload::Entries(payload))
    }
}

/// Catalog statistics.
pub struct StatsCommand {
    storage: SharedStorage,
}

impl StatsCommand {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl Command for StatsCommand {
    fn name(&self) -> &str {
        "stats"
    }

    fn description(&self) -> &str {
        "Show catalog statistics"
    }

    async fn execute(&self, _args: &[String], _ctx: &CommandContext<'_>) -> CommandResult {
        let stats = self.storage.lock().await.stats();
        if stats.total == 0 {
            return CommandResult::fail("The catalog is empty.");
        }

        let table = render::render_table(&[
            ("Total characters", stats.total.to_string()),
            ("🟢 Alive", stats.alive.to_string()),
            ("🔴 Dead", stats.dead.to_string()),
            ("⚪ Unknown", stats.unknown.to_string()),
            ("👤 Created by you", stats.user_created.to_string()),
        ]);
        CommandResult::ok(format!("\n📊 CATALOG STATISTICS{table}"))
            .with_payload(CommandPayload::Stats(stats))
    }
}
