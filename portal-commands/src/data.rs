//! Commands that change catalog data: fetch, create, my.

use async_trait::async_trait;
use portal_core::error::StorageError;
use portal_core::{CatalogEntry, Gender, Status};
use std::sync::Arc;
use tracing::{error, info};

use crate::SharedStorage;
use crate::registry::{Command, CommandContext, CommandPayload, CommandResult, CommandStrategy};
use crate::render;

const DEFAULT_PAGE: u32 = 1;

/// Groups the data-changing commands.
pub struct DataStrategy {
    storage: SharedStorage,
}

impl DataStrategy {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }
}

impl CommandStrategy for DataStrategy {
    fn name(&self) -> &str {
        "data"
    }

    fn commands(&self) -> Vec<Arc<dyn Command>> {
        vec![
            Arc::new(FetchCommand::new(self.storage.clone())),
            Arc::new(CreateCommand::new(self.storage.clone())),
            Arc::new(MyCommand::new(self.storage.clone())),
        ]
    }
}

/// Load one page from the remote source, replacing remote entries.
pub struct FetchCommand {
    storage: SharedStorage,
}

impl FetchCommand {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl Command for FetchCommand {
    fn name(&self) -> &str {
        "fetch"
    }

    fn description(&self) -> &str {
        "Load characters from the API. Example: fetch 1"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        // Unparseable page numbers silently fall back to the first page.
        let page = args
            .first()
            .and_then(|raw| raw.parse::<u32>().ok())
            .unwrap_or(DEFAULT_PAGE);

        ctx.console.display("⏳ Loading data...");
        let outcome = self.storage.lock().await.fetch_remote(page).await;

        match outcome {
            Ok(count) if count > 0 => {
                CommandResult::ok(format!("✅ Fetched {count} characters (page {page})"))
                    .with_payload(CommandPayload::Fetched { count, page })
            }
            Ok(_) => CommandResult::fail("❌ Failed to load data."),
            Err(e) => {
                ctx.console.display(&format!("❌ Load error: {e}"));
                CommandResult::fail("❌ Failed to load data.")
            }
        }
    }
}

/// Interactive creation of a user entry.
pub struct CreateCommand {
    storage: SharedStorage,
}

impl CreateCommand {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl Command for CreateCommand {
    fn name(&self) -> &str {
        "create"
    }

    fn description(&self) -> &str {
        "Create a new character interactively"
    }

    async fn execute(&self, _args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        let console = ctx.console;
        console.display("\n🆕 NEW CHARACTER");
        console.display(&"─".repeat(40));

        let name = console.prompt("Name", None);
        if name.is_empty() {
            return CommandResult::fail("Name must not be empty.");
        }

        console.display("\nStatus (1-Alive, 2-Dead, 3-unknown):");
        let status = Status::from_choice(&console.prompt("Choose [1-3]", Some("1")));

        let species = console.prompt("Species", Some("Human"));

        console.display("\nGender (1-Male, 2-Female, 3-Genderless, 4-unknown):");
        let gender = Gender::from_choice(&console.prompt("Choose [1-4]", Some("1")));

        let origin = console.prompt("Origin", Some("Unknown"));
        let location = console.prompt("Location", Some("Unknown"));

        let draft = CatalogEntry {
            status,
            species,
            gender,
            origin,
            location,
            ..CatalogEntry::draft(name)
        };

        let mut storage = self.storage.lock().await;
        let (entry, warning) = match storage.add_user_entry(draft) {
            Ok(entry) => (entry, None),
            Err(e @ StorageError::Persist { .. }) => {
                error!(error = %e, "User entry kept in memory only");
                // The entry is already appended; report it with the save problem.
                let entry = storage.user_entries().last().cloned();
                match entry {
                    Some(entry) => (entry, Some(e.to_string())),
                    None => return CommandResult::fail(format!("Could not create character: {e}")),
                }
            }
            Err(e) => {
                error!(error = %e, "User entry rejected");
                return CommandResult::fail(format!("Could not create character: {e}"));
            }
        };
        info!(id = entry.id, name = %entry.name, "Created character");

        let mut message = format!("\n✅ Character created!\n{}", render::render_entry(&entry));
        if let Some(warning) = warning {
            message.push_str(&format!("\n⚠ Not saved to disk: {warning}"));
        }
        CommandResult::ok(message).with_payload(CommandPayload::Entry(entry))
    }
}

/// List entries created by the user.
pub struct MyCommand {
    storage: SharedStorage,
}

impl MyCommand {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl Command for MyCommand {
    fn name(&self) -> &str {
        "my"
    }

    fn description(&self) -> &str {
        "Show the characters you created"
    }

    async fn execute(&self, _args: &[String], _ctx: &CommandContext<'_>) -> CommandResult {
        let storage = self.storage.lock().await;
        let mine = storage.user_entries();
        if mine.is_empty() {
            return CommandResult::fail(
                "You haven't created any characters yet. Use 'create'.",
            );
        }

        let output = render::render_entry_list(mine);
        CommandResult::ok(format!("\n👤 YOUR CHARACTERS{output}"))
            .with_payload(CommandPayload::Entries(mine.to_vec()))
    }
}
