//! Command registry: handler registration by strategy, and dispatch.
//!
//! Handlers are registered in named groups (strategies). Re-registering a
//! name replaces the earlier handler in place, so listing order stays stable.
//! Dispatch resolves a parsed invocation to a handler and always produces a
//! `CommandResult`; unknown names get prefix-based suggestions.

use async_trait::async_trait;
use portal_core::{CatalogEntry, CatalogStats};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::console::Console;
use crate::parser::{self, Invocation};

/// Structured data attached to a successful result.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandPayload {
    Entry(CatalogEntry),
    Entries(Vec<CatalogEntry>),
    Stats(CatalogStats),
    Fetched { count: usize, page: u32 },
    Commands(Vec<CommandSummary>),
}

/// Uniform outcome of every command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    pub payload: Option<CommandPayload>,
    /// Set by terminal commands; the REPL stops after displaying the message.
    pub terminate: bool,
}

impl CommandResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload: None,
            terminate: false,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            payload: None,
            terminate: false,
        }
    }

    /// A successful result that asks the loop to shut down.
    pub fn exit(message: impl Into<String>) -> Self {
        Self {
            terminate: true,
            ..Self::ok(message)
        }
    }

    pub fn with_payload(mut self, payload: CommandPayload) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Name, description, and group of a registered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSummary {
    pub name: String,
    pub description: String,
    pub strategy: String,
}

/// What a handler can see besides its arguments.
pub struct CommandContext<'a> {
    pub console: &'a dyn Console,
    /// Every registered command, in listing order.
    pub commands: &'a [CommandSummary],
}

/// Trait that every command handler implements.
#[async_trait]
pub trait Command: Send + Sync {
    /// The name typed at the prompt.
    fn name(&self) -> &str;

    /// One-line description shown by `help`.
    fn description(&self) -> &str;

    /// Run with positional arguments. Failures are results, never errors.
    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult;
}

/// A named group of commands registered together.
pub trait CommandStrategy {
    fn name(&self) -> &str;

    fn commands(&self) -> Vec<Arc<dyn Command>>;
}

struct RegisteredCommand {
    command: Arc<dyn Command>,
    strategy: String,
}

/// The dispatch facade: name lookup table plus the uniform result contract.
pub struct CommandRegistry {
    commands: Vec<RegisteredCommand>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register every command of a strategy.
    pub fn use_strategy(&mut self, strategy: &dyn CommandStrategy) {
        for command in strategy.commands() {
            self.register(strategy.name(), command);
        }
    }

    /// Register one command. An existing name is overwritten (last wins).
    pub fn register(&mut self, strategy: &str, command: Arc<dyn Command>) {
        let name = command.name().to_lowercase();
        let entry = RegisteredCommand {
            command,
            strategy: strategy.to_string(),
        };
        match self.index.get(&name) {
            Some(&slot) => {
                debug!(command = %name, strategy, "Replacing command");
                self.commands[slot] = entry;
            }
            None => {
                debug!(command = %name, strategy, "Registering command");
                self.index.insert(name, self.commands.len());
                self.commands.push(entry);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.index
            .get(name)
            .map(|&slot| Arc::clone(&self.commands[slot].command))
    }

    /// Registered names, in listing order.
    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.command.name()).collect()
    }

    pub fn summaries(&self) -> Vec<CommandSummary> {
        self.commands
            .iter()
            .map(|c| CommandSummary {
                name: c.command.name().to_string(),
                description: c.command.description().to_string(),
                strategy: c.strategy.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Registered names sharing the first two characters of `typed`,
    /// ignoring case. Shorter input yields nothing.
    pub fn suggestions(&self, typed: &str) -> Vec<&str> {
        let prefix: String = typed.to_lowercase().chars().take(2).collect();
        if prefix.chars().count() < 2 {
            return Vec::new();
        }
        self.names()
            .into_iter()
            .filter(|name| name.to_lowercase().starts_with(&prefix))
            .collect()
    }

    /// Resolve and run a parsed invocation.
    ///
    /// Options are not forwarded to handlers.
    pub async fn dispatch(&self, invocation: &Invocation, console: &dyn Console) -> CommandResult {
        if invocation.command.is_empty() {
            return CommandResult::fail("Enter a command. Use 'help' to list commands.");
        }

        let Some(command) = self.get(&invocation.command) else {
            let suggestions = self.suggestions(&invocation.command);
            debug!(
                command = %invocation.command,
                suggestions = suggestions.len(),
                "Unknown command"
            );
            let mut message = format!("Unknown command: '{}'.", invocation.command);
            if !suggestions.is_empty() {
                message.push_str(&format!(" Did you mean: {}?", suggestions.join(", ")));
            }
            return CommandResult::fail(message);
        };

        let summaries = self.summaries();
        let ctx = CommandContext {
            console,
            commands: &summaries,
        };
        debug!(command = %invocation.command, args = invocation.args.len(), "Dispatching");
        command.execute(&invocation.args, &ctx).await
    }

    /// Parse a raw line and dispatch it.
    pub async fn execute_line(&self, raw: &str, console: &dyn Console) -> CommandResult {
        self.dispatch(&parser::parse(raw), console).await
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    /// Echoes its arguments back.
    struct EchoCommand {
        name: &'static str,
        description: &'static str,
    }

    #[async_trait]
    impl Command for EchoCommand {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            self.description
        }

        async fn execute(&self, args: &[String], _ctx: &CommandContext<'_>) -> CommandResult {
            CommandResult::ok(args.join(" "))
        }
    }

    fn echo(name: &'static str) -> Arc<dyn Command> {
        Arc::new(EchoCommand {
            name,
            description: "echo",
        })
    }

    struct TestStrategy;

    impl CommandStrategy for TestStrategy {
        fn name(&self) -> &str {
            "test"
        }

        fn commands(&self) -> Vec<Arc<dyn Command>> {
            vec![echo("list"), echo("search"), echo("stats")]
        }
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.use_strategy(&TestStrategy);
        registry
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_use_strategy_registers_in_order() {
        let registry = registry();
        assert_eq!(registry.names(), vec!["list", "search", "stats"]);
        assert!(registry.summaries().iter().all(|s| s.strategy == "test"));
    }

    #[test]
    fn test_last_registration_wins_in_place() {
        let mut registry = registry();
        registry.register(
            "override",
            Arc::new(EchoCommand {
                name: "search",
                description: "replacement",
            }),
        );
        assert_eq!(registry.len(), 3);
        let summaries = registry.summaries();
        assert_eq!(summaries[1].description, "replacement");
        assert_eq!(summaries[1].strategy, "override");
    }

    #[test]
    fn test_suggestions_share_two_char_prefix() {
        let registry = registry();
        assert_eq!(registry.suggestions("se"), vec!["search"]);
        assert_eq!(registry.suggestions("ST"), vec!["stats"]);
        assert!(registry.suggestions("zz").is_empty());
        assert!(registry.suggestions("s").is_empty());
        assert!(registry.suggestions("").is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_empty_command() {
        let console = ScriptedConsole::new();
        let result = registry().execute_line("   ", &console).await;
        assert!(!result.success);
        assert!(result.message.contains("help"));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_with_suggestion() {
        let console = ScriptedConsole::new();
        let result = registry().execute_line("se", &console).await;
        assert!(!result.success);
        assert_eq!(
            result.message,
            "Unknown command: 'se'. Did you mean: search?"
        );
    }

    #[tokio::test]
    async fn test_dispatch_unknown_without_suggestion() {
        let console = ScriptedConsole::new();
        let result = registry().execute_line("zz", &console).await;
        assert!(!result.success);
        assert_eq!(result.message, "Unknown command: 'zz'.");
    }

    #[tokio::test]
    async fn test_dispatch_passes_positionals_only() {
        let console = ScriptedConsole::new();
        let result = registry()
            .execute_line("SEARCH Rick --page 2 -x Sanchez", &console)
            .await;
        assert!(result.success);
        assert_eq!(result.message, "Rick Sanchez");
        assert!(!result.terminate);
    }

    #[test]
    fn test_result_constructors() {
        let exit = CommandResult::exit("bye");
        assert!(exit.success);
        assert!(exit.terminate);

        let fetched = CommandResult::ok("done")
            .with_payload(CommandPayload::Fetched { count: 2, page: 1 });
        assert_eq!(
            fetched.payload,
            Some(CommandPayload::Fetched { count: 2, page: 1 })
        );
        assert!(!CommandResult::fail("no").success);
    }
}
