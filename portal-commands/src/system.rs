//! Session commands: help, clear, exit.

use async_trait::async_trait;
use std::sync::Arc;

use crate::registry::{Command, CommandContext, CommandPayload, CommandResult, CommandStrategy};
use crate::render;

/// Groups the session commands.
pub struct SystemStrategy;

impl CommandStrategy for SystemStrategy {
    fn name(&self) -> &str {
        "system"
    }

    fn commands(&self) -> Vec<Arc<dyn Command>> {
        vec![
            Arc::new(HelpCommand),
            Arc::new(ClearCommand),
            Arc::new(ExitCommand),
        ]
    }
}

/// List every registered command.
pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "Show the list of commands"
    }

    async fn execute(&self, _args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        CommandResult::ok(render::render_help(ctx.commands))
            .with_payload(CommandPayload::Commands(ctx.commands.to_vec()))
    }
}

pub struct ClearCommand;

#[async_trait]
impl Command for ClearCommand {
    fn name(&self) -> &str {
        "clear"
    }

    fn description(&self) -> &str {
        "Clear the screen"
    }

    async fn execute(&self, _args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        ctx.console.clear_screen();
        CommandResult::ok("")
    }
}

/// Ask the loop to stop. The REPL owns the actual shutdown.
pub struct ExitCommand;

#[async_trait]
impl Command for ExitCommand {
    fn name(&self) -> &str {
        "exit"
    }

    fn description(&self) -> &str {
        "Quit the program"
    }

    async fn execute(&self, _args: &[String], _ctx: &CommandContext<'_>) -> CommandResult {
        CommandResult::exit("\n👋 Goodbye!\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::registry::CommandSummary;

    fn summary(name: &str, description: &str) -> CommandSummary {
        CommandSummary {
            name: name.into(),
            description: description.into(),
            strategy: "test".into(),
        }
    }

    #[tokio::test]
    async fn test_help_lists_every_command() {
        let console = ScriptedConsole::new();
        let commands = vec![summary("list", "Show all"), summary("exit", "Quit")];
        let ctx = CommandContext {
            console: &console,
            commands: &commands,
        };

        let result = HelpCommand.execute(&[], &ctx).await;
        assert!(result.success);
        assert!(result.message.contains("list"));
        assert!(result.message.contains("exit"));
        assert_eq!(result.payload, Some(CommandPayload::Commands(commands.clone())));
    }

    #[tokio::test]
    async fn test_clear_uses_console() {
        let console = ScriptedConsole::new();
        let ctx = CommandContext {
            console: &console,
            commands: &[],
        };
        let result = ClearCommand.execute(&[], &ctx).await;
        assert!(result.success);
        assert!(result.message.is_empty());
        assert_eq!(console.clear_count(), 1);
    }

    #[tokio::test]
    async fn test_exit_requests_termination() {
        let console = ScriptedConsole::new();
        let ctx = CommandContext {
            console: &console,
            commands: &[],
        };
        let result = ExitCommand.execute(&[], &ctx).await;
        assert!(result.success);
        assert!(result.terminate);
    }
}
