//! Read-eval-print loop and one-shot execution.

use portal_commands::registry::CommandRegistry;
use portal_commands::{Console, console};
use portal_core::PortalConfig;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::repl_input::ReplInput;

pub const INTERRUPT_NOTICE: &str = "\n  Use 'exit' to quit.\n";

const BANNER: &str = r#"
    ╔═══════════════════════════════════════════════════════╗
    ║                                                       ║
    ║   🛸  RICK AND MORTY CHARACTER CATALOG  🛸            ║
    ║                                                       ║
    ║   A console for browsing and extending the catalog    ║
    ║                                                       ║
    ╚═══════════════════════════════════════════════════════╝
"#;

/// What a single read produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// The user pressed Ctrl-C at the prompt.
    Interrupted,
    Eof,
}

/// Where the loop gets its command lines from.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome>;
}

/// Plain buffered stdin, for pipes and dumb terminals.
pub struct StdinLines;

impl LineSource for StdinLines {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadOutcome> {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(ReadOutcome::Eof);
        }
        Ok(ReadOutcome::Line(line.trim().to_string()))
    }
}

/// Console backed by the process terminal.
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn display(&self, message: &str) {
        println!("{message}");
    }

    fn prompt(&self, message: &str, default: Option<&str>) -> String {
        print!("{}", console::prompt_label(message, default));
        let _ = io::stdout().flush();

        let mut raw = String::new();
        if let Err(e) = io::stdin().lock().read_line(&mut raw) {
            debug!(error = %e, "Prompt read failed");
        }
        console::resolve_answer(&raw, default)
    }

    fn clear_screen(&self) {
        print!("\x1b[2J\x1b[H");
        let _ = io::stdout().flush();
    }
}

/// Drive the registry from `input` until exit or end of input.
///
/// Returns the number of lines dispatched.
pub async fn run_loop(
    registry: &CommandRegistry,
    console: &dyn Console,
    input: &mut dyn LineSource,
    prompt: &str,
) -> io::Result<usize> {
    let mut dispatched = 0;
    loop {
        let line = match input.read_line(prompt)? {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Interrupted => {
                console.display(INTERRUPT_NOTICE);
                continue;
            }
            ReadOutcome::Eof => {
                debug!("End of input");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let result = registry.execute_line(&line, console).await;
        dispatched += 1;
        debug!(success = result.success, terminate = result.terminate, "Command finished");

        if !result.message.is_empty() {
            console.display(&result.message);
        }
        if result.terminate {
            break;
        }
        console.display("");
    }
    Ok(dispatched)
}

/// Run the interactive console.
pub async fn run_interactive(
    registry: &CommandRegistry,
    config: &PortalConfig,
    workspace: &Path,
) -> anyhow::Result<()> {
    let console = TerminalConsole;
    if config.ui.show_banner {
        console.display(BANNER);
        console.display("  Type 'help' for the list of commands.\n");
    }

    let prompt = config.ui.prompt.clone();
    let interrupts = spawn_interrupt_notice(prompt.clone());

    let dispatched = if config.ui.interactive_input && io::stdin().is_terminal() {
        let mut input = ReplInput::new(workspace, registry.summaries());
        let coloured = format!("\x1b[1;34m{prompt}\x1b[0m");
        run_loop(registry, &console, &mut input, &coloured).await
    } else {
        run_loop(registry, &console, &mut StdinLines, &prompt).await
    };
    interrupts.abort();

    let dispatched = dispatched?;
    info!(commands = dispatched, "Session ended");
    Ok(())
}

/// Execute one command line and report whether it succeeded.
pub async fn run_single_line(registry: &CommandRegistry, line: &str) -> bool {
    let console = TerminalConsole;
    let result = registry.execute_line(line, &console).await;
    if !result.message.is_empty() {
        console.display(&result.message);
    }
    result.success
}

/// Ctrl-C outside raw mode arrives as a signal. Answer it with the
/// advisory instead of letting the process die.
fn spawn_interrupt_notice(prompt: String) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            print!("\n{INTERRUPT_NOTICE}\n{prompt}");
            let _ = io::stdout().flush();
        }
    })
}
