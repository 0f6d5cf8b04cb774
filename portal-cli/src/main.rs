//! Portal CLI: terminal console for the character catalog.
//!
//! Runs one command line when words are given, otherwise starts the REPL.

mod commands;
mod repl;
mod repl_input;

use clap::Parser;
use portal_commands::{builtin_registry, share};
use portal_core::{CatalogSource, CatalogStorage, HttpCatalogSource};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Portal: browse and extend a character catalog from the terminal
#[derive(Parser, Debug)]
#[command(name = "portal", version, about, long_about = None)]
struct Cli {
    /// Command line to run once, e.g. `portal show 1` (starts the REPL if omitted)
    #[arg(trailing_var_arg = true)]
    line: Vec<String>,

    /// Workspace directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Read plain lines instead of using the raw-mode editor
    #[arg(long)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Write the default configuration to `.portal/config.toml`
    Init,
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "portal", "portal")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "portal.log");
    let (non_blocking, log_guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if let Some(command) = cli.command {
        return commands::handle_command(command, &workspace, cli.config.as_deref());
    }

    let mut config = portal_core::load_config(Some(&workspace), cli.config.as_deref(), None)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    config.validate()?;
    if cli.plain {
        config.ui.interactive_input = false;
    }

    let source = HttpCatalogSource::new(&config.source)?;
    tracing::debug!(source = %source.describe(), "Remote source ready");
    let storage = CatalogStorage::open(Arc::new(source), config.storage.resolve(&workspace));
    let registry = builtin_registry(share(storage));

    if !cli.line.is_empty() {
        let line = cli.line.join(" ");
        let ok = repl::run_single_line(&registry, &line).await;
        // process::exit skips destructors; flush the file layer first.
        drop(log_guard);
        std::process::exit(if ok { 0 } else { 1 });
    }

    repl::run_interactive(&registry, &config, &workspace).await
}
