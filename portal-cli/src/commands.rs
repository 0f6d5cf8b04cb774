//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use std::path::Path;

/// Handle a CLI subcommand.
pub fn handle_command(
    command: Commands,
    workspace: &Path,
    config_file: Option<&Path>,
) -> anyhow::Result<()> {
    match command {
        Commands::Config { action } => handle_config(action, workspace, config_file),
    }
}

fn handle_config(
    action: ConfigAction,
    workspace: &Path,
    config_file: Option<&Path>,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let path = portal_core::config::workspace_config_path(workspace);
            if path.exists() {
                println!("Configuration file already exists at: {}", path.display());
                return Ok(());
            }
            let written = portal_core::config::init_config_file(workspace)?;
            println!("Created default configuration at: {}", written.display());
            Ok(())
        }
        ConfigAction::Show => {
            let config = portal_core::load_config(Some(workspace), config_file, None)
                .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
            println!("{}", portal_core::config::to_toml(&config)?);
            Ok(())
        }
    }
}
