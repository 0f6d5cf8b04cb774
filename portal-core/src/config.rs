//! Configuration system for Portal.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> CLI args.
//! Configuration is loaded from `~/.config/portal/config.toml` and/or `.portal/config.toml`
//! in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, PortalError};

/// Default remote character endpoint.
pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api/character";

/// Default durable store file name, relative to the workspace.
pub const DEFAULT_USER_ENTRIES_FILE: &str = "user_characters.json";

/// Top-level configuration for Portal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Remote catalog source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base endpoint; the page number is sent as a `page` query parameter.
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            user_agent: format!("portal/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Durable store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Relative paths are resolved against the workspace directory.
    pub user_entries_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            user_entries_file: PathBuf::from(DEFAULT_USER_ENTRIES_FILE),
        }
    }
}

impl StorageConfig {
    /// Resolve the durable store path against `workspace`.
    pub fn resolve(&self, workspace: &Path) -> PathBuf {
        if self.user_entries_file.is_absolute() {
            self.user_entries_file.clone()
        } else {
            workspace.join(&self.user_entries_file)
        }
    }
}

/// Console settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    pub prompt: String,
    /// Use raw-mode line editing with history when stdin is a terminal.
    pub interactive_input: bool,
    pub show_banner: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            interactive_input: true,
            show_banner: true,
        }
    }
}

impl PortalConfig {
    /// Reject values that would make the catalog unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "source.base_url must not be empty".into(),
            });
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                message: "source.timeout_secs must be greater than zero".into(),
            });
        }
        if self.storage.user_entries_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                message: "storage.user_entries_file must not be empty".into(),
            });
        }
        Ok(())
    }
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "portal", "portal")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Workspace-level config file location.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".portal").join("config.toml")
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `PORTAL_`)
/// 3. An explicit config file, or the workspace-local `.portal/config.toml`
/// 4. User config (`~/.config/portal/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    config_file: Option<&Path>,
    overrides: Option<&PortalConfig>,
) -> Result<PortalConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(PortalConfig::default()));

    if let Some(user_config) = user_config_path()
        && user_config.exists()
    {
        figment = figment.merge(Toml::file(&user_config));
    }

    match (config_file, workspace) {
        (Some(file), _) => {
            figment = figment.merge(Toml::file(file));
        }
        (None, Some(ws)) => {
            let ws_config = workspace_config_path(ws);
            if ws_config.exists() {
                figment = figment.merge(Toml::file(&ws_config));
            }
        }
        (None, None) => {}
    }

    // PORTAL_SOURCE__BASE_URL, PORTAL_UI__PROMPT, etc.
    figment = figment.merge(Env::prefixed("PORTAL_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

/// Write the default configuration to the workspace config file.
///
/// Refuses to overwrite an existing file. Returns the path written.
pub fn init_config_file(workspace: &Path) -> crate::error::Result<PathBuf> {
    let path = workspace_config_path(workspace);
    if path.exists() {
        return Err(PortalError::Config(ConfigError::Invalid {
            message: format!("{} already exists", path.display()),
        }));
    }
    let body = to_toml(&PortalConfig::default())?;
    crate::persistence::atomic_write(&path, body.as_bytes())?;
    Ok(path)
}

/// Render a configuration as TOML.
pub fn to_toml(config: &PortalConfig) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(|e| ConfigError::Invalid {
        message: e.to_string(),
    })
}
