//! # Portal Commands
//!
//! Command handlers and dispatch for the Portal console.
//! Provides the invocation parser, the command registry, the console
//! collaborator trait, renderers, and the built-in command strategies.

pub mod console;
pub mod data;
pub mod info;
pub mod parser;
pub mod registry;
pub mod render;
pub mod system;

use portal_core::CatalogStorage;
use registry::CommandRegistry;
use std::sync::Arc;
use tokio::sync::Mutex;

pub use console::{Console, ScriptedConsole};
pub use parser::{Invocation, parse};
pub use registry::{
    Command, CommandContext, CommandPayload, CommandResult, CommandStrategy, CommandSummary,
};

/// Storage handle shared by every handler.
pub type SharedStorage = Arc<Mutex<CatalogStorage>>;

/// Wrap storage for handler use.
pub fn share(storage: CatalogStorage) -> SharedStorage {
    Arc::new(Mutex::new(storage))
}

/// Register the info, data, and system strategies, in that order.
pub fn register_builtin_strategies(registry: &mut CommandRegistry, storage: SharedStorage) {
    registry.use_strategy(&info::InfoStrategy::new(storage.clone()));
    registry.use_strategy(&data::DataStrategy::new(storage));
    registry.use_strategy(&system::SystemStrategy);
}

/// A registry with every built-in command.
pub fn builtin_registry(storage: SharedStorage) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    register_builtin_strategies(&mut registry, storage);
    registry
}
