//! # Portal Core
//!
//! Core library for the Portal character catalog.
//! Provides the data model, the remote source abstraction, the hybrid
//! remote/user storage, configuration, and error types.

pub mod config;
pub mod error;
pub mod persistence;
pub mod source;
pub mod storage;
pub mod types;

// Re-export commonly used types at the crate root.
pub use config::{PortalConfig, load_config};
pub use error::{PortalError, Result};
pub use source::{CatalogSource, HttpCatalogSource, MockCatalogSource};
pub use storage::CatalogStorage;
pub use types::{
    CatalogEntry, CatalogStats, Gender, NamedRef, RemoteRecord, Status, USER_ID_START,
};
