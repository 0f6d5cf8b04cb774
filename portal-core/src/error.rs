//! Error types for the Portal core library.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering the remote source, durable storage, and configuration.
//! Storage errors are reported by the command layer, so they stay out of
//! `PortalError`.

use std::path::PathBuf;

/// Top-level error type for the Portal core library.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport failures from the remote catalog source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("Request failed: {message}")]
    Request { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Remote source returned status {status}")]
    Status { status: u16 },

    #[error("Failed to decode remote page: {message}")]
    Decode { message: String },
}

/// Errors from the durable user-entry store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to persist user entries to {path}: {message}")]
    Persist { path: PathBuf, message: String },

    #[error("Failed to load user entries from {path}: {message}")]
    Load { path: PathBuf, message: String },

    #[error("No user ids left after {last_id}")]
    IdsExhausted { last_id: u64 },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// A type alias for results using the top-level `PortalError`.
pub type Result<T> = std::result::Result<T, PortalError>;
