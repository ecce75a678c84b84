//! Error types for selection-core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by configuration, persistence and remote fetches.
///
/// Rendering never produces an error: missing or malformed settings
/// degrade to defaults instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("invalid configuration:\n  - {}", .0.join("\n  - "))]
    ConfigValidation(Vec<String>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid site URL '{0}'")]
    InvalidSiteUrl(String),

    #[error("security check failed: invalid or expired nonce")]
    NonceVerification,

    #[error("unknown widget '{0}'")]
    UnknownWidget(String),

    #[error("fetch failed: {0}")]
    Fetch(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
