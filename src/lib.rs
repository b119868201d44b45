//! Finishline: a crawl-and-reconcile engine for race results
//!
//! This crate implements the shared engine behind many per-site race-result
//! scrapers: hierarchy discovery, offset/limit pagination, deduplication,
//! retry handling, record normalization, and post-crawl count reconciliation.
//! Per-site payload extraction lives behind the [`adapter::SourceAdapter`]
//! trait and is not part of the core.

pub mod adapter;
pub mod config;
pub mod crawler;
pub mod reconcile;
pub mod record;

use thiserror::Error;

/// Main error type for Finishline operations
#[derive(Debug, Error)]
pub enum FinishlineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] adapter::FetchError),

    #[error("Normalization error: {0}")]
    Normalization(#[from] record::NormalizationError),

    #[error("Record file error at {path}: {source}")]
    RecordFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Record decode error: {0}")]
    RecordDecode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Finishline operations
pub type Result<T> = std::result::Result<T, FinishlineError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use adapter::{FetchError, SeedParams, SourceAdapter};
pub use config::Config;
pub use record::{CanonicalRecord, Gender};
