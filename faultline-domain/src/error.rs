//! Domain-level error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors from parsing names of codes, levels and filters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Unrecognized status code name
    #[error("unknown status code '{name}'")]
    UnknownCode {
        /// The name that did not match any code
        name: String,
    },

    /// Unrecognized log level name
    #[error("unknown log level '{name}'")]
    UnknownLevel {
        /// The name that did not match any level
        name: String,
    },
}

/// Errors from loading a [`DomainConfig`](crate::config::DomainConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed to load
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// TOML syntax or schema error
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON syntax or schema error
    #[cfg(feature = "json")]
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A value was well-formed but not meaningful
    #[error("invalid configuration: {0}")]
    Invalid(#[from] DomainError),
}

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;
