//! Domain configuration loaded from files
//!
//! A [`DomainConfig`] carries the knobs that are commonly set per deployment
//! rather than per call site:
//!
//! ```toml
//! default_error_code = "INTERNAL"
//! describe = "while serving requests"
//!
//! [log]
//! level = "warn"
//! filter = { every_n = 100 }
//! ```
//!
//! `filter` is one of `"none"`, `"every_pow2"`, `{ first_n = N }`,
//! `{ every_n = N }` or `{ every_ms = N }`. A level of `"off"` disables
//! logging.

use crate::description::DescribeConfig;
use crate::error::{ConfigError, DomainError, Result};
use crate::logging::{Filter, LogSetting, Logger, LoggingConfig};
use crate::status::{Code, StatusConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Log filter as written in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterConfig {
    /// Log every record
    None,
    /// Log the first `n` records
    FirstN(i64),
    /// Log every `n`th record
    EveryN(i64),
    /// Log records with power-of-two indices
    EveryPow2,
    /// Log at most once per this many milliseconds
    EveryMs(u64),
}

impl From<FilterConfig> for Filter {
    fn from(config: FilterConfig) -> Self {
        match config {
            FilterConfig::None => Filter::NoFilter,
            FilterConfig::FirstN(n) => Filter::FirstN(n),
            FilterConfig::EveryN(n) => Filter::EveryN(n),
            FilterConfig::EveryPow2 => Filter::EveryPow2,
            FilterConfig::EveryMs(ms) => Filter::Every(Duration::from_millis(ms)),
        }
    }
}

/// `[log]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`
    pub level: String,
    /// Filter; absent means the default filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterConfig>,
    /// Filter for log settings that do not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_filter: Option<FilterConfig>,
}

impl LogConfig {
    /// The logger named by `level`
    pub fn logger(&self) -> std::result::Result<Logger, DomainError> {
        if self.level.eq_ignore_ascii_case("off") {
            return Ok(Logger::Null);
        }
        self.level
            .parse::<Level>()
            .map(Logger::Tracing)
            .map_err(|_| DomainError::UnknownLevel {
                name: self.level.clone(),
            })
    }

    /// Logger and filter
    pub fn setting(&self) -> std::result::Result<LogSetting, DomainError> {
        Ok(LogSetting {
            logger: self.logger()?,
            filter: self.filter.map(Filter::from),
        })
    }
}

/// Knobs applied to a domain at startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DomainConfig {
    /// Code for errors whose culprit carries none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_error_code: Option<Code>,
    /// Code for every error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<Code>,
    /// Logging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,
    /// Policy description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub describe: Option<String>,
}

impl DomainConfig {
    /// Log every error at `WARN` and report unclassified failures as internal
    pub fn strict() -> Self {
        Self {
            default_error_code: Some(Code::Internal),
            error_code: None,
            log: Some(LogConfig {
                level: "warn".to_string(),
                filter: None,
                default_filter: None,
            }),
            describe: None,
        }
    }

    /// Parse and validate TOML
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON
    #[cfg(feature = "json")]
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a file; `.json` files are read as JSON, everything else as TOML
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading domain configuration");

        #[cfg(feature = "json")]
        if path.extension().is_some_and(|ext| ext == "json") {
            return Self::from_json_str(&text);
        }
        Self::from_toml_str(&text)
    }

    /// Check values that parse but mean nothing
    pub fn validate(&self) -> std::result::Result<(), DomainError> {
        if let Some(log) = &self.log {
            log.logger()?;
        }
        Ok(())
    }

    /// Apply every set knob to `domain`
    ///
    /// Works on anything carrying the status, logging and description
    /// layers, such as [`standard()`](crate::defaults::standard).
    pub fn apply<D, S, L, R>(&self, domain: D) -> Result<D>
    where
        D: StatusConfig<S> + LoggingConfig<L> + DescribeConfig<R>,
    {
        let mut domain = domain;
        if let Some(code) = self.default_error_code {
            domain = domain.default_error_code(code);
        }
        if let Some(code) = self.error_code {
            domain = domain.error_code(code);
        }
        if let Some(log) = &self.log {
            if let Some(filter) = log.default_filter {
                domain = domain.default_log_filter(filter.into());
            }
            let setting = log.setting()?;
            domain = domain.log(setting.logger, setting.filter);
        }
        if let Some(text) = &self.describe {
            domain = domain.describe(text);
        }
        Ok(domain)
    }
}
