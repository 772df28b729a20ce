//! Run configuration read from the environment.
//!
//! Settings can be provided through variables prefixed with `CUKEDEX_` and
//! then overridden by the command line:
//!
//! - `CUKEDEX_LOG_LEVEL`: `trace`, `debug`, `info`, `warn` or `error`
//! - `CUKEDEX_MODE`: `strict` or `test` propagate the first failing file
//! - `CUKEDEX_JOBS`: worker threads, `0` for the available parallelism
//! - `CUKEDEX_ROOT`: directory marker for report paths

use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::batch::BatchOptions;
use crate::discovery::DEFAULT_ROOT;

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A setting could not be interpreted.
    #[error("invalid value `{value}` for {key}: {reason}")]
    InvalidValue {
        /// Variable or option name.
        key: String,
        /// Rejected value.
        value: String,
        /// What was expected instead.
        reason: &'static str,
    },
}

impl ConfigError {
    /// Attribute the error to `key`, keeping the value and reason.
    #[must_use]
    pub fn with_key(self, key: &str) -> Self {
        match self {
            Self::InvalidValue { value, reason, .. } => Self::InvalidValue {
                key: key.to_string(),
                value,
                reason,
            },
        }
    }
}

/// Log level matching the `tracing` levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including filtering decisions per construct.
    Trace,
    /// Filtering decisions and discovery details.
    Debug,
    /// Batch summaries.
    Info,
    /// Skipped files and locale fallbacks.
    #[default]
    #[serde(alias = "warning")]
    Warn,
    /// Failures only.
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::InvalidValue {
                key: "log level".to_string(),
                value: s.to_string(),
                reason: "expected one of: trace, debug, info, warn, error",
            }),
        }
    }
}

impl LogLevel {
    /// Filter directive for `tracing-subscriber`.
    #[must_use]
    pub const fn as_filter_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Settings shared by every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Log verbosity.
    pub log_level: LogLevel,
    /// Propagate the first failing file instead of skipping it.
    pub strict: bool,
    /// Worker threads, `0` for the available parallelism.
    pub jobs: usize,
    /// Directory marker for report paths; derived from the input when unset.
    pub root: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            strict: false,
            jobs: 0,
            root: None,
        }
    }
}

fn parse_mode(value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "strict" | "test" => Ok(true),
        "" | "lenient" | "default" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: "CUKEDEX_MODE".to_string(),
            value: value.to_string(),
            reason: "expected `strict`, `test` or `lenient`",
        }),
    }
}

impl RunConfig {
    /// Load configuration from `CUKEDEX_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a variable is set to an
    /// unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps variable names to
    /// values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for unusable values.
    ///
    /// # Examples
    ///
    /// ```
    /// use cukedex::{LogLevel, RunConfig};
    ///
    /// let config = RunConfig::from_lookup(|key| match key {
    ///     "CUKEDEX_MODE" => Some("test".to_string()),
    ///     "CUKEDEX_LOG_LEVEL" => Some("debug".to_string()),
    ///     _ => None,
    /// })?;
    /// assert!(config.strict);
    /// assert_eq!(config.log_level, LogLevel::Debug);
    /// # Ok::<(), cukedex::ConfigError>(())
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let log_level = lookup("CUKEDEX_LOG_LEVEL")
            .map(|val| {
                val.parse::<LogLevel>()
                    .map_err(|err| err.with_key("CUKEDEX_LOG_LEVEL"))
            })
            .transpose()?
            .unwrap_or_default();
        let strict = lookup("CUKEDEX_MODE")
            .map(|val| parse_mode(&val))
            .transpose()?
            .unwrap_or(false);
        let jobs = lookup("CUKEDEX_JOBS")
            .map(|val| {
                val.trim()
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "CUKEDEX_JOBS".to_string(),
                        value: val.clone(),
                        reason: "expected a non-negative integer",
                    })
            })
            .transpose()?
            .unwrap_or(0);
        let root = lookup("CUKEDEX_ROOT").filter(|val| !val.trim().is_empty());
        Ok(Self {
            log_level,
            strict,
            jobs,
            root,
        })
    }

    /// Apply values that take precedence over the environment.
    #[must_use]
    pub fn apply_overrides(
        mut self,
        log_level: Option<LogLevel>,
        strict: Option<bool>,
        jobs: Option<usize>,
        root: Option<String>,
    ) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        if let Some(strict) = strict {
            self.strict = strict;
        }
        if let Some(jobs) = jobs {
            self.jobs = jobs;
        }
        if root.is_some() {
            self.root = root;
        }
        self
    }

    /// Batch options for this run, using `derived_root` when no root marker
    /// was configured.
    #[must_use]
    pub fn batch_options(&self, derived_root: Option<&str>) -> BatchOptions {
        let root = self
            .root
            .as_deref()
            .or(derived_root)
            .unwrap_or(DEFAULT_ROOT)
            .to_string();
        BatchOptions {
            strict: self.strict,
            jobs: self.jobs,
            root,
        }
    }
}
