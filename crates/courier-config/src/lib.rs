//! Declarative configuration for the Courier dispatcher.
//!
//! A [`Config`] lists the handlers to build, in dispatch order, together with
//! the plugins attached to each and the logging settings consumed by
//! telemetry. [`Config::load_layered`] merges, lowest precedence first, a TOML
//! configuration file (named by `--config-path` or `COURIER_CONFIG_PATH`),
//! `COURIER_*` environment variables and the `--log-filter`/`--log-format`
//! flags, then validates the result so that a plugin declaring both scope
//! lists or an entry with no kind is rejected before anything is constructed.
//! In-memory JSON documents go through [`Config::from_json_str`]; the shape
//! below is the same in either form.
//!
//! ```json
//! {
//!   "log_filter": "courier_dispatch=debug",
//!   "log_format": "compact",
//!   "handlers": [
//!     {
//!       "kind": "jsonrpc",
//!       "base_path": "/api",
//!       "plugins": [
//!         { "kind": "headers", "priority": 10,
//!           "options": { "headers": { "X-Frame-Options": "DENY" } } },
//!         { "kind": "trace", "blacklist": { "health": "*" } }
//!       ]
//!     },
//!     { "kind": "command" }
//!   ]
//! }
//! ```

mod defaults;
mod error;
mod handler;
mod logging;

use std::ffi::OsString;
use std::path::Path;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    CONFIG_PATH_FLAG, DEFAULT_LOG_FILTER, ENV_PREFIX, default_log_filter,
    default_log_filter_string, default_log_format,
};
pub use error::ConfigError;
pub use handler::{ALL_OPERATIONS, HandlerConfig, PluginConfig, ScopeEntries, ScopeEntry};
pub use logging::{LogFormat, LogFormatParseError};

/// Program name placed before loader arguments built by this crate.
const PROGRAM_NAME: &str = "courier";

/// Top-level dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "COURIER")]
pub struct Config {
    /// Tracing filter expression.
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// Handlers in dispatch order. Only files and in-memory documents carry
    /// handlers.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub handlers: Vec<HandlerConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            handlers: Vec::new(),
        }
    }
}

impl Config {
    /// Parses and validates configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or the first
    /// validation failure.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|source| ConfigError::Parse { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Merges the configuration layers described by `args` and validates
    /// the result.
    ///
    /// `args` is a full command line, program name first. Environment
    /// variables prefixed with [`ENV_PREFIX`] override the file named by
    /// [`CONFIG_PATH_FLAG`], and flags override both.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a layer cannot be read or merged,
    /// otherwise the first validation failure.
    pub fn load_layered<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let layered: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let config = Self::load_from_iter(layered)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration file at `path`, layered under the
    /// environment.
    ///
    /// # Errors
    ///
    /// See [`Config::load_layered`].
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_layered([
            OsString::from(PROGRAM_NAME),
            OsString::from(CONFIG_PATH_FLAG),
            path.as_ref().as_os_str().to_owned(),
        ])
    }

    /// Checks structural rules serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyKind`], [`ConfigError::ConflictingScope`]
    /// or [`ConfigError::InvalidScope`] for the first offending entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.handlers
            .iter()
            .enumerate()
            .try_for_each(|(index, handler)| handler.validate(index))
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Handlers in dispatch order.
    #[must_use]
    pub fn handlers(&self) -> &[HandlerConfig] {
        &self.handlers
    }
}
