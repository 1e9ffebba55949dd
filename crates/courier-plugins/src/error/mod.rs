//! Errors raised while registering or constructing plugins.
//!
//! These are setup-time failures. Hook failures at request time are
//! [`courier_core::RouteError`] values so they can flow through the
//! dispatcher's error recovery like any other routing error.

use thiserror::Error;

/// Errors arising from plugin registration and construction.
#[derive(Debug, Error)]
pub enum PluginError {
    /// No factory is registered for the requested kind.
    #[error("plugin kind '{kind}' is not registered")]
    UnknownKind {
        /// Kind that was looked up.
        kind: String,
    },

    /// A factory for the kind already exists.
    #[error("plugin kind '{kind}' is already registered")]
    DuplicateKind {
        /// Kind that was registered twice.
        kind: String,
    },

    /// The plugin options could not be interpreted.
    #[error("invalid options for plugin '{kind}': {message}")]
    InvalidOptions {
        /// Plugin kind.
        kind: String,
        /// Description of the problem.
        message: String,
        /// Underlying JSON error, if any.
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl PluginError {
    /// Creates an invalid options error from a serde failure.
    #[must_use]
    pub fn invalid_options(kind: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidOptions {
            kind: kind.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }
}
