use std::sync::Arc;

use ortho_config::OrthoError;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Merging the file, environment and command-line layers failed.
    #[error("configuration layers could not be loaded: {source}")]
    Load {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },

    /// The configuration text is not valid JSON for the expected shape.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// A handler or plugin entry names no kind.
    #[error("{location} has an empty kind")]
    EmptyKind {
        /// Position of the offending entry, for example `handlers[1]`.
        location: String,
    },

    /// A plugin declares both a whitelist and a blacklist.
    #[error("{location} declares both a whitelist and a blacklist")]
    ConflictingScope {
        /// Position of the offending plugin entry.
        location: String,
    },

    /// A scope entry is neither `"*"` nor a list of operations.
    #[error("{location} scope for unit '{unit}' must be \"*\" or a list of operations")]
    InvalidScope {
        /// Position of the offending plugin entry.
        location: String,
        /// Unit key whose entry is malformed.
        unit: String,
    },
}

impl From<Arc<OrthoError>> for ConfigError {
    fn from(source: Arc<OrthoError>) -> Self {
        Self::Load { source }
    }
}
