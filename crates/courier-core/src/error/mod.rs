//! Error taxonomy shared by handlers, plugins and operations.
//!
//! Every failure that can cross the dispatcher boundary is a [`RouteError`].
//! Each variant maps to an HTTP-style status through
//! [`RouteError::status_code`]; JSON-RPC consumers additionally read the
//! numeric application code through [`RouteError::code`]. The `Display`
//! output of every variant is exactly its message, because the dispatcher
//! returns that text verbatim when no handler could be selected.

use thiserror::Error;

use crate::status;

/// Errors surfaced while matching, routing or executing a request.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Input was rejected before reaching an operation.
    #[error("{message}")]
    BadRequest {
        /// Human-readable description.
        message: String,
    },

    /// Caller is not authenticated.
    #[error("{message}")]
    Unauthorized {
        /// Human-readable description.
        message: String,
    },

    /// Caller is authenticated but not permitted.
    #[error("{message}")]
    AccessDenied {
        /// Human-readable description.
        message: String,
    },

    /// Target unit or operation does not exist.
    #[error("{message}")]
    ResourceNotFound {
        /// Human-readable description.
        message: String,
    },

    /// Verb is not accepted; `allowed` feeds the `Allow` response header.
    #[error("{message}")]
    MethodNotAllowed {
        /// Human-readable description.
        message: String,
        /// Verbs the target does accept.
        allowed: Vec<String>,
    },

    /// Caller exceeded a rate limit.
    #[error("{message}")]
    TooManyRequests {
        /// Human-readable description.
        message: String,
    },

    /// A response value could not be serialised.
    #[error("{message}")]
    EncoderFailure {
        /// Human-readable description.
        message: String,
        /// Underlying serialisation error, when one exists.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// No handler matched, or a handler/plugin is misconfigured.
    #[error("{message}")]
    HandlerFailure {
        /// Human-readable description.
        message: String,
    },

    /// A dependency is temporarily unavailable.
    #[error("{message}")]
    ServiceUnavailable {
        /// Human-readable description.
        message: String,
    },

    /// Application error carrying an explicit numeric code.
    #[error("{message}")]
    Coded {
        /// Application-defined code; values at or below -32000 are passed
        /// through to JSON-RPC clients unchanged.
        code: i64,
        /// Human-readable description.
        message: String,
    },

    /// Unclassified failure.
    #[error("{message}")]
    Internal {
        /// Human-readable description.
        message: String,
    },
}

impl RouteError {
    /// Returns the HTTP-style status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest { .. } => status::BAD_REQUEST,
            Self::Unauthorized { .. } => status::UNAUTHORIZED,
            Self::AccessDenied { .. } => status::FORBIDDEN,
            Self::ResourceNotFound { .. } => status::NOT_FOUND,
            Self::MethodNotAllowed { .. } => status::METHOD_NOT_ALLOWED,
            Self::TooManyRequests { .. } => status::TOO_MANY_REQUESTS,
            Self::ServiceUnavailable { .. } => status::SERVICE_UNAVAILABLE,
            Self::EncoderFailure { .. }
            | Self::HandlerFailure { .. }
            | Self::Coded { .. }
            | Self::Internal { .. } => status::DEFAULT_ERROR,
        }
    }

    /// Returns the numeric application code, `0` for uncoded kinds.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Coded { code, .. } => *code,
            _ => 0,
        }
    }

    /// Returns the verbs advertised through the `Allow` header, if any.
    #[must_use]
    pub const fn allowed_methods(&self) -> Option<&[String]> {
        match self {
            Self::MethodNotAllowed { allowed, .. } => Some(allowed.as_slice()),
            _ => None,
        }
    }

    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates an access denied error.
    #[must_use]
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::AccessDenied {
            message: message.into(),
        }
    }

    /// Creates a resource not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            message: message.into(),
        }
    }

    /// Creates a method not allowed error advertising the accepted verbs.
    #[must_use]
    pub fn method_not_allowed<I, S>(message: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MethodNotAllowed {
            message: message.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a rate limit error.
    #[must_use]
    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::TooManyRequests {
            message: message.into(),
        }
    }

    /// Creates an encoder failure from a serde error.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::EncoderFailure {
            message: format!("failed to encode response: {source}"),
            source: Some(source),
        }
    }

    /// Creates an encoder failure with a custom message.
    #[must_use]
    pub fn encoder_failure(message: impl Into<String>) -> Self {
        Self::EncoderFailure {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a handler failure.
    #[must_use]
    pub fn handler_failure(message: impl Into<String>) -> Self {
        Self::HandlerFailure {
            message: message.into(),
        }
    }

    /// Creates a service unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Creates an application error with an explicit code.
    #[must_use]
    pub fn coded(code: i64, message: impl Into<String>) -> Self {
        Self::Coded {
            code,
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests;
