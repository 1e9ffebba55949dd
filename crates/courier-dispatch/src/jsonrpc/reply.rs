//! JSON-RPC response objects and error codes.

use courier_core::RouteError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Invalid JSON was received. Reserved: unparsable bodies are never claimed.
pub const PARSE_ERROR: i64 = -32700;
/// The call is not a valid request object.
pub const INVALID_REQUEST: i64 = -32600;
/// Reserved; unresolved methods are reported as [`INTERNAL_ERROR`].
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Reserved; not emitted.
pub const INVALID_PARAMS: i64 = -32602;
/// Generic failure while executing a call.
pub const INTERNAL_ERROR: i64 = -32603;
/// Codes at or below this value are application codes and pass through.
pub const SERVER_ERROR_MAX: i64 = -32000;

/// Version implied when a call carries no `jsonrpc` member.
pub const DEFAULT_VERSION: &str = "1.0";

/// The `error` member of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    /// Numeric error code.
    pub code: i64,
    /// Human-readable message.
    pub message: String,
}

impl RpcError {
    /// Creates an error object.
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Shapes a failure raised while executing one call.
    ///
    /// Application codes at or below [`SERVER_ERROR_MAX`] keep their code;
    /// everything else becomes [`INTERNAL_ERROR`] with the original message.
    #[must_use]
    pub fn from_call_failure(error: &RouteError) -> Self {
        let code = if is_application_code(error.code()) {
            error.code()
        } else {
            INTERNAL_ERROR
        };
        Self::new(code, error.to_string())
    }

    /// Shapes a failure that aborted the whole route.
    ///
    /// Application codes pass through; anything else is masked as a bare
    /// "Internal Error".
    #[must_use]
    pub fn from_route_failure(error: &RouteError) -> Self {
        if is_application_code(error.code()) {
            Self::new(error.code(), error.to_string())
        } else {
            Self::new(INTERNAL_ERROR, "Internal Error")
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        let mut fields = Map::new();
        fields.insert("code".to_owned(), Value::from(self.code));
        fields.insert("message".to_owned(), Value::String(self.message.clone()));
        Value::Object(fields)
    }
}

const fn is_application_code(code: i64) -> bool {
    code <= SERVER_ERROR_MAX
}

/// Outcome of one call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The operation's return value.
    Result(Value),
    /// The failure.
    Error(RpcError),
}

/// A version-aware response to one call.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcResponse {
    version: Option<String>,
    outcome: Outcome,
    id: Option<Value>,
}

impl RpcResponse {
    /// Creates a response, echoing `version` unless it is the implicit
    /// `"1.0"`.
    #[must_use]
    pub fn new(version: Option<&str>, outcome: Outcome, id: Option<Value>) -> Self {
        Self {
            version: version
                .filter(|declared| *declared != DEFAULT_VERSION)
                .map(str::to_owned),
            outcome,
            id,
        }
    }

    /// Response outcome.
    #[must_use]
    pub const fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Renders the wire object: `jsonrpc` (when echoed), then `result` or
    /// `error`, then `id` (when present).
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut fields = Map::new();
        if let Some(version) = &self.version {
            fields.insert("jsonrpc".to_owned(), Value::String(version.clone()));
        }
        match &self.outcome {
            Outcome::Result(value) => fields.insert("result".to_owned(), value.clone()),
            Outcome::Error(error) => fields.insert("error".to_owned(), error.to_value()),
        };
        if let Some(id) = &self.id {
            fields.insert("id".to_owned(), id.clone());
        }
        Value::Object(fields)
    }
}
