//! Response body encoders.

use courier_core::RouteError;
use serde_json::Value;

/// Turns a response value into wire text.
pub trait Encoder: Send + Sync {
    /// Encodes `value`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::EncoderFailure`] when the value cannot be
    /// serialised.
    fn encode(&self, value: &Value) -> Result<String, RouteError>;

    /// Media type advertised through `Content-Type`.
    fn content_type(&self) -> &'static str;
}

/// Encodes values as compact JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl Encoder for JsonEncoder {
    fn encode(&self, value: &Value) -> Result<String, RouteError> {
        serde_json::to_string(value).map_err(RouteError::from_json_error)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

/// Encodes strings verbatim and anything else as JSON.
///
/// `null` becomes the empty string, which suits command output where an
/// operation has nothing to print.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEncoder;

impl Encoder for TextEncoder {
    fn encode(&self, value: &Value) -> Result<String, RouteError> {
        match value {
            Value::Null => Ok(String::new()),
            Value::String(text) => Ok(text.clone()),
            other => JsonEncoder.encode(other),
        }
    }

    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }
}
