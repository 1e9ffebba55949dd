//! Structural validation of individual calls.

use courier_core::Params;
use serde_json::Value;

use super::reply::{INVALID_REQUEST, Outcome, RpcError, RpcResponse};

/// A structurally valid call.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcCall {
    version: Option<String>,
    method: String,
    id: Option<Value>,
    params: Params,
}

/// A call rejected by validation, with whatever could be echoed back.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidCall {
    version: Option<String>,
    id: Option<Value>,
    notification: bool,
    reason: &'static str,
}

impl RpcCall {
    /// Validates one element of the request payload.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCall`] when the element is not an object, `method` is
    /// missing, empty or not a string, `jsonrpc` is not a string, or `params`
    /// is neither an array nor an object. A `null` `params` counts as absent.
    pub fn parse(raw: &Value) -> Result<Self, InvalidCall> {
        let Value::Object(fields) = raw else {
            return Err(InvalidCall {
                version: None,
                id: None,
                notification: false,
                reason: "call is not an object",
            });
        };

        let id = fields.get("id").filter(|value| !value.is_null()).cloned();
        let version_field = fields.get("jsonrpc");
        let version = version_field.and_then(Value::as_str).map(str::to_owned);
        let invalid = |reason| InvalidCall {
            version: version.clone(),
            notification: id.is_none(),
            id: id.clone(),
            reason,
        };

        if version_field.is_some() && version.is_none() {
            return Err(invalid("jsonrpc member is not a string"));
        }
        let method = match fields.get("method").and_then(Value::as_str) {
            Some(method) if !method.is_empty() => method.to_owned(),
            _ => return Err(invalid("method is missing, empty or not a string")),
        };
        let raw_params = fields
            .get("params")
            .filter(|value| !value.is_null())
            .cloned();
        let Some(params) = Params::from_value(raw_params) else {
            return Err(invalid("params is neither an array nor an object"));
        };

        Ok(Self {
            version,
            method,
            id,
            params,
        })
    }

    /// Declared version, if any.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Target method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Call identifier; `None` for notifications.
    #[must_use]
    pub const fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    /// Call parameters.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// Returns `true` when no response must be sent.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Builds the response for `outcome`.
    #[must_use]
    pub fn respond(&self, outcome: Outcome) -> RpcResponse {
        RpcResponse::new(self.version(), outcome, self.id.clone())
    }
}

impl InvalidCall {
    /// Why validation failed.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        self.reason
    }

    /// Returns `true` when the rejected call was a notification.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.notification
    }

    /// Builds the "Invalid Request" response.
    #[must_use]
    pub fn respond(&self) -> RpcResponse {
        RpcResponse::new(
            self.version.as_deref(),
            Outcome::Error(RpcError::new(INVALID_REQUEST, "Invalid Request")),
            self.id.clone(),
        )
    }
}
