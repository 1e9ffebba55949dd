//! The handler contract.
//!
//! Dispatch is two-phase. [`Handler::is_appropriate`] inspects a request and,
//! when the handler can serve it, returns a [`RouteMatch`] describing what was
//! matched. The dispatcher then hands that match back to
//! [`Handler::perform_route`]. Handlers keep no per-request state of their
//! own, so one instance serves any number of requests.

use std::fmt;
use std::sync::Arc;

use courier_core::{ExecutionMode, Request, RouteError};
use courier_plugins::{HookContext, PluginChain};
use serde_json::Value;

use crate::encoder::Encoder;
use crate::resolver::Unit;

/// What a handler matched on a request.
#[derive(Clone)]
pub struct RouteMatch {
    unit: String,
    operation: Option<String>,
    target: Arc<dyn Unit>,
    payload: Value,
}

impl RouteMatch {
    /// Creates a match against `unit`, resolved to `target`.
    #[must_use]
    pub fn new(unit: impl Into<String>, target: Arc<dyn Unit>, payload: Value) -> Self {
        Self {
            unit: unit.into(),
            operation: None,
            target,
            payload,
        }
    }

    /// Records the operation when it is known at match time.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Unit key.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Operation name, when the match names a single operation.
    #[must_use]
    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    /// Resolved unit.
    #[must_use]
    pub fn target(&self) -> &dyn Unit {
        self.target.as_ref()
    }

    /// Decoded request payload.
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("unit", &self.unit)
            .field("operation", &self.operation)
            .field("payload", &self.payload)
            .finish_non_exhaustive()
    }
}

/// A strategy for serving one family of requests.
pub trait Handler: Send + Sync {
    /// Name used in logs and hook contexts.
    fn name(&self) -> &str;

    /// Execution mode this handler serves.
    fn mode(&self) -> ExecutionMode;

    /// Plugins attached to this handler, in execution order.
    fn plugins(&self) -> &PluginChain;

    /// Returns a match when this handler can serve `request`.
    ///
    /// Never fails: unrecognised input, unknown targets and unreadable bodies
    /// all yield `None`.
    fn is_appropriate(&self, request: &Request) -> Option<RouteMatch>;

    /// Serves a matched request and returns the encoded body.
    ///
    /// # Errors
    ///
    /// Any error is recovered by the dispatcher through
    /// [`Handler::handle_exception`].
    fn perform_route(&self, route: &RouteMatch, cx: &mut HookContext)
    -> Result<String, RouteError>;

    /// Shapes an error into the value that is encoded as the response body.
    fn handle_exception(&self, error: &RouteError) -> Value {
        Value::String(error.to_string())
    }

    /// Encoder used for this handler's bodies.
    fn encoder(&self) -> &dyn Encoder;
}
