//! JSON-RPC 1.0/2.0 protocol handler.
//!
//! The handler claims `POST` requests whose path maps to a known unit and
//! whose body decodes to a JSON object (single call) or array (batch). Each
//! call is validated, resolved against the unit and invoked between the
//! `before_resolve`, `after_resolve`, `before_invoke` and `after_invoke`
//! hooks. Failures are captured per call, so one bad call never spoils the
//! rest of a batch.
//!
//! ## Wire format
//!
//! ```json
//! {"jsonrpc":"2.0","method":"add","params":[1,2],"id":1}
//! ```
//!
//! ```json
//! {"jsonrpc":"2.0","result":3,"id":1}
//! ```
//!
//! `jsonrpc` is echoed unless it is absent or `"1.0"`. Calls without an `id`
//! (or with a `null` one) are notifications and produce no response object;
//! a single notification yields the empty-string payload `""` and an
//! all-notification batch yields `[]`.

mod call;
mod path;
mod reply;

use std::fmt;
use std::slice;
use std::sync::Arc;

use courier_core::{ExecutionMode, Request, RouteError};
use courier_plugins::{Hook, HookContext, PluginChain};
use serde_json::Value;
use tracing::debug;

pub use self::call::{InvalidCall, RpcCall};
pub use self::reply::{
    DEFAULT_VERSION, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, Outcome,
    PARSE_ERROR, RpcError, RpcResponse, SERVER_ERROR_MAX,
};
use crate::encoder::{Encoder, JsonEncoder};
use crate::handler::{Handler, RouteMatch};
use crate::resolver::OperationResolver;

/// Tracing target for JSON-RPC handling.
const JSONRPC_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::jsonrpc");

/// JSON-RPC handler over an [`OperationResolver`].
pub struct JsonRpcProtocol {
    name: String,
    base_path: Option<String>,
    plugins: PluginChain,
    resolver: Arc<dyn OperationResolver>,
    encoder: JsonEncoder,
}

impl JsonRpcProtocol {
    /// Registry kind.
    pub const KIND: &'static str = "jsonrpc";

    /// Creates a handler with no base path and no plugins.
    #[must_use]
    pub fn new(resolver: Arc<dyn OperationResolver>) -> Self {
        Self {
            name: Self::KIND.to_owned(),
            base_path: None,
            plugins: PluginChain::new(),
            resolver,
            encoder: JsonEncoder,
        }
    }

    /// Overrides the handler name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the path prefix stripped before unit lookup.
    #[must_use]
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = Some(path::normalise(base_path));
        self
    }

    /// Replaces the plugin chain.
    #[must_use]
    pub fn with_plugins(mut self, plugins: PluginChain) -> Self {
        self.plugins = plugins;
        self
    }

    /// Configured base path, normalised.
    #[must_use]
    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    fn process(&self, route: &RouteMatch, raw: &Value, cx: &mut HookContext) -> Option<Value> {
        let call = match RpcCall::parse(raw) {
            Ok(call) => call,
            Err(invalid) => {
                debug!(target: JSONRPC_TARGET, reason = invalid.reason(), "invalid call");
                return (!invalid.is_notification()).then(|| invalid.respond().to_value());
            }
        };

        cx.set_operation(call.method());
        let response = self
            .invoke(route, &call, cx)
            .unwrap_or_else(|error| {
                debug!(
                    target: JSONRPC_TARGET,
                    method = call.method(),
                    %error,
                    "call failed"
                );
                call.respond(Outcome::Error(RpcError::from_call_failure(&error)))
                    .to_value()
            });
        cx.clear_operation();

        (!call.is_notification()).then_some(response)
    }

    fn invoke(
        &self,
        route: &RouteMatch,
        call: &RpcCall,
        cx: &mut HookContext,
    ) -> Result<Value, RouteError> {
        self.plugins.invoke(Hook::BeforeResolve, cx)?;
        let resolved = route.target().operation(call.method());
        self.plugins.invoke(Hook::AfterResolve, cx)?;
        self.plugins.invoke(Hook::BeforeInvoke(call.params()), cx)?;

        let operation = resolved.ok_or_else(|| {
            RouteError::not_found(format!(
                "method '{}' is not defined on unit '{}'",
                call.method(),
                route.unit()
            ))
        })?;
        let result = operation.invoke(call.params())?;

        let response = call.respond(Outcome::Result(result)).to_value();
        self.plugins.invoke(Hook::AfterInvoke(&response), cx)?;
        Ok(response)
    }
}

impl Handler for JsonRpcProtocol {
    fn name(&self) -> &str {
        &self.name
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Request
    }

    fn plugins(&self) -> &PluginChain {
        &self.plugins
    }

    fn is_appropriate(&self, request: &Request) -> Option<RouteMatch> {
        if !request.verb().eq_ignore_ascii_case("POST") {
            return None;
        }
        let unit = path::unit_key(request.path(), self.base_path())?;
        let Some(target) = self.resolver.resolve(&unit) else {
            debug!(target: JSONRPC_TARGET, unit = %unit, "unknown unit");
            return None;
        };
        let payload = match request.body().bytes().map(serde_json::from_slice::<Value>) {
            Ok(Ok(payload)) if payload.is_object() || payload.is_array() => payload,
            Ok(Ok(_)) => {
                debug!(target: JSONRPC_TARGET, unit = %unit, "body is not an object or array");
                return None;
            }
            Ok(Err(error)) => {
                debug!(target: JSONRPC_TARGET, unit = %unit, %error, "body is not JSON");
                return None;
            }
            Err(error) => {
                debug!(target: JSONRPC_TARGET, unit = %unit, %error, "body unreadable");
                return None;
            }
        };
        Some(RouteMatch::new(unit, target, payload))
    }

    fn perform_route(
        &self,
        route: &RouteMatch,
        cx: &mut HookContext,
    ) -> Result<String, RouteError> {
        let (calls, batch) = match route.payload() {
            Value::Array(calls) => (calls.as_slice(), true),
            single => (slice::from_ref(single), false),
        };
        debug!(
            target: JSONRPC_TARGET,
            unit = route.unit(),
            calls = calls.len(),
            batch,
            "processing calls"
        );

        let mut responses: Vec<Value> = calls
            .iter()
            .filter_map(|raw| self.process(route, raw, cx))
            .collect();

        let body = if batch {
            Value::Array(responses)
        } else {
            responses.pop().unwrap_or_else(|| Value::String(String::new()))
        };
        self.encoder.encode(&body)
    }

    fn handle_exception(&self, error: &RouteError) -> Value {
        Value::Object(
            [("error".to_owned(), RpcError::from_route_failure(error).to_value())]
                .into_iter()
                .collect(),
        )
    }

    fn encoder(&self) -> &dyn Encoder {
        &self.encoder
    }
}

impl fmt::Debug for JsonRpcProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonRpcProtocol")
            .field("name", &self.name)
            .field("base_path", &self.base_path)
            .field("plugins", &self.plugins.names())
            .finish_non_exhaustive()
    }
}
