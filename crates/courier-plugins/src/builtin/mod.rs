//! Plugins shipped with the crate.
//!
//! - [`HeadersPlugin`] (`headers`): adds configured static response headers
//!   as soon as a handler claims the request, so they appear on both success
//!   and error responses.
//! - [`TracePlugin`] (`trace`): logs every hook through `tracing`.

use std::collections::BTreeMap;
use std::sync::Arc;

use courier_core::{Params, RouteError};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::PluginError;
use crate::hook::{HookContext, HookResult, Plugin};

/// Tracing target for the `trace` plugin.
const TRACE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::trace");

/// Adds static headers to every response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HeadersPlugin {
    #[serde(default)]
    headers: BTreeMap<String, String>,
}

impl HeadersPlugin {
    /// Registry kind.
    pub const KIND: &'static str = "headers";

    /// Builds the plugin from `{"headers": {"Name": "value"}}`.
    ///
    /// A `null` options value yields a plugin with no headers.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidOptions`] when the options do not match
    /// that shape.
    pub fn from_options(options: &Value) -> Result<Self, PluginError> {
        if options.is_null() {
            return Ok(Self::default());
        }
        Self::deserialize(options).map_err(|error| PluginError::invalid_options(Self::KIND, error))
    }

    /// Configured headers.
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}

impl Plugin for HeadersPlugin {
    fn name(&self) -> &str {
        Self::KIND
    }

    fn after_handler_selected(&self, cx: &mut HookContext) -> HookResult {
        for (name, value) in &self.headers {
            cx.set_header(name.clone(), value.clone());
        }
        Ok(())
    }
}

/// Logs every lifecycle hook at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracePlugin;

impl TracePlugin {
    /// Registry kind.
    pub const KIND: &'static str = "trace";

    fn log(cx: &HookContext, hook: &'static str) {
        debug!(
            target: TRACE_TARGET,
            hook,
            handler = cx.handler(),
            unit = cx.unit(),
            operation = cx.operation(),
            "hook reached"
        );
    }
}

impl Plugin for TracePlugin {
    fn name(&self) -> &str {
        Self::KIND
    }

    fn after_handler_selected(&self, cx: &mut HookContext) -> HookResult {
        Self::log(cx, "after_handler_selected");
        Ok(())
    }

    fn before_resolve(&self, cx: &mut HookContext) -> HookResult {
        Self::log(cx, "before_resolve");
        Ok(())
    }

    fn after_resolve(&self, cx: &mut HookContext) -> HookResult {
        Self::log(cx, "after_resolve");
        Ok(())
    }

    fn before_invoke(&self, cx: &mut HookContext, params: &Params) -> HookResult {
        debug!(target: TRACE_TARGET, arguments = params.len(), "invoking operation");
        Self::log(cx, "before_invoke");
        Ok(())
    }

    fn after_invoke(&self, cx: &mut HookContext, _response: &Value) -> HookResult {
        Self::log(cx, "after_invoke");
        Ok(())
    }

    fn after_full_route_invoked(&self, cx: &mut HookContext, body: &str) -> HookResult {
        debug!(target: TRACE_TARGET, bytes = body.len(), "route completed");
        Self::log(cx, "after_full_route_invoked");
        Ok(())
    }

    fn error_occurred(&self, cx: &mut HookContext, error: &RouteError) -> HookResult {
        debug!(target: TRACE_TARGET, %error, status = error.status_code(), "route failed");
        Self::log(cx, "error_occurred");
        Ok(())
    }
}

pub(crate) fn headers(options: &Value) -> Result<Arc<dyn Plugin>, PluginError> {
    Ok(Arc::new(HeadersPlugin::from_options(options)?))
}

pub(crate) fn trace(_options: &Value) -> Result<Arc<dyn Plugin>, PluginError> {
    Ok(Arc::new(TracePlugin))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use courier_core::Container;
    use serde_json::json;

    use super::*;
    use crate::hook::Hook;

    #[test]
    fn headers_plugin_sets_configured_headers() {
        let plugin =
            HeadersPlugin::from_options(&json!({"headers": {"X-Frame-Options": "DENY"}}))
                .expect("valid options");
        let mut cx = HookContext::new("jsonrpc", Arc::new(Container::new()));

        Hook::AfterHandlerSelected
            .dispatch(&plugin, &mut cx)
            .expect("hook");

        assert_eq!(
            cx.headers().get("X-Frame-Options").map(String::as_str),
            Some("DENY")
        );
    }

    #[test]
    fn null_options_mean_no_headers() {
        let plugin = HeadersPlugin::from_options(&Value::Null).expect("null options");
        assert!(plugin.headers().is_empty());
    }

    #[test]
    fn trace_plugin_never_fails() {
        let mut cx = HookContext::new("command", Arc::new(Container::new()));
        let error = RouteError::internal("x");
        for hook in [
            Hook::AfterHandlerSelected,
            Hook::AfterFullRouteInvoked("ok"),
            Hook::ErrorOccurred(&error),
        ] {
            hook.dispatch(&TracePlugin, &mut cx).expect("trace hook");
        }
    }
}
