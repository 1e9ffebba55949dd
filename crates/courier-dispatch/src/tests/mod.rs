//! Shared test doubles and BDD suites.

use std::sync::{Arc, Mutex};

use courier_core::{ExecutionMode, Params, Request, RouteError};
use courier_plugins::{HookContext, HookResult, Plugin, PluginChain, ScopedPlugin};
use serde_json::{Value, json};

use crate::encoder::{Encoder, JsonEncoder};
use crate::handler::{Handler, RouteMatch};
use crate::resolver::{MethodTable, UnitRegistry};


/// Ordered record of hook calls shared between a probe and the test.
#[derive(Debug, Clone, Default)]
pub(crate) struct HookLog(Arc<Mutex<Vec<String>>>);

impl HookLog {
    fn push(&self, entry: String) {
        self.0.lock().expect("hook log lock").push(entry);
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.lock().expect("hook log lock").clone()
    }
}

/// Plugin recording each hook as `hook` or, once an operation is known,
/// `hook(operation)`.
pub(crate) struct Probe {
    log: HookLog,
    fail_on: Option<(&'static str, fn() -> RouteError)>,
    header: Option<(&'static str, &'static str)>,
}

impl Probe {
    pub(crate) fn new(log: &HookLog) -> Self {
        Self {
            log: log.clone(),
            fail_on: None,
            header: None,
        }
    }

    pub(crate) const fn failing_on(
        mut self,
        hook: &'static str,
        error: fn() -> RouteError,
    ) -> Self {
        self.fail_on = Some((hook, error));
        self
    }

    pub(crate) const fn setting_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.header = Some((name, value));
        self
    }

    pub(crate) fn scoped(self) -> ScopedPlugin {
        ScopedPlugin::new(Arc::new(self))
    }

    fn record(&self, cx: &mut HookContext, hook: &'static str) -> HookResult {
        let entry = match cx.operation() {
            Some(operation) => format!("{hook}({operation})"),
            None => hook.to_owned(),
        };
        self.log.push(entry);
        if let Some((name, value)) = self.header {
            cx.set_header(name, value);
        }
        match self.fail_on {
            Some((failing, error)) if failing == hook => Err(error()),
            _ => Ok(()),
        }
    }
}

impl Plugin for Probe {
    fn name(&self) -> &str {
        "probe"
    }

    fn after_handler_selected(&self, cx: &mut HookContext) -> HookResult {
        self.record(cx, "after_handler_selected")
    }

    fn before_resolve(&self, cx: &mut HookContext) -> HookResult {
        self.record(cx, "before_resolve")
    }

    fn after_resolve(&self, cx: &mut HookContext) -> HookResult {
        self.record(cx, "after_resolve")
    }

    fn before_invoke(&self, cx: &mut HookContext, _params: &Params) -> HookResult {
        self.record(cx, "before_invoke")
    }

    fn after_invoke(&self, cx: &mut HookContext, _response: &Value) -> HookResult {
        self.record(cx, "after_invoke")
    }

    fn after_full_route_invoked(&self, cx: &mut HookContext, _body: &str) -> HookResult {
        self.record(cx, "after_full_route_invoked")
    }

    fn error_occurred(&self, cx: &mut HookContext, _error: &RouteError) -> HookResult {
        self.record(cx, "error_occurred")
    }
}

/// Handler with scripted behaviour for dispatcher tests.
pub(crate) struct StubHandler {
    name: &'static str,
    mode: ExecutionMode,
    claims: bool,
    failure: Option<fn() -> RouteError>,
    plugins: PluginChain,
    encoder: Box<dyn Encoder>,
}

impl StubHandler {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            mode: ExecutionMode::Request,
            claims: true,
            failure: None,
            plugins: PluginChain::new(),
            encoder: Box::new(JsonEncoder),
        }
    }

    pub(crate) const fn for_commands(mut self) -> Self {
        self.mode = ExecutionMode::Command;
        self
    }

    pub(crate) const fn declining(mut self) -> Self {
        self.claims = false;
        self
    }

    pub(crate) const fn failing(mut self, error: fn() -> RouteError) -> Self {
        self.failure = Some(error);
        self
    }

    pub(crate) fn with_plugin(mut self, plugin: ScopedPlugin) -> Self {
        self.plugins.add(plugin);
        self
    }

    pub(crate) fn with_encoder(mut self, encoder: impl Encoder + 'static) -> Self {
        self.encoder = Box::new(encoder);
        self
    }
}

impl Handler for StubHandler {
    fn name(&self) -> &str {
        self.name
    }

    fn mode(&self) -> ExecutionMode {
        self.mode
    }

    fn plugins(&self) -> &PluginChain {
        &self.plugins
    }

    fn is_appropriate(&self, _request: &Request) -> Option<RouteMatch> {
        self.claims
            .then(|| RouteMatch::new("stub", Arc::new(MethodTable::new()), Value::Null))
    }

    fn perform_route(
        &self,
        _route: &RouteMatch,
        _cx: &mut HookContext,
    ) -> Result<String, RouteError> {
        match self.failure {
            Some(error) => Err(error()),
            None => Ok(format!("\"{}\"", self.name)),
        }
    }

    fn encoder(&self) -> &dyn Encoder {
        self.encoder.as_ref()
    }
}

/// Units used across the JSON-RPC and command suites.
pub(crate) fn sample_units() -> UnitRegistry {
    let math = MethodTable::new()
        .with_operation("echo", |params| {
            Ok(params.positional(0).cloned().unwrap_or_else(|| json!("hi")))
        })
        .with_operation("add", |params| {
            let operand = |index| {
                params
                    .positional(index)
                    .and_then(|value| match value {
                        Value::String(text) => text.parse().ok(),
                        other => other.as_i64(),
                    })
                    .ok_or_else(|| RouteError::bad_request("add expects two integers"))
            };
            Ok(json!(operand(0)? + operand(1)?))
        })
        .with_operation("nothing", |_| Ok(Value::Null))
        .with_operation("quota", |_| Err(RouteError::coded(-32001, "quota exceeded")))
        .with_operation("broken", |_| Err(RouteError::coded(123, "disk on fire")));
    let admin = MethodTable::new().with_operation("reset", |_| Ok(json!(true)));

    UnitRegistry::new()
        .with_unit("math", math)
        .with_unit("v1/admin", admin)
}
