//! Crate-level test doubles and BDD tests.

use std::sync::{Arc, Mutex};

use courier_core::{Params, RouteError};
use serde_json::Value;

use crate::hook::{HookContext, HookResult, Plugin};

mod behaviour;

/// Shared, ordered record of hook calls.
#[derive(Debug, Clone, Default)]
pub(crate) struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    fn push(&self, entry: String) {
        self.0.lock().expect("call log lock").push(entry);
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.lock().expect("call log lock").clone()
    }
}

/// Plugin that records every hook call as `name:hook`.
pub(crate) struct RecordingPlugin {
    name: String,
    log: CallLog,
    fail_on: Option<&'static str>,
}

impl RecordingPlugin {
    pub(crate) fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_owned(),
            log: log.clone(),
            fail_on: None,
        }
    }

    pub(crate) const fn failing_on(mut self, hook: &'static str) -> Self {
        self.fail_on = Some(hook);
        self
    }

    fn record(&self, hook: &'static str) -> HookResult {
        self.log.push(format!("{}:{hook}", self.name));
        if self.fail_on == Some(hook) {
            return Err(RouteError::access_denied(format!("{} rejected {hook}", self.name)));
        }
        Ok(())
    }
}

impl Plugin for RecordingPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn after_handler_selected(&self, _cx: &mut HookContext) -> HookResult {
        self.record("after_handler_selected")
    }

    fn before_resolve(&self, _cx: &mut HookContext) -> HookResult {
        self.record("before_resolve")
    }

    fn after_resolve(&self, _cx: &mut HookContext) -> HookResult {
        self.record("after_resolve")
    }

    fn before_invoke(&self, _cx: &mut HookContext, _params: &Params) -> HookResult {
        self.record("before_invoke")
    }

    fn after_invoke(&self, _cx: &mut HookContext, _response: &Value) -> HookResult {
        self.record("after_invoke")
    }

    fn after_full_route_invoked(&self, _cx: &mut HookContext, _body: &str) -> HookResult {
        self.record("after_full_route_invoked")
    }

    fn error_occurred(&self, _cx: &mut HookContext, _error: &RouteError) -> HookResult {
        self.record("error_occurred")
    }
}
