//! Per-request state shared with plugins.

use std::sync::Arc;

use courier_core::{Container, Headers};

/// Mutable view of the request handed to every hook.
///
/// The context records which handler claimed the request and, as routing
/// progresses, the unit and operation being executed. Plugins use it to add
/// response headers and to reach injected services.
#[derive(Debug)]
pub struct HookContext {
    handler: String,
    unit: Option<String>,
    operation: Option<String>,
    headers: Headers,
    container: Arc<Container>,
}

impl HookContext {
    /// Creates a context for a request claimed by `handler`.
    #[must_use]
    pub fn new(handler: impl Into<String>, container: Arc<Container>) -> Self {
        Self {
            handler: handler.into(),
            unit: None,
            operation: None,
            headers: Headers::new(),
            container,
        }
    }

    /// Name of the handler that claimed the request.
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// Records the unit being routed to.
    pub fn set_unit(&mut self, unit: impl Into<String>) {
        self.unit = Some(unit.into());
    }

    /// Records the operation being executed.
    pub fn set_operation(&mut self, operation: impl Into<String>) {
        self.operation = Some(operation.into());
    }

    /// Forgets the current operation, keeping the unit.
    pub fn clear_operation(&mut self) {
        self.operation = None;
    }

    /// Target unit, once known.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Target operation, once known.
    #[must_use]
    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    /// Returns the unit/operation pair when both are known.
    ///
    /// Plugin scopes are only evaluated against a complete target.
    #[must_use]
    pub fn target(&self) -> Option<(&str, &str)> {
        self.unit().zip(self.operation())
    }

    /// Sets a response header.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Response headers accumulated so far.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Injected service container.
    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Consumes the context, yielding the accumulated headers.
    #[must_use]
    pub fn into_headers(self) -> Headers {
        self.headers
    }
}
