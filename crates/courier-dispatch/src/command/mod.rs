//! Command-mode handler.
//!
//! Claims command requests whose task is written `unit:operation`, for
//! example `math:add 1 2`, when the resolver knows both halves. Positional
//! arguments become [`Params::Positional`] strings and the result is rendered
//! with the [`TextEncoder`].

use std::sync::Arc;

use courier_core::{ExecutionMode, Params, Request, RouteError};
use courier_plugins::{Hook, HookContext, PluginChain};
use serde_json::Value;
use tracing::debug;

use crate::encoder::{Encoder, TextEncoder};
use crate::handler::{Handler, RouteMatch};
use crate::resolver::OperationResolver;

const COMMAND_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::command");

/// Separator between unit and operation in a task name.
pub const TASK_SEPARATOR: char = ':';

/// Runs `unit:operation` tasks.
pub struct CommandHandler {
    name: String,
    plugins: PluginChain,
    resolver: Arc<dyn OperationResolver>,
    encoder: TextEncoder,
}

impl CommandHandler {
    /// Registry kind.
    pub const KIND: &'static str = "command";

    /// Creates a handler with no plugins.
    #[must_use]
    pub fn new(resolver: Arc<dyn OperationResolver>) -> Self {
        Self {
            name: Self::KIND.to_owned(),
            plugins: PluginChain::new(),
            resolver,
            encoder: TextEncoder,
        }
    }

    /// Overrides the handler name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces the plugin chain.
    #[must_use]
    pub fn with_plugins(mut self, plugins: PluginChain) -> Self {
        self.plugins = plugins;
        self
    }
}

impl Handler for CommandHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Command
    }

    fn plugins(&self) -> &PluginChain {
        &self.plugins
    }

    fn is_appropriate(&self, request: &Request) -> Option<RouteMatch> {
        let (unit, operation) = request.path().split_once(TASK_SEPARATOR)?;
        if unit.is_empty() || operation.is_empty() {
            return None;
        }
        let target = self.resolver.resolve(unit)?;
        if target.operation(operation).is_none() {
            debug!(target: COMMAND_TARGET, unit, operation, "unknown operation");
            return None;
        }
        let arguments = request
            .arguments()
            .iter()
            .cloned()
            .map(Value::String)
            .collect();
        Some(RouteMatch::new(unit, target, Value::Array(arguments)).with_operation(operation))
    }

    fn perform_route(
        &self,
        route: &RouteMatch,
        cx: &mut HookContext,
    ) -> Result<String, RouteError> {
        let name = route
            .operation()
            .ok_or_else(|| RouteError::internal("command route has no operation"))?;
        let operation = route
            .target()
            .operation(name)
            .ok_or_else(|| {
                RouteError::not_found(format!("unknown task '{}:{name}'", route.unit()))
            })?;
        let params = match route.payload() {
            Value::Array(arguments) => Params::Positional(arguments.clone()),
            _ => Params::None,
        };

        self.plugins.invoke(Hook::BeforeInvoke(&params), cx)?;
        let result = operation.invoke(&params)?;
        self.plugins.invoke(Hook::AfterInvoke(&result), cx)?;

        self.encoder.encode(&result)
    }

    fn encoder(&self) -> &dyn Encoder {
        &self.encoder
    }
}

#[cfg(test)]
mod tests;
