//! Handler factory registry.
//!
//! Mirrors the plugin registry: configuration names handlers by kind and each
//! kind maps to a factory that assembles the handler from its
//! [`HandlerParts`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use courier_plugins::PluginChain;

use crate::bootstrap::BootstrapError;
use crate::command::CommandHandler;
use crate::handler::Handler;
use crate::jsonrpc::JsonRpcProtocol;
use crate::resolver::OperationResolver;

/// Everything a factory needs to build one handler.
#[derive(Clone)]
pub struct HandlerParts {
    /// Handler name.
    pub name: String,
    /// Path prefix stripped before unit lookup.
    pub base_path: Option<String>,
    /// Plugins, already ordered and scoped.
    pub plugins: PluginChain,
    /// Operation resolver shared by all handlers.
    pub resolver: Arc<dyn OperationResolver>,
}

impl fmt::Debug for HandlerParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerParts")
            .field("name", &self.name)
            .field("base_path", &self.base_path)
            .field("plugins", &self.plugins.names())
            .finish_non_exhaustive()
    }
}

/// Builds a handler from its parts.
pub type HandlerFactory = Box<dyn Fn(HandlerParts) -> Box<dyn Handler> + Send + Sync>;

/// Registry of handler factories keyed by kind.
#[derive(Default)]
pub struct HandlerRegistry {
    factories: HashMap<String, HandlerFactory>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the `jsonrpc` and `command` kinds.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .factories
            .insert(JsonRpcProtocol::KIND.to_owned(), Box::new(jsonrpc));
        registry
            .factories
            .insert(CommandHandler::KIND.to_owned(), Box::new(command));
        registry
    }

    /// Registers a factory for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::DuplicateHandler`] if the kind is taken.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F) -> Result<(), BootstrapError>
    where
        F: Fn(HandlerParts) -> Box<dyn Handler> + Send + Sync + 'static,
    {
        let key = kind.into();
        if self.factories.contains_key(&key) {
            return Err(BootstrapError::DuplicateHandler { kind: key });
        }
        self.factories.insert(key, Box::new(factory));
        Ok(())
    }

    /// Builds a handler of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::UnknownHandler`] for unregistered kinds.
    pub fn create(
        &self,
        kind: &str,
        parts: HandlerParts,
    ) -> Result<Box<dyn Handler>, BootstrapError> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| BootstrapError::UnknownHandler {
                kind: kind.to_owned(),
            })?;
        Ok(factory(parts))
    }

    /// Registered kinds, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

fn jsonrpc(parts: HandlerParts) -> Box<dyn Handler> {
    let mut handler = JsonRpcProtocol::new(parts.resolver)
        .with_name(parts.name)
        .with_plugins(parts.plugins);
    if let Some(base_path) = parts.base_path.as_deref() {
        handler = handler.with_base_path(base_path);
    }
    Box::new(handler)
}

fn command(parts: HandlerParts) -> Box<dyn Handler> {
    Box::new(
        CommandHandler::new(parts.resolver)
            .with_name(parts.name)
            .with_plugins(parts.plugins),
    )
}
