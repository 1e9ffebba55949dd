//! Plugin factory registry.
//!
//! Configuration names plugins by kind. The [`PluginRegistry`] maps each kind
//! to a factory that builds the plugin from its free-form JSON options, so
//! unknown kinds are rejected when the dispatcher is assembled rather than
//! when a request first reaches them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::builtin::{self, HeadersPlugin, TracePlugin};
use crate::error::PluginError;
use crate::hook::Plugin;

/// Builds a plugin from its configured options.
pub type PluginFactory =
    Box<dyn Fn(&Value) -> Result<Arc<dyn Plugin>, PluginError> + Send + Sync>;

/// Registry of plugin factories keyed by kind.
///
/// # Example
///
/// ```
/// use courier_plugins::PluginRegistry;
/// use serde_json::json;
///
/// let registry = PluginRegistry::with_builtins();
/// let plugin = registry
///     .create("headers", &json!({"headers": {"X-Frame-Options": "DENY"}}))
///     .expect("builtin kind");
/// assert_eq!(plugin.name(), "headers");
/// ```
#[derive(Default)]
pub struct PluginRegistry {
    factories: HashMap<String, PluginFactory>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry preloaded with the built-in plugin kinds.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .factories
            .insert(HeadersPlugin::KIND.to_owned(), Box::new(builtin::headers));
        registry
            .factories
            .insert(TracePlugin::KIND.to_owned(), Box::new(builtin::trace));
        registry
    }

    /// Registers a factory for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::DuplicateKind`] if the kind is already taken.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F) -> Result<(), PluginError>
    where
        F: Fn(&Value) -> Result<Arc<dyn Plugin>, PluginError> + Send + Sync + 'static,
    {
        let key = kind.into();
        if self.factories.contains_key(&key) {
            return Err(PluginError::DuplicateKind { kind: key });
        }
        self.factories.insert(key, Box::new(factory));
        Ok(())
    }

    /// Builds a plugin of `kind` from `options`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::UnknownKind`] for unregistered kinds, or the
    /// factory's own error.
    pub fn create(&self, kind: &str, options: &Value) -> Result<Arc<dyn Plugin>, PluginError> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| PluginError::UnknownKind {
                kind: kind.to_owned(),
            })?;
        factory(options)
    }

    /// Returns `true` when a factory exists for `kind`.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
