//! Ordered plugin execution.
//!
//! A [`PluginChain`] keeps its entries sorted by ascending priority. The sort
//! is stable, so plugins sharing a priority run in the order they were added.
//! [`PluginChain::invoke`] runs one hook across every entry whose scope admits
//! the context's current target and stops at the first failure.

use std::fmt;
use std::sync::Arc;

use courier_core::RouteError;
use tracing::{trace, warn};

use crate::hook::{Hook, HookContext, Plugin};
use crate::scope::{PluginScope, ScopeMap};

/// Tracing target for plugin chain execution.
pub(crate) const CHAIN_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::chain");

/// A plugin together with its priority and scope.
#[derive(Clone)]
pub struct ScopedPlugin {
    plugin: Arc<dyn Plugin>,
    priority: i32,
    scope: PluginScope,
}

impl ScopedPlugin {
    /// Wraps a plugin with priority 0 and global scope.
    #[must_use]
    pub const fn new(plugin: Arc<dyn Plugin>) -> Self {
        Self {
            plugin,
            priority: 0,
            scope: PluginScope::Global,
        }
    }

    /// Sets the execution priority; lower values run first.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Restricts the plugin to the listed units/operations.
    #[must_use]
    pub fn with_whitelist(mut self, entries: ScopeMap) -> Self {
        self.scope.set_whitelist(entries);
        self
    }

    /// Excludes the plugin from the listed units/operations.
    #[must_use]
    pub fn with_blacklist(mut self, entries: ScopeMap) -> Self {
        self.scope.set_blacklist(entries);
        self
    }

    /// Plugin name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.plugin.name()
    }

    /// Execution priority.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Unit/operation scope.
    #[must_use]
    pub const fn scope(&self) -> &PluginScope {
        &self.scope
    }

    /// Mutable scope, for setup-time adjustments.
    #[must_use]
    pub const fn scope_mut(&mut self) -> &mut PluginScope {
        &mut self.scope
    }

    /// Returns `true` when the plugin applies to `unit`/`operation`.
    #[must_use]
    pub fn supports(&self, unit: &str, operation: &str) -> bool {
        self.scope.supports(unit, operation)
    }

    fn applies_to(&self, cx: &HookContext) -> bool {
        cx.target()
            .is_none_or(|(unit, operation)| self.supports(unit, operation))
    }
}

impl fmt::Debug for ScopedPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedPlugin")
            .field("name", &self.name())
            .field("priority", &self.priority)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Plugins attached to one handler, in execution order.
#[derive(Debug, Clone, Default)]
pub struct PluginChain {
    plugins: Vec<ScopedPlugin>,
}

impl PluginChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a plugin and restores priority order.
    pub fn add(&mut self, plugin: ScopedPlugin) {
        self.plugins.push(plugin);
        // `sort_by_key` is stable: equal priorities keep insertion order.
        self.plugins.sort_by_key(ScopedPlugin::priority);
    }

    /// Iterates plugins in execution order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &ScopedPlugin> {
        self.plugins.iter()
    }

    /// Plugin names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(ScopedPlugin::name).collect()
    }

    /// Number of plugins.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` when the chain holds no plugins.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Runs `hook` on every in-scope plugin, in order.
    ///
    /// Scope is evaluated only once the context knows both unit and operation;
    /// before that every plugin runs.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a plugin; later plugins are skipped.
    pub fn invoke(&self, hook: Hook<'_>, cx: &mut HookContext) -> Result<(), RouteError> {
        for entry in &self.plugins {
            if !entry.applies_to(cx) {
                trace!(
                    target: CHAIN_TARGET,
                    hook = hook.name(),
                    plugin = entry.name(),
                    "plugin out of scope"
                );
                continue;
            }
            trace!(
                target: CHAIN_TARGET,
                hook = hook.name(),
                plugin = entry.name(),
                "invoking plugin hook"
            );
            if let Err(error) = hook.dispatch(entry.plugin.as_ref(), cx) {
                warn!(
                    target: CHAIN_TARGET,
                    hook = hook.name(),
                    plugin = entry.name(),
                    %error,
                    "plugin hook failed"
                );
                return Err(error);
            }
        }
        Ok(())
    }
}

impl FromIterator<ScopedPlugin> for PluginChain {
    fn from_iter<I: IntoIterator<Item = ScopedPlugin>>(iter: I) -> Self {
        let mut chain = Self::new();
        for plugin in iter {
            chain.add(plugin);
        }
        chain
    }
}
