//! Plugin hooks, scoping and ordered execution for the Courier dispatcher.
//!
//! Plugins are cross-cutting observers and interceptors invoked at fixed
//! points of the dispatch lifecycle. Each lifecycle point is a variant of
//! [`Hook`]; the [`Plugin`] trait provides a default no-op method per hook so
//! implementations only override what they care about.
//!
//! A [`PluginChain`] owns the plugins configured for one handler. Entries are
//! kept sorted by ascending priority, with ties resolved by registration
//! order, and each entry carries a [`PluginScope`] restricting it to a set of
//! units and operations.
//!
//! # Architecture
//!
//! ```text
//! PluginRegistry ──create──▶ Arc<dyn Plugin> ──wrap──▶ ScopedPlugin
//!                                                       │
//!                                     PluginChain::add ◀┘
//!                                           │
//!            Hook + HookContext ──invoke────┘ (in priority order, in scope)
//! ```

pub mod builtin;
pub mod chain;
pub mod error;
pub mod hook;
pub mod registry;
pub mod scope;

#[cfg(test)]
mod tests;

pub use self::chain::{PluginChain, ScopedPlugin};
pub use self::error::PluginError;
pub use self::hook::{Hook, HookContext, HookResult, Plugin};
pub use self::registry::{PluginFactory, PluginRegistry};
pub use self::scope::{Operations, PluginScope, ScopeMap};
