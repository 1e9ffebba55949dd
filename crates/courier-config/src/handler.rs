//! Handler and plugin declarations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

/// Token granting a plugin every operation of a unit.
pub const ALL_OPERATIONS: &str = "*";

/// Scope declared for one unit: `"*"` or a list of operation names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ScopeEntry {
    /// Explicit operation names.
    Operations(Vec<String>),
    /// A bare token; only [`ALL_OPERATIONS`] is meaningful.
    Token(String),
}

impl ScopeEntry {
    /// Returns `true` for the `"*"` token.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::Token(token) if token == ALL_OPERATIONS)
    }
}

/// Unit key to scope entry.
pub type ScopeEntries = BTreeMap<String, ScopeEntry>;

/// One plugin attached to a handler.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PluginConfig {
    /// Registry kind, for example `headers`.
    pub kind: String,
    /// Execution priority; lower runs first.
    #[serde(default)]
    pub priority: i32,
    /// Units and operations the plugin is restricted to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<ScopeEntries>,
    /// Units and operations the plugin is excluded from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blacklist: Option<ScopeEntries>,
    /// Free-form options handed to the plugin factory.
    #[serde(default)]
    pub options: Value,
}

impl PluginConfig {
    /// Creates a global plugin entry with priority 0 and no options.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            priority: 0,
            whitelist: None,
            blacklist: None,
            options: Value::Null,
        }
    }

    fn validate(&self, location: &str) -> Result<(), ConfigError> {
        if self.kind.trim().is_empty() {
            return Err(ConfigError::EmptyKind {
                location: location.to_owned(),
            });
        }
        if self.whitelist.is_some() && self.blacklist.is_some() {
            return Err(ConfigError::ConflictingScope {
                location: location.to_owned(),
            });
        }
        let entries = self.whitelist.iter().chain(self.blacklist.iter()).flatten();
        for (unit, entry) in entries {
            if matches!(entry, ScopeEntry::Token(_)) && !entry.is_all() {
                return Err(ConfigError::InvalidScope {
                    location: location.to_owned(),
                    unit: unit.clone(),
                });
            }
        }
        Ok(())
    }
}

/// One handler in dispatch order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HandlerConfig {
    /// Registry kind, for example `jsonrpc`.
    pub kind: String,
    /// Display name; defaults to the kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Path prefix stripped before unit lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    /// Plugins attached to this handler.
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,
}

impl HandlerConfig {
    /// Creates a handler entry of `kind` with no plugins.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            base_path: None,
            plugins: Vec::new(),
        }
    }

    /// Name used in logs and hook contexts.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.kind)
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let location = format!("handlers[{index}]");
        if self.kind.trim().is_empty() {
            return Err(ConfigError::EmptyKind { location });
        }
        for (position, plugin) in self.plugins.iter().enumerate() {
            plugin.validate(&format!("{location}.plugins[{position}]"))?;
        }
        Ok(())
    }
}
