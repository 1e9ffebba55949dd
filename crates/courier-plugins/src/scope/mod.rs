//! Unit/operation scoping for plugins.
//!
//! A plugin is either global, restricted to an allow-list, or excluded by a
//! deny-list. The lists are mutually exclusive: [`PluginScope`] is a single
//! enum, so installing one list replaces the other.

use std::collections::{BTreeMap, BTreeSet};

/// Operations of a unit covered by a scope entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operations {
    /// Every operation of the unit.
    All,
    /// Only the named operations.
    Only(BTreeSet<String>),
}

impl Operations {
    /// Builds an explicit operation set.
    #[must_use]
    pub fn only<I, S>(operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(operations.into_iter().map(Into::into).collect())
    }

    /// Returns `true` when `operation` is covered.
    #[must_use]
    pub fn covers(&self, operation: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.contains(operation),
        }
    }
}

/// Scope entries keyed by unit name.
pub type ScopeMap = BTreeMap<String, Operations>;

/// Where a plugin applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PluginScope {
    /// Applies everywhere.
    #[default]
    Global,
    /// Applies only to the listed units/operations.
    Allow(ScopeMap),
    /// Applies everywhere except the listed units/operations.
    Deny(ScopeMap),
}

impl PluginScope {
    /// Installs an allow-list, discarding any deny-list.
    pub fn set_whitelist(&mut self, entries: ScopeMap) {
        *self = Self::Allow(entries);
    }

    /// Installs a deny-list, discarding any allow-list.
    pub fn set_blacklist(&mut self, entries: ScopeMap) {
        *self = Self::Deny(entries);
    }

    /// Returns the allow-list, if one is installed.
    #[must_use]
    pub const fn whitelist(&self) -> Option<&ScopeMap> {
        match self {
            Self::Allow(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the deny-list, if one is installed.
    #[must_use]
    pub const fn blacklist(&self) -> Option<&ScopeMap> {
        match self {
            Self::Deny(entries) => Some(entries),
            _ => None,
        }
    }

    /// Decides whether a plugin with this scope runs for `unit`/`operation`.
    #[must_use]
    pub fn supports(&self, unit: &str, operation: &str) -> bool {
        match self {
            Self::Global => true,
            Self::Allow(entries) => entries
                .get(unit)
                .is_some_and(|operations| operations.covers(operation)),
            Self::Deny(entries) => entries
                .get(unit)
                .is_none_or(|operations| !operations.covers(operation)),
        }
    }
}
