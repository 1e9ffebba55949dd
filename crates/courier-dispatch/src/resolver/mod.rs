//! Operation resolution.
//!
//! Handlers never know concrete services. They ask an [`OperationResolver`]
//! for the [`Unit`] registered under a key derived from the request, then ask
//! the unit for a named [`Operation`]. [`UnitRegistry`] and [`MethodTable`]
//! are the in-memory implementations used by bootstrap and tests.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use courier_core::{Params, RouteError};
use serde_json::Value;

/// Something that can be invoked with call parameters.
pub trait Operation: Send + Sync {
    /// Runs the operation.
    ///
    /// # Errors
    ///
    /// Returns the operation's own failure.
    fn invoke(&self, params: &Params) -> Result<Value, RouteError>;
}

impl<F> Operation for F
where
    F: Fn(&Params) -> Result<Value, RouteError> + Send + Sync,
{
    fn invoke(&self, params: &Params) -> Result<Value, RouteError> {
        self(params)
    }
}

/// A named group of operations, the target of one route.
pub trait Unit: Send + Sync {
    /// Looks up an operation by name.
    fn operation(&self, name: &str) -> Option<&dyn Operation>;

    /// Names of the operations this unit exposes, if known.
    fn operation_names(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// Maps unit keys to invokable units.
pub trait OperationResolver: Send + Sync {
    /// Returns the unit registered under `unit`.
    fn resolve(&self, unit: &str) -> Option<Arc<dyn Unit>>;

    /// Returns `true` when `unit` is known.
    fn contains(&self, unit: &str) -> bool {
        self.resolve(unit).is_some()
    }
}

/// A [`Unit`] backed by a table of named operations.
///
/// # Example
///
/// ```
/// use courier_dispatch::resolver::{MethodTable, Unit};
/// use serde_json::json;
///
/// let table = MethodTable::new().with_operation("echo", |_| Ok(json!("hi")));
/// assert!(table.operation("echo").is_some());
/// ```
#[derive(Default)]
pub struct MethodTable {
    operations: BTreeMap<String, Box<dyn Operation>>,
}

impl MethodTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `operation` under `name`, replacing any previous entry.
    #[must_use]
    pub fn with_operation<F>(mut self, name: impl Into<String>, operation: F) -> Self
    where
        F: Fn(&Params) -> Result<Value, RouteError> + Send + Sync + 'static,
    {
        self.insert(name, operation);
        self
    }

    /// Adds `operation` under `name`, replacing any previous entry.
    pub fn insert<F>(&mut self, name: impl Into<String>, operation: F)
    where
        F: Fn(&Params) -> Result<Value, RouteError> + Send + Sync + 'static,
    {
        self.operations.insert(name.into(), Box::new(operation));
    }

    /// Number of operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` when the table holds no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Unit for MethodTable {
    fn operation(&self, name: &str) -> Option<&dyn Operation> {
        self.operations.get(name).map(|operation| &**operation)
    }

    fn operation_names(&self) -> Vec<&str> {
        self.operations.keys().map(String::as_str).collect()
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("operations", &self.operation_names())
            .finish()
    }
}

/// In-memory [`OperationResolver`].
#[derive(Default, Clone)]
pub struct UnitRegistry {
    units: HashMap<String, Arc<dyn Unit>>,
}

impl UnitRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `unit` under `key`, replacing any previous entry.
    pub fn register<U>(&mut self, key: impl Into<String>, unit: U)
    where
        U: Unit + 'static,
    {
        self.units.insert(key.into(), Arc::new(unit));
    }

    /// Builder form of [`UnitRegistry::register`].
    #[must_use]
    pub fn with_unit<U>(mut self, key: impl Into<String>, unit: U) -> Self
    where
        U: Unit + 'static,
    {
        self.register(key, unit);
        self
    }

    /// Registered keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.units.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl OperationResolver for UnitRegistry {
    fn resolve(&self, unit: &str) -> Option<Arc<dyn Unit>> {
        self.units.get(unit).map(Arc::clone)
    }

    fn contains(&self, unit: &str) -> bool {
        self.units.contains_key(unit)
    }
}

impl fmt::Debug for UnitRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitRegistry")
            .field("units", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests;
