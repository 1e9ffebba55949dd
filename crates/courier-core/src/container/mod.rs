//! Dependency container for cross-cutting services.
//!
//! The container is a keyed store of shared service instances (for example an
//! authenticator consulted by an access plugin). It is populated during setup
//! through `&mut` access, then shared read-only behind an `Arc` for the
//! lifetime of the dispatcher. It performs no locking of its own.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RouteError;

type Service = Arc<dyn Any + Send + Sync>;

/// Keyed store of shared service instances.
#[derive(Default)]
pub struct Container {
    services: HashMap<String, Service>,
}

impl Container {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn set<T>(&mut self, key: impl Into<String>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.services.insert(key.into(), Arc::new(value));
    }

    /// Stores an already shared value under `key`.
    pub fn set_shared<T>(&mut self, key: impl Into<String>, value: Arc<T>)
    where
        T: Any + Send + Sync,
    {
        self.services.insert(key.into(), value);
    }

    /// Fetches the value stored under `key` if it has type `T`.
    #[must_use]
    pub fn get<T>(&self, key: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.services
            .get(key)
            .and_then(|service| Arc::clone(service).downcast::<T>().ok())
    }

    /// Fetches a value that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Internal`] when `key` is missing or holds a value
    /// of another type.
    pub fn require<T>(&self, key: &str) -> Result<Arc<T>, RouteError>
    where
        T: Any + Send + Sync,
    {
        self.get(key).ok_or_else(|| {
            RouteError::internal(format!(
                "service '{key}' is not registered as {}",
                std::any::type_name::<T>()
            ))
        })
    }

    /// Returns `true` when a value is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.services.contains_key(key)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.services.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("Container").field("services", &keys).finish()
    }
}
