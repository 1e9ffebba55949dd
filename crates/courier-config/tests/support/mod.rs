//! Serialised access to `COURIER_*` environment variables.

use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Variables the loader reads; cleared on entry so ambient values never leak
/// into a test.
const LOADER_VARIABLES: &[&str] = &[
    "COURIER_CONFIG_PATH",
    "COURIER_LOG_FILTER",
    "COURIER_LOG_FORMAT",
];

/// Holds the environment lock and restores every touched variable on drop.
pub struct EnvScope {
    saved: Vec<(String, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvScope {
    pub fn lock() -> Self {
        let guard = ENV_MUTEX.lock().unwrap_or_else(PoisonError::into_inner);
        let mut scope = Self {
            saved: Vec::new(),
            _guard: guard,
        };
        for key in LOADER_VARIABLES {
            scope.save(key);
            // Edition 2024 marks environment mutation as unsafe; the mutex
            // keeps every loader test in this binary off the environment
            // while the scope is alive.
            unsafe { std::env::remove_var(key) };
        }
        scope
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.save(key);
        unsafe { std::env::set_var(key, value) };
    }

    fn save(&mut self, key: &str) {
        if self.saved.iter().all(|(saved, _)| saved != key) {
            self.saved.push((key.to_owned(), std::env::var_os(key)));
        }
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        while let Some((key, saved)) = self.saved.pop() {
            match saved {
                Some(value) => unsafe { std::env::set_var(&key, value) },
                None => unsafe { std::env::remove_var(&key) },
            }
        }
    }
}
