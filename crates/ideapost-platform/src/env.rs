//! Environment variable access.
//!
//! Config discovery reads `IDEAPOST_CONFIG` and `IDEAPOST_SENDER_PASSWORD`
//! through [`Environment`] so tests can use a [`MapEnvironment`] instead of
//! mutating the process environment.

use std::collections::HashMap;

/// Read-only environment lookup.
pub trait Environment: Send + Sync {
    /// Value of a variable, or `None` when unset.
    fn get_var(&self, name: &str) -> Option<String>;
}

/// Process environment via [`std::env`].
pub struct NativeEnvironment;

impl Environment for NativeEnvironment {
    fn get_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed key-value environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment(HashMap<String, String>);

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.0.insert(name.to_owned(), value.to_owned());
        self
    }
}

impl Environment for MapEnvironment {
    fn get_var(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}
