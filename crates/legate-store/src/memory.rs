//! In-memory key-value store for tests and client-local deployments.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use legate_core::{Error, KeyValueStore, Result};

/// In-process [`KeyValueStore`] backed by a mutex-guarded map.
///
/// Cloning shares the underlying map, so a clone handed to the engine
/// observes writes made through any other clone. A failure mode can be
/// toggled to exercise the engine's degraded-storage paths.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    failing: Arc<Mutex<bool>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed an entry. Useful for tests that start mid-lifecycle.
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .lock()
            .unwrap()
            .insert(key.into(), value.into());
        self
    }

    /// Toggle the failure mode: while set, every operation returns
    /// [`Error::Storage`], simulating a disabled persistence substrate.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    fn check_available(&self) -> Result<()> {
        if *self.failing.lock().unwrap() {
            return Err(Error::Storage("memory store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_available()?;
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn increment(&self, key: &str, by: i64) -> Result<i64> {
        self.check_available()?;
        let mut entries = self.entries.lock().unwrap();
        let current = match entries.get(key) {
            Some(raw) => raw.parse::<i64>().map_err(|_| {
                Error::Storage(format!("counter key {} holds non-integer value", key))
            })?,
            None => 0,
        };
        let next = current + by;
        entries.insert(key.to_string(), next.to_string());
        Ok(next)
    }
}
