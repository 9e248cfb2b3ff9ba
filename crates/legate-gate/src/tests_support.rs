//! Shared helpers for unit tests.

use std::sync::Arc;

use legate_core::KeyValueStore;

pub fn memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(legate_store::MemoryStore::new())
}
