//! Core traits for legate abstractions.
//!
//! These traits define the collaborator interfaces the gating engine depends
//! on — a time source and a key-value persistence substrate — enabling
//! pluggable backends and deterministic testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::Result;

// =============================================================================
// CLOCK
// =============================================================================

/// Injectable time source.
///
/// Every trial-window and period-bucket computation goes through a `Clock`
/// so day/week boundaries can be tested deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for deterministic tests.
///
/// Cloning shares the underlying instant, so a clone handed to the engine
/// observes later `set`/`advance` calls.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Create a manual clock frozen at the given instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Move the clock to an absolute instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    /// Advance the clock by a duration (negative durations move it back).
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// =============================================================================
// KEY-VALUE STORE
// =============================================================================

/// Persistence substrate for trial timestamps, usage counters, and the
/// credits balance.
///
/// In a client-local deployment this wraps browser-style persistent storage;
/// server-side it is backed by per-user rows. Implementations must make
/// [`increment`](KeyValueStore::increment) atomic — concurrent increments
/// from multiple devices must not lose updates.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any existing value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Atomically add `by` to the integer counter under `key`, creating it
    /// at `by` when absent, and return the new value.
    async fn increment(&self, key: &str, by: i64) -> Result<i64>;
}
