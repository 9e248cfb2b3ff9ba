//! # legate-store
//!
//! Persistence backends for the legate gating engine.
//!
//! Two implementations of [`legate_core::KeyValueStore`] are provided:
//!
//! - [`MemoryStore`] — in-process store for tests and client-local
//!   deployments where the host supplies its own persistence.
//! - [`PgKeyValueStore`] — per-user rows in PostgreSQL with a
//!   single-statement atomic increment, for server-side deployments where
//!   counters are shared across a user's devices.

pub mod memory;
pub mod pool;
pub mod postgres;

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use postgres::PgKeyValueStore;
