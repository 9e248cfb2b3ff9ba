//! # legate-core
//!
//! Core types, traits, and abstractions for the legate gating engine.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the other legate crates depend on: the tier and trial models, feature
//! policy records, gate decisions, and the clock / key-value collaborator
//! traits that make the engine testable without a real persistence backend.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::{Clock, KeyValueStore, ManualClock, SystemClock};
