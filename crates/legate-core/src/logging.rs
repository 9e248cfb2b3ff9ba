//! Structured logging schema and field name constants for legate.
//!
//! All crates use these constants for consistent structured logging fields.
//! This ensures log aggregation tools (Loki, Elasticsearch) can query by
//! standardized field names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (trial start/clear, migrations) |
//! | DEBUG | Decision points, policy lookups, config choices |
//! | TRACE | Per-key store reads/writes |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "gate", "trial", "usage", "credits", "store"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "trial_clock", "policy", "pg_kv", "memory_kv"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "evaluate", "commit", "ensure_started", "increment"
pub const OPERATION: &str = "op";

// ─── Gate fields ───────────────────────────────────────────────────────────

/// Resolved tier at the moment of a decision.
pub const TIER: &str = "tier";

/// Gated feature being evaluated.
pub const FEATURE: &str = "feature";

/// Period bucket key a counter was read from or written to.
pub const BUCKET: &str = "bucket";

/// Remaining quota after a decision ("inf" for unlimited).
pub const REMAINING: &str = "remaining";

/// Boolean outcome of a gate decision.
pub const ALLOWED: &str = "allowed";

// ─── Storage fields ────────────────────────────────────────────────────────

/// Key-value store key affected.
pub const STORE_KEY: &str = "store_key";

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
