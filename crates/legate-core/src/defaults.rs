//! Centralized default constants for the legate gating engine.
//!
//! **This module is the single source of truth** for all shared default values.
//! All crates should reference these constants instead of defining their own
//! magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// TRIAL WINDOW
// =============================================================================

/// Default trial duration in days.
///
/// The value shipped by the original product is effectively unlimited — the
/// trial never expires on its own. A production deployment that wants a real
/// bounded trial must override this via `LEGATE_TRIAL_DAYS` (see
/// `legate-gate`'s `GateConfig`); 3, 7, and 14 are the values the product
/// team has discussed.
pub const TRIAL_DURATION_DAYS: i64 = 999_999;

/// Storage key holding the trial start timestamp (RFC 3339).
pub const KEY_TRIAL_START: &str = "legacy_trial_start";

/// Storage key holding trial-scoped conversation history.
pub const KEY_TRIAL_CONVERSATIONS: &str = "trial_conversations";

/// Storage key holding trial-scoped settings.
pub const KEY_TRIAL_SETTINGS: &str = "trial_settings";

// =============================================================================
// VOICE QUOTAS
// =============================================================================

/// Voice assistant invocations per week for the free tier.
pub const VOICE_LIMIT_FREE_PER_WEEK: u32 = 3;

/// Voice assistant invocations per day for the logged-in tier.
pub const VOICE_LIMIT_LOGGED_IN_PER_DAY: u32 = 2;

/// Remaining-uses threshold at which the UI shows a near-limit warning.
pub const NEAR_LIMIT_THRESHOLD: u32 = 1;

/// Storage key prefix for usage counters. Full keys append the feature slug
/// and period bucket: `usage:voice_assistant:2026-W32`.
pub const KEY_USAGE_PREFIX: &str = "usage";

// =============================================================================
// PLANNING
// =============================================================================

/// Maximum tasks for the free tier (view-only planning).
pub const MAX_TASKS_FREE: u32 = 5;

/// Maximum tasks for the logged-in tier.
pub const MAX_TASKS_LOGGED_IN: u32 = 50;

// =============================================================================
// CREDITS
// =============================================================================

/// One-time credit grant for a fresh balance (new visitor).
pub const STARTING_CREDITS: i64 = 5;

/// Storage key holding the serialized credits balance.
pub const KEY_CREDITS: &str = "legacoin_credits";

// =============================================================================
// ACCOUNT MIGRATION
// =============================================================================

/// Key prefix for data migrated from a trial session to a full account.
/// Full keys look like `user_{id}_migrated_conversations`.
pub const MIGRATED_KEY_PREFIX: &str = "user_";
