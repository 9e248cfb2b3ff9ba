//! # legate-gate
//!
//! The gating engine for the Legacy assistant: trial window tracking, tier
//! resolution, feature policy tables, period-bucketed usage counters, and
//! the gate decision point the UI consults before every gated action.
//!
//! Data flow: UI event → [`Gate::evaluate`] queries the tier resolver (which
//! queries the [`TrialClock`]) plus the [`policy`] tables and
//! [`UsageCounters`] → allow/deny. On success the UI calls [`Gate::commit`]
//! to consume quota.
//!
//! All decisions are computed defensively: storage failures degrade to
//! "no active trial" / "zero usage" and are logged, never raised into the
//! calling UI layer.

pub mod config;
pub mod credits;
pub mod gate;
pub mod migration;
pub mod modes;
pub mod policy;
pub mod tier;
pub mod trial;
pub mod usage;

#[cfg(test)]
pub(crate) mod tests_support;

pub use config::GateConfig;
pub use credits::CreditsLedger;
pub use gate::Gate;
pub use migration::{migrate_trial_data, MigrationReport};
pub use modes::{AiMode, ModeRoute, ModelProvider};
pub use policy::{planning_policy, quota_policy, restricted_modes, voice_policy};
pub use tier::{require_tier, resolve_tier};
pub use trial::TrialClock;
pub use usage::UsageCounters;
