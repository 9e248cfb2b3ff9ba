//! Core data models for the legate gating engine.
//!
//! These types are shared across all legate crates and represent the
//! tier/trial/quota domain: who the actor is, what window they are in,
//! and what a gate decision looks like.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// TIERS
// =============================================================================

/// Privilege level governing feature access.
///
/// Exactly one tier applies at any evaluation instant; the tier is a pure
/// function of `(trial activity, authentication, subscription)` — see
/// `legate-gate`'s tier resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    /// Unauthenticated, no active trial.
    Free,
    /// Active trial, or authenticated session without a paid subscription.
    LoggedIn,
    /// Paid subscription.
    Premium,
}

impl Tier {
    /// All tiers, in ascending privilege order.
    pub fn all() -> &'static [Tier] {
        &[Tier::Free, Tier::LoggedIn, Tier::Premium]
    }

    /// Numeric rank used for required-tier comparisons.
    pub fn rank(&self) -> u8 {
        match self {
            Tier::Free => 0,
            Tier::LoggedIn => 1,
            Tier::Premium => 2,
        }
    }

    /// Whether this tier satisfies a required tier.
    pub fn meets(&self, required: Tier) -> bool {
        self.rank() >= required.rank()
    }

    /// Whether this tier carries logged-in-equivalent privileges.
    pub fn is_privileged(&self) -> bool {
        self.meets(Tier::LoggedIn)
    }

    /// Parse a tier from a string (case-insensitive, accepts underscores).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "free" => Some(Tier::Free),
            "logged-in" | "loggedin" => Some(Tier::LoggedIn),
            "premium" => Some(Tier::Premium),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Free => write!(f, "free"),
            Tier::LoggedIn => write!(f, "logged-in"),
            Tier::Premium => write!(f, "premium"),
        }
    }
}

/// Opaque authentication inputs supplied by the session collaborator.
///
/// The gating engine never inspects credentials; it only consumes these two
/// booleans alongside the trial state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub is_paid_subscriber: bool,
}

impl Session {
    /// An anonymous visitor.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated session without a paid subscription.
    pub fn authenticated() -> Self {
        Self {
            is_authenticated: true,
            is_paid_subscriber: false,
        }
    }

    /// A paid subscriber.
    pub fn subscriber() -> Self {
        Self {
            is_authenticated: true,
            is_paid_subscriber: true,
        }
    }
}

// =============================================================================
// TRIAL STATE
// =============================================================================

/// Snapshot of the trial window at one evaluation instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialState {
    /// When the trial started; `None` when no trial has been recorded.
    pub started_at: Option<DateTime<Utc>>,
    /// Derived expiry (`started_at + duration`).
    pub expires_at: Option<DateTime<Utc>>,
    /// Whole days remaining, clamped to ≥ 0.
    pub days_remaining: i64,
    /// Whether the window is still open. An exactly-expired window counts
    /// as inactive.
    pub is_active: bool,
}

impl TrialState {
    /// The state reported when no trial exists or storage is unavailable:
    /// no timestamps, zero days, inactive.
    pub fn inactive() -> Self {
        Self {
            started_at: None,
            expires_at: None,
            days_remaining: 0,
            is_active: false,
        }
    }
}

impl Default for TrialState {
    fn default() -> Self {
        Self::inactive()
    }
}

// =============================================================================
// QUOTAS AND PERIODS
// =============================================================================

/// A consumable quota: a finite count or unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quota {
    Limited(u32),
    Unlimited,
}

impl Quota {
    /// Whether this quota never runs out.
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Quota::Unlimited)
    }

    /// Remaining quota after `used` invocations, saturating at zero.
    pub fn remaining(&self, used: u32) -> Quota {
        match self {
            Quota::Limited(limit) => Quota::Limited(limit.saturating_sub(used)),
            Quota::Unlimited => Quota::Unlimited,
        }
    }

    /// Whether one more invocation is allowed after `used` so far.
    pub fn allows(&self, used: u32) -> bool {
        match self {
            Quota::Limited(limit) => used < *limit,
            Quota::Unlimited => true,
        }
    }
}

impl std::fmt::Display for Quota {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quota::Limited(n) => write!(f, "{}", n),
            Quota::Unlimited => write!(f, "inf"),
        }
    }
}

/// Recurring window a usage counter is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Resets at local-midnight boundaries (bucketed by calendar date).
    Day,
    /// Resets at the start of the ISO week.
    Week,
    /// No reset; counters are never consulted.
    Unlimited,
}

impl Period {
    /// The bucket containing `now`, or `None` for [`Period::Unlimited`].
    pub fn bucket(&self, now: DateTime<Utc>) -> Option<PeriodBucket> {
        match self {
            Period::Day => Some(PeriodBucket::Day(now.date_naive())),
            Period::Week => {
                let iso = now.iso_week();
                Some(PeriodBucket::Week {
                    year: iso.year(),
                    week: iso.week(),
                })
            }
            Period::Unlimited => None,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Day => write!(f, "day"),
            Period::Week => write!(f, "week"),
            Period::Unlimited => write!(f, "unlimited"),
        }
    }
}

/// A concrete period bucket a counter is keyed by.
///
/// Buckets make rollover implicit: a new day or ISO week produces a new key,
/// and stale buckets are simply never read again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodBucket {
    Day(NaiveDate),
    Week { year: i32, week: u32 },
}

impl PeriodBucket {
    /// Stable storage key fragment: `2026-08-06` or `2026-W32`.
    pub fn key(&self) -> String {
        match self {
            PeriodBucket::Day(date) => date.format("%Y-%m-%d").to_string(),
            PeriodBucket::Week { year, week } => format!("{}-W{:02}", year, week),
        }
    }
}

// =============================================================================
// FEATURE POLICIES
// =============================================================================

/// A capability whose availability depends on tier and/or a usage quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatedFeature {
    VoiceAssistant,
    EmailGeneration,
    Automations,
    ImageGeneration,
    VideoAnalysis,
}

impl GatedFeature {
    /// All gated features.
    pub fn all() -> &'static [GatedFeature] {
        &[
            GatedFeature::VoiceAssistant,
            GatedFeature::EmailGeneration,
            GatedFeature::Automations,
            GatedFeature::ImageGeneration,
            GatedFeature::VideoAnalysis,
        ]
    }

    /// Stable slug used in storage keys and log fields.
    pub fn slug(&self) -> &'static str {
        match self {
            GatedFeature::VoiceAssistant => "voice_assistant",
            GatedFeature::EmailGeneration => "email_generation",
            GatedFeature::Automations => "automations",
            GatedFeature::ImageGeneration => "image_generation",
            GatedFeature::VideoAnalysis => "video_analysis",
        }
    }

    /// Human-readable feature name for deny messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            GatedFeature::VoiceAssistant => "voice assistant",
            GatedFeature::EmailGeneration => "email generation",
            GatedFeature::Automations => "automations",
            GatedFeature::ImageGeneration => "image generation",
            GatedFeature::VideoAnalysis => "video analysis",
        }
    }
}

impl std::fmt::Display for GatedFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Per-tier quota policy for a rate-limited or tier-locked feature.
///
/// Tier-locked features carry a zero limit so the policy tables stay total
/// over every (feature, tier) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaPolicy {
    pub limit: Quota,
    pub period: Period,
}

impl QuotaPolicy {
    /// A policy that always denies (feature locked for this tier).
    pub fn locked() -> Self {
        Self {
            limit: Quota::Limited(0),
            period: Period::Unlimited,
        }
    }

    /// A policy that always allows.
    pub fn unlimited() -> Self {
        Self {
            limit: Quota::Unlimited,
            period: Period::Unlimited,
        }
    }
}

/// Planning feature flags and task cap for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanningPolicy {
    pub calendar: bool,
    pub tasks: bool,
    pub timeline: bool,
    pub edit_events: bool,
    pub delete_events: bool,
    pub max_tasks: Quota,
    /// Short human-readable summary shown in upgrade UI.
    pub description: &'static str,
}

impl PlanningPolicy {
    /// Whether creating one more task is permitted given `existing` tasks.
    ///
    /// A read-only tier blocks creation outright — the cap is only
    /// consulted once editing is allowed at all.
    pub fn can_create_task(&self, existing: u32) -> bool {
        self.tasks && self.edit_events && self.max_tasks.allows(existing)
    }
}

// =============================================================================
// GATE DECISIONS
// =============================================================================

/// Outcome of evaluating a gated feature for a tier.
///
/// Ephemeral — computed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    pub allowed: bool,
    pub remaining: Quota,
    /// Upgrade prompt when denied; `None` when allowed.
    pub message: Option<String>,
}

impl GateDecision {
    /// An allow decision with the given remaining quota.
    pub fn allow(remaining: Quota) -> Self {
        Self {
            allowed: true,
            remaining,
            message: None,
        }
    }

    /// A deny decision with a user-facing upgrade prompt.
    pub fn deny(remaining: Quota, message: impl Into<String>) -> Self {
        Self {
            allowed: false,
            remaining,
            message: Some(message.into()),
        }
    }
}

/// Near-limit warning level for usage display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageWarning {
    /// Quota exhausted for the current period.
    AtLimit,
    /// One use (or fewer) remaining this period.
    NearLimit { remaining: u32 },
}

// =============================================================================
// CREDITS
// =============================================================================

/// Persisted credits balance.
///
/// Serialized field names match the stored JSON blob written by earlier
/// clients (`{"credits": 5, "lastUpdated": "..."}`), so balances survive
/// the migration to this engine unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsBalance {
    pub credits: i64,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn tier_serde_uses_kebab_case() {
        assert_eq!(serde_json::to_string(&Tier::LoggedIn).unwrap(), "\"logged-in\"");
        assert_eq!(serde_json::to_string(&Tier::Free).unwrap(), "\"free\"");
        let tier: Tier = serde_json::from_str("\"premium\"").unwrap();
        assert_eq!(tier, Tier::Premium);
    }

    #[test]
    fn tier_rank_is_strictly_increasing() {
        assert!(Tier::Free.rank() < Tier::LoggedIn.rank());
        assert!(Tier::LoggedIn.rank() < Tier::Premium.rank());
    }

    #[test]
    fn tier_meets_required_tier() {
        assert!(Tier::Premium.meets(Tier::LoggedIn));
        assert!(Tier::LoggedIn.meets(Tier::LoggedIn));
        assert!(!Tier::Free.meets(Tier::LoggedIn));
        assert!(!Tier::LoggedIn.meets(Tier::Premium));
    }

    #[test]
    fn tier_from_str_loose() {
        assert_eq!(Tier::from_str_loose("FREE"), Some(Tier::Free));
        assert_eq!(Tier::from_str_loose("logged_in"), Some(Tier::LoggedIn));
        assert_eq!(Tier::from_str_loose("logged-in"), Some(Tier::LoggedIn));
        assert_eq!(Tier::from_str_loose("Premium"), Some(Tier::Premium));
        assert_eq!(Tier::from_str_loose("gold"), None);
    }

    #[test]
    fn quota_allows_below_limit_only() {
        let q = Quota::Limited(3);
        assert!(q.allows(0));
        assert!(q.allows(2));
        assert!(!q.allows(3));
        assert!(!q.allows(4));
        assert!(Quota::Unlimited.allows(u32::MAX));
    }

    #[test]
    fn quota_remaining_saturates() {
        assert_eq!(Quota::Limited(3).remaining(1), Quota::Limited(2));
        assert_eq!(Quota::Limited(3).remaining(5), Quota::Limited(0));
        assert_eq!(Quota::Unlimited.remaining(100), Quota::Unlimited);
    }

    #[test]
    fn day_bucket_key_is_calendar_date() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 15, 30, 0).unwrap();
        let bucket = Period::Day.bucket(now).unwrap();
        assert_eq!(bucket.key(), "2026-08-06");
    }

    #[test]
    fn week_bucket_key_is_iso_week() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 15, 30, 0).unwrap();
        let bucket = Period::Week.bucket(now).unwrap();
        assert_eq!(bucket.key(), "2026-W32");
    }

    #[test]
    fn iso_week_year_differs_from_calendar_year_at_boundary() {
        // 2027-01-01 falls in ISO week 53 of 2026.
        let now = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
        let bucket = Period::Week.bucket(now).unwrap();
        assert_eq!(bucket.key(), "2026-W53");
    }

    #[test]
    fn unlimited_period_has_no_bucket() {
        assert!(Period::Unlimited.bucket(Utc::now()).is_none());
    }

    #[test]
    fn consecutive_days_produce_distinct_buckets() {
        let d1 = Utc.with_ymd_and_hms(2026, 8, 6, 23, 59, 59).unwrap();
        let d2 = Utc.with_ymd_and_hms(2026, 8, 7, 0, 0, 0).unwrap();
        assert_ne!(Period::Day.bucket(d1), Period::Day.bucket(d2));
    }

    #[test]
    fn feature_slugs_are_distinct() {
        let slugs: Vec<_> = GatedFeature::all().iter().map(|f| f.slug()).collect();
        for (i, a) in slugs.iter().enumerate() {
            for b in slugs.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn credits_balance_serde_matches_stored_blob() {
        let json = r#"{"credits":5,"lastUpdated":"2026-08-06T12:00:00Z"}"#;
        let balance: CreditsBalance = serde_json::from_str(json).unwrap();
        assert_eq!(balance.credits, 5);

        let out = serde_json::to_value(&balance).unwrap();
        assert!(out.get("lastUpdated").is_some());
        assert!(out.get("last_updated").is_none());
    }

    #[test]
    fn trial_state_default_is_inactive() {
        let state = TrialState::default();
        assert!(!state.is_active);
        assert_eq!(state.days_remaining, 0);
        assert!(state.started_at.is_none());
    }
}
