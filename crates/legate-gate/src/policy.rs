//! Feature policy tables.
//!
//! Total, side-effect-free mappings from `(Tier, feature)` to concrete
//! policy records. Totality is carried by exhaustive matches over the
//! three-variant tier enum — there is no missing-key failure mode.

use legate_core::defaults;
use legate_core::{GatedFeature, PlanningPolicy, Quota, QuotaPolicy, Tier};

use crate::modes::AiMode;

/// Voice assistant quota per tier.
///
/// Free visitors get a weekly allowance, trial/logged-in users a daily one,
/// premium is uncapped.
pub fn voice_policy(tier: Tier) -> QuotaPolicy {
    match tier {
        Tier::Free => QuotaPolicy {
            limit: Quota::Limited(defaults::VOICE_LIMIT_FREE_PER_WEEK),
            period: legate_core::Period::Week,
        },
        Tier::LoggedIn => QuotaPolicy {
            limit: Quota::Limited(defaults::VOICE_LIMIT_LOGGED_IN_PER_DAY),
            period: legate_core::Period::Day,
        },
        Tier::Premium => QuotaPolicy::unlimited(),
    }
}

/// Planning feature flags and task cap per tier.
pub fn planning_policy(tier: Tier) -> PlanningPolicy {
    match tier {
        Tier::Free => PlanningPolicy {
            calendar: true,
            tasks: true,
            timeline: false,
            edit_events: false,
            delete_events: false,
            max_tasks: Quota::Limited(defaults::MAX_TASKS_FREE),
            description: "Limited to 5 tasks, view-only mode",
        },
        Tier::LoggedIn => PlanningPolicy {
            calendar: true,
            tasks: true,
            timeline: true,
            edit_events: true,
            delete_events: true,
            max_tasks: Quota::Limited(defaults::MAX_TASKS_LOGGED_IN),
            description: "Full planning features during trial",
        },
        Tier::Premium => PlanningPolicy {
            calendar: true,
            tasks: true,
            timeline: true,
            edit_events: true,
            delete_events: true,
            max_tasks: Quota::Unlimited,
            description: "Unlimited planning features",
        },
    }
}

/// AI modes unavailable to the given tier.
///
/// This is the single authoritative derivation: privileged tiers see no
/// restrictions, everyone else is locked out of every mode except the
/// general assistant. Banner and mode-selector UIs must both consult this
/// function rather than re-deriving restrictions from trial state.
pub fn restricted_modes(tier: Tier) -> &'static [AiMode] {
    match tier {
        Tier::Free => &[
            AiMode::Education,
            AiMode::Coding,
            AiMode::Reflection,
            AiMode::Planning,
            AiMode::Image,
            AiMode::Video,
        ],
        Tier::LoggedIn | Tier::Premium => &[],
    }
}

/// Quota policy for any gated feature.
///
/// Tier-locked features (everything except voice, which is quota-based)
/// are expressed as a zero limit so this table is total over every
/// `(feature, tier)` pair and the gate can distinguish "requires login"
/// from "limit reached".
pub fn quota_policy(feature: GatedFeature, tier: Tier) -> QuotaPolicy {
    match feature {
        GatedFeature::VoiceAssistant => voice_policy(tier),
        GatedFeature::EmailGeneration
        | GatedFeature::Automations
        | GatedFeature::ImageGeneration
        | GatedFeature::VideoAnalysis => match tier {
            Tier::Free => QuotaPolicy::locked(),
            Tier::LoggedIn | Tier::Premium => QuotaPolicy::unlimited(),
        },
    }
}
