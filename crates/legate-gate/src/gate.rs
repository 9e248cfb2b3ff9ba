//! Gate decision point.
//!
//! The single entry the rest of the system calls before performing a gated
//! action. Combines tier, feature policy, and live usage into an allow/deny
//! decision with tier-appropriate upgrade copy on deny. Decisions never
//! error for a well-formed `(feature, tier)` pair — the policy tables are
//! total and storage failures are masked behind safe defaults.

use std::sync::Arc;

use tracing::{debug, warn};

use legate_core::defaults::NEAR_LIMIT_THRESHOLD;
use legate_core::{
    Clock, GateDecision, GatedFeature, KeyValueStore, Quota, Session, Tier, UsageWarning,
};

use crate::config::GateConfig;
use crate::policy;
use crate::trial::TrialClock;
use crate::usage::UsageCounters;

/// The gate decision point, wired to a trial clock and usage counters over
/// one store/clock pair.
#[derive(Clone)]
pub struct Gate {
    trial: TrialClock,
    usage: UsageCounters,
    config: GateConfig,
}

impl Gate {
    /// Create a gate over the given store and time source.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, config: GateConfig) -> Self {
        Self {
            trial: TrialClock::new(store.clone(), clock.clone(), config.trial_duration_days),
            usage: UsageCounters::new(store, clock),
            config,
        }
    }

    /// The trial clock this gate consults.
    pub fn trial(&self) -> &TrialClock {
        &self.trial
    }

    /// Resolve the actor's tier from live trial state and the session.
    pub async fn resolve(&self, session: &Session) -> Tier {
        let trial = self.trial.state().await;
        crate::tier::resolve_tier(&trial, session)
    }

    /// Evaluate a gated feature for an already-resolved tier.
    pub async fn evaluate(&self, feature: GatedFeature, tier: Tier) -> GateDecision {
        let policy = policy::quota_policy(feature, tier);

        if policy.limit.is_unlimited() {
            return GateDecision::allow(Quota::Unlimited);
        }

        if policy.limit == Quota::Limited(0) {
            // Locked for this tier altogether; pick copy by the cheapest
            // tier that would unlock it.
            return GateDecision::deny(Quota::Limited(0), lock_message(feature, tier));
        }

        let used = self.usage.count(feature, policy.period).await;
        let remaining = policy.limit.remaining(used);
        let allowed = policy.limit.allows(used);

        debug!(
            subsystem = "gate",
            component = "decision",
            op = "evaluate",
            feature = %feature,
            tier = %tier,
            remaining = %remaining,
            allowed = allowed,
            "Gate decision"
        );

        if !allowed {
            return GateDecision::deny(
                Quota::Limited(0),
                format!(
                    "You've reached your {} limit for this {}. \
                     Upgrade to premium for unlimited access.",
                    feature.display_name(),
                    policy.period
                ),
            );
        }

        if self.config.eager_commit {
            // Legacy client behavior: attempting consumes quota even if the
            // action later fails.
            if let Err(e) = self.usage.record(feature, policy.period).await {
                warn!(
                    subsystem = "gate",
                    component = "decision",
                    op = "evaluate",
                    feature = %feature,
                    error = %e,
                    "Failed to eagerly record usage"
                );
            }
        }

        GateDecision::allow(remaining)
    }

    /// Resolve the tier and evaluate in one call, per the UI data flow.
    pub async fn evaluate_for(&self, feature: GatedFeature, session: &Session) -> GateDecision {
        let tier = self.resolve(session).await;
        self.evaluate(feature, tier).await
    }

    /// Consume one unit of quota after the gated action succeeded.
    ///
    /// Must not be called speculatively — a voice capture that errors out
    /// should not burn a use. No-op for unlimited or tier-locked policies,
    /// and under eager-commit mode (where evaluation already recorded the
    /// attempt). Storage failures are logged and masked.
    pub async fn commit(&self, feature: GatedFeature, tier: Tier) {
        if self.config.eager_commit {
            return;
        }

        let policy = policy::quota_policy(feature, tier);
        match policy.limit {
            Quota::Unlimited | Quota::Limited(0) => {}
            Quota::Limited(_) => {
                if let Err(e) = self.usage.record(feature, policy.period).await {
                    warn!(
                        subsystem = "gate",
                        component = "decision",
                        op = "commit",
                        feature = %feature,
                        tier = %tier,
                        error = %e,
                        "Failed to record usage"
                    );
                }
            }
        }
    }

    /// Near-limit warning for a decision, if any.
    ///
    /// `AtLimit` when the quota is exhausted, `NearLimit` when at most
    /// one use remains; unlimited quotas never warn.
    pub fn usage_warning(decision: &GateDecision) -> Option<UsageWarning> {
        match decision.remaining {
            Quota::Unlimited => None,
            Quota::Limited(0) => Some(UsageWarning::AtLimit),
            Quota::Limited(remaining) if remaining <= NEAR_LIMIT_THRESHOLD => {
                Some(UsageWarning::NearLimit { remaining })
            }
            Quota::Limited(_) => None,
        }
    }
}

/// Deny copy for a feature locked at this tier.
fn lock_message(feature: GatedFeature, tier: Tier) -> &'static str {
    // Find the cheapest tier that grants any access.
    let unlocked_by_login = !matches!(
        policy::quota_policy(feature, Tier::LoggedIn).limit,
        Quota::Limited(0)
    );

    if unlocked_by_login && !tier.meets(Tier::LoggedIn) {
        "Please create an account to access this feature."
    } else {
        "This feature is only available with a premium subscription."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use legate_core::ManualClock;

    use crate::tests_support::memory_store;

    fn gate(clock: &ManualClock) -> Gate {
        Gate::new(
            memory_store(),
            Arc::new(clock.clone()),
            GateConfig::default().trial_duration_days(3),
        )
    }

    fn aug_6() -> ManualClock {
        ManualClock::at(Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn premium_voice_is_unlimited_without_storage_reads() {
        let clock = aug_6();
        let store = legate_store::MemoryStore::new();
        store.set_failing(true); // would surface if evaluate touched storage
        let gate = Gate::new(
            Arc::new(store),
            Arc::new(clock.clone()),
            GateConfig::default(),
        );

        let decision = gate
            .evaluate(GatedFeature::VoiceAssistant, Tier::Premium)
            .await;
        assert!(decision.allowed);
        assert_eq!(decision.remaining, Quota::Unlimited);
        assert!(decision.message.is_none());
    }

    #[tokio::test]
    async fn free_voice_quota_exhausts_after_three_in_a_week() {
        let clock = aug_6();
        let gate = gate(&clock);

        for expected_remaining in [3u32, 2, 1] {
            let decision = gate.evaluate(GatedFeature::VoiceAssistant, Tier::Free).await;
            assert!(decision.allowed);
            assert_eq!(decision.remaining, Quota::Limited(expected_remaining));
            gate.commit(GatedFeature::VoiceAssistant, Tier::Free).await;
        }

        let fourth = gate.evaluate(GatedFeature::VoiceAssistant, Tier::Free).await;
        assert!(!fourth.allowed);
        assert_eq!(fourth.remaining, Quota::Limited(0));
        assert!(fourth.message.as_deref().unwrap().contains("this week"));
    }

    #[tokio::test]
    async fn week_rollover_restores_free_voice_quota() {
        let clock = aug_6();
        let gate = gate(&clock);

        for _ in 0..3 {
            gate.commit(GatedFeature::VoiceAssistant, Tier::Free).await;
        }
        assert!(!gate
            .evaluate(GatedFeature::VoiceAssistant, Tier::Free)
            .await
            .allowed);

        clock.advance(Duration::days(7));
        let decision = gate.evaluate(GatedFeature::VoiceAssistant, Tier::Free).await;
        assert!(decision.allowed);
        assert_eq!(decision.remaining, Quota::Limited(3));
    }

    #[tokio::test]
    async fn logged_in_voice_quota_is_daily() {
        let clock = aug_6();
        let gate = gate(&clock);

        for _ in 0..2 {
            assert!(gate
                .evaluate(GatedFeature::VoiceAssistant, Tier::LoggedIn)
                .await
                .allowed);
            gate.commit(GatedFeature::VoiceAssistant, Tier::LoggedIn).await;
        }
        assert!(!gate
            .evaluate(GatedFeature::VoiceAssistant, Tier::LoggedIn)
            .await
            .allowed);

        clock.advance(Duration::days(1));
        assert!(gate
            .evaluate(GatedFeature::VoiceAssistant, Tier::LoggedIn)
            .await
            .allowed);
    }

    #[tokio::test]
    async fn locked_feature_asks_free_tier_to_log_in() {
        let clock = aug_6();
        let gate = gate(&clock);

        let decision = gate.evaluate(GatedFeature::EmailGeneration, Tier::Free).await;
        assert!(!decision.allowed);
        assert!(decision
            .message
            .as_deref()
            .unwrap()
            .contains("create an account"));
    }

    #[tokio::test]
    async fn commit_is_success_gated_by_default() {
        let clock = aug_6();
        let gate = gate(&clock);

        // Evaluating repeatedly without committing never consumes quota.
        for _ in 0..10 {
            let decision = gate.evaluate(GatedFeature::VoiceAssistant, Tier::Free).await;
            assert_eq!(decision.remaining, Quota::Limited(3));
        }
    }

    #[tokio::test]
    async fn eager_commit_consumes_quota_on_evaluate() {
        let clock = aug_6();
        let gate = Gate::new(
            memory_store(),
            Arc::new(clock.clone()),
            GateConfig::default().eager_commit(true),
        );

        let first = gate.evaluate(GatedFeature::VoiceAssistant, Tier::Free).await;
        assert_eq!(first.remaining, Quota::Limited(3));

        // commit is a no-op in eager mode; the evaluation already recorded.
        gate.commit(GatedFeature::VoiceAssistant, Tier::Free).await;

        let second = gate.evaluate(GatedFeature::VoiceAssistant, Tier::Free).await;
        assert_eq!(second.remaining, Quota::Limited(2));
    }

    #[tokio::test]
    async fn evaluate_for_resolves_trial_tier() {
        let clock = aug_6();
        let gate = gate(&clock);

        gate.trial().ensure_started().await;

        // Active trial resolves to logged-in: daily limit of 2 applies.
        let decision = gate
            .evaluate_for(GatedFeature::VoiceAssistant, &Session::anonymous())
            .await;
        assert!(decision.allowed);
        assert_eq!(decision.remaining, Quota::Limited(2));
    }

    #[tokio::test]
    async fn storage_failure_still_produces_a_decision() {
        let clock = aug_6();
        let store = legate_store::MemoryStore::new();
        store.set_failing(true);
        let gate = Gate::new(
            Arc::new(store),
            Arc::new(clock.clone()),
            GateConfig::default(),
        );

        // Usage reads as zero, so the decision is a (permissive) allow
        // rather than a crash.
        let decision = gate.evaluate(GatedFeature::VoiceAssistant, Tier::Free).await;
        assert!(decision.allowed);
    }

    #[test]
    fn usage_warning_levels() {
        let at_limit = GateDecision::deny(Quota::Limited(0), "limit");
        assert_eq!(Gate::usage_warning(&at_limit), Some(UsageWarning::AtLimit));

        let near = GateDecision::allow(Quota::Limited(1));
        assert_eq!(
            Gate::usage_warning(&near),
            Some(UsageWarning::NearLimit { remaining: 1 })
        );

        let comfortable = GateDecision::allow(Quota::Limited(3));
        assert_eq!(Gate::usage_warning(&comfortable), None);

        let unlimited = GateDecision::allow(Quota::Unlimited);
        assert_eq!(Gate::usage_warning(&unlimited), None);
    }
}
