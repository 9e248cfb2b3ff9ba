//! Tier resolution.
//!
//! Classifies the current actor into exactly one [`Tier`] from the trial
//! state and the opaque session booleans. Pure — no side effects, no I/O
//! beyond the already-fetched inputs.

use legate_core::{GateDecision, Quota, Session, Tier, TrialState};

/// Resolve the actor's tier.
///
/// A confirmed paid subscriber is `premium`. Otherwise an active trial
/// grants `logged-in`-equivalent privileges — including for authenticated
/// accounts without a subscription. Everyone else, including an
/// authenticated user whose trial has expired, is `free`.
pub fn resolve_tier(trial: &TrialState, session: &Session) -> Tier {
    if session.is_authenticated && session.is_paid_subscriber {
        Tier::Premium
    } else if trial.is_active {
        Tier::LoggedIn
    } else {
        Tier::Free
    }
}

/// Check a tier against a required tier, producing a decision with the
/// appropriate upgrade copy when access is denied.
pub fn require_tier(tier: Tier, required: Tier) -> GateDecision {
    if tier.meets(required) {
        return GateDecision::allow(Quota::Unlimited);
    }

    let message = match required {
        Tier::Premium => "This feature is only available with a premium subscription.",
        _ => "Please create an account to access this feature.",
    };
    GateDecision::deny(Quota::Limited(0), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn active_trial() -> TrialState {
        TrialState {
            started_at: Some(Utc::now()),
            expires_at: Some(Utc::now() + chrono::Duration::days(3)),
            days_remaining: 3,
            is_active: true,
        }
    }

    #[test]
    fn paid_subscriber_is_premium() {
        assert_eq!(
            resolve_tier(&TrialState::inactive(), &Session::subscriber()),
            Tier::Premium
        );
        // Even with an active trial, the subscription wins.
        assert_eq!(
            resolve_tier(&active_trial(), &Session::subscriber()),
            Tier::Premium
        );
    }

    #[test]
    fn active_trial_grants_logged_in_even_when_anonymous() {
        assert_eq!(
            resolve_tier(&active_trial(), &Session::anonymous()),
            Tier::LoggedIn
        );
    }

    #[test]
    fn authenticated_without_subscription_follows_trial() {
        assert_eq!(
            resolve_tier(&active_trial(), &Session::authenticated()),
            Tier::LoggedIn
        );
        // Expired trial collapses to free, same as an anonymous visitor.
        assert_eq!(
            resolve_tier(&TrialState::inactive(), &Session::authenticated()),
            Tier::Free
        );
    }

    #[test]
    fn anonymous_without_trial_is_free() {
        assert_eq!(
            resolve_tier(&TrialState::inactive(), &Session::anonymous()),
            Tier::Free
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let trial = active_trial();
        let session = Session::authenticated();
        let first = resolve_tier(&trial, &session);
        for _ in 0..10 {
            assert_eq!(resolve_tier(&trial, &session), first);
        }
    }

    #[test]
    fn require_tier_allows_equal_and_higher() {
        assert!(require_tier(Tier::LoggedIn, Tier::LoggedIn).allowed);
        assert!(require_tier(Tier::Premium, Tier::LoggedIn).allowed);
        assert!(require_tier(Tier::Premium, Tier::Premium).allowed);
    }

    #[test]
    fn require_tier_denies_with_login_copy() {
        let decision = require_tier(Tier::Free, Tier::LoggedIn);
        assert!(!decision.allowed);
        assert!(decision.message.unwrap().contains("create an account"));
    }

    #[test]
    fn require_tier_denies_with_premium_copy() {
        let decision = require_tier(Tier::LoggedIn, Tier::Premium);
        assert!(!decision.allowed);
        assert!(decision.message.unwrap().contains("premium subscription"));
    }
}
