//! Gating engine configuration.
//!
//! Read from environment variables at construction time. The defaults
//! reproduce the shipped product behavior (effectively-unlimited trial,
//! success-gated quota commits).

use legate_core::defaults;
use legate_core::{Error, Result};

/// Configuration for the gate decision point and trial clock.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Trial window length in days. The default is effectively unlimited;
    /// production deployments set `LEGATE_TRIAL_DAYS` to a finite,
    /// intentional value.
    pub trial_duration_days: i64,
    /// When true, quota is consumed at evaluation time rather than by an
    /// explicit [`Gate::commit`](crate::Gate::commit) after the action
    /// succeeds. This reproduces the legacy client behavior, where a failed
    /// voice capture still burned a use.
    pub eager_commit: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            trial_duration_days: defaults::TRIAL_DURATION_DAYS,
            eager_commit: false,
        }
    }
}

impl GateConfig {
    /// Load configuration from environment variables with fallback to
    /// defaults.
    ///
    /// - `LEGATE_TRIAL_DAYS` — positive integer number of trial days.
    /// - `LEGATE_EAGER_COMMIT` — `true`/`1` to consume quota on attempt.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("LEGATE_TRIAL_DAYS") {
            match val.parse::<i64>() {
                Ok(days) if days > 0 => config.trial_duration_days = days,
                _ => {
                    tracing::warn!(value = %val, "Invalid LEGATE_TRIAL_DAYS, using default");
                }
            }
        }

        if let Ok(val) = std::env::var("LEGATE_EAGER_COMMIT") {
            config.eager_commit = val == "true" || val == "1";
        }

        config
    }

    /// Set the trial duration in days.
    pub fn trial_duration_days(mut self, days: i64) -> Self {
        self.trial_duration_days = days;
        self
    }

    /// Set whether quota is consumed at evaluation time.
    pub fn eager_commit(mut self, eager: bool) -> Self {
        self.eager_commit = eager;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.trial_duration_days <= 0 {
            return Err(Error::Config(format!(
                "trial_duration_days must be positive, got {}",
                self.trial_duration_days
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_behavior() {
        let config = GateConfig::default();
        assert_eq!(config.trial_duration_days, defaults::TRIAL_DURATION_DAYS);
        assert!(!config.eager_commit);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides() {
        let config = GateConfig::default()
            .trial_duration_days(3)
            .eager_commit(true);
        assert_eq!(config.trial_duration_days, 3);
        assert!(config.eager_commit);
    }

    #[test]
    fn validate_rejects_non_positive_duration() {
        assert!(GateConfig::default()
            .trial_duration_days(0)
            .validate()
            .is_err());
        assert!(GateConfig::default()
            .trial_duration_days(-7)
            .validate()
            .is_err());
    }
}
