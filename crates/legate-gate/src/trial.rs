//! Trial window tracking.
//!
//! The trial clock derives the whole trial state from a single persisted
//! start timestamp. Malformed or future-dated timestamps are treated as if
//! no trial had started and re-initialized; storage failures degrade to
//! "no active trial" so the UI stays usable in a maximally-restricted state.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use legate_core::defaults::KEY_TRIAL_START;
use legate_core::{Clock, KeyValueStore, Result, TrialState};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Establishes and reports trial window state from a persisted start
/// timestamp.
#[derive(Clone)]
pub struct TrialClock {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    duration_days: i64,
}

impl TrialClock {
    /// Create a trial clock over the given store and time source.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, duration_days: i64) -> Self {
        Self {
            store,
            clock,
            duration_days,
        }
    }

    /// Persist `now` as the trial start if no start is recorded yet, then
    /// report the resulting state.
    ///
    /// Idempotent: while a valid timestamp exists, subsequent calls are
    /// read-only no-ops.
    pub async fn ensure_started(&self) -> TrialState {
        match self.read_start().await {
            Ok(Some(start)) => self.state_from(start),
            Ok(None) => {
                let now = self.clock.now();
                if let Err(e) = self.store.set(KEY_TRIAL_START, &now.to_rfc3339()).await {
                    warn!(
                        subsystem = "trial",
                        component = "trial_clock",
                        op = "ensure_started",
                        error = %e,
                        "Failed to persist trial start; reporting inactive"
                    );
                    return TrialState::inactive();
                }
                info!(
                    subsystem = "trial",
                    component = "trial_clock",
                    op = "ensure_started",
                    started_at = %now,
                    "Trial window opened"
                );
                self.state_from(now)
            }
            Err(()) => TrialState::inactive(),
        }
    }

    /// Report the current trial state without starting a trial.
    pub async fn state(&self) -> TrialState {
        match self.read_start().await {
            Ok(Some(start)) => self.state_from(start),
            _ => TrialState::inactive(),
        }
    }

    /// Erase the persisted trial start (account conversion or explicit
    /// reset).
    pub async fn clear(&self) -> Result<()> {
        self.store.remove(KEY_TRIAL_START).await?;
        info!(
            subsystem = "trial",
            component = "trial_clock",
            op = "clear",
            "Trial window cleared"
        );
        Ok(())
    }

    /// Read and sanity-check the persisted start timestamp.
    ///
    /// Returns `Ok(None)` when absent or unusable (after re-initializing
    /// the bad value), `Err(())` when storage itself is unavailable.
    async fn read_start(&self) -> std::result::Result<Option<DateTime<Utc>>, ()> {
        let raw = match self.store.get(KEY_TRIAL_START).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    subsystem = "trial",
                    component = "trial_clock",
                    op = "read_start",
                    error = %e,
                    "Storage unavailable; treating as no active trial"
                );
                return Err(());
            }
        };

        let Some(raw) = raw else {
            return Ok(None);
        };

        let start = match DateTime::parse_from_rfc3339(&raw) {
            Ok(parsed) => parsed.with_timezone(&Utc),
            Err(e) => {
                warn!(
                    subsystem = "trial",
                    component = "trial_clock",
                    op = "read_start",
                    error = %e,
                    "Malformed trial start timestamp; re-initializing"
                );
                let _ = self.store.remove(KEY_TRIAL_START).await;
                return Ok(None);
            }
        };

        if start > self.clock.now() {
            warn!(
                subsystem = "trial",
                component = "trial_clock",
                op = "read_start",
                started_at = %start,
                "Future-dated trial start; re-initializing"
            );
            let _ = self.store.remove(KEY_TRIAL_START).await;
            return Ok(None);
        }

        Ok(Some(start))
    }

    fn state_from(&self, started_at: DateTime<Utc>) -> TrialState {
        let expires_at = started_at + Duration::days(self.duration_days);
        let remaining_ms = (expires_at - self.clock.now()).num_milliseconds();
        let days_remaining = ((remaining_ms as f64 / MS_PER_DAY).ceil() as i64).max(0);

        TrialState {
            started_at: Some(started_at),
            expires_at: Some(expires_at),
            days_remaining,
            // An exactly-expired window counts as inactive.
            is_active: days_remaining > 0,
        }
    }
}
