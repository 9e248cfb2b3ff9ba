//! Period-bucketed usage counters.
//!
//! Counters are keyed by `(feature, period bucket)` — calendar date for
//! daily quotas, ISO week for weekly ones — so usage naturally resets at
//! period boundaries without an explicit rollover job. Reads degrade to
//! zero when storage is unavailable.

use std::sync::Arc;

use tracing::warn;

use legate_core::defaults::KEY_USAGE_PREFIX;
use legate_core::{Clock, GatedFeature, KeyValueStore, Period, PeriodBucket, Result};

/// Tracks gated-feature invocations within the current period.
#[derive(Clone)]
pub struct UsageCounters {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl UsageCounters {
    /// Create counters over the given store and time source.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Storage key for a feature's counter in a given bucket.
    fn counter_key(feature: GatedFeature, bucket: &PeriodBucket) -> String {
        format!("{}:{}:{}", KEY_USAGE_PREFIX, feature.slug(), bucket.key())
    }

    /// Invocations of `feature` within the current period bucket.
    ///
    /// Absent counters read as zero; so do unavailable storage and corrupt
    /// values (logged at WARN). [`Period::Unlimited`] always reads zero.
    pub async fn count(&self, feature: GatedFeature, period: Period) -> u32 {
        let Some(bucket) = period.bucket(self.clock.now()) else {
            return 0;
        };
        let key = Self::counter_key(feature, &bucket);

        match self.store.get(&key).await {
            Ok(Some(raw)) => match raw.parse::<u32>() {
                Ok(count) => count,
                Err(_) => {
                    warn!(
                        subsystem = "usage",
                        component = "counters",
                        op = "count",
                        store_key = %key,
                        "Corrupt usage counter value; reading as zero"
                    );
                    0
                }
            },
            Ok(None) => 0,
            Err(e) => {
                warn!(
                    subsystem = "usage",
                    component = "counters",
                    op = "count",
                    store_key = %key,
                    error = %e,
                    "Storage unavailable; reading usage as zero"
                );
                0
            }
        }
    }

    /// Record one invocation of `feature` in the current period bucket.
    ///
    /// No-op for [`Period::Unlimited`]. Uses the store's atomic increment
    /// so concurrent invocations from multiple devices all land.
    pub async fn record(&self, feature: GatedFeature, period: Period) -> Result<u32> {
        let Some(bucket) = period.bucket(self.clock.now()) else {
            return Ok(0);
        };
        let key = Self::counter_key(feature, &bucket);
        let count = self.store.increment(&key, 1).await?;
        Ok(u32::try_from(count).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use legate_core::ManualClock;

    use crate::tests_support::memory_store;

    fn counters(clock: &ManualClock) -> UsageCounters {
        UsageCounters::new(memory_store(), Arc::new(clock.clone()))
    }

    fn aug_6() -> ManualClock {
        ManualClock::at(Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn fresh_counter_reads_zero() {
        let clock = aug_6();
        let usage = counters(&clock);
        assert_eq!(
            usage.count(GatedFeature::VoiceAssistant, Period::Week).await,
            0
        );
    }

    #[tokio::test]
    async fn record_then_count_within_same_bucket() {
        let clock = aug_6();
        let usage = counters(&clock);

        usage
            .record(GatedFeature::VoiceAssistant, Period::Day)
            .await
            .unwrap();
        usage
            .record(GatedFeature::VoiceAssistant, Period::Day)
            .await
            .unwrap();

        assert_eq!(
            usage.count(GatedFeature::VoiceAssistant, Period::Day).await,
            2
        );
    }

    #[tokio::test]
    async fn day_rollover_resets_daily_counter() {
        let clock = aug_6();
        let usage = counters(&clock);

        usage
            .record(GatedFeature::VoiceAssistant, Period::Day)
            .await
            .unwrap();
        assert_eq!(
            usage.count(GatedFeature::VoiceAssistant, Period::Day).await,
            1
        );

        clock.advance(Duration::days(1));
        assert_eq!(
            usage.count(GatedFeature::VoiceAssistant, Period::Day).await,
            0
        );
    }

    #[tokio::test]
    async fn week_rollover_resets_weekly_counter() {
        let clock = aug_6();
        let usage = counters(&clock);

        for _ in 0..3 {
            usage
                .record(GatedFeature::VoiceAssistant, Period::Week)
                .await
                .unwrap();
        }
        assert_eq!(
            usage.count(GatedFeature::VoiceAssistant, Period::Week).await,
            3
        );

        // 2026-08-06 is a Thursday in ISO week 32; a week later is week 33.
        clock.advance(Duration::days(7));
        assert_eq!(
            usage.count(GatedFeature::VoiceAssistant, Period::Week).await,
            0
        );
    }

    #[tokio::test]
    async fn features_have_independent_counters() {
        let clock = aug_6();
        let usage = counters(&clock);

        usage
            .record(GatedFeature::VoiceAssistant, Period::Day)
            .await
            .unwrap();

        assert_eq!(
            usage.count(GatedFeature::EmailGeneration, Period::Day).await,
            0
        );
    }

    #[tokio::test]
    async fn unlimited_period_is_a_no_op() {
        let clock = aug_6();
        let usage = counters(&clock);

        assert_eq!(
            usage
                .record(GatedFeature::VoiceAssistant, Period::Unlimited)
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            usage
                .count(GatedFeature::VoiceAssistant, Period::Unlimited)
                .await,
            0
        );
    }

    #[tokio::test]
    async fn storage_failure_reads_zero() {
        let store = legate_store::MemoryStore::new();
        store.set_failing(true);
        let clock = aug_6();
        let usage = UsageCounters::new(Arc::new(store), Arc::new(clock.clone()));

        assert_eq!(
            usage.count(GatedFeature::VoiceAssistant, Period::Week).await,
            0
        );
    }

    #[tokio::test]
    async fn corrupt_counter_reads_zero() {
        let clock = aug_6();
        let bucket = Period::Day.bucket(clock.now()).unwrap();
        let key = format!("usage:voice_assistant:{}", bucket.key());
        let store = legate_store::MemoryStore::new().with_entry(key, "three");
        let usage = UsageCounters::new(Arc::new(store), Arc::new(clock.clone()));

        assert_eq!(
            usage.count(GatedFeature::VoiceAssistant, Period::Day).await,
            0
        );
    }
}
