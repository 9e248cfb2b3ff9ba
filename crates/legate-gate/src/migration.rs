//! Trial-to-account data migration.
//!
//! When a trial visitor converts to a registered account, their trial-scoped
//! conversation history and settings are copied to account-scoped keys and
//! every trial key — including the trial start timestamp — is cleared, so
//! the visitor cannot re-enter the trial window.

use tracing::info;
use uuid::Uuid;

use legate_core::defaults::{
    KEY_TRIAL_CONVERSATIONS, KEY_TRIAL_SETTINGS, KEY_TRIAL_START, MIGRATED_KEY_PREFIX,
};
use legate_core::{KeyValueStore, Result};

/// What a migration actually moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub conversations_migrated: bool,
    pub settings_migrated: bool,
}

/// Account-scoped key for a migrated blob.
fn migrated_key(user_id: Uuid, suffix: &str) -> String {
    format!("{}{}_migrated_{}", MIGRATED_KEY_PREFIX, user_id, suffix)
}

/// Move trial-scoped data to account-scoped keys and clear the trial.
///
/// Idempotent: a second call finds no trial data and clears nothing more.
pub async fn migrate_trial_data(
    store: &dyn KeyValueStore,
    user_id: Uuid,
) -> Result<MigrationReport> {
    let mut report = MigrationReport::default();

    if let Some(conversations) = store.get(KEY_TRIAL_CONVERSATIONS).await? {
        store
            .set(&migrated_key(user_id, "conversations"), &conversations)
            .await?;
        report.conversations_migrated = true;
    }

    if let Some(settings) = store.get(KEY_TRIAL_SETTINGS).await? {
        store
            .set(&migrated_key(user_id, "settings"), &settings)
            .await?;
        report.settings_migrated = true;
    }

    store.remove(KEY_TRIAL_CONVERSATIONS).await?;
    store.remove(KEY_TRIAL_SETTINGS).await?;
    store.remove(KEY_TRIAL_START).await?;

    info!(
        subsystem = "trial",
        component = "migration",
        op = "migrate",
        user_id = %user_id,
        conversations = report.conversations_migrated,
        settings = report.settings_migrated,
        "Trial data migrated to account"
    );

    Ok(report)
}
