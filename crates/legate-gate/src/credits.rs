//! Credits (LEGACOIN) ledger.
//!
//! The balance is persisted as a small JSON blob compatible with what
//! earlier clients wrote, so existing balances carry over. A fresh visitor
//! receives a one-time starting grant; deductions refuse rather than going
//! negative.

use std::sync::Arc;

use tracing::{info, warn};

use legate_core::defaults::{KEY_CREDITS, STARTING_CREDITS};
use legate_core::{Clock, CreditsBalance, Error, KeyValueStore, Result};

/// Persisted credits balance with grant-once semantics.
#[derive(Clone)]
pub struct CreditsLedger {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl CreditsLedger {
    /// Create a ledger over the given store and time source.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Current balance.
    ///
    /// An absent balance triggers the one-time starting grant (persisted).
    /// Corrupt or unreadable balances fall back to the starting grant
    /// without crashing, logged at WARN.
    pub async fn balance(&self) -> CreditsBalance {
        match self.store.get(KEY_CREDITS).await {
            Ok(Some(raw)) => match serde_json::from_str::<CreditsBalance>(&raw) {
                Ok(balance) => balance,
                Err(e) => {
                    warn!(
                        subsystem = "credits",
                        component = "ledger",
                        op = "balance",
                        error = %e,
                        "Corrupt credits blob; falling back to starting grant"
                    );
                    self.starting_balance()
                }
            },
            Ok(None) => {
                let balance = self.starting_balance();
                if let Err(e) = self.persist(&balance).await {
                    warn!(
                        subsystem = "credits",
                        component = "ledger",
                        op = "balance",
                        error = %e,
                        "Failed to persist starting grant"
                    );
                } else {
                    info!(
                        subsystem = "credits",
                        component = "ledger",
                        op = "grant",
                        credits = balance.credits,
                        "Starting credits granted"
                    );
                }
                balance
            }
            Err(e) => {
                warn!(
                    subsystem = "credits",
                    component = "ledger",
                    op = "balance",
                    error = %e,
                    "Storage unavailable; reporting starting grant"
                );
                self.starting_balance()
            }
        }
    }

    /// Add credits to the balance.
    pub async fn add(&self, amount: i64) -> Result<CreditsBalance> {
        if amount < 0 {
            return Err(Error::InvalidInput(format!(
                "cannot add a negative credit amount: {}",
                amount
            )));
        }
        let mut balance = self.balance().await;
        balance.credits += amount;
        balance.last_updated = self.clock.now();
        self.persist(&balance).await?;
        Ok(balance)
    }

    /// Deduct credits if the balance covers `amount`.
    ///
    /// Returns `Ok(true)` when the deduction applied, `Ok(false)` when the
    /// balance was insufficient (the balance is left untouched).
    pub async fn deduct(&self, amount: i64) -> Result<bool> {
        if amount < 0 {
            return Err(Error::InvalidInput(format!(
                "cannot deduct a negative credit amount: {}",
                amount
            )));
        }
        let mut balance = self.balance().await;
        if balance.credits < amount {
            return Ok(false);
        }
        balance.credits -= amount;
        balance.last_updated = self.clock.now();
        self.persist(&balance).await?;
        Ok(true)
    }

    fn starting_balance(&self) -> CreditsBalance {
        CreditsBalance {
            credits: STARTING_CREDITS,
            last_updated: self.clock.now(),
        }
    }

    async fn persist(&self, balance: &CreditsBalance) -> Result<()> {
        let raw = serde_json::to_string(balance)?;
        self.store.set(KEY_CREDITS, &raw).await
    }
}
