//! Walk a visitor through the gating lifecycle on an in-memory store.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example gate_demo
//! ```

use std::sync::Arc;

use legate_core::{GatedFeature, Session, SystemClock};
use legate_gate::{CreditsLedger, Gate, GateConfig};
use legate_store::MemoryStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let clock = Arc::new(SystemClock);
    let gate = Gate::new(store.clone(), clock.clone(), GateConfig::from_env());

    let trial = gate.trial().ensure_started().await;
    println!(
        "trial active: {} ({} days remaining)",
        trial.is_active, trial.days_remaining
    );

    let session = Session::anonymous();
    let tier = gate.resolve(&session).await;
    println!("resolved tier: {}", tier);

    for attempt in 1..=3 {
        let decision = gate.evaluate(GatedFeature::VoiceAssistant, tier).await;
        println!(
            "voice attempt {}: allowed={} remaining={} {}",
            attempt,
            decision.allowed,
            decision.remaining,
            decision.message.as_deref().unwrap_or("")
        );
        if decision.allowed {
            // The capture succeeded; consume a use.
            gate.commit(GatedFeature::VoiceAssistant, tier).await;
        }
    }

    let ledger = CreditsLedger::new(store, clock);
    let balance = ledger.balance().await;
    println!("credits: {}", balance.credits);
}
