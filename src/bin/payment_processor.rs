use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dotenvy::dotenv;
use tracing_subscriber::{fmt, EnvFilter};

use pupfuel_backend::config;
use pupfuel_backend::store::{JsonFileStore, SharedStore};
use pupfuel_backend::subscriptions::{process_payments, PaymentOutcome};

/// One-shot `payment:process` entry point: runs a single billing batch over
/// all subscriptions and exits. Intended to be scheduled externally.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();
    dotenv().ok();

    let store: SharedStore =
        Arc::new(JsonFileStore::open(config::DATABASE_PATH.as_str()).await?);
    let gateway_delay = Duration::from_millis(*config::PAYMENT_GATEWAY_DELAY_MS);

    tracing::info!("processing payments");
    let processed = process_payments(store, Utc::now(), gateway_delay).await?;

    let mut charged = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;
    for item in &processed {
        match &item.outcome {
            PaymentOutcome::Charged { .. } => charged += 1,
            PaymentOutcome::Skipped { .. } => skipped += 1,
            PaymentOutcome::Failed { error } => {
                failed += 1;
                tracing::error!(
                    subscription = %item.subscription_id,
                    dog = %item.dog_name,
                    error,
                    "payment failed"
                );
            }
        }
    }
    tracing::info!(charged, skipped, failed, "payment batch complete");

    Ok(())
}
