use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::store::SharedStore;

use super::models::Subscription;
use super::service::{PaymentLedger, SubscriptionService};

pub const BILLING_PERIOD_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentOutcome {
    Charged { payment_id: Uuid, amount: f64 },
    Skipped { days_since_last_payment: i64 },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPayment {
    pub subscription_id: Uuid,
    pub dog_name: String,
    pub outcome: PaymentOutcome,
}

/// Walks every active subscription once and charges those due. Per-item
/// failures are logged, recorded in the returned outcome list and never abort
/// the batch; only the initial fetch can fail the run as a whole. There is no
/// locking between overlapping runs, so two batches racing within a day can
/// double-bill.
pub async fn process_payments(
    store: SharedStore,
    now: DateTime<Utc>,
    gateway_delay: Duration,
) -> Result<Vec<ProcessedPayment>> {
    let subscriptions = SubscriptionService::new(store.clone());
    let ledger = PaymentLedger::new(store);

    let active: Vec<Subscription> = subscriptions
        .list()
        .await?
        .into_iter()
        .filter(Subscription::is_active)
        .collect();

    let mut processed = Vec::with_capacity(active.len());
    for subscription in active {
        let outcome =
            match charge_if_due(&subscriptions, &ledger, &subscription, now, gateway_delay).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(
                        ?err,
                        subscription = %subscription.id,
                        "failed to process payment"
                    );
                    PaymentOutcome::Failed {
                        error: err.to_string(),
                    }
                }
            };
        processed.push(ProcessedPayment {
            subscription_id: subscription.id,
            dog_name: subscription.dog_name.clone(),
            outcome,
        });
    }

    Ok(processed)
}

async fn charge_if_due(
    subscriptions: &SubscriptionService,
    ledger: &PaymentLedger,
    subscription: &Subscription,
    now: DateTime<Utc>,
    gateway_delay: Duration,
) -> Result<PaymentOutcome, AppError> {
    // A never-billed subscription counts from the epoch and is always due.
    let last_payment = subscription
        .last_payment_date
        .unwrap_or(DateTime::UNIX_EPOCH);
    let days_since_last_payment = (now - last_payment).num_days();

    if days_since_last_payment < BILLING_PERIOD_DAYS {
        info!(
            subscription = %subscription.id,
            days_since_last_payment,
            "skipping payment, not due yet"
        );
        return Ok(PaymentOutcome::Skipped {
            days_since_last_payment,
        });
    }

    // Simulated gateway round-trip; the stub never declines.
    sleep(gateway_delay).await;

    let payment = ledger.append(subscription.id, subscription.price).await?;
    subscriptions
        .record_last_payment(subscription.id, payment.processed_at)
        .await?;

    info!(
        subscription = %subscription.id,
        dog = %subscription.dog_name,
        amount = subscription.price,
        "processed payment"
    );
    Ok(PaymentOutcome::Charged {
        payment_id: payment.id,
        amount: payment.amount,
    })
}
