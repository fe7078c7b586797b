use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const INITIAL_DELIVERY_DAYS: i64 = 3;
pub const DELIVERY_BUFFER_DAYS: i64 = 2;
pub const CYCLE_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub dog_name: String,
    pub status: SubscriptionStatus,
    pub meal_recommendation_id: Uuid,
    pub price: f64,
    pub portion_weight_grams: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<DateTime<Utc>>,
    /// Derived on read for active subscriptions, never persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_delivery_date: Option<DateTime<Utc>>,
    pub contents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_payment_date: Option<DateTime<Utc>>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Success,
    Failed,
}

/// Append-only charge record; many payments reference one subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub amount: f64,
    pub status: PaymentStatus,
    pub processed_at: DateTime<Utc>,
}

/// Projects the next delivery for a subscription created at `created_at`.
/// Brand-new subscriptions get their first box three days in; afterwards
/// deliveries land two buffer days past each completed 30-day cycle. Days are
/// exact 24-hour windows measured from the creation instant, with no calendar
/// or timezone normalization.
pub fn next_delivery_date(created_at: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let elapsed = now - created_at;
    if elapsed < Duration::days(INITIAL_DELIVERY_DAYS) {
        return created_at + Duration::days(INITIAL_DELIVERY_DAYS);
    }
    let cycles_elapsed = elapsed.num_days() / CYCLE_DAYS;
    created_at + Duration::days(DELIVERY_BUFFER_DAYS + (cycles_elapsed + 1) * CYCLE_DAYS)
}
