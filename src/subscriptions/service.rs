use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::onboarding::OnboardingService;
use crate::store::{read_records, write_records, SharedStore};

use super::models::{
    next_delivery_date, Payment, PaymentStatus, Subscription, SubscriptionStatus,
};

pub const SUBSCRIPTIONS: &str = "subscriptions";
pub const PAYMENTS: &str = "payments";

/// Owns subscription records: creation, status transitions and the derived
/// next-delivery date. All persistence is full-collection read-modify-write.
#[derive(Clone)]
pub struct SubscriptionService {
    store: SharedStore,
}

impl SubscriptionService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    async fn load(&self) -> AppResult<Vec<Subscription>> {
        Ok(read_records(self.store.as_ref(), SUBSCRIPTIONS).await?)
    }

    async fn save(&self, subscriptions: &[Subscription]) -> AppResult<()> {
        Ok(write_records(self.store.as_ref(), SUBSCRIPTIONS, subscriptions).await?)
    }

    /// Materializes an active subscription from a stored meal recommendation,
    /// copying the priced fields verbatim. The recommendation is never
    /// recomputed afterwards.
    pub async fn create(&self, meal_recommendation_id: Uuid) -> AppResult<Subscription> {
        let entry = OnboardingService::new(self.store.clone())
            .find_entry(meal_recommendation_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let subscription = Subscription {
            id: Uuid::new_v4(),
            dog_name: entry.dog_profile.name,
            status: SubscriptionStatus::Active,
            meal_recommendation_id,
            price: entry.recommendation.price_per_month,
            portion_weight_grams: entry.recommendation.daily_portion_grams,
            created_at: Utc::now(),
            cancelled_at: None,
            paused_at: None,
            next_delivery_date: None,
            contents: entry.recommendation.contents,
            last_payment_date: None,
        };

        let mut subscriptions = self.load().await?;
        subscriptions.push(subscription.clone());
        self.save(&subscriptions).await?;
        Ok(subscription)
    }

    /// Presentation order: active subscriptions first, then newest first.
    pub async fn list(&self) -> AppResult<Vec<Subscription>> {
        let mut subscriptions = self.load().await?;
        subscriptions.sort_by(|a, b| {
            b.is_active()
                .cmp(&a.is_active())
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(subscriptions)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Subscription> {
        let subscriptions = self.load().await?;
        let mut subscription = subscriptions
            .into_iter()
            .find(|subscription| subscription.id == id)
            .ok_or(AppError::NotFound)?;
        if subscription.is_active() {
            subscription.next_delivery_date =
                Some(next_delivery_date(subscription.created_at, Utc::now()));
        }
        Ok(subscription)
    }

    /// Moves a subscription between ACTIVE and PAUSED. A cancelled record is
    /// terminal and reported as absent. Re-applying the current status is
    /// permitted and re-stamps `paused_at` when pausing.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: SubscriptionStatus,
    ) -> AppResult<Subscription> {
        if !matches!(
            status,
            SubscriptionStatus::Active | SubscriptionStatus::Paused
        ) {
            return Err(AppError::BadRequest("Invalid status update".into()));
        }

        let mut subscriptions = self.load().await?;
        let subscription = subscriptions
            .iter_mut()
            .find(|subscription| {
                subscription.id == id && subscription.status != SubscriptionStatus::Cancelled
            })
            .ok_or(AppError::NotFound)?;

        subscription.status = status;
        subscription.paused_at = match status {
            SubscriptionStatus::Paused => Some(Utc::now()),
            _ => None,
        };

        let updated = subscription.clone();
        self.save(&subscriptions).await?;
        Ok(updated)
    }

    /// Legal from any prior status; cancelling an already-cancelled record
    /// just re-stamps `cancelled_at`.
    pub async fn cancel(&self, id: Uuid) -> AppResult<Subscription> {
        let mut subscriptions = self.load().await?;
        let subscription = subscriptions
            .iter_mut()
            .find(|subscription| subscription.id == id)
            .ok_or(AppError::NotFound)?;

        subscription.status = SubscriptionStatus::Cancelled;
        subscription.cancelled_at = Some(Utc::now());

        let updated = subscription.clone();
        self.save(&subscriptions).await?;
        Ok(updated)
    }

    /// Low-level primitive used by the billing batch: stamps the last payment
    /// date without checking for PAUSED, since callers filter to active
    /// subscriptions. Cancelled records are terminal and reported as absent.
    pub async fn record_last_payment(
        &self,
        id: Uuid,
        paid_at: DateTime<Utc>,
    ) -> AppResult<Subscription> {
        let mut subscriptions = self.load().await?;
        let subscription = subscriptions
            .iter_mut()
            .find(|subscription| {
                subscription.id == id && subscription.status != SubscriptionStatus::Cancelled
            })
            .ok_or(AppError::NotFound)?;

        subscription.last_payment_date = Some(paid_at);

        let updated = subscription.clone();
        self.save(&subscriptions).await?;
        Ok(updated)
    }
}

/// Append-only record of charge attempts. The simulated gateway never
/// declines, so every appended payment is a success.
#[derive(Clone)]
pub struct PaymentLedger {
    store: SharedStore,
}

impl PaymentLedger {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn append(&self, subscription_id: Uuid, amount: f64) -> AppResult<Payment> {
        let payment = Payment {
            id: Uuid::new_v4(),
            subscription_id,
            amount,
            status: PaymentStatus::Success,
            processed_at: Utc::now(),
        };

        let mut payments = self.list_all().await?;
        payments.push(payment.clone());
        write_records(self.store.as_ref(), PAYMENTS, &payments).await?;
        Ok(payment)
    }

    pub async fn list_all(&self) -> AppResult<Vec<Payment>> {
        Ok(read_records(self.store.as_ref(), PAYMENTS).await?)
    }
}
