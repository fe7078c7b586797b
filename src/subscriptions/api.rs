use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::SharedStore;

use super::models::{Subscription, SubscriptionStatus};
use super::service::SubscriptionService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub meal_recommendation_id: Uuid,
}

/// `status` stays a raw string so an unrecognized value maps to 400 rather
/// than being rejected at deserialization.
#[derive(Debug, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub status: String,
}

fn parse_status(raw: &str) -> Option<SubscriptionStatus> {
    match raw {
        "ACTIVE" => Some(SubscriptionStatus::Active),
        "PAUSED" => Some(SubscriptionStatus::Paused),
        "CANCELLED" => Some(SubscriptionStatus::Cancelled),
        _ => None,
    }
}

pub async fn create_subscription(
    Extension(store): Extension<SharedStore>,
    Json(payload): Json<CreateSubscriptionRequest>,
) -> AppResult<(StatusCode, Json<Subscription>)> {
    let subscription = SubscriptionService::new(store)
        .create(payload.meal_recommendation_id)
        .await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

pub async fn list_subscriptions(
    Extension(store): Extension<SharedStore>,
) -> AppResult<Json<Vec<Subscription>>> {
    let subscriptions = SubscriptionService::new(store).list().await?;
    Ok(Json(subscriptions))
}

pub async fn get_subscription(
    Extension(store): Extension<SharedStore>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Subscription>> {
    let subscription = SubscriptionService::new(store).get(id).await?;
    Ok(Json(subscription))
}

pub async fn update_subscription(
    Extension(store): Extension<SharedStore>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSubscriptionRequest>,
) -> AppResult<Json<Subscription>> {
    let status = parse_status(&payload.status)
        .ok_or_else(|| AppError::BadRequest("Invalid status update".into()))?;
    let subscription = SubscriptionService::new(store)
        .set_status(id, status)
        .await?;
    Ok(Json(subscription))
}

pub async fn cancel_subscription(
    Extension(store): Extension<SharedStore>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Subscription>> {
    let subscription = SubscriptionService::new(store).cancel(id).await?;
    Ok(Json(subscription))
}
