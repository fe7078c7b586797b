use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::{Extension, Router};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use pupfuel_backend::routes::api_routes;
use pupfuel_backend::store::MemoryStore;

fn app() -> Router {
    api_routes().layer(Extension(MemoryStore::shared()))
}

async fn request(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

async fn onboard(app: &Router, name: &str, weight: f64) -> Value {
    let (status, body) = request(
        app,
        Method::POST,
        "/onboarding/meal-plan",
        Some(json!({ "name": name, "age": 4, "weight": weight })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

async fn subscribe(app: &Router, recommendation_id: &str) -> Value {
    let (status, body) = request(
        app,
        Method::POST,
        "/subscriptions",
        Some(json!({ "mealRecommendationId": recommendation_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn meal_plan_prices_and_portions_by_weight() {
    let app = app();
    let plan = onboard(&app, "Rex", 10.0).await;

    assert_eq!(plan["dailyPortionGrams"], json!(200.0));
    assert_eq!(plan["monthlyAmount"], json!(6000.0));
    assert_eq!(plan["pricePerMonth"], json!(50.0));
    assert_eq!(plan["contents"].as_array().unwrap().len(), 5);
    assert!(plan["id"].is_string());
}

#[tokio::test]
async fn meal_plan_rejects_out_of_range_profile() {
    let app = app();
    let (status, _) = request(
        &app,
        Method::POST,
        "/onboarding/meal-plan",
        Some(json!({ "name": "Rex", "age": 4, "weight": 0.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn created_subscription_copies_recommendation_and_projects_delivery() {
    let app = app();
    let plan = onboard(&app, "Rex", 10.0).await;
    let subscription = subscribe(&app, plan["id"].as_str().unwrap()).await;

    assert_eq!(subscription["status"], json!("ACTIVE"));
    assert_eq!(subscription["dogName"], json!("Rex"));
    assert_eq!(subscription["price"], json!(50.0));
    // Derived field is absent on the stored record.
    assert!(subscription.get("nextDeliveryDate").is_none());

    let id = subscription["id"].as_str().unwrap();
    let (status, fetched) =
        request(&app, Method::GET, &format!("/subscriptions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(fetched["nextDeliveryDate"].is_string());
}

#[tokio::test]
async fn unknown_recommendation_yields_404_and_no_record() {
    let app = app();
    let (status, _) = request(
        &app,
        Method::POST,
        "/subscriptions",
        Some(json!({ "mealRecommendationId": "4b8f5f3e-0000-0000-0000-000000000000" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, listed) = request(&app, Method::GET, "/subscriptions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn pause_resume_and_invalid_status_transitions() {
    let app = app();
    let plan = onboard(&app, "Luna", 5.0).await;
    let subscription = subscribe(&app, plan["id"].as_str().unwrap()).await;
    let id = subscription["id"].as_str().unwrap().to_string();
    let uri = format!("/subscriptions/{id}");

    let (status, paused) = request(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "status": "PAUSED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paused["status"], json!("PAUSED"));
    assert!(paused["pausedAt"].is_string());

    let (status, resumed) = request(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "status": "ACTIVE" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(resumed.get("pausedAt").is_none());

    // Cancellation has its own operation.
    let (status, _) = request(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "status": "CANCELLED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Strings outside the known set are invalid input, not a decode failure.
    let (status, _) = request(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "status": "SUSPENDED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // And an unknown status never sticks.
    let (status, fetched) = request(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], json!("ACTIVE"));
}

#[tokio::test]
async fn cancelled_subscription_is_indistinguishable_from_absent_for_patch() {
    let app = app();
    let plan = onboard(&app, "Milo", 8.0).await;
    let subscription = subscribe(&app, plan["id"].as_str().unwrap()).await;
    let id = subscription["id"].as_str().unwrap().to_string();
    let uri = format!("/subscriptions/{id}");

    let (status, cancelled) = request(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], json!("CANCELLED"));
    assert!(cancelled["cancelledAt"].is_string());

    let (status, _) = request(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "status": "ACTIVE" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Still readable, but without the derived delivery date.
    let (status, fetched) = request(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(fetched.get("nextDeliveryDate").is_none());
}

#[tokio::test]
async fn list_orders_active_first_then_newest() {
    let app = app();
    let plan = onboard(&app, "Rex", 10.0).await;
    let recommendation_id = plan["id"].as_str().unwrap();

    let first = subscribe(&app, recommendation_id).await;
    let second = subscribe(&app, recommendation_id).await;
    let third = subscribe(&app, recommendation_id).await;

    // Cancel the newest one; actives must still sort ahead of it.
    let third_id = third["id"].as_str().unwrap();
    let (status, _) = request(
        &app,
        Method::DELETE,
        &format!("/subscriptions/{third_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, listed) = request(&app, Method::GET, "/subscriptions", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|subscription| subscription["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            second["id"].as_str().unwrap(),
            first["id"].as_str().unwrap(),
            third_id
        ]
    );
}

#[tokio::test]
async fn missing_subscription_is_404() {
    let app = app();
    let (status, _) = request(
        &app,
        Method::GET,
        "/subscriptions/4b8f5f3e-0000-0000-0000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        &app,
        Method::DELETE,
        "/subscriptions/4b8f5f3e-0000-0000-0000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
