use axum::{
    routing::{get, post},
    Router,
};

use crate::{onboarding, subscriptions::api};

pub fn api_routes() -> Router {
    Router::new()
        .route("/onboarding/meal-plan", post(onboarding::calculate_meal_plan))
        .route(
            "/subscriptions",
            get(api::list_subscriptions).post(api::create_subscription),
        )
        .route(
            "/subscriptions/:id",
            get(api::get_subscription)
                .patch(api::update_subscription)
                .delete(api::cancel_subscription),
        )
}
