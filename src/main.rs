use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use tracing_subscriber::{fmt, EnvFilter};

use pupfuel_backend::config;
use pupfuel_backend::routes::api_routes;
use pupfuel_backend::store::{JsonFileStore, SharedStore};

async fn root() -> &'static str {
    "PupFuel API"
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    dotenvy::dotenv().ok();
    let store: SharedStore =
        Arc::new(JsonFileStore::open(config::DATABASE_PATH.as_str()).await?);

    let (prometheus_layer, metrics_handle) = PrometheusMetricLayer::pair();
    let app = Router::new()
        .route("/", get(root))
        .route(
            "/metrics",
            get(move || async move { metrics_handle.render() }),
        )
        .merge(api_routes())
        .layer(prometheus_layer)
        .layer(Extension(store));

    let addr: SocketAddr = format!("{}:{}", config::BIND_ADDRESS.as_str(), *config::BIND_PORT)
        .parse()
        .map_err(|error| Box::new(error) as Box<dyn std::error::Error>)?;
    tracing::info!(%addr, "Listening for incoming connections");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
