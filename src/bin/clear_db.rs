use dotenvy::dotenv;
use tracing_subscriber::{fmt, EnvFilter};

use pupfuel_backend::config;
use pupfuel_backend::onboarding;
use pupfuel_backend::store::{JsonFileStore, RecordStore};
use pupfuel_backend::subscriptions::{PAYMENTS, SUBSCRIPTIONS};

/// Maintenance command: resets every collection to empty.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();
    dotenv().ok();

    let store = JsonFileStore::open(config::DATABASE_PATH.as_str()).await?;
    for collection in [onboarding::COLLECTION, SUBSCRIPTIONS, PAYMENTS] {
        store.write(collection, Vec::new()).await?;
    }
    tracing::info!("database cleared");

    Ok(())
}
