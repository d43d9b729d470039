use anyhow::Context;
use car_finder::config::AppConfig;
use car_finder::core::service::{BlobStore, CarStore};
use car_finder::server::ServerBuilder;
use car_finder::storage::InMemoryCarStore;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("CAR_FINDER_CONFIG").ok();
    let config =
        AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = config_path.as_deref().unwrap_or("<defaults>"),
        "Starting Car Finder API"
    );

    let cars = car_store(&config).await?;
    let blobs = blob_store(&config).await;

    ServerBuilder::new()
        .with_shared_car_store(cars)
        .with_shared_blob_store(blobs)
        .with_config(&config)
        .serve(&config.bind_address())
        .await
}

#[cfg(feature = "postgres")]
async fn car_store(config: &AppConfig) -> anyhow::Result<Arc<dyn CarStore>> {
    use car_finder::storage::postgres::{PostgresCarStore, ensure_schema};
    use sqlx::postgres::PgPoolOptions;

    let Some(url) = config.database.url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, cars are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryCarStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(url)
        .await
        .context("Failed to connect to database")?;
    ensure_schema(&pool).await?;

    tracing::info!("Connected to PostgreSQL");
    Ok(Arc::new(PostgresCarStore::new(pool)))
}

#[cfg(not(feature = "postgres"))]
async fn car_store(config: &AppConfig) -> anyhow::Result<Arc<dyn CarStore>> {
    if config.database.url.is_some() {
        tracing::warn!("DATABASE_URL is set but the postgres feature is disabled");
    }
    tracing::warn!("Using in-memory car store, cars are lost on restart");
    Ok(Arc::new(InMemoryCarStore::new()))
}

#[cfg(feature = "s3")]
async fn blob_store(config: &AppConfig) -> Arc<dyn BlobStore> {
    use car_finder::storage::S3BlobStore;

    tracing::info!(bucket = %config.storage.bucket, "Using S3-compatible photo bucket");
    Arc::new(S3BlobStore::from_env(&config.storage.bucket, &config.storage.public_base_url).await)
}

#[cfg(not(feature = "s3"))]
async fn blob_store(config: &AppConfig) -> Arc<dyn BlobStore> {
    use car_finder::storage::InMemoryBlobStore;

    tracing::warn!("Using in-memory photo store, photos are lost on restart");
    Arc::new(InMemoryBlobStore::new(config.bucket_url()))
}
