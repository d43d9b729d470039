//! ServerBuilder for fluent API to build the HTTP server

use super::router::{build_car_routes, build_meta_routes, with_middleware};
use crate::cars::AppState;
use crate::config::{AppConfig, PhotoSettings};
use crate::core::service::{BlobStore, CarStore};
use crate::photos::PhotoAttachmentManager;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder wiring the record store and blob store into a router
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_car_store(InMemoryCarStore::new())
///     .with_blob_store(InMemoryBlobStore::new("http://localhost/photos"))
///     .build()?;
/// ```
pub struct ServerBuilder {
    car_store: Option<Arc<dyn CarStore>>,
    blob_store: Option<Arc<dyn BlobStore>>,
    photo_settings: PhotoSettings,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            car_store: None,
            blob_store: None,
            photo_settings: PhotoSettings::default(),
            custom_routes: Vec::new(),
        }
    }

    /// Set the car record store (required)
    pub fn with_car_store(self, store: impl CarStore + 'static) -> Self {
        self.with_shared_car_store(Arc::new(store))
    }

    /// Set an already shared car record store
    pub fn with_shared_car_store(mut self, store: Arc<dyn CarStore>) -> Self {
        self.car_store = Some(store);
        self
    }

    /// Set the photo blob store (required)
    pub fn with_blob_store(self, store: impl BlobStore + 'static) -> Self {
        self.with_shared_blob_store(Arc::new(store))
    }

    /// Set an already shared photo blob store
    pub fn with_shared_blob_store(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.blob_store = Some(store);
        self
    }

    /// Override the blob-call timeout and commit retry budget
    pub fn with_photo_settings(mut self, settings: PhotoSettings) -> Self {
        self.photo_settings = settings;
        self
    }

    /// Take the photo settings from a loaded configuration
    pub fn with_config(self, config: &AppConfig) -> Self {
        self.with_photo_settings(config.storage.photo_settings())
    }

    /// Add routes outside the catalog (merged before middleware is applied)
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the final router
    pub fn build(mut self) -> Result<Router> {
        let cars = self
            .car_store
            .take()
            .ok_or_else(|| anyhow::anyhow!("CarStore is required. Call .with_car_store()"))?;
        let blobs = self
            .blob_store
            .take()
            .ok_or_else(|| anyhow::anyhow!("BlobStore is required. Call .with_blob_store()"))?;

        let state = AppState {
            photos: PhotoAttachmentManager::new(cars.clone(), blobs, self.photo_settings),
            cars,
        };

        let mut app = build_meta_routes().merge(build_car_routes(state));
        for routes in self.custom_routes {
            app = app.merge(routes);
        }

        Ok(with_middleware(app))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
