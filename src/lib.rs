//! # Car Finder
//!
//! A car-listing catalog served over HTTP, with photos kept in an object
//! store and referenced from each car record by public URL.
//!
//! ## Features
//!
//! - **Car CRUD**: create, list, fetch, replace and delete car records
//! - **Derived mileage**: `mileage_miles` is always `floor(mileage_km * 0.621371)`
//! - **Photo attachments**: upload to and remove from a blob store, keeping the
//!   photo list in step with the stored blobs
//! - **Optimistic concurrency**: photo-list commits are conditional on a
//!   per-car version, so concurrent photo edits never drop each other
//! - **Pluggable storage**: in-memory stores by default, PostgreSQL (`postgres`
//!   feature) and S3-compatible buckets (`s3` feature)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use car_finder::prelude::*;
//!
//! ServerBuilder::new()
//!     .with_car_store(InMemoryCarStore::new())
//!     .with_blob_store(InMemoryBlobStore::new("http://localhost:8000/photos"))
//!     .serve("127.0.0.1:8000")
//!     .await?;
//! ```

pub mod cars;
pub mod config;
pub mod core;
pub mod photos;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Car, CarFields, CarId, CatalogError, CatalogResult, km_to_miles,
        service::{BlobStore, CarStore, PhotoListCommit},
    };

    // === Photos ===
    pub use crate::photos::{PhotoAttachmentManager, PhotoUpload};

    // === Handlers ===
    pub use crate::cars::{AppState, MessageResponse, PhotoUploadedResponse};

    // === Storage ===
    pub use crate::storage::{InMemoryBlobStore, InMemoryCarStore};
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresCarStore;
    #[cfg(feature = "s3")]
    pub use crate::storage::S3BlobStore;

    // === Config ===
    pub use crate::config::{AppConfig, PhotoSettings};

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
}
