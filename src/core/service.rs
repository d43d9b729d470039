//! Service traits for the record store and the blob store
//!
//! Both stores are external collaborators. The catalog only depends on these
//! traits, so backends (in-memory, PostgreSQL, S3) are chosen at wiring time.

use crate::core::car::{Car, CarFields, CarId};
use crate::core::error::{BlobStoreError, CatalogResult};
use async_trait::async_trait;
use bytes::Bytes;

/// Outcome of a conditional photo-list swap
#[derive(Debug, Clone, PartialEq)]
pub enum PhotoListCommit {
    /// The list was replaced; carries the car as stored afterwards
    Committed(Car),

    /// The car exists but its version moved on since it was read
    Stale,

    /// The car no longer exists
    Missing,
}

/// Durable store owning every [`Car`]
///
/// Implementations assign identities, derive `mileage_miles`, and guarantee
/// that a single-record write is atomic.
#[async_trait]
pub trait CarStore: Send + Sync {
    /// List every car, ordered by ascending id
    async fn list(&self) -> CatalogResult<Vec<Car>>;

    /// Get a car by id
    async fn get(&self, id: CarId) -> CatalogResult<Option<Car>>;

    /// Create a car with an empty photo list
    async fn create(&self, fields: CarFields) -> CatalogResult<Car>;

    /// Overwrite every descriptive field, leaving photos untouched
    ///
    /// Returns `None` when the car does not exist.
    async fn replace_fields(&self, id: CarId, fields: CarFields) -> CatalogResult<Option<Car>>;

    /// Swap the whole photo list, if the car is still at `expected_version`
    ///
    /// This is the only way photos are ever mutated.
    async fn replace_photo_list(
        &self,
        id: CarId,
        photos: Vec<String>,
        expected_version: u64,
    ) -> CatalogResult<PhotoListCommit>;

    /// Delete a car; returns `false` when it did not exist
    async fn delete(&self, id: CarId) -> CatalogResult<bool>;
}

/// External object storage holding photo bytes
///
/// Keys are flat object names (no directory structure).
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `bytes` under `key`, tagged with `content_type`
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), BlobStoreError>;

    /// Make the object publicly readable and return its durable public URL
    async fn make_public(&self, key: &str) -> Result<String, BlobStoreError>;

    /// Check whether an object exists
    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError>;

    /// Delete an object
    async fn delete(&self, key: &str) -> Result<(), BlobStoreError>;
}
