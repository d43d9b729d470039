//! Photo Attachment Manager
//!
//! Coordinates the two stores behind every photo mutation:
//!
//! ```text
//! attach: get car ──▶ check content type ──▶ put + make_public ──▶ commit list + url
//! detach: get car ──▶ check index ──▶ exists? delete ──▶ commit list - url
//! ```
//!
//! A URL only enters a photo list after its blob is stored and public, and a
//! URL only leaves a photo list after its blob is gone. The converse leak (a
//! stored blob whose commit failed) is logged and left for manual cleanup.
//!
//! Commits are conditional on the version read just before, so two concurrent
//! mutations of the same car cannot silently drop each other's change.

use crate::config::PhotoSettings;
use crate::core::car::{Car, CarId};
use crate::core::error::{BlobOperation, BlobStoreError, CarError, CatalogResult, StorageError, ValidationError};
use crate::core::service::{BlobStore, CarStore, PhotoListCommit};
use crate::photos::keys::{file_extension, key_from_url, object_key};
use bytes::Bytes;
use std::future::Future;
use std::sync::Arc;

/// A photo as received from the client
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Bytes,
    /// Declared content type; trusted, bytes are not sniffed
    pub content_type: String,
    /// Declared filename, only used for its extension
    pub filename: String,
}

/// Orchestrates photo attach/detach across the record and blob stores
#[derive(Clone)]
pub struct PhotoAttachmentManager {
    cars: Arc<dyn CarStore>,
    blobs: Arc<dyn BlobStore>,
    settings: PhotoSettings,
}

impl PhotoAttachmentManager {
    pub fn new(cars: Arc<dyn CarStore>, blobs: Arc<dyn BlobStore>, settings: PhotoSettings) -> Self {
        Self {
            cars,
            blobs,
            settings,
        }
    }

    /// Upload a photo and append its public URL to the car's photo list
    ///
    /// Returns the new photo URL.
    pub async fn attach_photo(&self, car_id: CarId, upload: PhotoUpload) -> CatalogResult<String> {
        let car = self.fetch(car_id).await?;

        if !upload.content_type.starts_with("image/") {
            return Err(ValidationError::NotAnImage {
                content_type: upload.content_type,
            }
            .into());
        }

        let key = object_key(car_id, file_extension(&upload.filename));
        let url = self
            .blob_call(BlobOperation::Upload, async {
                self.blobs.put(&key, upload.bytes, &upload.content_type).await?;
                self.blobs.make_public(&key).await
            })
            .await?;

        let committed = self
            .commit_with_retry(car, |photos| {
                photos.push(url.clone());
                true
            })
            .await;

        if let Err(e) = committed {
            tracing::warn!(car_id, key = %key, error = %e, "photo stored but not committed, blob is orphaned");
            return Err(e);
        }

        tracing::info!(car_id, key = %key, "photo attached");
        Ok(url)
    }

    /// Remove the photo at `index`, deleting its blob first
    ///
    /// Indices are positional: every later photo shifts down by one.
    pub async fn detach_photo(&self, car_id: CarId, index: i64) -> CatalogResult<()> {
        let car = self.fetch(car_id).await?;

        let url = usize::try_from(index)
            .ok()
            .and_then(|i| car.photos.get(i))
            .cloned()
            .ok_or(CarError::PhotoNotFound { car_id, index })?;
        let key = key_from_url(&url).to_string();

        self.blob_call(BlobOperation::Delete, async {
            if self.blobs.exists(&key).await? {
                self.blobs.delete(&key).await
            } else {
                tracing::debug!(car_id, key = %key, "photo blob already absent");
                Ok(())
            }
        })
        .await?;

        // First attempt removes the exact position; later attempts work on a
        // re-read list where the position may have moved, so go by value.
        let mut position = usize::try_from(index).ok();
        self.commit_with_retry(car, |photos| {
            let at = position
                .take()
                .filter(|&i| photos.get(i) == Some(&url))
                .or_else(|| photos.iter().position(|p| p == &url));
            match at {
                Some(i) => {
                    photos.remove(i);
                    true
                }
                None => false,
            }
        })
        .await?;

        tracing::info!(car_id, index, key = %key, "photo detached");
        Ok(())
    }

    pub fn settings(&self) -> PhotoSettings {
        self.settings
    }

    async fn fetch(&self, car_id: CarId) -> CatalogResult<Car> {
        self.cars
            .get(car_id)
            .await?
            .ok_or_else(|| CarError::NotFound { id: car_id }.into())
    }

    /// Run a blob-store call under the configured timeout
    async fn blob_call<T>(
        &self,
        operation: BlobOperation,
        call: impl Future<Output = Result<T, BlobStoreError>>,
    ) -> CatalogResult<T> {
        let timeout = self.settings.operation_timeout;
        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(StorageError::Blob {
                operation,
                message: format!("{:#}", anyhow::Error::from(e)),
            }
            .into()),
            Err(_) => Err(StorageError::Blob {
                operation,
                message: format!("timed out after {}s", timeout.as_secs_f64()),
            }
            .into()),
        }
    }

    /// Apply `mutate` to the photo list and commit it against the version read
    ///
    /// On a stale version the car is re-read and `mutate` re-applied. When
    /// `mutate` returns `false` there is nothing left to change and the
    /// current state is accepted as-is.
    async fn commit_with_retry(
        &self,
        mut car: Car,
        mut mutate: impl FnMut(&mut Vec<String>) -> bool,
    ) -> CatalogResult<Car> {
        let car_id = car.id;
        let attempts = self.settings.max_commit_attempts.max(1);

        for attempt in 1..=attempts {
            let mut photos = std::mem::take(&mut car.photos);
            if !mutate(&mut photos) {
                car.photos = photos;
                return Ok(car);
            }

            match self.cars.replace_photo_list(car_id, photos, car.version).await? {
                PhotoListCommit::Committed(updated) => return Ok(updated),
                PhotoListCommit::Missing => return Err(CarError::NotFound { id: car_id }.into()),
                PhotoListCommit::Stale => {
                    tracing::warn!(car_id, attempt, "photo list changed concurrently, retrying");
                    car = self.fetch(car_id).await?;
                }
            }
        }

        Err(CarError::Conflict { id: car_id, attempts }.into())
    }
}
