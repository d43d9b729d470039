//! In-memory implementations of CarStore and BlobStore for testing and development

use crate::core::car::{Car, CarFields, CarId};
use crate::core::error::{BlobStoreError, CatalogResult};
use crate::core::service::{BlobStore, CarStore, PhotoListCommit};
use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

struct CarTable {
    next_id: CarId,
    rows: BTreeMap<CarId, Car>,
}

/// In-memory car store
///
/// Ids start at 1 and are never reused, like a database sequence.
/// Uses RwLock for thread-safe access.
#[derive(Clone)]
pub struct InMemoryCarStore {
    table: Arc<RwLock<CarTable>>,
}

impl InMemoryCarStore {
    /// Create a new, empty in-memory car store
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(CarTable {
                next_id: 1,
                rows: BTreeMap::new(),
            })),
        }
    }
}

impl Default for InMemoryCarStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CarStore for InMemoryCarStore {
    async fn list(&self) -> CatalogResult<Vec<Car>> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: CarId) -> CatalogResult<Option<Car>> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(table.rows.get(&id).cloned())
    }

    async fn create(&self, fields: CarFields) -> CatalogResult<Car> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let id = table.next_id;
        table.next_id += 1;

        let car = Car::new(id, fields, Utc::now());
        table.rows.insert(id, car.clone());

        Ok(car)
    }

    async fn replace_fields(&self, id: CarId, fields: CarFields) -> CatalogResult<Option<Car>> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(car) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        car.apply_fields(fields);
        car.version += 1;

        Ok(Some(car.clone()))
    }

    async fn replace_photo_list(
        &self,
        id: CarId,
        photos: Vec<String>,
        expected_version: u64,
    ) -> CatalogResult<PhotoListCommit> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let Some(car) = table.rows.get_mut(&id) else {
            return Ok(PhotoListCommit::Missing);
        };
        if car.version != expected_version {
            return Ok(PhotoListCommit::Stale);
        }
        car.photos = photos;
        car.version += 1;

        Ok(PhotoListCommit::Committed(car.clone()))
    }

    async fn delete(&self, id: CarId) -> CatalogResult<bool> {
        let mut table = self
            .table
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(table.rows.remove(&id).is_some())
    }
}

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Bytes,
    content_type: String,
    public: bool,
}

/// In-memory object store
///
/// Public URLs are `<public_base_url>/<key>`. The store can be switched
/// offline to exercise failure paths.
#[derive(Clone)]
pub struct InMemoryBlobStore {
    public_base_url: String,
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryBlobStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            objects: Arc::new(RwLock::new(HashMap::new())),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent call fail with [`BlobStoreError::Offline`]
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects
            .read()
            .map(|o| o.contains_key(key))
            .unwrap_or(false)
    }

    pub fn is_public(&self, key: &str) -> bool {
        self.objects
            .read()
            .map(|o| o.get(key).is_some_and(|obj| obj.public))
            .unwrap_or(false)
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        let objects = self.objects.read().ok()?;
        objects.get(key).map(|obj| obj.content_type.clone())
    }

    pub fn bytes(&self, key: &str) -> Option<Bytes> {
        let objects = self.objects.read().ok()?;
        objects.get(key).map(|obj| obj.bytes.clone())
    }

    fn check_online(&self) -> Result<(), BlobStoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(BlobStoreError::Offline)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), BlobStoreError> {
        self.check_online()?;
        let mut objects = self
            .objects
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        objects.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
                public: false,
            },
        );
        Ok(())
    }

    async fn make_public(&self, key: &str) -> Result<String, BlobStoreError> {
        self.check_online()?;
        let mut objects = self
            .objects
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let object = objects.get_mut(key).ok_or_else(|| BlobStoreError::NoSuchKey {
            key: key.to_string(),
        })?;
        object.public = true;

        Ok(format!("{}/{}", self.public_base_url, key))
    }

    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError> {
        self.check_online()?;
        let objects = self
            .objects
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(objects.contains_key(key))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobStoreError> {
        self.check_online()?;
        let mut objects = self
            .objects
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        objects.remove(key);
        Ok(())
    }
}
