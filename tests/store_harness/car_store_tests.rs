//! Macro-generated test suite for `CarStore` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//!
//! use store_harness::*;
//! use car_finder::storage::InMemoryCarStore;
//!
//! car_store_tests!(InMemoryCarStore::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_and_get` - create then retrieve, derived miles and empty photos
//! - `test_get_nonexistent` - unknown id returns None
//! - `test_list_ordered_by_id` - three cars come back in id order
//! - `test_ids_not_reused` - deleting the newest car does not recycle its id
//! - `test_replace_fields_keeps_photos` - replacing fields leaves photos alone
//! - `test_replace_fields_nonexistent` - returns None
//! - `test_delete_existing` / `test_delete_nonexistent`
//!
//! ## Photo list commits
//! - `test_photo_commit_bumps_version`
//! - `test_stale_photo_commit_rejected`
//! - `test_photo_commit_on_missing_car`
//! - `test_concurrent_creates`

/// Generate a full `CarStore` conformance test suite.
///
/// `$factory` must evaluate to a fresh, empty store. It is re-evaluated for
/// each test. For the concurrent test the store must be `Clone + 'static`.
#[macro_export]
macro_rules! car_store_tests {
    ($factory:expr) => {
        mod car_store_contract_tests {
            use super::*;
            use car_finder::core::service::{CarStore, PhotoListCommit};

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let store = $factory;

                let created = store.create(sample_fields("BMW", "320d", 100_000)).await.unwrap();
                assert!(created.id > 0);
                assert_eq!(created.brand, "BMW");
                assert_eq!(created.series.as_deref(), Some("E90"));
                assert_eq!(created.mileage_miles, 62_137);
                assert!(created.photos.is_empty());
                assert_eq!(created.version, 1);

                let fetched = store.get(created.id).await.unwrap().unwrap();
                assert_eq!(fetched.id, created.id);
                assert_eq!(fetched.model, "320d");
                assert_eq!(fetched.mileage_km, 100_000);
                assert_eq!(fetched.mileage_miles, 62_137);
                assert_eq!(fetched.car_status, "odpala i jezdzi");
                assert!((fetched.price - 21500.0).abs() < f64::EPSILON);
            }

            #[tokio::test]
            async fn test_create_without_series() {
                let store = $factory;
                let mut fields = sample_fields("Fiat", "126p", 1);
                fields.series = None;

                let created = store.create(fields).await.unwrap();
                assert_eq!(created.series, None);
                assert_eq!(created.mileage_miles, 0);

                let fetched = store.get(created.id).await.unwrap().unwrap();
                assert_eq!(fetched.series, None);
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let store = $factory;
                assert!(store.get(999_999).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_list_empty() {
                let store = $factory;
                assert!(store.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_ordered_by_id() {
                let store = $factory;
                let a = store.create(sample_fields("Audi", "A4", 10)).await.unwrap();
                let b = store.create(sample_fields("BMW", "E46", 20)).await.unwrap();
                let c = store.create(sample_fields("Citroen", "C5", 30)).await.unwrap();

                let ids: Vec<i64> = store.list().await.unwrap().iter().map(|car| car.id).collect();
                assert_eq!(ids, vec![a.id, b.id, c.id]);
                assert!(a.id < b.id && b.id < c.id);
            }

            #[tokio::test]
            async fn test_ids_not_reused() {
                let store = $factory;
                let first = store.create(sample_fields("Audi", "A4", 10)).await.unwrap();
                assert!(store.delete(first.id).await.unwrap());

                let second = store.create(sample_fields("Audi", "A6", 10)).await.unwrap();
                assert_ne!(second.id, first.id);
            }

            #[tokio::test]
            async fn test_replace_fields_keeps_photos() {
                let store = $factory;
                let car = store.create(sample_fields("BMW", "320d", 1000)).await.unwrap();
                let committed = store
                    .replace_photo_list(car.id, vec!["https://x/p1.jpg".to_string()], car.version)
                    .await
                    .unwrap();
                assert!(matches!(committed, PhotoListCommit::Committed(_)));

                let updated = store
                    .replace_fields(car.id, sample_fields("BMW", "330i", 2000))
                    .await
                    .unwrap()
                    .unwrap();

                assert_eq!(updated.id, car.id);
                assert_eq!(updated.model, "330i");
                assert_eq!(updated.mileage_km, 2000);
                assert_eq!(updated.mileage_miles, 1242);
                assert_eq!(updated.photos, vec!["https://x/p1.jpg".to_string()]);
                assert_eq!(updated.created_at, car.created_at);
                assert!(updated.version > car.version + 1);
            }

            #[tokio::test]
            async fn test_replace_fields_nonexistent() {
                let store = $factory;
                let result = store
                    .replace_fields(999_999, sample_fields("BMW", "320d", 1))
                    .await
                    .unwrap();
                assert!(result.is_none());
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let store = $factory;
                let car = store.create(sample_fields("BMW", "320d", 1)).await.unwrap();

                assert!(store.delete(car.id).await.unwrap());
                assert!(store.get(car.id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let store = $factory;
                assert!(!store.delete(999_999).await.unwrap());
            }

            // ==================================================================
            // Photo list commits
            // ==================================================================

            #[tokio::test]
            async fn test_photo_commit_bumps_version() {
                let store = $factory;
                let car = store.create(sample_fields("BMW", "320d", 1)).await.unwrap();
                let photos = vec!["https://x/a.jpg".to_string(), "https://x/b.png".to_string()];

                let PhotoListCommit::Committed(updated) = store
                    .replace_photo_list(car.id, photos.clone(), car.version)
                    .await
                    .unwrap()
                else {
                    panic!("expected a committed photo list");
                };

                assert_eq!(updated.photos, photos);
                assert_eq!(updated.version, car.version + 1);
                assert_eq!(store.get(car.id).await.unwrap().unwrap().photos, photos);
            }

            #[tokio::test]
            async fn test_stale_photo_commit_rejected() {
                let store = $factory;
                let car = store.create(sample_fields("BMW", "320d", 1)).await.unwrap();

                let first = store
                    .replace_photo_list(car.id, vec!["https://x/a.jpg".to_string()], car.version)
                    .await
                    .unwrap();
                assert!(matches!(first, PhotoListCommit::Committed(_)));

                let second = store
                    .replace_photo_list(car.id, vec!["https://x/b.jpg".to_string()], car.version)
                    .await
                    .unwrap();
                assert_eq!(second, PhotoListCommit::Stale);

                let stored = store.get(car.id).await.unwrap().unwrap();
                assert_eq!(stored.photos, vec!["https://x/a.jpg".to_string()]);
            }

            #[tokio::test]
            async fn test_photo_commit_on_missing_car() {
                let store = $factory;
                let result = store
                    .replace_photo_list(999_999, vec!["https://x/a.jpg".to_string()], 1)
                    .await
                    .unwrap();
                assert_eq!(result, PhotoListCommit::Missing);
            }

            #[tokio::test]
            async fn test_fields_update_invalidates_photo_version() {
                let store = $factory;
                let car = store.create(sample_fields("BMW", "320d", 1)).await.unwrap();
                store
                    .replace_fields(car.id, sample_fields("BMW", "318i", 1))
                    .await
                    .unwrap();

                let result = store
                    .replace_photo_list(car.id, vec!["https://x/a.jpg".to_string()], car.version)
                    .await
                    .unwrap();
                assert_eq!(result, PhotoListCommit::Stale);
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_creates() {
                let store = $factory;
                let mut handles = Vec::new();

                for i in 0..10 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        store
                            .create(sample_fields("Skoda", &format!("Octavia {i}"), i))
                            .await
                            .unwrap()
                    }));
                }

                let mut ids = Vec::new();
                for handle in handles {
                    ids.push(handle.await.unwrap().id);
                }
                ids.sort();
                ids.dedup();

                assert_eq!(ids.len(), 10);
                assert_eq!(store.list().await.unwrap().len(), 10);
            }
        }
    };
}
