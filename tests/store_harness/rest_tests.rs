//! REST integration test macro for car store backends.
//!
//! The `rest_integration_tests!` macro drives a `CarStore` through full HTTP
//! round-trips: JSON/multipart → handler → stores → JSON, with an in-memory
//! blob store behind the photo routes.

/// Generate a REST integration test suite for a car store backend.
///
/// `$factory` must produce a fresh `impl CarStore + 'static`.
///
/// # Generated Tests
///
/// - `test_rest_create` - POST 200, derived miles, empty photos
/// - `test_rest_get` / `test_rest_list`
/// - `test_rest_update` - PUT replaces fields, recomputes miles
/// - `test_rest_delete` - DELETE confirmation, then GET 404
/// - `test_rest_photo_lifecycle` - upload two, delete the first, list shifts
#[macro_export]
macro_rules! rest_integration_tests {
    ($factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::multipart::{MultipartForm, Part};
            use axum_test::TestServer;
            use car_finder::core::Car;
            use std::sync::Arc;

            async fn make_server() -> (TestServer, car_finder::storage::InMemoryBlobStore) {
                let store = $factory;
                let blobs = memory_blobs();
                let server = make_test_server(Arc::new(store), Arc::new(blobs.clone()));
                (server, blobs)
            }

            fn image_form(name: &str) -> MultipartForm {
                MultipartForm::new().add_part(
                    "file",
                    Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0])
                        .file_name(name)
                        .mime_type("image/jpeg"),
                )
            }

            #[tokio::test]
            async fn test_rest_create() {
                let (server, _) = make_server().await;

                let response = server.post("/cars").json(&sample_body("BMW", "320d", 100_000)).await;
                response.assert_status_ok();

                let car: Car = response.json();
                assert!(car.id > 0);
                assert_eq!(car.brand, "BMW");
                assert_eq!(car.mileage_miles, 62_137);
                assert!(car.photos.is_empty());
            }

            #[tokio::test]
            async fn test_rest_get() {
                let (server, _) = make_server().await;
                let created: Car = server.post("/cars").json(&sample_body("Audi", "A4", 0)).await.json();

                let response = server.get(&format!("/cars/{}", created.id)).await;
                response.assert_status_ok();

                let car: Car = response.json();
                assert_eq!(car.id, created.id);
                assert_eq!(car.model, "A4");
                assert_eq!(car.mileage_miles, 0);
            }

            #[tokio::test]
            async fn test_rest_list() {
                let (server, _) = make_server().await;
                server.get("/cars").await.assert_json(&serde_json::json!([]));

                let first: Car = server.post("/cars").json(&sample_body("Audi", "A4", 1)).await.json();
                let second: Car = server.post("/cars").json(&sample_body("BMW", "E46", 2)).await.json();

                let cars: Vec<Car> = server.get("/cars").await.json();
                let ids: Vec<i64> = cars.iter().map(|car| car.id).collect();
                assert_eq!(ids, vec![first.id, second.id]);
            }

            #[tokio::test]
            async fn test_rest_update() {
                let (server, _) = make_server().await;
                let created: Car = server.post("/cars").json(&sample_body("BMW", "320d", 100)).await.json();

                let response = server
                    .put(&format!("/cars/{}", created.id))
                    .json(&sample_body("BMW", "330i", 2000))
                    .await;
                response.assert_status_ok();

                let car: Car = response.json();
                assert_eq!(car.id, created.id);
                assert_eq!(car.model, "330i");
                assert_eq!(car.mileage_miles, 1242);

                let fetched: Car = server.get(&format!("/cars/{}", created.id)).await.json();
                assert_eq!(fetched.model, "330i");
            }

            #[tokio::test]
            async fn test_rest_update_not_found() {
                let (server, _) = make_server().await;

                let response = server.put("/cars/424242").json(&sample_body("BMW", "330i", 1)).await;
                response.assert_status(StatusCode::NOT_FOUND);
                let body: serde_json::Value = response.json();
                assert_eq!(body["detail"], "Car not found");
            }

            #[tokio::test]
            async fn test_rest_delete() {
                let (server, _) = make_server().await;
                let created: Car = server.post("/cars").json(&sample_body("BMW", "320d", 1)).await.json();

                let response = server.delete(&format!("/cars/{}", created.id)).await;
                response.assert_status_ok();
                response.assert_json(&serde_json::json!({"message": "Car deleted successfully"}));

                server
                    .get(&format!("/cars/{}", created.id))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
                server
                    .delete(&format!("/cars/{}", created.id))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_rest_photo_lifecycle() {
                let (server, blobs) = make_server().await;
                let created: Car = server.post("/cars").json(&sample_body("BMW", "320d", 1)).await.json();
                let photos_path = format!("/cars/{}/photos", created.id);

                let first: serde_json::Value =
                    server.post(&photos_path).multipart(image_form("front.jpg")).await.json();
                let second: serde_json::Value =
                    server.post(&photos_path).multipart(image_form("back.jpg")).await.json();
                let first_url = first["photo_url"].as_str().unwrap().to_string();
                let second_url = second["photo_url"].as_str().unwrap().to_string();
                assert_eq!(blobs.len(), 2);

                let car: Car = server.get(&format!("/cars/{}", created.id)).await.json();
                assert_eq!(car.photos, vec![first_url.clone(), second_url.clone()]);

                server
                    .delete(&format!("{photos_path}/0"))
                    .await
                    .assert_json(&serde_json::json!({"message": "Photo deleted successfully"}));

                let car: Car = server.get(&format!("/cars/{}", created.id)).await.json();
                assert_eq!(car.photos, vec![second_url]);
                assert!(!blobs.contains(key_of(&first_url)));
                assert_eq!(blobs.len(), 1);
            }
        }
    };
}
