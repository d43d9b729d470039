//! Router assembly for the car catalog

use crate::cars::handlers::{
    AppState, create_car, delete_car, delete_photo, get_car, list_cars, update_car, upload_photo,
};
use axum::extract::DefaultBodyLimit;
use axum::{Json, Router, routing::get, routing::post};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build car and photo routes
///
/// - GET /cars - List cars ordered by id
/// - POST /cars - Create a car
/// - GET /cars/{id} - Get a car
/// - PUT /cars/{id} - Replace a car's writable fields
/// - DELETE /cars/{id} - Delete a car
/// - POST /cars/{id}/photos - Upload a photo (multipart `file`)
/// - DELETE /cars/{id}/photos/{index} - Remove the photo at `index`
///
/// The upload route accepts bodies up to `max_photo_bytes` instead of axum's
/// 2 MiB default.
pub fn build_car_routes(state: AppState) -> Router {
    let max_photo_bytes = state.photos.settings().max_photo_bytes;

    Router::new()
        .route("/cars", get(list_cars).post(create_car))
        .route(
            "/cars/{id}",
            get(get_car).put(update_car).delete(delete_car),
        )
        .route(
            "/cars/{id}/photos",
            post(upload_photo).layer(DefaultBodyLimit::max(max_photo_bytes)),
        )
        .route(
            "/cars/{id}/photos/{index}",
            axum::routing::delete(delete_photo),
        )
        .with_state(state)
}

/// Service banner and liveness routes
pub fn build_meta_routes() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

/// Wrap the assembled routes with request tracing and permissive CORS
pub fn with_middleware(router: Router) -> Router {
    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Car Finder API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "car-finder",
    }))
}
