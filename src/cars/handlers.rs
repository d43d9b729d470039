//! HTTP handlers for car and photo operations
//!
//! Handlers only translate between HTTP and the stores; the photo protocol
//! itself lives in [`PhotoAttachmentManager`].

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::error::{CatalogError, CatalogResult};
use crate::core::extractors::{CarPayload, PhotoForm, parse_car_id, parse_photo_index};
use crate::core::{Car, CarStore};
use crate::photos::PhotoAttachmentManager;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub cars: Arc<dyn CarStore>,
    pub photos: PhotoAttachmentManager,
}

/// Plain confirmation body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Response for a successful photo upload
#[derive(Debug, Serialize, Deserialize)]
pub struct PhotoUploadedResponse {
    pub message: String,
    pub photo_url: String,
}

/// GET /cars
pub async fn list_cars(State(state): State<AppState>) -> CatalogResult<Json<Vec<Car>>> {
    Ok(Json(state.cars.list().await?))
}

/// GET /cars/{id}
pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> CatalogResult<Json<Car>> {
    let id = parse_car_id(&id)?;
    let car = state
        .cars
        .get(id)
        .await?
        .ok_or_else(|| CatalogError::car_not_found(id))?;
    Ok(Json(car))
}

/// POST /cars
///
/// `photos` starts empty and `mileage_miles` is derived; neither is accepted
/// from the client.
pub async fn create_car(
    State(state): State<AppState>,
    CarPayload(fields): CarPayload,
) -> CatalogResult<Json<Car>> {
    let car = state.cars.create(fields).await?;
    tracing::info!(car_id = car.id, brand = %car.brand, model = %car.model, "car created");
    Ok(Json(car))
}

/// PUT /cars/{id}
pub async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
    CarPayload(fields): CarPayload,
) -> CatalogResult<Json<Car>> {
    let id = parse_car_id(&id)?;
    let car = state
        .cars
        .replace_fields(id, fields)
        .await?
        .ok_or_else(|| CatalogError::car_not_found(id))?;
    Ok(Json(car))
}

/// DELETE /cars/{id}
///
/// Photo blobs of the deleted car are left in the bucket.
pub async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> CatalogResult<Json<MessageResponse>> {
    let id = parse_car_id(&id)?;
    if !state.cars.delete(id).await? {
        return Err(CatalogError::car_not_found(id));
    }
    tracing::info!(car_id = id, "car deleted");
    Ok(MessageResponse::new("Car deleted successfully"))
}

/// POST /cars/{id}/photos
///
/// Expects a `multipart/form-data` body with a `file` part.
///
/// The body is extracted before the car lookup runs, so a malformed, missing
/// or oversized `file` part is reported (422/413) even when the car does not
/// exist. A well-formed upload to a missing car is a 404.
pub async fn upload_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    PhotoForm(upload): PhotoForm,
) -> CatalogResult<Json<PhotoUploadedResponse>> {
    let id = parse_car_id(&id)?;
    let photo_url = state.photos.attach_photo(id, upload).await?;
    Ok(Json(PhotoUploadedResponse {
        message: "Photo uploaded successfully".to_string(),
        photo_url,
    }))
}

/// DELETE /cars/{id}/photos/{index}
pub async fn delete_photo(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, String)>,
) -> CatalogResult<Json<MessageResponse>> {
    let id = parse_car_id(&id)?;
    let index = parse_photo_index(&index)?;
    state.photos.detach_photo(id, index).await?;
    Ok(MessageResponse::new("Photo deleted successfully"))
}
