//! Axum extractors for catalog requests
//!
//! Each extractor turns axum's own rejections into [`CatalogError`] so every
//! failure reaches the client in the same `{code, detail}` shape.

use crate::core::car::{CarFields, CarId};
use crate::core::error::{CatalogError, CatalogResult, ValidationError};
use crate::photos::PhotoUpload;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use axum::Json;

/// Content type assumed when a multipart part does not declare one
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// JSON body carrying the full writable field set of a car
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_car(
///     State(state): State<AppState>,
///     CarPayload(fields): CarPayload,
/// ) -> CatalogResult<Json<Car>> { ... }
/// ```
pub struct CarPayload(pub CarFields);

impl<S> FromRequest<S> for CarPayload
where
    S: Send + Sync,
{
    type Rejection = CatalogError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<CarFields>::from_request(req, state).await {
            Ok(Json(fields)) => Ok(CarPayload(fields)),
            Err(rejection) => Err(body_rejection(rejection.status(), rejection.body_text()).into()),
        }
    }
}

/// The `file` part of a `multipart/form-data` photo upload
pub struct PhotoForm(pub PhotoUpload);

impl<S> FromRequest<S> for PhotoForm
where
    S: Send + Sync,
{
    type Rejection = CatalogError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| body_rejection(rejection.status(), rejection.body_text()))?;

        while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
            if field.name() != Some("file") {
                continue;
            }

            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or(FALLBACK_CONTENT_TYPE)
                .to_string();
            let bytes = field.bytes().await.map_err(invalid_multipart)?;

            return Ok(PhotoForm(PhotoUpload {
                bytes,
                content_type,
                filename,
            }));
        }

        Err(ValidationError::MissingFile.into())
    }
}

fn invalid_multipart(err: axum::extract::multipart::MultipartError) -> ValidationError {
    body_rejection(err.status(), err.body_text())
}

/// Oversized bodies stay 413; every other body rejection is `InvalidBody`
fn body_rejection(status: StatusCode, message: String) -> ValidationError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::PayloadTooLarge { message }
    } else {
        ValidationError::InvalidBody { message }
    }
}

/// Parse the `{id}` path segment
pub fn parse_car_id(raw: &str) -> CatalogResult<CarId> {
    raw.parse().map_err(|_| {
        ValidationError::InvalidPath {
            parameter: "id".to_string(),
            value: raw.to_string(),
        }
        .into()
    })
}

/// Parse the `{index}` path segment
///
/// Negative values parse; range checking is the attachment manager's job.
pub fn parse_photo_index(raw: &str) -> CatalogResult<i64> {
    raw.parse().map_err(|_| {
        ValidationError::InvalidPath {
            parameter: "index".to_string(),
            value: raw.to_string(),
        }
        .into()
    })
}
