//! Typed error handling for the car catalog
//!
//! Every failure surfaced by the service is one of the categories below, so
//! callers can match on the exact case instead of inspecting strings.
//!
//! # Error Categories
//!
//! - [`CarError`]: the car, or a photo position on it, does not exist, or a
//!   concurrent photo mutation could not be reconciled
//! - [`ValidationError`]: the request itself is malformed
//! - [`StorageError`]: the blob store or the record store failed
//! - [`ConfigError`]: configuration could not be loaded
//!
//! # Example
//!
//! ```rust,ignore
//! match manager.detach_photo(car_id, index).await {
//!     Ok(()) => {}
//!     Err(CatalogError::Car(CarError::PhotoNotFound { .. })) => {
//!         // stale index, refresh the car and try again
//!     }
//!     Err(e) => return Err(e),
//! }
//! ```

use crate::core::car::CarId;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type of the catalog service
#[derive(Debug)]
pub enum CatalogError {
    /// Car or photo lookups and photo-list reconciliation
    Car(CarError),

    /// Malformed request input
    Validation(ValidationError),

    /// Blob store or record store failures
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Car(e) => write!(f, "{}", e),
            CatalogError::Validation(e) => write!(f, "{}", e),
            CatalogError::Storage(e) => write!(f, "{}", e),
            CatalogError::Config(e) => write!(f, "{}", e),
            CatalogError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Car(e) => Some(e),
            CatalogError::Validation(e) => Some(e),
            CatalogError::Storage(e) => Some(e),
            CatalogError::Config(e) => Some(e),
            CatalogError::Internal(_) => None,
        }
    }
}

/// Error body returned to HTTP clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub detail: String,
}

impl CatalogError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Car(e) => e.status_code(),
            CatalogError::Validation(e) => e.status_code(),
            CatalogError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::Car(e) => e.error_code(),
            CatalogError::Validation(e) => e.error_code(),
            CatalogError::Storage(e) => e.error_code(),
            CatalogError::Config(_) => "CONFIG_ERROR",
            CatalogError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            detail: self.to_string(),
        }
    }

    /// Shorthand for [`CarError::NotFound`]
    pub fn car_not_found(id: CarId) -> Self {
        CatalogError::Car(CarError::NotFound { id })
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        } else {
            tracing::warn!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Car Errors
// =============================================================================

/// Errors about a car or a position in its photo list
#[derive(Debug)]
pub enum CarError {
    /// No car with this id
    NotFound { id: CarId },

    /// Photo index outside `[0, len)`
    PhotoNotFound { car_id: CarId, index: i64 },

    /// The photo list kept changing underneath every commit attempt
    Conflict { id: CarId, attempts: u32 },
}

impl fmt::Display for CarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarError::NotFound { .. } => write!(f, "Car not found"),
            CarError::PhotoNotFound { .. } => write!(f, "Photo not found"),
            CarError::Conflict { id, attempts } => write!(
                f,
                "Photo list of car {} changed concurrently; gave up after {} attempts",
                id, attempts
            ),
        }
    }
}

impl std::error::Error for CarError {}

impl CarError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CarError::NotFound { .. } => StatusCode::NOT_FOUND,
            CarError::PhotoNotFound { .. } => StatusCode::NOT_FOUND,
            CarError::Conflict { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            CarError::NotFound { .. } => "CAR_NOT_FOUND",
            CarError::PhotoNotFound { .. } => "PHOTO_NOT_FOUND",
            CarError::Conflict { .. } => "PHOTO_LIST_CONFLICT",
        }
    }
}

impl From<CarError> for CatalogError {
    fn from(err: CarError) -> Self {
        CatalogError::Car(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to request input
#[derive(Debug)]
pub enum ValidationError {
    /// Declared content type is not `image/*`
    NotAnImage { content_type: String },

    /// JSON body missing, malformed or of the wrong shape
    InvalidBody { message: String },

    /// Path segment could not be parsed
    InvalidPath { parameter: String, value: String },

    /// Multipart request without a `file` part
    MissingFile,

    /// Request body over the route's size limit
    PayloadTooLarge { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotAnImage { .. } => write!(f, "File must be an image"),
            ValidationError::PayloadTooLarge { message } => {
                write!(f, "Request body too large: {}", message)
            }
            ValidationError::InvalidBody { message } => {
                write!(f, "Invalid request body: {}", message)
            }
            ValidationError::InvalidPath { parameter, value } => {
                write!(f, "Invalid value '{}' for path parameter '{}'", value, parameter)
            }
            ValidationError::MissingFile => write!(f, "Missing multipart field 'file'"),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::NotAnImage { .. } => StatusCode::BAD_REQUEST,
            ValidationError::InvalidBody { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ValidationError::InvalidPath { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ValidationError::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            ValidationError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::NotAnImage { .. } => "NOT_AN_IMAGE",
            ValidationError::InvalidBody { .. } => "INVALID_BODY",
            ValidationError::InvalidPath { .. } => "INVALID_PATH",
            ValidationError::MissingFile => "MISSING_FILE",
            ValidationError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
        }
    }
}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        CatalogError::Validation(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// The blob-store phase an error happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobOperation {
    Upload,
    Delete,
}

impl fmt::Display for BlobOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobOperation::Upload => write!(f, "upload"),
            BlobOperation::Delete => write!(f, "delete"),
        }
    }
}

/// Errors raised by the external stores
#[derive(Debug)]
pub enum StorageError {
    /// Blob store failure, including timeouts; carries the cause text
    Blob {
        operation: BlobOperation,
        message: String,
    },

    /// Record store failure
    Backend { backend: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Blob { operation, message } => {
                write!(f, "Failed to {} photo: {}", operation, message)
            }
            StorageError::Backend { backend, message } => {
                write!(f, "{} record store error: {}", backend, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::Blob { .. } => "PHOTO_STORAGE_FAILURE",
            StorageError::Backend { .. } => "RECORD_STORE_ERROR",
        }
    }

    pub fn backend(backend: &str, message: impl fmt::Display) -> Self {
        StorageError::Backend {
            backend: backend.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<StorageError> for CatalogError {
    fn from(err: StorageError) -> Self {
        CatalogError::Storage(err)
    }
}

/// Errors reported by [`BlobStore`](crate::core::service::BlobStore) backends
#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    #[error("object '{key}' does not exist")]
    NoSuchKey { key: String },

    #[error("blob store is unavailable")]
    Offline,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration or environment
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for CatalogError {
    fn from(err: ConfigError) -> Self {
        CatalogError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        CatalogError::Storage(StorageError::backend("PostgreSQL", err))
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        CatalogError::Internal(format!("{:#}", err))
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Tests
// =============================================================================
