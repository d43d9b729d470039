//! Object-key derivation for photo blobs

use crate::core::car::CarId;
use uuid::Uuid;

/// Extension used when the filename carries none
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Substring after the last `.` of `filename`, or [`DEFAULT_EXTENSION`]
pub fn file_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => DEFAULT_EXTENSION,
    }
}

/// A fresh key of the form `car_<id>_<uuid>.<ext>`
///
/// The car id is only there for humans reading the bucket; lookups go through
/// the URL stored in the photo list.
pub fn object_key(car_id: CarId, extension: &str) -> String {
    format!("car_{}_{}.{}", car_id, Uuid::new_v4(), extension)
}

/// The object key behind a public URL: its final path segment
pub fn key_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
