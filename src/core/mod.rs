//! Core module containing the catalog's model, store traits and errors

pub mod car;
pub mod error;
pub mod extractors;
pub mod service;

pub use car::{Car, CarFields, CarId, km_to_miles};
pub use error::{CatalogError, CatalogResult};
pub use service::{BlobStore, CarStore, PhotoListCommit};
