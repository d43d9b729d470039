//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "s3")]
pub mod s3;

pub use in_memory::{InMemoryBlobStore, InMemoryCarStore};
#[cfg(feature = "postgres")]
pub use postgres::PostgresCarStore;
#[cfg(feature = "s3")]
pub use s3::S3BlobStore;
