//! Server module for building the HTTP server
//!
//! `ServerBuilder` wires a record store and a blob store into the catalog
//! routes, plus the banner and health routes.

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
