//! HTTP surface for cars and their photos

pub mod handlers;

pub use handlers::{AppState, MessageResponse, PhotoUploadedResponse};
