//! Photo attachment lifecycle: object keys and the attach/detach protocol

pub mod keys;
pub mod manager;

pub use manager::{PhotoAttachmentManager, PhotoUpload};
