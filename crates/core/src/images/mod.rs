//! Content-addressed image repository.
//!
//! Uploaded image bytes are stored once under a SHA-256 digest filename;
//! lookups for unknown filenames fall back to a default placeholder
//! instead of failing.

pub mod key;
pub mod store;

pub use crate::Error;

pub use store::ImageStore;
