//! Core types and persistence for the souq item-listing backend.
//!
//! This crate provides:
//! - Catalog store (items and categories) with a SQLite backend
//! - Content-addressed image repository with a default-image fallback
//! - Unified error types
//! - Configuration structures

pub mod catalog;
pub mod config;
pub mod error;
pub mod images;

pub use catalog::{CatalogDb, ItemView};
pub use config::AppConfig;
pub use error::Error;
pub use images::ImageStore;
