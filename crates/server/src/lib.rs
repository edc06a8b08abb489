//! HTTP boundary for the souq item catalog.
//!
//! Thin axum layer over `souq-core`: multipart item intake, JSON
//! list/get/search responses, and image serving with the default-image
//! fallback.

pub mod error;
pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::router;
