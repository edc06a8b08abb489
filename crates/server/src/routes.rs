//! Router construction: endpoint surface, body limits, CORS, tracing.

use crate::handlers::{self, AppState};
use anyhow::Context;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::get,
};
use souq_core::AppConfig;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Multipart framing overhead allowed on top of the raw image size.
const BODY_OVERHEAD: usize = 64 * 1024;

/// Build the application router.
pub fn router(state: AppState, config: &AppConfig) -> anyhow::Result<Router> {
    let origin: HeaderValue = config
        .front_origin
        .parse()
        .with_context(|| format!("invalid front_origin: {}", config.front_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(Router::new()
        .route("/", get(handlers::root))
        .route("/items", get(handlers::list_items).post(handlers::add_item))
        .route("/items/{item_id}", get(handlers::get_item))
        .route("/search", get(handlers::search_items))
        .route("/image/{image_filename}", get(handlers::get_image))
        .layer(DefaultBodyLimit::max(config.max_image_bytes + BODY_OVERHEAD))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
