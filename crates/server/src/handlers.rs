//! Request handlers for the souq item API.

use crate::error::{ApiError, ApiResult};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use souq_core::{CatalogDb, ImageStore, ItemView};

/// Shared handler state: the catalog database and the image store.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogDb,
    pub images: ImageStore,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<ItemView>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keyword: String,
}

pub async fn root() -> Json<Message> {
    Json(Message { message: "Hello, world!".to_string() })
}

/// Accept a new item as a multipart form with `name`, `category`, and an
/// `image` file part. The image is stored content-addressed first, then
/// the catalog row is created referencing its key.
pub async fn add_item(State(state): State<AppState>, mut multipart: Multipart) -> ApiResult<Json<Message>> {
    let mut name: Option<String> = None;
    let mut category: Option<String> = None;
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => {
                name = Some(field.text().await.map_err(|e| ApiError::bad_request(e.to_string()))?);
            }
            Some("category") => {
                category = Some(field.text().await.map_err(|e| ApiError::bad_request(e.to_string()))?);
            }
            Some("image") => {
                let bytes = field.bytes().await.map_err(|e| ApiError::bad_request(e.to_string()))?;
                image = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ApiError::bad_request("missing form field: name"))?;
    let category = category.ok_or_else(|| ApiError::bad_request("missing form field: category"))?;
    let image = image.ok_or_else(|| ApiError::bad_request("missing form field: image"))?;
    if image.is_empty() {
        return Err(ApiError::bad_request("image upload must not be empty"));
    }

    tracing::info!(%name, %category, image_bytes = image.len(), "receive item");

    let image_key = state.images.store(&image).await?;
    let id = state.catalog.create_item(&name, &category, &image_key).await?;

    tracing::info!(id, %image_key, "item stored");
    Ok(Json(Message { message: format!("item received: {name}") }))
}

pub async fn list_items(State(state): State<AppState>) -> ApiResult<Json<ItemsResponse>> {
    let items = state.catalog.list_items().await?;
    Ok(Json(ItemsResponse { items }))
}

pub async fn get_item(State(state): State<AppState>, Path(item_id): Path<i64>) -> ApiResult<Json<ItemView>> {
    let item = state.catalog.get_item(item_id).await?;
    Ok(Json(item))
}

pub async fn search_items(
    State(state): State<AppState>, Query(params): Query<SearchParams>,
) -> ApiResult<Json<ItemsResponse>> {
    let items = state.catalog.search_items(&params.keyword).await?;
    Ok(Json(ItemsResponse { items }))
}

/// Serve an image blob by filename, falling back to the default
/// placeholder for unknown names.
pub async fn get_image(
    State(state): State<AppState>, Path(image_filename): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let path = state.images.resolve(&image_filename).await?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError::internal(format!("failed to read image {}: {e}", path.display())))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("image/jpeg"));
    Ok((headers, bytes))
}
