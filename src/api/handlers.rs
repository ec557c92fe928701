//! API Handlers
//!
//! HTTP request handlers for each inventory endpoint. Bodies are validated
//! before any write, so a rejected request never mutates. PUT and PATCH
//! resolve the SKU first: an unknown SKU is a 404 even with a bad body.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::error::{InventoryError, Result};
use crate::models::{
    parse_body, HealthResponse, JsonPayload, MessageResponse, MutationResponse, ProductFields,
    ProductPatch, QuantityQuery,
};
use crate::service::ProductService;

/// Application state shared across all handlers.
///
/// Holds explicitly constructed store and cache clients through the service.
#[derive(Clone)]
pub struct AppState {
    pub service: ProductService,
}

impl AppState {
    pub fn new(service: ProductService) -> Self {
        Self { service }
    }
}

/// Handler for POST /products/post
pub async fn create_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<MutationResponse>)> {
    let fields = ProductFields::from_json(&parse_body(&body)?)?;
    let product = state.service.create(fields).await?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::new("Product created successfully", product)),
    ))
}

/// Handler for GET /products/getall
pub async fn list_all_handler(State(state): State<AppState>) -> Result<JsonPayload> {
    state.service.list_all().await
}

/// Handler for GET /products/getbyquantity?quantity&page&per_page
pub async fn list_by_quantity_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<QuantityQuery>, QueryRejection>,
) -> Result<JsonPayload> {
    // Malformed query strings (e.g. a repeated key) get the JSON error body too
    let Query(query) = query.map_err(|rejection| {
        debug!(error = %rejection, "query string rejected");
        InventoryError::Validation("Invalid query string".to_string())
    })?;
    let page = query.validate()?;
    state.service.list_by_quantity(page).await
}

/// Handler for GET /products/getby/:sku
pub async fn get_handler(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> Result<JsonPayload> {
    state.service.get(&sku).await
}

/// Handler for PUT /products/put/:sku
pub async fn replace_handler(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    body: Bytes,
) -> Result<Json<MutationResponse>> {
    state.service.ensure_exists(&sku).await?;
    let fields = ProductFields::from_json(&parse_body(&body)?)?;
    let product = state.service.replace(&sku, fields).await?;

    Ok(Json(MutationResponse::new("Product updated", product)))
}

/// Handler for PATCH /products/patch/:sku
pub async fn patch_handler(
    State(state): State<AppState>,
    Path(sku): Path<String>,
    body: Bytes,
) -> Result<Json<MutationResponse>> {
    state.service.ensure_exists(&sku).await?;
    let patch = ProductPatch::from_json(&parse_body(&body)?)?;
    let product = state.service.patch(&sku, patch).await?;

    Ok(Json(MutationResponse::new(
        "Product patched successfully",
        product,
    )))
}

/// Handler for DELETE /products/delete/:sku
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.service.delete(&sku).await?;

    Ok(Json(MessageResponse::new("Product deleted")))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(state.service.health().await)
}
