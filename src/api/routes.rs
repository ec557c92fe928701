//! API Routes
//!
//! Configures the Axum router with all inventory endpoints.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_handler, delete_handler, get_handler, health_handler, list_all_handler,
    list_by_quantity_handler, patch_handler, replace_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /products/post` - Create a product
/// - `GET /products/getall` - List every product
/// - `GET /products/getbyquantity` - Quantity-filtered page (trailing slash accepted)
/// - `GET /products/getby/:sku` - Single product
/// - `PUT /products/put/:sku` - Full replace
/// - `PATCH /products/patch/:sku` - Partial update
/// - `DELETE /products/delete/:sku` - Delete
/// - `GET /health` - Store and cache probes
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/products/post", post(create_handler))
        .route("/products/getall", get(list_all_handler))
        .route("/products/getbyquantity", get(list_by_quantity_handler))
        .route("/products/getbyquantity/", get(list_by_quantity_handler))
        .route("/products/getby/:sku", get(get_handler))
        .route("/products/put/:sku", put(replace_handler))
        .route("/products/patch/:sku", patch(patch_handler))
        .route("/products/delete/:sku", delete(delete_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
