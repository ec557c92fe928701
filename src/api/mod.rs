//! API Module
//!
//! HTTP handlers and routing for the inventory REST API.
//!
//! # Endpoints
//! - `POST /products/post` - Create a product
//! - `GET /products/getall` - List every product
//! - `GET /products/getbyquantity` - Quantity-filtered, paginated list
//! - `GET /products/getby/:sku` - Single product
//! - `PUT /products/put/:sku` - Full replace
//! - `PATCH /products/patch/:sku` - Partial update
//! - `DELETE /products/delete/:sku` - Delete
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
