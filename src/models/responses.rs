//! Response DTOs for the inventory API
//!
//! Defines the structure of outgoing HTTP response bodies.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::Product;

/// Body of `GET /products/getall` and `GET /products/getbyquantity`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductListResponse {
    #[serde(rename = "Products")]
    pub products: Vec<Product>,
}

impl ProductListResponse {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

/// Body of `GET /products/getby/:sku`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    #[serde(rename = "Product")]
    pub product: Product,
}

impl ProductResponse {
    pub fn new(product: Product) -> Self {
        Self { product }
    }
}

/// Body of create, replace and patch: a message plus the stored product.
#[derive(Debug, Clone, Serialize)]
pub struct MutationResponse {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Product")]
    pub product: Product,
}

impl MutationResponse {
    pub fn new(message: impl Into<String>, product: Product) -> Self {
        Self {
            message: message.into(),
            product,
        }
    }
}

/// Body carrying only a message, used for delete.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    #[serde(rename = "Message")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" when both backends answer, "degraded" otherwise
    pub status: String,
    pub database: String,
    pub cache: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Builds a report from the two backend probes.
    pub fn from_probes(database_up: bool, cache_up: bool) -> Self {
        let label = |up: bool| if up { "up" } else { "down" }.to_string();
        Self {
            status: if database_up && cache_up {
                "healthy"
            } else {
                "degraded"
            }
            .to_string(),
            database: label(database_up),
            cache: label(cache_up),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "Message")]
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

// == Pre-serialized Payload ==
/// A JSON document that is already serialized, as stored in the cache.
///
/// Written to the wire verbatim so cache hits skip re-encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPayload(pub String);

impl JsonPayload {
    /// Serializes `value` once; the resulting text is both cached and returned.
    pub fn encode<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_string(value).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl IntoResponse for JsonPayload {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            self.0,
        )
            .into_response()
    }
}
