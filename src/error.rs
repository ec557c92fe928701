//! Error types for the inventory service
//!
//! Provides unified error handling using thiserror. Store and cache
//! failures carry their own typed errors; only `InventoryError` ever
//! reaches an HTTP response, and its body never embeds backend details.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Failures reported by a `ProductStore` implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Insert rejected because the SKU is already taken
    #[error("SKU already exists: {0}")]
    DuplicateSku(String),

    /// Pool exhausted, closed or timed out
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other database failure
    #[error("store failure: {0}")]
    Backend(String),
}

// == Cache Error Enum ==
/// Failures reported by a `Cache` implementation.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Connection could not be established or was lost
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// Operation exceeded the client-level timeout
    #[error("cache operation timed out after {0}ms")]
    Timeout(u64),

    /// Any other cache failure
    #[error("cache failure: {0}")]
    Backend(String),
}

// == Inventory Error Enum ==
/// Unified error type for request handling.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Request failed validation before any mutation
    #[error("{0}")]
    Validation(String),

    /// No product holds the given SKU
    #[error("Product not found: {0}")]
    NotFound(String),

    /// Every SKU candidate collided with a concurrent insert
    #[error("no unique SKU after {0} attempts")]
    SkuExhausted(u32),

    /// Store failure, aborts the operation
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Payload could not be serialized
    #[error("serialization failure: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::Serialization(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            InventoryError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            InventoryError::NotFound(_) => {
                (StatusCode::NOT_FOUND, "Product not found".to_string())
            }
            InventoryError::SkuExhausted(_) => {
                error!(error = %self, "SKU allocation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not allocate a unique SKU".to_string(),
                )
            }
            InventoryError::Store(StoreError::Unavailable(_)) => {
                error!(error = %self, "store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage backend unavailable".to_string(),
                )
            }
            InventoryError::Store(_) => {
                error!(error = %self, "store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Storage backend failure".to_string(),
                )
            }
            InventoryError::Serialization(_) => {
                error!(error = %self, "serialization failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, ErrorResponse::new(message)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the inventory service.
pub type Result<T> = std::result::Result<T, InventoryError>;
