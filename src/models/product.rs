//! Product entity
//!
//! The single record type persisted in the `products` table and
//! serialized into every response and cache payload.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stocked product, keyed by its generated SKU.
///
/// JSON field names follow the public API (`SKU`, `Product`, ...);
/// column names follow the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    /// Nine-character identifier, immutable after creation
    #[serde(rename = "SKU")]
    pub sku: String,
    /// Product name
    #[serde(rename = "Product")]
    #[sqlx(rename = "product")]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Department")]
    pub department: String,
    /// Units in stock, never negative
    #[serde(rename = "Quantity")]
    pub quantity: i64,
    /// Unit price, never negative
    #[serde(rename = "Price")]
    pub price: f64,
}
