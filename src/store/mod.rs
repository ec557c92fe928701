//! Store Module
//!
//! Durable product storage keyed by SKU. The store is the single authority
//! on SKU uniqueness: a duplicate insert fails with
//! `StoreError::DuplicateSku` and never overwrites.

mod sqlite;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::Product;

pub use sqlite::SqliteProductStore;

/// Convenience Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// CRUD over `Product` records.
///
/// Listing operations order by SKU ascending so offset pagination is
/// reproducible for a fixed store state.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Round-trips to the backend.
    async fn ping(&self) -> StoreResult<()>;

    /// Returns true if a product currently holds `sku`.
    async fn sku_exists(&self, sku: &str) -> StoreResult<bool>;

    /// Inserts a new product. Fails with `DuplicateSku` if the SKU is taken.
    async fn insert(&self, product: &Product) -> StoreResult<()>;

    async fn find(&self, sku: &str) -> StoreResult<Option<Product>>;

    async fn list_all(&self) -> StoreResult<Vec<Product>>;

    /// Products with `quantity >= min_quantity`, skipping `offset` rows.
    async fn list_by_quantity(
        &self,
        min_quantity: i64,
        offset: i64,
        limit: i64,
    ) -> StoreResult<Vec<Product>>;

    /// Overwrites every non-key column. Returns false if the SKU no longer exists.
    async fn update(&self, product: &Product) -> StoreResult<bool>;

    /// Returns false if nothing was deleted.
    async fn delete(&self, sku: &str) -> StoreResult<bool>;
}
