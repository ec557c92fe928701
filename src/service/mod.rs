//! Product Service
//!
//! Coordinates the store and the cache for every product operation.
//!
//! # Read path
//! Look up the exact cache key; a hit is returned verbatim. On a miss the
//! store is queried, the result serialized once, cached with the
//! configured TTL and returned.
//!
//! # Write path
//! Only after the store mutation commits: drop `all_products`, drop every
//! `products_quantity_*` page, and for update/delete drop `product_{sku}`.
//! Cache failures here are logged and swallowed; the mutation still
//! succeeds. A failed invalidation leaves stale entries that live until
//! their TTL runs out, and a reader racing a writer can re-cache pre-write
//! data after invalidation ran. Both windows are bounded by the TTL.

#[cfg(test)]
mod property_tests;

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{keys, Cache, DEFAULT_TTL_SECS};
use crate::error::{InventoryError, Result, StoreError};
use crate::models::{
    HealthResponse, JsonPayload, PageRequest, Product, ProductFields, ProductListResponse,
    ProductPatch, ProductResponse,
};
use crate::sku::SkuGenerator;
use crate::store::ProductStore;

/// Default number of insert attempts when generated SKUs collide
pub const DEFAULT_SKU_MAX_ATTEMPTS: u32 = 5;

/// Product operations over an injected store and cache.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
    cache: Arc<dyn Cache>,
    generator: SkuGenerator,
    cache_ttl: u64,
    sku_max_attempts: u32,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>, cache: Arc<dyn Cache>) -> Self {
        Self {
            store,
            cache,
            generator: SkuGenerator::new(),
            cache_ttl: DEFAULT_TTL_SECS,
            sku_max_attempts: DEFAULT_SKU_MAX_ATTEMPTS,
        }
    }

    /// Expiry for cached reads, in seconds.
    pub fn with_cache_ttl(mut self, ttl_secs: u64) -> Self {
        self.cache_ttl = ttl_secs;
        self
    }

    /// Insert attempts before giving up on SKU allocation (at least one).
    pub fn with_sku_max_attempts(mut self, attempts: u32) -> Self {
        self.sku_max_attempts = attempts.max(1);
        self
    }

    // == Reads ==

    /// Full collection, SKU ascending.
    pub async fn list_all(&self) -> Result<JsonPayload> {
        self.read_through(keys::ALL_PRODUCTS, || async {
            Ok::<_, InventoryError>(ProductListResponse::new(self.store.list_all().await?))
        })
        .await
    }

    /// One page of products with `quantity >= page.quantity`, SKU ascending.
    pub async fn list_by_quantity(&self, page: PageRequest) -> Result<JsonPayload> {
        let key = keys::quantity_page(page.quantity, page.page, page.per_page);
        self.read_through(&key, || async {
            let products = self
                .store
                .list_by_quantity(page.quantity, page.offset(), page.per_page)
                .await?;
            Ok::<_, InventoryError>(ProductListResponse::new(products))
        })
        .await
    }

    /// Single product. Misses are not cached.
    pub async fn get(&self, sku: &str) -> Result<JsonPayload> {
        self.read_through(&keys::product(sku), || async {
            self.store
                .find(sku)
                .await?
                .map(ProductResponse::new)
                .ok_or_else(|| InventoryError::NotFound(sku.to_string()))
        })
        .await
    }

    async fn read_through<T, F, Fut>(&self, key: &str, load: F) -> Result<JsonPayload>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.cache.get(key).await {
            Ok(Some(hit)) => {
                debug!(key, "cache hit");
                return Ok(JsonPayload(hit));
            }
            Ok(None) => debug!(key, "cache miss"),
            Err(e) => warn!(key, error = %e, "cache read failed, serving from store"),
        }

        let payload = JsonPayload::encode(&load().await?)?;
        if let Err(e) = self.cache.set(key, payload.as_str(), self.cache_ttl).await {
            warn!(key, error = %e, "cache write failed");
        }
        Ok(payload)
    }

    // == Writes ==

    /// Stores a new product under a freshly generated SKU.
    ///
    /// A candidate claimed by a concurrent insert between the pre-check and
    /// the insert is detected by the store's uniqueness constraint and a new
    /// candidate drawn, up to the configured number of attempts.
    pub async fn create(&self, fields: ProductFields) -> Result<Product> {
        for attempt in 1..=self.sku_max_attempts {
            let sku = self
                .generator
                .generate(
                    self.store.as_ref(),
                    &fields.department,
                    &fields.name,
                    &fields.brand,
                )
                .await?;
            let product = fields.clone().into_product(sku);

            match self.store.insert(&product).await {
                Ok(()) => {
                    self.invalidate(None).await;
                    info!(sku = %product.sku, "product created");
                    return Ok(product);
                }
                Err(StoreError::DuplicateSku(sku)) => {
                    warn!(%sku, attempt, "SKU claimed by a concurrent insert, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(InventoryError::SkuExhausted(self.sku_max_attempts))
    }

    /// Fails with `NotFound` unless a product is stored under `sku`.
    ///
    /// PUT and PATCH call this before validating their body, so an unknown
    /// SKU is reported as 404 whatever the body holds.
    pub async fn ensure_exists(&self, sku: &str) -> Result<()> {
        if self.store.sku_exists(sku).await? {
            Ok(())
        } else {
            Err(InventoryError::NotFound(sku.to_string()))
        }
    }

    /// Overwrites every field except the SKU.
    pub async fn replace(&self, sku: &str, fields: ProductFields) -> Result<Product> {
        let product = fields.into_product(sku.to_string());
        if !self.store.update(&product).await? {
            return Err(InventoryError::NotFound(sku.to_string()));
        }
        self.invalidate(Some(sku)).await;
        info!(sku, "product replaced");
        Ok(product)
    }

    /// Overwrites only the fields present in `patch`.
    ///
    /// Concurrent writers to the same SKU race; the later commit wins.
    pub async fn patch(&self, sku: &str, patch: ProductPatch) -> Result<Product> {
        let mut product = self
            .store
            .find(sku)
            .await?
            .ok_or_else(|| InventoryError::NotFound(sku.to_string()))?;
        patch.apply(&mut product);

        if !self.store.update(&product).await? {
            return Err(InventoryError::NotFound(sku.to_string()));
        }
        self.invalidate(Some(sku)).await;
        info!(sku, "product patched");
        Ok(product)
    }

    pub async fn delete(&self, sku: &str) -> Result<()> {
        if !self.store.delete(sku).await? {
            return Err(InventoryError::NotFound(sku.to_string()));
        }
        self.invalidate(Some(sku)).await;
        info!(sku, "product deleted");
        Ok(())
    }

    /// Drops every cache entry a committed write may have made stale.
    async fn invalidate(&self, sku: Option<&str>) {
        if let Err(e) = self.cache.delete(keys::ALL_PRODUCTS).await {
            warn!(key = keys::ALL_PRODUCTS, error = %e, "cache invalidation failed");
        }

        match self.cache.delete_prefix(keys::QUANTITY_PREFIX).await {
            Ok(removed) => debug!(removed, "quantity pages invalidated"),
            Err(e) => {
                warn!(prefix = keys::QUANTITY_PREFIX, error = %e, "cache invalidation failed")
            }
        }

        if let Some(sku) = sku {
            let key = keys::product(sku);
            if let Err(e) = self.cache.delete(&key).await {
                warn!(%key, error = %e, "cache invalidation failed");
            }
        }
    }

    // == Health ==

    pub async fn health(&self) -> HealthResponse {
        let database_up = self.store.ping().await.is_ok();
        let cache_up = self.cache.ping().await.is_ok();
        HealthResponse::from_probes(database_up, cache_up)
    }
}
