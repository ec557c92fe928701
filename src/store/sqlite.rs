//! SQLite-backed product store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | ProductStore Error |
//! |------------|--------------------|
//! | Database, unique / primary-key violation | `DuplicateSku` |
//! | PoolTimedOut, PoolClosed, Io | `Unavailable` |
//! | anything else | `Backend` |

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info, instrument};

use crate::error::StoreError;
use crate::models::Product;
use crate::store::{ProductStore, StoreResult};

const CREATE_PRODUCTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        sku TEXT PRIMARY KEY NOT NULL CHECK (length(sku) = 9),
        product TEXT NOT NULL CHECK (length(product) <= 80),
        description TEXT NOT NULL CHECK (length(description) <= 1500),
        brand TEXT NOT NULL CHECK (length(brand) <= 80),
        department TEXT NOT NULL CHECK (length(department) <= 90),
        quantity INTEGER NOT NULL CHECK (quantity >= 0),
        price REAL NOT NULL CHECK (price >= 0)
    )
"#;

const CREATE_QUANTITY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_products_quantity ON products (quantity)";

const SELECT_COLUMNS: &str =
    "SELECT sku, product, description, brand, department, quantity, price FROM products";

/// Product store over a `sqlx` SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteProductStore {
    pool: SqlitePool,
}

impl SqliteProductStore {
    /// Wraps an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool on `database_url`, creating the database file if needed.
    ///
    /// `acquire_timeout` bounds how long a request waits for a connection;
    /// expiry surfaces as `StoreError::Unavailable`.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| map_sqlx_error("connect", e))?
            .create_if_missing(true)
            .busy_timeout(acquire_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        info!(max_connections, "store pool opened");
        Ok(Self::new(pool))
    }

    /// Single-connection in-memory database with the schema applied.
    ///
    /// The connection is never recycled, since dropping it would drop the
    /// database with it.
    pub async fn in_memory() -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Creates the `products` table and its quantity index if missing.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::query(CREATE_PRODUCTS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        sqlx::query(CREATE_QUANTITY_INDEX)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        debug!("products schema ready");
        Ok(())
    }

    /// Closes every pooled connection. Called once at shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping", e))?;
        Ok(())
    }

    async fn sku_exists(&self, sku: &str) -> StoreResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM products WHERE sku = ?")
            .bind(sku)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("sku_exists", e))?;
        Ok(found.is_some())
    }

    #[instrument(skip(self, product), fields(sku = %product.sku), err)]
    async fn insert(&self, product: &Product) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (sku, product, description, brand, department, quantity, price)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.brand)
        .bind(&product.department)
        .bind(product.quantity)
        .bind(product.price)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateSku(product.sku.clone())
            } else {
                map_sqlx_error("insert", e)
            }
        })?;
        Ok(())
    }

    async fn find(&self, sku: &str) -> StoreResult<Option<Product>> {
        let sql = format!("{} WHERE sku = ?", SELECT_COLUMNS);
        sqlx::query_as::<_, Product>(&sql)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find", e))
    }

    async fn list_all(&self) -> StoreResult<Vec<Product>> {
        let sql = format!("{} ORDER BY sku ASC", SELECT_COLUMNS);
        sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_all", e))
    }

    async fn list_by_quantity(
        &self,
        min_quantity: i64,
        offset: i64,
        limit: i64,
    ) -> StoreResult<Vec<Product>> {
        let sql = format!(
            "{} WHERE quantity >= ? ORDER BY sku ASC LIMIT ? OFFSET ?",
            SELECT_COLUMNS
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(min_quantity)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_by_quantity", e))
    }

    #[instrument(skip(self, product), fields(sku = %product.sku), err)]
    async fn update(&self, product: &Product) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET product = ?, description = ?, brand = ?, department = ?, quantity = ?, price = ?
            WHERE sku = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.brand)
        .bind(&product.department)
        .bind(product.quantity)
        .bind(product.price)
        .bind(&product.sku)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, sku: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE sku = ?")
            .bind(sku)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;
        Ok(result.rows_affected() > 0)
    }
}

/// SQLITE_CONSTRAINT_PRIMARYKEY (1555) and SQLITE_CONSTRAINT_UNIQUE (2067).
fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation()
                || matches!(db_err.code().as_deref(), Some("1555") | Some("2067"))
        }
        _ => false,
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {}", operation))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("I/O error in {}: {}", operation, e)),
        sqlx::Error::Database(db_err) => {
            StoreError::Backend(format!("database error in {}: {}", operation, db_err.message()))
        }
        other => StoreError::Backend(format!("sqlx error in {}: {}", operation, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(sku: &str, quantity: i64) -> Product {
        Product {
            sku: sku.to_string(),
            name: "Drill".to_string(),
            description: "Cordless drill".to_string(),
            brand: "Makita".to_string(),
            department: "Tools".to_string(),
            quantity,
            price: 99.0,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = SqliteProductStore::in_memory().await.unwrap();
        store.insert(&product("TDM123456", 3)).await.unwrap();

        let found = store.find("TDM123456").await.unwrap();
        assert_eq!(found, Some(product("TDM123456", 3)));
        assert!(store.sku_exists("TDM123456").await.unwrap());
        assert!(!store.sku_exists("TDM000000").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected_not_overwritten() {
        let store = SqliteProductStore::in_memory().await.unwrap();
        store.insert(&product("TDM123456", 3)).await.unwrap();

        let mut other = product("TDM123456", 50);
        other.name = "Saw".to_string();
        let result = store.insert(&other).await;

        assert!(matches!(result, Err(StoreError::DuplicateSku(ref s)) if s == "TDM123456"));
        assert_eq!(store.find("TDM123456").await.unwrap().unwrap().name, "Drill");
    }

    #[tokio::test]
    async fn test_schema_enforces_text_limits() {
        let store = SqliteProductStore::in_memory().await.unwrap();

        let mut long = product("TDM123456", 3);
        long.department = "T".repeat(91);
        let result = store.insert(&long).await;

        assert!(matches!(result, Err(StoreError::Backend(_))));
        assert!(!store.sku_exists("TDM123456").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_all_sorted_by_sku() {
        let store = SqliteProductStore::in_memory().await.unwrap();
        for sku in ["ZZZ000001", "AAA000002", "MMM000003"] {
            store.insert(&product(sku, 1)).await.unwrap();
        }

        let skus: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.sku)
            .collect();
        assert_eq!(skus, vec!["AAA000002", "MMM000003", "ZZZ000001"]);
    }

    #[tokio::test]
    async fn test_list_by_quantity_filters_and_paginates() {
        let store = SqliteProductStore::in_memory().await.unwrap();
        store.insert(&product("CCC000001", 15)).await.unwrap();
        store.insert(&product("AAA000001", 5)).await.unwrap();
        store.insert(&product("BBB000001", 10)).await.unwrap();

        let page: Vec<String> = store
            .list_by_quantity(0, 0, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.sku)
            .collect();
        assert_eq!(page, vec!["AAA000001", "BBB000001"]);

        let second = store.list_by_quantity(0, 2, 2).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].sku, "CCC000001");

        let filtered = store.list_by_quantity(10, 0, 10).await.unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|p| p.quantity >= 10));
    }

    #[tokio::test]
    async fn test_update_and_delete_report_missing_rows() {
        let store = SqliteProductStore::in_memory().await.unwrap();
        assert!(!store.update(&product("TDM123456", 1)).await.unwrap());
        assert!(!store.delete("TDM123456").await.unwrap());

        store.insert(&product("TDM123456", 1)).await.unwrap();
        assert!(store.update(&product("TDM123456", 7)).await.unwrap());
        assert_eq!(store.find("TDM123456").await.unwrap().unwrap().quantity, 7);

        assert!(store.delete("TDM123456").await.unwrap());
        assert!(store.find("TDM123456").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_closed_pool_reports_unavailable() {
        let store = SqliteProductStore::in_memory().await.unwrap();
        store.close().await;

        assert!(matches!(store.ping().await, Err(StoreError::Unavailable(_))));
    }
}
