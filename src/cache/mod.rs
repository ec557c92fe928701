//! Cache Module
//!
//! String-valued key/value cache with per-key TTL, holding serialized
//! read results. Two backends: an in-process map (default) and Redis.

mod entry;
pub mod keys;
mod memory;
mod redis_backend;

use async_trait::async_trait;

use crate::error::CacheError;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use redis_backend::RedisCache;

/// Convenience Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

// == Public Constants ==
/// Expiry applied to every cached read result, in seconds
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Atomic per-key cache operations.
///
/// Callers treat every error as non-fatal: a failed read is a miss and a
/// failed invalidation is logged.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Round-trips to the backend.
    async fn ping(&self) -> CacheResult<()>;

    /// Returns the live value for `key`, or None if absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value and TTL.
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> CacheResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Removes every key starting with `prefix`, returning how many were removed.
    async fn delete_prefix(&self, prefix: &str) -> CacheResult<usize>;
}
