//! Redis-backed cache shared by every service instance.
//!
//! Uses a multiplexed `ConnectionManager` that reconnects on its own.
//! Every command is bounded by the configured timeout; expiry surfaces as
//! `CacheError::Timeout`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{RedisError, RedisResult};
use tracing::{debug, info};

use crate::cache::{Cache, CacheResult};
use crate::error::CacheError;

/// Keys fetched per SCAN round trip
const SCAN_BATCH: usize = 100;

/// Cache client over a Redis server.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    timeout: Duration,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Connects to `redis_url`, failing if no connection is made within `timeout`.
    pub async fn connect(redis_url: &str, timeout: Duration) -> CacheResult<Self> {
        let client = redis::Client::open(redis_url).map_err(map_redis_error)?;
        let conn = bounded(timeout, client.get_connection_manager()).await?;
        info!("redis cache connected");
        Ok(Self { conn, timeout })
    }

    async fn run<T, F>(&self, fut: F) -> CacheResult<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        bounded(self.timeout, fut).await
    }
}

async fn bounded<T, F>(timeout: Duration, fut: F) -> CacheResult<T>
where
    F: Future<Output = RedisResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(map_redis_error),
        Err(_) => Err(CacheError::Timeout(timeout.as_millis() as u64)),
    }
}

fn map_redis_error(err: RedisError) -> CacheError {
    if err.is_timeout() {
        CacheError::Unavailable(format!("redis timed out: {}", err))
    } else if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
        CacheError::Unavailable(err.to_string())
    } else {
        CacheError::Backend(err.to_string())
    }
}

/// Escapes glob metacharacters so a prefix matches literally in SCAN MATCH.
fn match_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

#[async_trait]
impl Cache for RedisCache {
    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let _: String = self
            .run(async move { redis::cmd("PING").query_async(&mut conn).await })
            .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        self.run(async move { redis::cmd("GET").arg(key).query_async(&mut conn).await })
            .await
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        self.run(async move {
            redis::cmd("SETEX")
                .arg(key)
                .arg(ttl_secs.max(1))
                .arg(value)
                .query_async(&mut conn)
                .await
        })
        .await
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let _: usize = self
            .run(async move { redis::cmd("DEL").arg(key).query_async(&mut conn).await })
            .await?;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> CacheResult<usize> {
        let pattern = match_pattern(prefix);
        let mut cursor: u64 = 0;
        let mut removed = 0;

        loop {
            let mut conn = self.conn.clone();
            let pattern = pattern.as_str();
            let (next, keys): (u64, Vec<String>) = self
                .run(async move {
                    redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(pattern)
                        .arg("COUNT")
                        .arg(SCAN_BATCH)
                        .query_async(&mut conn)
                        .await
                })
                .await?;

            if !keys.is_empty() {
                let mut conn = self.conn.clone();
                let deleted: usize = self
                    .run(async move { redis::cmd("DEL").arg(&keys).query_async(&mut conn).await })
                    .await?;
                removed += deleted;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(prefix, removed, "redis prefix deletion finished");
        Ok(removed)
    }
}
