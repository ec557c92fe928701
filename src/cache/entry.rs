//! Cache Entry Module
//!
//! A stored payload with its expiry deadline.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A cached payload and the instant it stops being served.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized JSON payload
    pub value: String,
    /// Deadline after which the entry reads as a miss
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl_secs` seconds from now.
    pub fn new(value: String, ttl_secs: u64) -> Self {
        Self::with_ttl(value, Duration::from_secs(ttl_secs))
    }

    pub fn with_ttl(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    // == Is Expired ==
    /// Expired once the current instant reaches the deadline.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
