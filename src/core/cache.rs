use super::asset::RatePair;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

/// Last successfully observed rate for a pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheEntry {
    pub rate: f64,
    pub fetched_at: DateTime<Utc>,
}

/// Returns whether `entry` may still be served at `now`.
///
/// A zero `ttl` disables caching, so nothing is ever fresh. Entries stamped
/// in the future (clock skew) count as fresh.
pub fn is_fresh(entry: &CacheEntry, now: DateTime<Utc>, ttl: Duration) -> bool {
    if ttl.is_zero() {
        return false;
    }
    match (now - entry.fetched_at).to_std() {
        Ok(age) => age < ttl,
        Err(_) => true,
    }
}

pub struct RateCache {
    inner: RwLock<HashMap<RatePair, CacheEntry>>,
    ttl: Duration,
}

impl RateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Entry for `pair` regardless of its age.
    pub async fn get(&self, pair: RatePair) -> Option<CacheEntry> {
        let cache = self.inner.read().await;
        let entry = cache.get(&pair).copied();
        if entry.is_some() {
            debug!(%pair, "Cache HIT");
        } else {
            debug!(%pair, "Cache MISS");
        }
        entry
    }

    /// Entry for `pair` if it is still within the cache TTL at `now`.
    pub async fn fresh(&self, pair: RatePair, now: DateTime<Utc>) -> Option<CacheEntry> {
        let entry = self.get(pair).await?;
        if is_fresh(&entry, now, self.ttl) {
            Some(entry)
        } else {
            debug!(%pair, fetched_at = %entry.fetched_at, "Cache entry stale");
            None
        }
    }

    pub async fn put(&self, pair: RatePair, rate: f64, fetched_at: DateTime<Utc>) {
        let mut cache = self.inner.write().await;
        debug!(%pair, rate, "Cache PUT");
        cache.insert(pair, CacheEntry { rate, fetched_at });
    }

    /// Writes every `(pair, rate)` with the same timestamp in one critical section.
    pub async fn put_all(&self, rates: &[(RatePair, f64)], fetched_at: DateTime<Utc>) {
        let mut cache = self.inner.write().await;
        for &(pair, rate) in rates {
            debug!(%pair, rate, "Cache PUT");
            cache.insert(pair, CacheEntry { rate, fetched_at });
        }
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
