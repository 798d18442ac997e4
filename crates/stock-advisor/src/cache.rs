//! Read-through cache for ticker data
//!
//! Entries are keyed by `(ticker, period)` and expire after a fixed TTL.
//! Expired entries are ignored on read and replaced on the next miss.

use crate::model::{Period, StockData};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Default lifetime of a cached entry
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Cache key for ticker data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Upper-cased ticker symbol
    pub ticker: String,
    /// History lookback the data was fetched with
    pub period: Period,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(ticker: impl Into<String>, period: Period) -> Self {
        Self {
            ticker: ticker.into(),
            period,
        }
    }
}

struct Entry {
    inserted_at: Instant,
    data: StockData,
}

/// Thread-safe TTL cache for ticker data
pub struct StockCache {
    entries: Arc<RwLock<HashMap<CacheKey, Entry>>>,
    ttl: Duration,
}

impl StockCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, entry: &Entry) -> bool {
        entry.inserted_at.elapsed() < self.ttl
    }

    /// Get a value from the cache if it has not expired
    pub async fn get(&self, key: &CacheKey) -> Option<StockData> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| self.is_fresh(entry))
            .map(|entry| entry.data.clone())
    }

    /// Insert a value into the cache, replacing any previous entry
    pub async fn insert(&self, key: CacheKey, data: StockData) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            Entry {
                inserted_at: Instant::now(),
                data,
            },
        );
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// If a fresh value exists in cache, it's returned immediately.
    /// Otherwise, the fetcher function is called and the result is cached.
    /// Errors are returned as-is and nothing is cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: CacheKey, fetcher: F) -> Result<StockData, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<StockData, E>>,
    {
        if let Some(data) = self.get(&key).await {
            tracing::debug!(ticker = %key.ticker, period = %key.period, "Cache hit");
            return Ok(data);
        }

        tracing::debug!(ticker = %key.ticker, period = %key.period, "Cache miss");

        let data = fetcher().await?;
        self.insert(key, data.clone()).await;

        Ok(data)
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate(&self, key: &CacheKey) {
        let mut entries = self.entries.write().await;
        entries.remove(key);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }

    /// Drop expired entries, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        before - entries.len()
    }

    /// Number of stored entries, expired ones included until purged
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for StockCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl Clone for StockCache {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            ttl: self.ttl,
        }
    }
}

impl std::fmt::Debug for StockCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockCache").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StockSnapshot;
    use crate::model::fixtures::{apple, history};

    fn data(ticker: &str) -> StockData {
        StockData {
            snapshot: StockSnapshot::empty(ticker),
            history: history(&[1.0, 2.0, 3.0]),
        }
    }

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = StockCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AAPL", Period::OneYear);
        let value = StockData {
            snapshot: apple(),
            history: history(&[150.0]),
        };

        cache.insert(key.clone(), value.clone()).await;

        assert_eq!(cache.get(&key).await, Some(value));
    }

    #[tokio::test]
    async fn test_cache_keyed_by_period() {
        let cache = StockCache::default();
        cache.insert(CacheKey::new("AAPL", Period::OneYear), data("AAPL")).await;

        assert!(cache.get(&CacheKey::new("AAPL", Period::OneYear)).await.is_some());
        assert!(cache.get(&CacheKey::new("AAPL", Period::OneMonth)).await.is_none());
        assert!(cache.get(&CacheKey::new("MSFT", Period::OneYear)).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_get_or_fetch() {
        let cache = StockCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AAPL", Period::OneYear);
        let value = data("AAPL");

        let mut call_count = 0;
        let result = cache
            .get_or_fetch(key.clone(), || {
                call_count += 1;
                async { Ok::<_, String>(value.clone()) }
            })
            .await
            .unwrap();
        assert_eq!(result, value);
        assert_eq!(call_count, 1);

        let result = cache
            .get_or_fetch(key.clone(), || {
                call_count += 1;
                async { Ok::<_, String>(value.clone()) }
            })
            .await
            .unwrap();
        assert_eq!(result, value);
        assert_eq!(call_count, 1);
    }

    #[tokio::test]
    async fn test_fetch_error_is_not_cached() {
        let cache = StockCache::default();
        let key = CacheKey::new("BAD", Period::OneYear);

        let result = cache
            .get_or_fetch(key.clone(), || async { Err::<StockData, _>("boom") })
            .await;
        assert_eq!(result, Err("boom"));
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = StockCache::new(Duration::from_secs(3600));
        let key = CacheKey::new("AAPL", Period::OneYear);
        cache.insert(key.clone(), data("AAPL")).await;

        tokio::time::advance(Duration::from_secs(3599)).await;
        assert!(cache.get(&key).await.is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get(&key).await.is_none());

        let mut fetched = false;
        cache
            .get_or_fetch(key.clone(), || {
                fetched = true;
                async { Ok::<_, String>(data("AAPL")) }
            })
            .await
            .unwrap();
        assert!(fetched);
        assert!(cache.get(&key).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = StockCache::new(Duration::from_secs(10));
        cache.insert(CacheKey::new("OLD", Period::OneYear), data("OLD")).await;

        tokio::time::advance(Duration::from_secs(11)).await;
        cache.insert(CacheKey::new("NEW", Period::OneYear), data("NEW")).await;

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_cache_invalidation_and_clear() {
        let cache = StockCache::new(Duration::from_secs(60));
        let clone = cache.clone();
        let key = CacheKey::new("AAPL", Period::OneYear);

        cache.insert(key.clone(), data("AAPL")).await;
        assert!(clone.get(&key).await.is_some());

        clone.invalidate(&key).await;
        assert!(cache.get(&key).await.is_none());

        for i in 0..5 {
            cache
                .insert(CacheKey::new(format!("STOCK{i}"), Period::OneMonth), data("X"))
                .await;
        }
        assert_eq!(cache.len().await, 5);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
