//! Upstream rate source abstraction

use super::asset::RatePair;
use super::cache::CacheEntry;
use super::error::RateError;
use async_trait::async_trait;

#[async_trait]
pub trait RateFetcher: Send + Sync {
    /// Label reported as the data source of freshly fetched quotes.
    fn source(&self) -> &'static str;

    /// Pairs populated by a single successful fetch.
    fn pairs(&self) -> &'static [RatePair];

    fn owns(&self, pair: RatePair) -> bool {
        self.pairs().contains(&pair)
    }

    /// Fetches fresh data, writes every owned pair into the cache and returns
    /// the entry for `pair`. Nothing is written on failure.
    async fn fetch(&self, pair: RatePair) -> Result<CacheEntry, RateError>;
}
