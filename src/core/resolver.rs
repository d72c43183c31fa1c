//! Cache-or-fetch resolution of direct pairs and two-hop cross pairs.
use super::asset::{Asset, RatePair, Route};
use super::cache::{CacheEntry, RateCache};
use super::error::RateError;
use super::fetcher::RateFetcher;
use chrono::{DateTime, Utc};
use futures::future::try_join;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Source label of quotes served from the cache.
pub const CACHE_SOURCE: &str = "cache";

/// A resolved direct-pair rate and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub pair: RatePair,
    pub rate: f64,
    pub fetched_at: DateTime<Utc>,
    pub source: &'static str,
}

impl Quote {
    fn new(pair: RatePair, entry: CacheEntry, source: &'static str) -> Self {
        Quote {
            pair,
            rate: entry.rate,
            fetched_at: entry.fetched_at,
            source,
        }
    }

    pub fn is_cached(&self) -> bool {
        self.source == CACHE_SOURCE
    }
}

/// An amount of `asset` expressed in RUB, with the legs used to get there.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionBreakdown {
    pub asset: Asset,
    pub amount: f64,
    /// `amount × asset→USD`, crypto assets only.
    pub usd_amount: Option<f64>,
    pub rub_amount: f64,
    pub asset_usd: Option<Quote>,
    pub usd_rub: Quote,
}

struct FetcherSlot {
    fetcher: Arc<dyn RateFetcher>,
    in_flight: Mutex<()>,
}

pub struct RateResolver {
    cache: Arc<RateCache>,
    slots: Vec<FetcherSlot>,
}

impl RateResolver {
    pub fn new(cache: Arc<RateCache>, fetchers: Vec<Arc<dyn RateFetcher>>) -> Self {
        let slots = fetchers
            .into_iter()
            .map(|fetcher| FetcherSlot {
                fetcher,
                in_flight: Mutex::new(()),
            })
            .collect();
        RateResolver { cache, slots }
    }

    fn slot_for(&self, pair: RatePair) -> Result<&FetcherSlot, RateError> {
        self.slots
            .iter()
            .find(|slot| slot.fetcher.owns(pair))
            .ok_or(RateError::UnsupportedPair {
                base: pair.base(),
                quote: pair.quote(),
            })
    }

    /// Serves a fresh cache entry or fetches the pair from its provider.
    ///
    /// Fetch failures are returned as is; stale entries are never served.
    /// Misses on pairs owned by the same fetcher are serialized, so concurrent
    /// callers share one upstream call while the result stays fresh.
    #[instrument(skip(self), fields(pair = %pair))]
    pub async fn quote(&self, pair: RatePair) -> Result<Quote, RateError> {
        if let Some(entry) = self.cache.fresh(pair, Utc::now()).await {
            return Ok(Quote::new(pair, entry, CACHE_SOURCE));
        }

        let slot = self.slot_for(pair)?;
        let _guard = slot.in_flight.lock().await;

        // Another caller may have refreshed the pair while we waited
        if let Some(entry) = self.cache.fresh(pair, Utc::now()).await {
            debug!("Served by a concurrent fetch");
            return Ok(Quote::new(pair, entry, CACHE_SOURCE));
        }

        let entry = slot.fetcher.fetch(pair).await?;
        Ok(Quote::new(pair, entry, slot.fetcher.source()))
    }

    /// Rate of one `base` in `quote`, composing cross pairs through USD.
    pub async fn rate_value(&self, base: Asset, quote: Asset) -> Result<f64, RateError> {
        match Route::resolve(base, quote)? {
            Route::Identity => Ok(1.0),
            Route::Direct(pair) => Ok(self.quote(pair).await?.rate),
            Route::Cross(first, second) => {
                let (a, b) = try_join(self.quote(first), self.quote(second)).await?;
                debug!(%base, %quote, first = a.rate, second = b.rate, "Composed cross rate");
                Ok(a.rate * b.rate)
            }
        }
    }

    /// Expresses `amount` of `asset` in RUB. Any finite amount is accepted.
    pub async fn convert(&self, asset: Asset, amount: f64) -> Result<ConversionBreakdown, RateError> {
        if !amount.is_finite() {
            return Err(RateError::InvalidAmount(amount.to_string()));
        }

        match Route::resolve(asset, Asset::Rub)? {
            Route::Direct(pair) => {
                let usd_rub = self.quote(pair).await?;
                Ok(ConversionBreakdown {
                    asset,
                    amount,
                    usd_amount: None,
                    rub_amount: amount * usd_rub.rate,
                    asset_usd: None,
                    usd_rub,
                })
            }
            Route::Cross(first, second) => {
                let (asset_usd, usd_rub) =
                    try_join(self.quote(first), self.quote(second)).await?;
                let usd_amount = amount * asset_usd.rate;
                Ok(ConversionBreakdown {
                    asset,
                    amount,
                    usd_amount: Some(usd_amount),
                    rub_amount: usd_amount * usd_rub.rate,
                    asset_usd: Some(asset_usd),
                    usd_rub,
                })
            }
            Route::Identity => Err(RateError::UnsupportedAsset(asset.to_string())),
        }
    }
}
