use super::http::{checked_rate, get_text};
use crate::core::asset::RatePair;
use crate::core::cache::{CacheEntry, RateCache};
use crate::core::error::RateError;
use crate::core::fetcher::RateFetcher;
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, instrument};

pub const SOURCE: &str = "CoinGecko";

/// BTC→USD and ETH→USD from one CoinGecko `simple/price` call.
///
/// Every successful fetch populates both pairs with the same timestamp, so
/// the two quotes are always consistent with each other.
pub struct CoinGeckoFetcher {
    client: reqwest::Client,
    base_url: String,
    cache: Arc<RateCache>,
}

impl CoinGeckoFetcher {
    pub fn new(client: reqwest::Client, base_url: &str, cache: Arc<RateCache>) -> Self {
        CoinGeckoFetcher {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    fn parse_prices(body: &str) -> Result<(f64, f64), RateError> {
        let data: SimplePriceResponse = serde_json::from_str(body).map_err(|e| {
            error!(error = ?e, response = %body, "Failed to parse CoinGecko response");
            RateError::UpstreamShape {
                provider: SOURCE,
                detail: format!("invalid JSON: {e}"),
            }
        })?;

        let missing = |field: &str| {
            error!(response = %body, "CoinGecko response has no {}", field);
            RateError::UpstreamShape {
                provider: SOURCE,
                detail: format!("missing {field}"),
            }
        };

        let btc = data
            .bitcoin
            .and_then(|p| p.usd)
            .ok_or_else(|| missing("bitcoin.usd"))?;
        let eth = data
            .ethereum
            .and_then(|p| p.usd)
            .ok_or_else(|| missing("ethereum.usd"))?;

        Ok((
            checked_rate(SOURCE, "bitcoin.usd", btc)?,
            checked_rate(SOURCE, "ethereum.usd", eth)?,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    bitcoin: Option<UsdPrice>,
    ethereum: Option<UsdPrice>,
}

#[derive(Debug, Deserialize)]
struct UsdPrice {
    usd: Option<f64>,
}

#[async_trait]
impl RateFetcher for CoinGeckoFetcher {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn pairs(&self) -> &'static [RatePair] {
        &[RatePair::BtcUsd, RatePair::EthUsd]
    }

    #[instrument(name = "CryptoRateFetch", skip(self), fields(pair = %pair))]
    async fn fetch(&self, pair: RatePair) -> Result<CacheEntry, RateError> {
        if !self.owns(pair) {
            return Err(RateError::UnsupportedPair {
                base: pair.base(),
                quote: pair.quote(),
            });
        }

        let url = format!(
            "{}/simple/price?ids=bitcoin,ethereum&vs_currencies=usd",
            self.base_url
        );
        debug!("Requesting crypto prices from {}", url);

        let body = get_text(&self.client, SOURCE, &url).await?;
        let (btc_usd, eth_usd) = Self::parse_prices(&body)?;

        let fetched_at = Utc::now();
        self.cache
            .put_all(
                &[(RatePair::BtcUsd, btc_usd), (RatePair::EthUsd, eth_usd)],
                fetched_at,
            )
            .await;

        let rate = if pair == RatePair::BtcUsd {
            btc_usd
        } else {
            eth_usd
        };
        Ok(CacheEntry { rate, fetched_at })
    }
}
