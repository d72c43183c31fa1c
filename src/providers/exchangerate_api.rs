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

pub const SOURCE: &str = "exchangerate-api.com";

/// USD→RUB from the exchangerate-api.com `latest/USD` endpoint.
pub struct ExchangeRateApiFetcher {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    cache: Arc<RateCache>,
}

impl ExchangeRateApiFetcher {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        api_key: &str,
        cache: Arc<RateCache>,
    ) -> Self {
        ExchangeRateApiFetcher {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            cache,
        }
    }

    fn parse_rub(body: &str) -> Result<f64, RateError> {
        let data: LatestRatesResponse = serde_json::from_str(body).map_err(|e| {
            error!(error = ?e, response = %body, "Failed to parse fiat rates response");
            RateError::UpstreamShape {
                provider: SOURCE,
                detail: format!("invalid JSON: {e}"),
            }
        })?;

        let rub = data
            .conversion_rates
            .and_then(|rates| rates.rub)
            .ok_or_else(|| {
                error!(response = %body, "Fiat rates response has no conversion_rates.RUB");
                RateError::UpstreamShape {
                    provider: SOURCE,
                    detail: "missing conversion_rates.RUB".to_string(),
                }
            })?;

        checked_rate(SOURCE, "conversion_rates.RUB", rub)
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    conversion_rates: Option<ConversionRates>,
}

#[derive(Debug, Deserialize)]
struct ConversionRates {
    #[serde(rename = "RUB")]
    rub: Option<f64>,
}

#[async_trait]
impl RateFetcher for ExchangeRateApiFetcher {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn pairs(&self) -> &'static [RatePair] {
        &[RatePair::UsdRub]
    }

    #[instrument(name = "FiatRateFetch", skip(self), fields(pair = %pair))]
    async fn fetch(&self, pair: RatePair) -> Result<CacheEntry, RateError> {
        if !self.owns(pair) {
            return Err(RateError::UnsupportedPair {
                base: pair.base(),
                quote: pair.quote(),
            });
        }

        let url = format!("{}/{}/latest/USD", self.base_url, self.api_key);
        debug!("Requesting fiat rates from {}/<api-key>/latest/USD", self.base_url);

        let body = get_text(&self.client, SOURCE, &url).await?;
        let rate = Self::parse_rub(&body)?;

        let fetched_at = Utc::now();
        self.cache.put(RatePair::UsdRub, rate, fetched_at).await;
        Ok(CacheEntry { rate, fetched_at })
    }
}
