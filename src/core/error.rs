//! Errors surfaced by the rate-resolution layer

use super::asset::Asset;
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum RateError {
    #[error("Request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}")]
    UpstreamStatus {
        provider: &'static str,
        status: StatusCode,
    },

    #[error("Unexpected response from {provider}: {detail}")]
    UpstreamShape {
        provider: &'static str,
        detail: String,
    },

    #[error("Unsupported pair: {base}→{quote}")]
    UnsupportedPair { base: Asset, quote: Asset },

    #[error("Unsupported currency: {0}. Supported: USD, BTC, ETH")]
    UnsupportedAsset(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl RateError {
    /// True for failures talking to an upstream, as opposed to bad input.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            RateError::Transport { .. }
                | RateError::UpstreamStatus { .. }
                | RateError::UpstreamShape { .. }
        )
    }
}
