//! Assets, direct pairs and the routes used to resolve a requested pair

use super::error::RateError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
    Usd,
    Btc,
    Eth,
    Rub,
}

impl Asset {
    pub fn code(&self) -> &'static str {
        match self {
            Asset::Usd => "USD",
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
            Asset::Rub => "RUB",
        }
    }
}

impl Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Asset {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Asset::Usd),
            "BTC" => Ok(Asset::Btc),
            "ETH" => Ok(Asset::Eth),
            "RUB" => Ok(Asset::Rub),
            _ => Err(RateError::UnsupportedAsset(s.trim().to_string())),
        }
    }
}

/// A pair backed by an upstream provider. These are the only cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatePair {
    UsdRub,
    BtcUsd,
    EthUsd,
}

impl RatePair {
    pub const ALL: [RatePair; 3] = [RatePair::UsdRub, RatePair::BtcUsd, RatePair::EthUsd];

    pub fn base(&self) -> Asset {
        match self {
            RatePair::UsdRub => Asset::Usd,
            RatePair::BtcUsd => Asset::Btc,
            RatePair::EthUsd => Asset::Eth,
        }
    }

    pub fn quote(&self) -> Asset {
        match self {
            RatePair::UsdRub => Asset::Rub,
            RatePair::BtcUsd | RatePair::EthUsd => Asset::Usd,
        }
    }

    /// Pair quoting one unit of `asset` in its natural counter-currency:
    /// RUB for USD, USD for crypto assets.
    pub fn natural_for(asset: Asset) -> Option<RatePair> {
        match asset {
            Asset::Usd => Some(RatePair::UsdRub),
            Asset::Btc => Some(RatePair::BtcUsd),
            Asset::Eth => Some(RatePair::EthUsd),
            Asset::Rub => None,
        }
    }
}

impl Display for RatePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}→{}", self.base(), self.quote())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Identity,
    Direct(RatePair),
    /// `asset→USD` followed by `USD→RUB`.
    Cross(RatePair, RatePair),
}

impl Route {
    pub fn resolve(base: Asset, quote: Asset) -> Result<Route, RateError> {
        match (base, quote) {
            (Asset::Usd, Asset::Usd) => Ok(Route::Identity),
            (Asset::Usd, Asset::Rub) => Ok(Route::Direct(RatePair::UsdRub)),
            (Asset::Btc, Asset::Usd) => Ok(Route::Direct(RatePair::BtcUsd)),
            (Asset::Eth, Asset::Usd) => Ok(Route::Direct(RatePair::EthUsd)),
            (Asset::Btc, Asset::Rub) => Ok(Route::Cross(RatePair::BtcUsd, RatePair::UsdRub)),
            (Asset::Eth, Asset::Rub) => Ok(Route::Cross(RatePair::EthUsd, RatePair::UsdRub)),
            (base, quote) => Err(RateError::UnsupportedPair { base, quote }),
        }
    }
}
