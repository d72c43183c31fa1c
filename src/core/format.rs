//! Renders resolved quotes and conversions as reply text.
//!
//! RUB figures use 4 decimals, USD figures 2 and input amounts 6. Output is
//! locale independent.
use super::asset::{Asset, RatePair};
use super::resolver::{ConversionBreakdown, Quote};
use chrono::{DateTime, SecondsFormat, Utc};

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A rate expressed in the pair's quote asset.
pub fn format_rate(pair: RatePair, rate: f64) -> String {
    format_in(pair.quote(), rate)
}

fn format_in(asset: Asset, value: f64) -> String {
    match asset {
        Asset::Rub => format!("{value:.4}"),
        _ => format!("{value:.2}"),
    }
}

fn annotation(quote: &Quote) -> String {
    format!(
        "source: {}, UTC {}",
        quote.source,
        format_timestamp(quote.fetched_at)
    )
}

fn leg(quote: &Quote) -> String {
    format!(
        "{}={} ({})",
        quote.pair,
        format_rate(quote.pair, quote.rate),
        annotation(quote)
    )
}

/// `1 USD ≈ 90.1235 RUB (source: …, UTC …)`
pub fn format_quote(quote: &Quote) -> String {
    format!(
        "1 {} ≈ {} {} ({})",
        quote.pair.base(),
        format_rate(quote.pair, quote.rate),
        quote.pair.quote(),
        annotation(quote)
    )
}

pub fn format_conversion(breakdown: &ConversionBreakdown) -> String {
    let mut output = format!("{:.6} {}", breakdown.amount, breakdown.asset);
    if let Some(usd_amount) = breakdown.usd_amount {
        output.push_str(&format!(" ≈ {} USD", format_in(Asset::Usd, usd_amount)));
    }
    output.push_str(&format!(
        " ≈ {} RUB",
        format_in(Asset::Rub, breakdown.rub_amount)
    ));

    if let Some(asset_usd) = &breakdown.asset_usd {
        output.push('\n');
        output.push_str(&leg(asset_usd));
    }
    output.push('\n');
    output.push_str(&leg(&breakdown.usd_rub));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::CACHE_SOURCE;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap()
    }

    fn quote(pair: RatePair, rate: f64, source: &'static str) -> Quote {
        Quote {
            pair,
            rate,
            fetched_at: ts(),
            source,
        }
    }

    #[test]
    fn test_rub_rate_has_four_decimals() {
        assert_eq!(format_rate(RatePair::UsdRub, 90.12345), "90.1235");
        assert_eq!(format_rate(RatePair::UsdRub, 92.5), "92.5000");
    }

    #[test]
    fn test_usd_price_has_two_decimals() {
        assert_eq!(format_rate(RatePair::BtcUsd, 50123.456), "50123.46");
        assert_eq!(format_rate(RatePair::EthUsd, 3000.0), "3000.00");
    }

    #[test]
    fn test_large_values_are_not_grouped() {
        assert_eq!(format_in(Asset::Rub, 4_500_000.0), "4500000.0000");
    }

    #[test]
    fn test_timestamp_is_iso_utc() {
        assert_eq!(format_timestamp(ts()), "2024-03-01T12:30:05.000Z");
    }

    #[test]
    fn test_format_quote() {
        let q = quote(RatePair::UsdRub, 90.12345, "exchangerate-api.com");
        assert_eq!(
            format_quote(&q),
            "1 USD ≈ 90.1235 RUB (source: exchangerate-api.com, UTC 2024-03-01T12:30:05.000Z)"
        );

        let q = quote(RatePair::BtcUsd, 50123.456, CACHE_SOURCE);
        assert_eq!(
            format_quote(&q),
            "1 BTC ≈ 50123.46 USD (source: cache, UTC 2024-03-01T12:30:05.000Z)"
        );
    }

    #[test]
    fn test_format_crypto_conversion() {
        let breakdown = ConversionBreakdown {
            asset: Asset::Eth,
            amount: 0.3,
            usd_amount: Some(900.0),
            rub_amount: 81_000.0,
            asset_usd: Some(quote(RatePair::EthUsd, 3000.0, "CoinGecko")),
            usd_rub: quote(RatePair::UsdRub, 90.0, CACHE_SOURCE),
        };

        assert_eq!(
            format_conversion(&breakdown),
            "0.300000 ETH ≈ 900.00 USD ≈ 81000.0000 RUB\n\
             ETH→USD=3000.00 (source: CoinGecko, UTC 2024-03-01T12:30:05.000Z)\n\
             USD→RUB=90.0000 (source: cache, UTC 2024-03-01T12:30:05.000Z)"
        );
    }

    #[test]
    fn test_format_usd_conversion() {
        let breakdown = ConversionBreakdown {
            asset: Asset::Usd,
            amount: 100.0,
            usd_amount: None,
            rub_amount: 9_012.345,
            asset_usd: None,
            usd_rub: quote(RatePair::UsdRub, 90.12345, "exchangerate-api.com"),
        };

        assert_eq!(
            format_conversion(&breakdown),
            "100.000000 USD ≈ 9012.3450 RUB\n\
             USD→RUB=90.1235 (source: exchangerate-api.com, UTC 2024-03-01T12:30:05.000Z)"
        );
    }
}
