use crate::core::format::{format_conversion, format_quote};
use crate::core::{Asset, RatePair, RateResolver};
use anyhow::Result;

/// Prints one unit of the pair's base asset in its quote asset.
pub async fn run_quote(resolver: &RateResolver, pair: RatePair) -> Result<()> {
    let quote = resolver.quote(pair).await?;
    println!("{}", format_quote(&quote));
    Ok(())
}

/// Prints `amount` of `asset` converted to RUB with the breakdown.
pub async fn run_convert(resolver: &RateResolver, asset: Asset, amount: f64) -> Result<()> {
    let breakdown = resolver.convert(asset, amount).await?;
    println!("{}", format_conversion(&breakdown));
    Ok(())
}
