pub mod bot;
pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::{AppConfig, exchange_api_key};
use crate::core::{Asset, RateCache, RateFetcher, RatePair, RateResolver};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Quote(RatePair),
    Convert { asset: Asset, amount: f64 },
    Rates,
    Chat,
}

/// Wires the cache and both upstream fetchers from the configuration.
pub fn build_resolver(config: &AppConfig, api_key: &str) -> Result<RateResolver> {
    let client = providers::http::build_client(&config.http.user_agent, config.request_timeout())
        .context("Failed to build HTTP client")?;
    let cache = Arc::new(RateCache::new(config.ttl()));

    let fiat = providers::ExchangeRateApiFetcher::new(
        client.clone(),
        config.exchangerate_base_url(),
        api_key,
        Arc::clone(&cache),
    );
    let crypto =
        providers::CoinGeckoFetcher::new(client, config.coingecko_base_url(), Arc::clone(&cache));

    let fetchers: Vec<Arc<dyn RateFetcher>> = vec![
        Arc::new(fiat) as Arc<dyn RateFetcher>,
        Arc::new(crypto) as Arc<dyn RateFetcher>,
    ];
    Ok(RateResolver::new(cache, fetchers))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xrate starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let resolver = build_resolver(&config, &exchange_api_key())?;

    match command {
        AppCommand::Quote(pair) => cli::quote::run_quote(&resolver, pair).await,
        AppCommand::Convert { asset, amount } => {
            cli::quote::run_convert(&resolver, asset, amount).await
        }
        AppCommand::Rates => cli::rates::run(&resolver).await,
        AppCommand::Chat => cli::chat::run(&resolver).await,
    }
}
