pub mod coingecko;
pub mod exchangerate_api;
pub mod http;

pub use coingecko::CoinGeckoFetcher;
pub use exchangerate_api::ExchangeRateApiFetcher;
