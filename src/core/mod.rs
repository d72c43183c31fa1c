//! Rate resolution and caching

pub mod asset;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod log;
pub mod resolver;

// Re-export main types for cleaner imports
pub use asset::{Asset, RatePair, Route};
pub use cache::{CacheEntry, RateCache};
pub use error::RateError;
pub use fetcher::RateFetcher;
pub use resolver::{ConversionBreakdown, Quote, RateResolver};
