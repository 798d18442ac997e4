//! Market data providers

pub mod yahoo;

use crate::error::Result;
use crate::model::{Period, PriceHistory, StockSnapshot};
use async_trait::async_trait;

pub use yahoo::YahooProvider;

/// Source of price history and fundamentals
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars for `symbol` over `period`, oldest first
    async fn history(&self, symbol: &str, period: Period) -> Result<PriceHistory>;

    /// Descriptive data and fundamentals for `symbol`
    async fn snapshot(&self, symbol: &str) -> Result<StockSnapshot>;
}
