//! Broad market basket: index returns, volatility and sector performance
//!
//! The basket is fetched one symbol at a time. A failure on any symbol
//! degrades the whole snapshot to "not available" rather than erroring, so
//! the market-condition prompt can always be built.

use crate::api::MarketDataProvider;
use crate::error::Result;
use crate::model::Period;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Index ETFs and the volatility index polled alongside the sectors
pub const INDEX_SYMBOLS: [&str; 3] = ["SPY", "QQQ", "IWM"];
pub const VIX_SYMBOL: &str = "^VIX";

/// Market sectors tracked through their SPDR select sector ETFs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    Technology,
    Financial,
    Healthcare,
    Energy,
    ConsumerDiscretionary,
    ConsumerStaples,
    Industrial,
    Materials,
    Utilities,
    RealEstate,
}

impl Sector {
    /// Every sector in prompt order
    pub const ALL: [Sector; 10] = [
        Sector::Technology,
        Sector::Financial,
        Sector::Healthcare,
        Sector::Energy,
        Sector::ConsumerDiscretionary,
        Sector::ConsumerStaples,
        Sector::Industrial,
        Sector::Materials,
        Sector::Utilities,
        Sector::RealEstate,
    ];

    /// Get sector ETF ticker
    pub fn etf_ticker(&self) -> &'static str {
        match self {
            Sector::Technology => "XLK",
            Sector::Financial => "XLF",
            Sector::Healthcare => "XLV",
            Sector::Energy => "XLE",
            Sector::ConsumerDiscretionary => "XLY",
            Sector::ConsumerStaples => "XLP",
            Sector::Industrial => "XLI",
            Sector::Materials => "XLB",
            Sector::Utilities => "XLU",
            Sector::RealEstate => "XLRE",
        }
    }

    /// Get sector name
    pub fn name(&self) -> &'static str {
        match self {
            Sector::Technology => "Technology",
            Sector::Financial => "Financial",
            Sector::Healthcare => "Healthcare",
            Sector::Energy => "Energy",
            Sector::ConsumerDiscretionary => "Consumer Discretionary",
            Sector::ConsumerStaples => "Consumer Staples",
            Sector::Industrial => "Industrial",
            Sector::Materials => "Materials",
            Sector::Utilities => "Utilities",
            Sector::RealEstate => "Real Estate",
        }
    }
}

/// Point-in-time view of the broad market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Percent return over the period
    pub spy: Option<f64>,
    pub qqq: Option<f64>,
    pub iwm: Option<f64>,
    /// Latest VIX level
    pub vix: Option<f64>,
    /// Percent return per sector, always in [`Sector::ALL`] order
    pub sectors: Vec<(Sector, Option<f64>)>,
}

impl MarketSnapshot {
    /// A snapshot with every value unavailable
    pub fn unavailable() -> Self {
        Self {
            spy: None,
            qqq: None,
            iwm: None,
            vix: None,
            sectors: Sector::ALL.iter().map(|s| (*s, None)).collect(),
        }
    }

    /// Percent return rendered as `X.XX%`
    pub fn format_return(value: Option<f64>) -> String {
        value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}%"))
    }

    pub fn vix_display(&self) -> String {
        self.vix.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
    }

    /// Sector returns as a JSON-style object, one sector per line
    pub fn sector_block(&self) -> Result<String> {
        let block: serde_json::Map<String, serde_json::Value> = self
            .sectors
            .iter()
            .map(|(sector, value)| (sector.name().to_string(), Self::format_return(*value).into()))
            .collect();
        Ok(serde_json::to_string_pretty(&block)?)
    }
}

impl Default for MarketSnapshot {
    fn default() -> Self {
        Self::unavailable()
    }
}

async fn period_return(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    period: Period,
) -> Result<Option<f64>> {
    let history = provider.history(symbol, period).await?;
    Ok(history.percent_change())
}

async fn collect(provider: &dyn MarketDataProvider, period: Period) -> Result<MarketSnapshot> {
    let spy = period_return(provider, INDEX_SYMBOLS[0], period).await?;
    let qqq = period_return(provider, INDEX_SYMBOLS[1], period).await?;
    let iwm = period_return(provider, INDEX_SYMBOLS[2], period).await?;
    let vix = provider.history(VIX_SYMBOL, period).await?.last_close();

    let mut sectors = Vec::with_capacity(Sector::ALL.len());
    for sector in Sector::ALL {
        let value = period_return(provider, sector.etf_ticker(), period).await?;
        sectors.push((sector, value));
    }

    Ok(MarketSnapshot {
        spy,
        qqq,
        iwm,
        vix,
        sectors,
    })
}

/// Fetch the market basket over `period`
///
/// Never fails: any provider error is logged and yields
/// [`MarketSnapshot::unavailable`].
#[instrument(skip(provider))]
pub async fn fetch_market_snapshot(
    provider: &dyn MarketDataProvider,
    period: Period,
) -> MarketSnapshot {
    match collect(provider, period).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(error = %e, "Market basket unavailable");
            MarketSnapshot::unavailable()
        }
    }
}
