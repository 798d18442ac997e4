//! Market data model
//!
//! Every fundamental is an `Option<f64>`: a field the provider could not
//! supply is `None` and stays `None` through classification, formatting and
//! prompt rendering. It is never replaced by zero.

use crate::error::{Result, StockError};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lookback period for price history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    YearToDate,
}

impl Period {
    /// Provider range code ("1mo", "1y", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::YearToDate => "ytd",
        }
    }

    /// First instant covered by the period when it ends at `end`
    pub fn start(&self, end: DateTime<Utc>) -> DateTime<Utc> {
        let days = match self {
            Period::OneMonth => 30,
            Period::ThreeMonths => 90,
            Period::SixMonths => 180,
            Period::OneYear => 365,
            Period::TwoYears => 730,
            Period::FiveYears => 1825,
            Period::YearToDate => {
                return NaiveDate::from_ymd_opt(end.year(), 1, 1)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map_or(end, |d| d.and_utc());
            }
        };
        end - chrono::Duration::days(days)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1mo" => Ok(Period::OneMonth),
            "3mo" => Ok(Period::ThreeMonths),
            "6mo" => Ok(Period::SixMonths),
            "1y" => Ok(Period::OneYear),
            "2y" => Ok(Period::TwoYears),
            "5y" => Ok(Period::FiveYears),
            "ytd" => Ok(Period::YearToDate),
            other => Err(StockError::ConfigError(format!("Invalid period: {other}"))),
        }
    }
}

/// One trading day of OHLCV data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Daily price history in ascending date order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    bars: Vec<PriceBar>,
}

impl PriceHistory {
    /// Build a history, sorting bars chronologically
    pub fn new(mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self { bars }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The last `n` bars (all of them when fewer exist)
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    /// Closing prices in order
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Percentage change from the first to the last close in the window
    pub fn percent_change(&self) -> Option<f64> {
        let first = self.bars.first()?.close;
        let last = self.bars.last()?.close;
        if first == 0.0 || !first.is_finite() || !last.is_finite() {
            return None;
        }
        Some((last / first - 1.0) * 100.0)
    }
}

/// Descriptive and fundamental data for one ticker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub ticker: String,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub business_summary: Option<String>,

    pub current_price: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub market_cap: Option<f64>,
    pub eps: Option<f64>,
    pub forward_eps: Option<f64>,
    pub book_value: Option<f64>,
    pub price_to_book: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub operating_margin: Option<f64>,
    pub profit_margin: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub earnings_quarterly_growth: Option<f64>,
    pub beta: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
}

impl StockSnapshot {
    /// A snapshot with only the ticker set
    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Default::default()
        }
    }

    /// Long name when known, otherwise the ticker
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.ticker)
    }
}

/// The unit cached per (ticker, period): fundamentals plus history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockData {
    pub snapshot: StockSnapshot,
    pub history: PriceHistory,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn bar(day: u32, close: f64) -> PriceBar {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1)
            .map(|d| d + chrono::Duration::days(i64::from(day)))
            .unwrap();
        PriceBar {
            date,
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            volume: 1_000_000 + u64::from(day),
        }
    }

    pub fn history(closes: &[f64]) -> PriceHistory {
        PriceHistory::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, c)| bar(i as u32, *c))
                .collect(),
        )
    }

    pub fn apple() -> StockSnapshot {
        StockSnapshot {
            ticker: "AAPL".to_string(),
            name: Some("Apple Inc.".to_string()),
            sector: Some("Technology".to_string()),
            industry: Some("Consumer Electronics".to_string()),
            country: Some("United States".to_string()),
            website: Some("https://www.apple.com".to_string()),
            business_summary: Some("Apple designs smartphones and personal computers.".to_string()),
            current_price: Some(187.44),
            pe_ratio: Some(29.13),
            forward_pe: Some(26.7),
            peg_ratio: Some(2.41),
            dividend_yield: Some(0.0051),
            market_cap: Some(2_910_000_000_000.0),
            eps: Some(6.43),
            forward_eps: Some(7.02),
            book_value: Some(4.79),
            price_to_book: Some(39.1),
            debt_to_equity: Some(145.8),
            return_on_equity: Some(1.47),
            free_cash_flow: Some(84_700_000_000.0),
            operating_margin: Some(0.301),
            profit_margin: Some(0.253),
            revenue_growth: Some(0.021),
            earnings_growth: Some(0.109),
            earnings_quarterly_growth: Some(0.108),
            beta: Some(1.29),
            fifty_two_week_low: Some(164.08),
            fifty_two_week_high: Some(199.62),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_history_sorted_and_tail() {
        let history = PriceHistory::new(vec![bar(3, 13.0), bar(1, 11.0), bar(2, 12.0)]);

        assert_eq!(history.closes(), vec![11.0, 12.0, 13.0]);
        assert_eq!(history.tail(2).len(), 2);
        assert_eq!(history.tail(2)[0].close, 12.0);
        assert_eq!(history.tail(50).len(), 3);
        assert_eq!(history.last_close(), Some(13.0));
    }

    #[test]
    fn test_percent_change() {
        let history = history(&[100.0, 90.0, 110.0]);
        let change = history.percent_change().unwrap();
        assert!((change - 10.0).abs() < 1e-9);

        assert_eq!(PriceHistory::default().percent_change(), None);
        assert_eq!(super::fixtures::history(&[0.0, 1.0]).percent_change(), None);
    }

    #[test]
    fn test_period_parse_and_display() {
        assert_eq!("1y".parse::<Period>().unwrap(), Period::OneYear);
        assert_eq!(" 1MO ".parse::<Period>().unwrap(), Period::OneMonth);
        assert!("7w".parse::<Period>().is_err());
        assert_eq!(Period::OneMonth.to_string(), "1mo");
    }

    #[test]
    fn test_period_start() {
        let end = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc();
        assert_eq!((end - Period::OneYear.start(end)).num_days(), 365);
        assert_eq!(Period::YearToDate.start(end).month(), 1);
        assert_eq!(Period::YearToDate.start(end).day(), 1);
    }

    #[test]
    fn test_display_name_falls_back_to_ticker() {
        assert_eq!(StockSnapshot::empty("MSFT").display_name(), "MSFT");
        assert_eq!(apple().display_name(), "Apple Inc.");
    }
}
