//! Trend signals from 50 and 200 day moving averages

use crate::error::{Result, StockError};
use crate::model::PriceHistory;
use serde::{Deserialize, Serialize};
use ta::{Next, indicators::SimpleMovingAverage};

pub const SHORT_WINDOW: usize = 50;
pub const LONG_WINDOW: usize = 200;
/// How many bars back a crossover is looked for
pub const CROSS_LOOKBACK: usize = 20;

/// Moving average with `None` until the window is full
pub fn moving_average(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    let mut sma =
        SimpleMovingAverage::new(period).map_err(|e| StockError::IndicatorError(e.to_string()))?;

    Ok(closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let value = sma.next(close);
            (i + 1 >= period).then_some(value)
        })
        .collect())
}

/// Latest close relative to a moving average
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaPosition {
    pub average: f64,
    /// `close - average`
    pub gap: f64,
}

impl MaPosition {
    fn new(close: f64, average: f64) -> Self {
        Self {
            average,
            gap: close - average,
        }
    }

    pub fn is_above(&self) -> bool {
        self.gap > 0.0
    }

    /// "Above MA50 by $3.21" style summary
    pub fn describe(&self, label: &str) -> String {
        let side = if self.is_above() { "Above" } else { "Below" };
        format!("{side} {label} by ${:.2}", self.gap.abs())
    }
}

/// Moving-average crossover within the lookback window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cross {
    /// MA50 moved above MA200
    Golden,
    /// MA50 moved below MA200
    Death,
}

impl Cross {
    pub fn message(&self) -> &'static str {
        match self {
            Cross::Golden => "Golden Cross detected (MA50 crossed above MA200) - Bullish signal",
            Cross::Death => "Death Cross detected (MA50 crossed below MA200) - Bearish signal",
        }
    }
}

/// Trend summary shown above the analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSignals {
    pub last_close: f64,
    pub ma50: MaPosition,
    pub ma200: MaPosition,
    pub cross: Option<Cross>,
}

/// Compute trend signals, or `None` when the history is too short
pub fn trend_signals(history: &PriceHistory) -> Result<Option<TrendSignals>> {
    if history.len() <= LONG_WINDOW {
        return Ok(None);
    }

    let closes = history.closes();
    let short = moving_average(&closes, SHORT_WINDOW)?;
    let long = moving_average(&closes, LONG_WINDOW)?;

    let last = closes.len() - 1;
    let (Some(short_now), Some(long_now)) = (short[last], long[last]) else {
        return Ok(None);
    };
    let last_close = closes[last];

    let before = closes.len() - CROSS_LOOKBACK;
    let cross = match (short[before], long[before]) {
        (Some(short_then), Some(long_then)) => {
            if short_now > long_now && short_then <= long_then {
                Some(Cross::Golden)
            } else if short_now < long_now && short_then >= long_then {
                Some(Cross::Death)
            } else {
                None
            }
        }
        _ => None,
    };

    Ok(Some(TrendSignals {
        last_close,
        ma50: MaPosition::new(last_close, short_now),
        ma200: MaPosition::new(last_close, long_now),
        cross,
    }))
}
