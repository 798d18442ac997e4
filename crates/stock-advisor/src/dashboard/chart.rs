//! Inline SVG price chart
//!
//! Closing prices are drawn as one polyline; the 50 and 200 day moving
//! averages are overlaid once their windows fill.

use crate::error::Result;
use crate::indicators::{LONG_WINDOW, SHORT_WINDOW, moving_average};
use crate::model::PriceHistory;
use serde::Serialize;

pub const WIDTH: u32 = 1000;
pub const HEIGHT: u32 = 320;
const PADDING: f64 = 10.0;

/// Chart geometry handed to the page template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChart {
    pub width: u32,
    pub height: u32,
    /// `x,y` pairs for the close line
    pub close: String,
    pub ma50: Option<String>,
    pub ma200: Option<String>,
    pub low: String,
    pub high: String,
    pub start: String,
    pub end: String,
}

struct Scale {
    count: usize,
    low: f64,
    high: f64,
}

impl Scale {
    fn x(&self, index: usize) -> f64 {
        PADDING + index as f64 / (self.count - 1) as f64 * (f64::from(WIDTH) - 2.0 * PADDING)
    }

    fn y(&self, value: f64) -> f64 {
        let span = self.high - self.low;
        let ratio = if span > 0.0 { (value - self.low) / span } else { 0.5 };
        let height = f64::from(HEIGHT);
        height - PADDING - ratio * (height - 2.0 * PADDING)
    }

    fn points<'a>(&self, values: impl Iterator<Item = (usize, &'a f64)>) -> String {
        values
            .map(|(i, v)| format!("{:.1},{:.1}", self.x(i), self.y(*v)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn overlay(&self, series: &[Option<f64>]) -> Option<String> {
        let points: Vec<(usize, &f64)> = series
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (i, v)))
            .collect();
        (points.len() >= 2).then(|| self.points(points.into_iter()))
    }
}

impl PriceChart {
    /// Chart for `history`, `None` with fewer than two bars
    pub fn from_history(history: &PriceHistory) -> Result<Option<Self>> {
        let closes = history.closes();
        if closes.len() < 2 {
            return Ok(None);
        }

        let low = closes.iter().copied().fold(f64::INFINITY, f64::min);
        let high = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let scale = Scale {
            count: closes.len(),
            low,
            high,
        };

        let bars = history.bars();
        let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
            return Ok(None);
        };

        Ok(Some(Self {
            width: WIDTH,
            height: HEIGHT,
            close: scale.points(closes.iter().enumerate()),
            ma50: scale.overlay(&moving_average(&closes, SHORT_WINDOW)?),
            ma200: scale.overlay(&moving_average(&closes, LONG_WINDOW)?),
            low: format!("${low:.2}"),
            high: format!("${high:.2}"),
            start: first.date.to_string(),
            end: last.date.to_string(),
        }))
    }
}
