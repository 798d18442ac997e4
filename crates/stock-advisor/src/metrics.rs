//! Metric classification and number formatting
//!
//! Classification maps a named fundamental and its value to a qualitative
//! status using fixed thresholds. Percent-style metrics are fractions
//! (`0.15` is 15%). Both the classifier and the formatters are total: any
//! value that cannot be read as a finite number falls back instead of failing.

use crate::model::StockSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder rendered for values that are not available
pub const NOT_AVAILABLE: &str = "N/A";

/// Qualitative reading of a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Positive,
    Neutral,
    Negative,
}

impl MetricStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricStatus::Positive => "positive",
            MetricStatus::Neutral => "neutral",
            MetricStatus::Negative => "negative",
        }
    }

    /// Dashboard caption
    pub fn label(&self) -> &'static str {
        match self {
            MetricStatus::Positive => "Favorable",
            MetricStatus::Neutral => "Neutral",
            MetricStatus::Negative => "Concerning",
        }
    }

    /// Dashboard accent colour
    pub fn color(&self) -> &'static str {
        match self {
            MetricStatus::Positive => "#2E7D32",
            MetricStatus::Neutral => "#757575",
            MetricStatus::Negative => "#C62828",
        }
    }
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value as it reaches the classifier or a formatter
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// The provider did not supply the field
    Missing,
    Number(f64),
    /// Free text, coerced permissively when read as a number
    Text(String),
}

impl MetricValue {
    /// The value as a finite number, if it can be read as one
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            MetricValue::Missing => return None,
            MetricValue::Number(n) => *n,
            MetricValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        number.is_finite().then_some(number)
    }

    fn is_not_available(&self) -> bool {
        match self {
            MetricValue::Missing => true,
            MetricValue::Text(s) => s.trim() == NOT_AVAILABLE,
            MetricValue::Number(_) => false,
        }
    }

    fn fallback_text(&self) -> String {
        match self {
            MetricValue::Missing => NOT_AVAILABLE.to_string(),
            MetricValue::Number(n) => n.to_string(),
            MetricValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(MetricValue::Missing, MetricValue::Number)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

/// Fundamentals shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    PeRatio,
    ForwardPe,
    PegRatio,
    Eps,
    DividendYield,
    BookValue,
    PriceToBook,
    ReturnOnEquity,
    DebtToEquity,
    FreeCashFlow,
    OperatingMargin,
    ProfitMargin,
    RevenueGrowth,
    EarningsGrowth,
}

/// Comparison direction and cut points for a metric
enum Thresholds {
    /// Lower is better: `< good` positive, `< bad` neutral, else negative
    LowerIsBetter { good: f64, bad: f64 },
    /// Higher is better: `> good` positive, `> 0` neutral, else negative
    HigherIsBetter { good: f64 },
    /// `> good` positive, anything else neutral
    BonusOnly { good: f64 },
}

impl Metric {
    /// Dashboard order, four columns of three
    pub const DASHBOARD: [Metric; 12] = [
        Metric::PeRatio,
        Metric::ForwardPe,
        Metric::PegRatio,
        Metric::Eps,
        Metric::DividendYield,
        Metric::BookValue,
        Metric::PriceToBook,
        Metric::ReturnOnEquity,
        Metric::DebtToEquity,
        Metric::FreeCashFlow,
        Metric::OperatingMargin,
        Metric::ProfitMargin,
    ];

    /// Display name, also the name accepted by [`classify`]
    pub fn name(&self) -> &'static str {
        match self {
            Metric::PeRatio => "P/E Ratio",
            Metric::ForwardPe => "Forward P/E",
            Metric::PegRatio => "PEG Ratio",
            Metric::Eps => "EPS",
            Metric::DividendYield => "Dividend Yield",
            Metric::BookValue => "Book Value",
            Metric::PriceToBook => "Price to Book",
            Metric::ReturnOnEquity => "Return on Equity",
            Metric::DebtToEquity => "Debt to Equity",
            Metric::FreeCashFlow => "Free Cash Flow",
            Metric::OperatingMargin => "Operating Margin",
            Metric::ProfitMargin => "Profit Margin",
            Metric::RevenueGrowth => "Revenue Growth",
            Metric::EarningsGrowth => "Earnings Growth",
        }
    }

    /// Look a metric up by its display name
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        [
            Metric::PeRatio,
            Metric::ForwardPe,
            Metric::PegRatio,
            Metric::Eps,
            Metric::DividendYield,
            Metric::BookValue,
            Metric::PriceToBook,
            Metric::ReturnOnEquity,
            Metric::DebtToEquity,
            Metric::FreeCashFlow,
            Metric::OperatingMargin,
            Metric::ProfitMargin,
            Metric::RevenueGrowth,
            Metric::EarningsGrowth,
        ]
        .into_iter()
        .find(|m| m.name() == name)
    }

    fn thresholds(&self) -> Option<Thresholds> {
        match self {
            Metric::PeRatio | Metric::ForwardPe => {
                Some(Thresholds::LowerIsBetter { good: 15.0, bad: 25.0 })
            }
            Metric::PriceToBook => Some(Thresholds::LowerIsBetter { good: 1.5, bad: 3.0 }),
            Metric::DebtToEquity => Some(Thresholds::LowerIsBetter { good: 0.5, bad: 1.5 }),
            Metric::PegRatio => Some(Thresholds::LowerIsBetter { good: 1.0, bad: 2.0 }),
            Metric::DividendYield => Some(Thresholds::BonusOnly { good: 0.03 }),
            Metric::RevenueGrowth | Metric::EarningsGrowth | Metric::ReturnOnEquity => {
                Some(Thresholds::HigherIsBetter { good: 0.15 })
            }
            Metric::OperatingMargin | Metric::ProfitMargin => {
                Some(Thresholds::HigherIsBetter { good: 0.20 })
            }
            Metric::Eps | Metric::BookValue | Metric::FreeCashFlow => None,
        }
    }

    /// Classify a numeric value of this metric
    pub fn status(&self, value: f64) -> MetricStatus {
        if !value.is_finite() {
            return MetricStatus::Neutral;
        }
        match self.thresholds() {
            Some(Thresholds::LowerIsBetter { good, bad }) => {
                if value < good {
                    MetricStatus::Positive
                } else if value < bad {
                    MetricStatus::Neutral
                } else {
                    MetricStatus::Negative
                }
            }
            Some(Thresholds::HigherIsBetter { good }) => {
                if value > good {
                    MetricStatus::Positive
                } else if value > 0.0 {
                    MetricStatus::Neutral
                } else {
                    MetricStatus::Negative
                }
            }
            Some(Thresholds::BonusOnly { good }) => {
                if value > good {
                    MetricStatus::Positive
                } else {
                    MetricStatus::Neutral
                }
            }
            None => MetricStatus::Neutral,
        }
    }

    /// Raw value of this metric on a snapshot
    pub fn value(&self, snapshot: &StockSnapshot) -> Option<f64> {
        match self {
            Metric::PeRatio => snapshot.pe_ratio,
            Metric::ForwardPe => snapshot.forward_pe,
            Metric::PegRatio => snapshot.peg_ratio,
            Metric::Eps => snapshot.eps,
            Metric::DividendYield => snapshot.dividend_yield,
            Metric::BookValue => snapshot.book_value,
            Metric::PriceToBook => snapshot.price_to_book,
            Metric::ReturnOnEquity => snapshot.return_on_equity,
            Metric::DebtToEquity => snapshot.debt_to_equity,
            Metric::FreeCashFlow => snapshot.free_cash_flow,
            Metric::OperatingMargin => snapshot.operating_margin,
            Metric::ProfitMargin => snapshot.profit_margin,
            Metric::RevenueGrowth => snapshot.revenue_growth,
            Metric::EarningsGrowth => snapshot.earnings_growth,
        }
    }

    /// Value rendered the way the dashboard shows it
    pub fn display(&self, value: Option<f64>) -> String {
        let Some(value) = value else {
            return NOT_AVAILABLE.to_string();
        };
        match self {
            Metric::DividendYield
            | Metric::ReturnOnEquity
            | Metric::OperatingMargin
            | Metric::ProfitMargin
            | Metric::RevenueGrowth
            | Metric::EarningsGrowth => format_percentage(value),
            Metric::FreeCashFlow => format_large_number(value),
            Metric::Eps | Metric::BookValue => format!("${value}"),
            Metric::PeRatio
            | Metric::ForwardPe
            | Metric::PegRatio
            | Metric::PriceToBook
            | Metric::DebtToEquity => format!("{value:.2}"),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a metric given by name
///
/// Unknown names, missing values and values that do not read as a finite
/// number are all [`MetricStatus::Neutral`].
pub fn classify(metric_name: &str, value: impl Into<MetricValue>) -> MetricStatus {
    let value = value.into();
    match (Metric::from_name(metric_name), value.as_number()) {
        (Some(metric), Some(number)) => metric.status(number),
        _ => MetricStatus::Neutral,
    }
}

/// Format a currency amount with a B/M/K suffix (`$1.50B`)
pub fn format_large_number(value: impl Into<MetricValue>) -> String {
    let value = value.into();
    if value.is_not_available() {
        return NOT_AVAILABLE.to_string();
    }
    let Some(num) = value.as_number() else {
        return value.fallback_text();
    };

    if num >= 1_000_000_000.0 {
        format!("${:.2}B", num / 1_000_000_000.0)
    } else if num >= 1_000_000.0 {
        format!("${:.2}M", num / 1_000_000.0)
    } else if num >= 1_000.0 {
        format!("${:.2}K", num / 1_000.0)
    } else {
        format!("${num:.2}")
    }
}

/// Format a fraction as a percentage (`0.1523` → `15.23%`)
pub fn format_percentage(value: impl Into<MetricValue>) -> String {
    let value = value.into();
    if value.is_not_available() {
        return NOT_AVAILABLE.to_string();
    }
    match value.as_number() {
        Some(num) => format!("{:.2}%", num * 100.0),
        None => value.fallback_text(),
    }
}

/// One cell of the key-metrics grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub metric: Metric,
    pub label: &'static str,
    pub display: String,
    pub status: MetricStatus,
    pub status_label: &'static str,
    pub color: &'static str,
}

/// Key metrics for a snapshot, classified on the raw values
pub fn key_metrics(snapshot: &StockSnapshot) -> Vec<MetricCard> {
    Metric::DASHBOARD
        .iter()
        .map(|metric| {
            let raw = metric.value(snapshot);
            let status = classify(metric.name(), raw);
            MetricCard {
                metric: *metric,
                label: metric.name(),
                display: metric.display(raw),
                status,
                status_label: status.label(),
                color: status.color(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::apple;

    #[test]
    fn test_pe_boundaries() {
        for name in ["P/E Ratio", "Forward P/E"] {
            assert_eq!(classify(name, 14.99), MetricStatus::Positive);
            assert_eq!(classify(name, 15.0), MetricStatus::Neutral);
            assert_eq!(classify(name, 24.99), MetricStatus::Neutral);
            assert_eq!(classify(name, 25.0), MetricStatus::Negative);
        }
    }

    #[test]
    fn test_price_to_book_boundaries() {
        assert_eq!(classify("Price to Book", 1.49), MetricStatus::Positive);
        assert_eq!(classify("Price to Book", 1.5), MetricStatus::Neutral);
        assert_eq!(classify("Price to Book", 3.0), MetricStatus::Negative);
    }

    #[test]
    fn test_dividend_yield_never_negative() {
        assert_eq!(classify("Dividend Yield", 0.031), MetricStatus::Positive);
        assert_eq!(classify("Dividend Yield", 0.03), MetricStatus::Neutral);
        assert_eq!(classify("Dividend Yield", 0.0), MetricStatus::Neutral);
        assert_eq!(classify("Dividend Yield", -0.01), MetricStatus::Neutral);
    }

    #[test]
    fn test_growth_and_roe_boundaries() {
        for name in ["Revenue Growth", "Earnings Growth", "Return on Equity"] {
            assert_eq!(classify(name, 0.151), MetricStatus::Positive);
            assert_eq!(classify(name, 0.15), MetricStatus::Neutral);
            assert_eq!(classify(name, 0.001), MetricStatus::Neutral);
            assert_eq!(classify(name, 0.0), MetricStatus::Negative);
            assert_eq!(classify(name, -0.2), MetricStatus::Negative);
        }
    }

    #[test]
    fn test_debt_to_equity_boundaries() {
        assert_eq!(classify("Debt to Equity", 0.49), MetricStatus::Positive);
        assert_eq!(classify("Debt to Equity", 0.5), MetricStatus::Neutral);
        assert_eq!(classify("Debt to Equity", 1.5), MetricStatus::Negative);
    }

    #[test]
    fn test_margin_boundaries() {
        for name in ["Operating Margin", "Profit Margin"] {
            assert_eq!(classify(name, 0.21), MetricStatus::Positive);
            assert_eq!(classify(name, 0.20), MetricStatus::Neutral);
            assert_eq!(classify(name, 0.0), MetricStatus::Negative);
        }
    }

    #[test]
    fn test_peg_boundaries() {
        assert_eq!(classify("PEG Ratio", 0.99), MetricStatus::Positive);
        assert_eq!(classify("PEG Ratio", 1.0), MetricStatus::Neutral);
        assert_eq!(classify("PEG Ratio", 2.0), MetricStatus::Negative);
    }

    #[test]
    fn test_unknown_metric_is_neutral() {
        assert_eq!(classify("Beta", 0.1), MetricStatus::Neutral);
        assert_eq!(classify("EPS", -3.0), MetricStatus::Neutral);
        assert_eq!(classify("", 100.0), MetricStatus::Neutral);
    }

    #[test]
    fn test_classify_is_total() {
        assert_eq!(classify("P/E Ratio", MetricValue::Missing), MetricStatus::Neutral);
        assert_eq!(classify("P/E Ratio", None), MetricStatus::Neutral);
        assert_eq!(classify("P/E Ratio", "N/A"), MetricStatus::Neutral);
        assert_eq!(classify("P/E Ratio", "abc"), MetricStatus::Neutral);
        assert_eq!(classify("P/E Ratio", f64::NAN), MetricStatus::Neutral);
        assert_eq!(classify("P/E Ratio", f64::INFINITY), MetricStatus::Neutral);
        assert_eq!(classify("P/E Ratio", "15.23%"), MetricStatus::Neutral);
    }

    #[test]
    fn test_classify_coerces_text() {
        assert_eq!(classify("P/E Ratio", " 12.5 "), MetricStatus::Positive);
        assert_eq!(classify("Revenue Growth", "-0.05"), MetricStatus::Negative);
        assert_eq!(classify("PEG Ratio", String::from("3")), MetricStatus::Negative);
    }

    #[test]
    fn test_format_large_number() {
        assert_eq!(format_large_number(1_500_000_000.0), "$1.50B");
        assert_eq!(format_large_number(2_500_000.0), "$2.50M");
        assert_eq!(format_large_number(1_000.0), "$1.00K");
        assert_eq!(format_large_number(999.0), "$999.00");
        assert_eq!(format_large_number(MetricValue::Missing), "N/A");
        assert_eq!(format_large_number(None), "N/A");
        assert_eq!(format_large_number("N/A"), "N/A");
        assert_eq!(format_large_number("1500"), "$1.50K");
        assert_eq!(format_large_number("n/a-ish"), "n/a-ish");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.1523), "15.23%");
        assert_eq!(format_percentage(-0.05), "-5.00%");
        assert_eq!(format_percentage(MetricValue::Missing), "N/A");
        assert_eq!(format_percentage("N/A"), "N/A");
        assert_eq!(format_percentage("bogus"), "bogus");
    }

    #[test]
    fn test_metric_name_round_trip() {
        for metric in Metric::DASHBOARD {
            assert_eq!(Metric::from_name(metric.name()), Some(metric));
        }
        assert_eq!(Metric::from_name("Operating Margins"), None);
    }

    #[test]
    fn test_key_metrics_use_raw_values() {
        let cards = key_metrics(&apple());
        assert_eq!(cards.len(), 12);

        let pe = &cards[0];
        assert_eq!(pe.label, "P/E Ratio");
        assert_eq!(pe.display, "29.13");
        assert_eq!(pe.status, MetricStatus::Negative);

        let margin = cards
            .iter()
            .find(|c| c.metric == Metric::OperatingMargin)
            .unwrap();
        assert_eq!(margin.display, "30.10%");
        assert_eq!(margin.status, MetricStatus::Positive);

        let fcf = cards.iter().find(|c| c.metric == Metric::FreeCashFlow).unwrap();
        assert_eq!(fcf.display, "$84.70B");
        assert_eq!(fcf.status, MetricStatus::Neutral);
    }

    #[test]
    fn test_key_metrics_missing_values() {
        let cards = key_metrics(&StockSnapshot::empty("XYZ"));
        assert!(cards.iter().all(|c| c.display == "N/A"));
        assert!(cards.iter().all(|c| c.status == MetricStatus::Neutral));
    }
}
