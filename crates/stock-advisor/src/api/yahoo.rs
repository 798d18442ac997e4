//! Yahoo Finance market data
//!
//! Daily bars come from the chart API through `yahoo_finance_api`; the
//! fundamentals come from the `quoteSummary` endpoint, which the crate does
//! not cover, so that part is a plain `reqwest` call. `quoteSummary` only
//! answers requests that carry a session cookie and the matching crumb, so
//! the provider performs that handshake once and repeats it after a 401.

use super::MarketDataProvider;
use crate::error::{Result, StockError};
use crate::model::{Period, PriceBar, PriceHistory, StockSnapshot};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use yahoo_finance_api as yahoo;

const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query2.finance.yahoo.com/v1/test/getcrumb";
const SUMMARY_MODULES: &str =
    "price,summaryProfile,summaryDetail,financialData,defaultKeyStatistics";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; stock-advisor/0.1)";

/// Yahoo Finance backed [`MarketDataProvider`]
#[derive(Debug, Clone)]
pub struct YahooProvider {
    client: Client,
    summary_url: String,
    crumb: Arc<Mutex<Option<String>>>,
}

impl YahooProvider {
    /// Create a provider with a 30 second request timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a provider with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            summary_url: QUOTE_SUMMARY_URL.to_string(),
            crumb: Arc::new(Mutex::new(None)),
        })
    }

    /// Point the fundamentals lookup at another base URL
    pub fn with_summary_url(mut self, url: impl Into<String>) -> Self {
        self.summary_url = url.into();
        self
    }

    fn to_offset(at: DateTime<Utc>) -> Result<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(at.timestamp())
            .map_err(|e| StockError::YahooFinanceError(format!("Invalid timestamp: {e}")))
    }

    /// Session crumb, fetched on first use
    async fn crumb(&self) -> Result<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // fc.yahoo.com answers 404 but sets the session cookie
        self.client.get(COOKIE_URL).send().await?;

        let response = self.client.get(CRUMB_URL).send().await?;
        let status = response.status();
        let crumb = response.text().await?.trim().to_string();
        if !status.is_success() || crumb.is_empty() || crumb.contains('<') {
            return Err(StockError::YahooFinanceError(format!(
                "Failed to obtain session crumb (HTTP {status})"
            )));
        }

        debug!("Obtained Yahoo session crumb");
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    async fn reset_crumb(&self) {
        *self.crumb.lock().await = None;
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    #[instrument(skip(self))]
    async fn history(&self, symbol: &str, period: Period) -> Result<PriceHistory> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let end = Utc::now();
        let start = Self::to_offset(period.start(end))?;
        let end = Self::to_offset(end)?;

        let response = provider
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| StockError::YahooFinanceError(e.to_string()))?;

        let bars: Vec<PriceBar> = quotes
            .iter()
            .filter_map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
                Some(PriceBar {
                    date,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .collect();

        debug!(bars = bars.len(), "Fetched price history");
        Ok(PriceHistory::new(bars))
    }

    #[instrument(skip(self))]
    async fn snapshot(&self, symbol: &str) -> Result<StockSnapshot> {
        let crumb = self.crumb().await?;
        let url = format!("{}/{symbol}", self.summary_url);
        let response = self
            .client
            .get(&url)
            .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            // stale session, handshake again on the next call
            self.reset_crumb().await;
        }
        check_status(symbol, status, &body)?;

        parse_quote_summary(symbol, &body)
    }
}

/// Yahoo's error envelope for rejected requests
#[derive(Debug, Deserialize)]
struct FinanceErrorEnvelope {
    finance: FinanceError,
}

#[derive(Debug, Deserialize)]
struct FinanceError {
    error: SummaryError,
}

/// Turn a non-success `quoteSummary` response into an error
///
/// A 404 means Yahoo has no such symbol and becomes
/// [`StockError::DataUnavailable`]; every other failure status becomes
/// [`StockError::YahooFinanceError`] carrying the status code and Yahoo's
/// description when the body has one.
pub fn check_status(symbol: &str, status: StatusCode, body: &str) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }

    let detail = serde_json::from_str::<FinanceErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.finance.error)
        .or_else(|| {
            serde_json::from_str::<QuoteSummaryEnvelope>(body)
                .ok()
                .and_then(|envelope| envelope.quote_summary.error)
        })
        .and_then(|error| error.description.or(error.code));

    warn!(%status, detail = detail.as_deref().unwrap_or(""), "quoteSummary request failed");

    let reason = match detail {
        Some(detail) => format!("HTTP {status}: {detail}"),
        None => format!("HTTP {status}"),
    };

    if status == StatusCode::NOT_FOUND {
        return Err(StockError::DataUnavailable {
            symbol: symbol.to_string(),
            reason,
        });
    }
    Err(StockError::YahooFinanceError(reason))
}

/// Parse a `quoteSummary` response body into a snapshot
///
/// Fields the response omits stay `None`.
pub fn parse_quote_summary(symbol: &str, body: &str) -> Result<StockSnapshot> {
    let envelope: QuoteSummaryEnvelope = serde_json::from_str(body)?;
    let summary = envelope.quote_summary;

    if let Some(error) = summary.error {
        return Err(StockError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: error
                .description
                .or(error.code)
                .unwrap_or_else(|| "unknown error".to_string()),
        });
    }

    let modules = summary
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| StockError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: "No summary data returned".to_string(),
        })?;

    Ok(modules.into_snapshot(symbol))
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    #[serde(default)]
    result: Option<Vec<SummaryModules>>,
    #[serde(default)]
    error: Option<SummaryError>,
}

#[derive(Debug, Deserialize)]
struct SummaryError {
    code: Option<String>,
    description: Option<String>,
}

/// Yahoo wraps numbers as `{"raw": 1.5, "fmt": "1.50"}`
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

fn raw(value: Option<&RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw).filter(|v| v.is_finite())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SummaryModules {
    price: Option<PriceModule>,
    #[serde(rename = "summaryProfile")]
    summary_profile: Option<ProfileModule>,
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<DetailModule>,
    #[serde(rename = "financialData")]
    financial_data: Option<FinancialModule>,
    #[serde(rename = "defaultKeyStatistics")]
    key_statistics: Option<KeyStatisticsModule>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
    regular_market_price: Option<RawValue>,
    market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProfileModule {
    sector: Option<String>,
    industry: Option<String>,
    country: Option<String>,
    website: Option<String>,
    long_business_summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DetailModule {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    #[serde(rename = "forwardPE")]
    forward_pe: Option<RawValue>,
    #[serde(rename = "dividendYield")]
    dividend_yield: Option<RawValue>,
    #[serde(rename = "marketCap")]
    market_cap: Option<RawValue>,
    #[serde(rename = "fiftyTwoWeekLow")]
    fifty_two_week_low: Option<RawValue>,
    #[serde(rename = "fiftyTwoWeekHigh")]
    fifty_two_week_high: Option<RawValue>,
    beta: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FinancialModule {
    current_price: Option<RawValue>,
    debt_to_equity: Option<RawValue>,
    return_on_equity: Option<RawValue>,
    free_cashflow: Option<RawValue>,
    operating_margins: Option<RawValue>,
    profit_margins: Option<RawValue>,
    revenue_growth: Option<RawValue>,
    earnings_growth: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct KeyStatisticsModule {
    peg_ratio: Option<RawValue>,
    trailing_eps: Option<RawValue>,
    forward_eps: Option<RawValue>,
    book_value: Option<RawValue>,
    price_to_book: Option<RawValue>,
    earnings_quarterly_growth: Option<RawValue>,
    #[serde(rename = "forwardPE")]
    forward_pe: Option<RawValue>,
}

impl SummaryModules {
    fn into_snapshot(self, symbol: &str) -> StockSnapshot {
        let price = self.price.unwrap_or_default();
        let profile = self.summary_profile.unwrap_or_default();
        let detail = self.summary_detail.unwrap_or_default();
        let financial = self.financial_data.unwrap_or_default();
        let stats = self.key_statistics.unwrap_or_default();

        StockSnapshot {
            ticker: symbol.to_string(),
            name: price.long_name.or(price.short_name),
            sector: profile.sector,
            industry: profile.industry,
            country: profile.country,
            website: profile.website,
            business_summary: profile.long_business_summary,

            current_price: raw(financial.current_price.as_ref())
                .or_else(|| raw(price.regular_market_price.as_ref())),
            pe_ratio: raw(detail.trailing_pe.as_ref()),
            forward_pe: raw(detail.forward_pe.as_ref()).or_else(|| raw(stats.forward_pe.as_ref())),
            peg_ratio: raw(stats.peg_ratio.as_ref()),
            dividend_yield: raw(detail.dividend_yield.as_ref()),
            market_cap: raw(price.market_cap.as_ref()).or_else(|| raw(detail.market_cap.as_ref())),
            eps: raw(stats.trailing_eps.as_ref()),
            forward_eps: raw(stats.forward_eps.as_ref()),
            book_value: raw(stats.book_value.as_ref()),
            price_to_book: raw(stats.price_to_book.as_ref()),
            debt_to_equity: raw(financial.debt_to_equity.as_ref()),
            return_on_equity: raw(financial.return_on_equity.as_ref()),
            free_cash_flow: raw(financial.free_cashflow.as_ref()),
            operating_margin: raw(financial.operating_margins.as_ref()),
            profit_margin: raw(financial.profit_margins.as_ref()),
            revenue_growth: raw(financial.revenue_growth.as_ref()),
            earnings_growth: raw(financial.earnings_growth.as_ref()),
            earnings_quarterly_growth: raw(stats.earnings_quarterly_growth.as_ref()),
            beta: raw(detail.beta.as_ref()),
            fifty_two_week_low: raw(detail.fifty_two_week_low.as_ref()),
            fifty_two_week_high: raw(detail.fifty_two_week_high.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = r#"{
        "quoteSummary": {
            "result": [{
                "price": {
                    "longName": "Apple Inc.",
                    "shortName": "Apple",
                    "regularMarketPrice": {"raw": 187.0, "fmt": "187.00"},
                    "marketCap": {"raw": 2910000000000, "fmt": "2.91T"}
                },
                "summaryProfile": {
                    "sector": "Technology",
                    "industry": "Consumer Electronics",
                    "country": "United States",
                    "website": "https://www.apple.com",
                    "longBusinessSummary": "Apple designs smartphones."
                },
                "summaryDetail": {
                    "trailingPE": {"raw": 29.13, "fmt": "29.13"},
                    "forwardPE": {"raw": 26.7},
                    "dividendYield": {"raw": 0.0051},
                    "fiftyTwoWeekLow": {"raw": 164.08},
                    "fiftyTwoWeekHigh": {"raw": 199.62},
                    "beta": {"raw": 1.29}
                },
                "financialData": {
                    "currentPrice": {"raw": 187.44},
                    "debtToEquity": {"raw": 145.8},
                    "returnOnEquity": {"raw": 1.47},
                    "freeCashflow": {"raw": 84700000000},
                    "operatingMargins": {"raw": 0.301},
                    "profitMargins": {"raw": 0.253},
                    "revenueGrowth": {"raw": 0.021},
                    "earningsGrowth": {}
                },
                "defaultKeyStatistics": {
                    "pegRatio": {"raw": 2.41},
                    "trailingEps": {"raw": 6.43},
                    "forwardEps": {"raw": 7.02},
                    "bookValue": {"raw": 4.79},
                    "priceToBook": {"raw": 39.1},
                    "earningsQuarterlyGrowth": {"raw": 0.108}
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_quote_summary() {
        let snapshot = parse_quote_summary("AAPL", SUMMARY).unwrap();

        assert_eq!(snapshot.ticker, "AAPL");
        assert_eq!(snapshot.name.as_deref(), Some("Apple Inc."));
        assert_eq!(snapshot.sector.as_deref(), Some("Technology"));
        assert_eq!(snapshot.current_price, Some(187.44));
        assert_eq!(snapshot.pe_ratio, Some(29.13));
        assert_eq!(snapshot.market_cap, Some(2_910_000_000_000.0));
        assert_eq!(snapshot.free_cash_flow, Some(84_700_000_000.0));
        assert_eq!(snapshot.peg_ratio, Some(2.41));
        assert_eq!(snapshot.beta, Some(1.29));
    }

    #[test]
    fn test_absent_fields_stay_none() {
        let snapshot = parse_quote_summary("AAPL", SUMMARY).unwrap();
        assert_eq!(snapshot.earnings_growth, None);

        let minimal = r#"{"quoteSummary": {"result": [{"price": {"shortName": "Tiny"}}], "error": null}}"#;
        let snapshot = parse_quote_summary("TINY", minimal).unwrap();
        assert_eq!(snapshot.name.as_deref(), Some("Tiny"));
        assert_eq!(snapshot.pe_ratio, None);
        assert_eq!(snapshot.current_price, None);
        assert_eq!(snapshot.business_summary, None);
    }

    #[test]
    fn test_summary_error_is_data_unavailable() {
        let body = r#"{"quoteSummary": {"result": null, "error": {"code": "Not Found", "description": "Quote not found for symbol: ZZZZ"}}}"#;
        let err = parse_quote_summary("ZZZZ", body).unwrap_err();
        assert!(matches!(err, StockError::DataUnavailable { ref symbol, .. } if symbol == "ZZZZ"));
        assert!(err.to_string().contains("Quote not found"));
    }

    #[test]
    fn test_empty_result_is_data_unavailable() {
        let body = r#"{"quoteSummary": {"result": [], "error": null}}"#;
        assert!(matches!(
            parse_quote_summary("X", body),
            Err(StockError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn test_malformed_body_is_json_error() {
        assert!(matches!(
            parse_quote_summary("X", "<html>"),
            Err(StockError::JsonError(_))
        ));
    }

    #[test]
    fn test_unauthorized_status_is_reported() {
        let body = r#"{"finance":{"result":null,"error":{"code":"Unauthorized","description":"Invalid Crumb"}}}"#;
        let err = check_status("AAPL", StatusCode::UNAUTHORIZED, body).unwrap_err();

        assert!(matches!(err, StockError::YahooFinanceError(_)));
        assert_eq!(
            err.to_string(),
            "Yahoo Finance error: HTTP 401 Unauthorized: Invalid Crumb"
        );
    }

    #[test]
    fn test_not_found_status_is_data_unavailable() {
        let body = r#"{"quoteSummary": {"result": null, "error": {"code": "Not Found", "description": "Quote not found for symbol: ZZZZ"}}}"#;
        let err = check_status("ZZZZ", StatusCode::NOT_FOUND, body).unwrap_err();

        assert!(matches!(err, StockError::DataUnavailable { ref symbol, .. } if symbol == "ZZZZ"));
        assert!(err.to_string().contains("HTTP 404 Not Found: Quote not found for symbol: ZZZZ"));
    }

    #[test]
    fn test_status_without_error_body() {
        let err = check_status("AAPL", StatusCode::BAD_GATEWAY, "<html>").unwrap_err();
        assert_eq!(err.to_string(), "Yahoo Finance error: HTTP 502 Bad Gateway");
    }

    #[test]
    fn test_success_status_passes() {
        assert!(check_status("AAPL", StatusCode::OK, SUMMARY).is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_history_live() {
        let provider = YahooProvider::new().unwrap();
        let history = provider.history("AAPL", Period::OneMonth).await.unwrap();
        assert!(!history.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_snapshot_live() {
        let provider = YahooProvider::new().unwrap();
        let snapshot = provider.snapshot("AAPL").await.unwrap();
        assert!(snapshot.name.is_some());
    }
}
