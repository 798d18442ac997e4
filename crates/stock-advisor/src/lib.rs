//! AI stock advisor
//!
//! Fetches price history and fundamentals for a ticker, classifies the key
//! metrics, builds a prompt for one of five analysis modes and asks a
//! language model for a written analysis, which is styled as HTML for the
//! dashboard. It includes:
//!
//! - Market data from Yahoo Finance, cached per ticker and period
//! - Metric classification and number formatting
//! - Moving-average trend signals (MA50, MA200, golden and death crosses)
//! - Famous-investor, intrinsic value, technical, Elliott Wave and market
//!   condition prompts
//! - A market basket of index, volatility and sector ETFs
//! - An axum dashboard and a command-line interface
//!
//! # Example
//!
//! ```rust,ignore
//! use stock_advisor::{AdvisorConfig, AnalysisMode, AnalysisRequest, Persona, StockAdvisor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let advisor = StockAdvisor::from_config(AdvisorConfig::from_env(".env")?)?;
//!
//!     let data = advisor.load_stock("AAPL").await?;
//!     let request = AnalysisRequest::new("AAPL", AnalysisMode::InvestorStyle)
//!         .with_persona(Persona::Lynch);
//!     let analysis = advisor.analyze(&request, &data).await?;
//!     println!("{}", analysis.raw_text);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod indicators;
pub mod market;
pub mod metrics;
pub mod model;
pub mod prompts;

pub use api::{MarketDataProvider, YahooProvider};
pub use cache::StockCache;
pub use config::AdvisorConfig;
pub use engine::{Analysis, AnalysisMode, AnalysisRequest, Persona, StockAdvisor};
pub use error::{Result, StockError};
pub use formatter::format_response;
pub use market::MarketSnapshot;
pub use metrics::{MetricStatus, classify, format_large_number, format_percentage};
pub use model::{Period, PriceHistory, StockData, StockSnapshot};
