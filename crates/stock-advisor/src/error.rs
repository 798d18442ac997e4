//! Error types for stock advisor operations

use thiserror::Error;

/// Stock advisor errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Malformed analysis request (unknown mode and similar)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Technical indicator calculation error
    #[error("Indicator error: {0}")]
    IndicatorError(String),

    /// Prompt template error
    #[error("Prompt error: {0}")]
    Prompt(#[from] advisor_prompt::PromptError),

    /// Model invocation error
    #[error("Model error: {0}")]
    Llm(#[from] advisor_llm::LLMError),

    /// No API key configured for the model provider
    #[error("API key is missing. Please check your configuration.")]
    MissingApiKey,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

impl From<advisor_utils::ConfigError> for StockError {
    fn from(err: advisor_utils::ConfigError) -> Self {
        StockError::ConfigError(err.to_string())
    }
}

impl StockError {
    /// Whether the error came from fetching market data (as opposed to the model)
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            StockError::InvalidSymbol(_)
                | StockError::DataUnavailable { .. }
                | StockError::NetworkError(_)
                | StockError::JsonError(_)
                | StockError::YahooFinanceError(_)
        )
    }
}
