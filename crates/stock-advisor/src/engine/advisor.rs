//! The stock advisor service

use super::request::{AnalysisMode, AnalysisRequest};
use super::result::Analysis;
use crate::api::{MarketDataProvider, YahooProvider};
use crate::cache::{CacheKey, StockCache};
use crate::config::AdvisorConfig;
use crate::error::{Result, StockError};
use crate::formatter::{escape_markup, format_response};
use crate::market::{MarketSnapshot, fetch_market_snapshot};
use crate::model::{StockData, StockSnapshot};
use crate::prompts::PromptBuilder;
use advisor_llm::providers::AnthropicProvider;
use advisor_llm::{CompletionRequest, LLMError, LLMProvider, Message};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Loads market data, builds prompts and runs analyses
pub struct StockAdvisor {
    provider: Arc<dyn MarketDataProvider>,
    cache: StockCache,
    prompts: PromptBuilder,
    llm: Option<Arc<dyn LLMProvider>>,
    config: AdvisorConfig,
}

impl StockAdvisor {
    /// Create an advisor from explicit collaborators
    ///
    /// `llm` is `None` when no API key is configured; data views still work
    /// and [`StockAdvisor::analyze`] reports [`StockError::MissingApiKey`].
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        llm: Option<Arc<dyn LLMProvider>>,
        config: AdvisorConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            provider,
            cache: StockCache::new(config.cache_ttl),
            prompts: PromptBuilder::new()?,
            llm,
            config,
        })
    }

    /// Create an advisor backed by Yahoo Finance and Anthropic
    pub fn from_config(config: AdvisorConfig) -> Result<Self> {
        let provider = Arc::new(YahooProvider::with_timeout(config.request_timeout)?);

        let llm: Option<Arc<dyn LLMProvider>> = match config.api_key.as_deref() {
            Some(key) => {
                let llm = AnthropicProvider::with_timeout(key, config.model_timeout)?;
                Some(Arc::new(llm) as Arc<dyn LLMProvider>)
            }
            None => {
                warn!("No API key configured, analyses are disabled");
                None
            }
        };

        Self::new(provider, llm, config)
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    pub fn cache(&self) -> &StockCache {
        &self.cache
    }

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Whether a model provider is available
    pub fn can_analyze(&self) -> bool {
        self.llm.is_some()
    }

    /// Trim and upper-case user input, rejecting empty tickers
    pub fn normalize_ticker(raw: &str) -> Result<String> {
        let ticker = raw.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(StockError::InvalidSymbol(
                "Please enter a valid ticker symbol".to_string(),
            ));
        }
        Ok(ticker)
    }

    /// Fundamentals and history for a ticker, through the cache
    #[instrument(skip(self))]
    pub async fn load_stock(&self, ticker: &str) -> Result<StockData> {
        let ticker = Self::normalize_ticker(ticker)?;
        let key = CacheKey::new(ticker.clone(), self.config.history_period);

        self.cache
            .get_or_fetch(key, || self.fetch_stock(&ticker))
            .await
    }

    async fn fetch_stock(&self, ticker: &str) -> Result<StockData> {
        let history = self
            .provider
            .history(ticker, self.config.history_period)
            .await?;

        if history.is_empty() {
            return Err(StockError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: format!(
                    "Could not fetch data for {ticker}. Please check the ticker symbol."
                ),
            });
        }

        let snapshot = match self.provider.snapshot(ticker).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Fundamentals unavailable, continuing with price history");
                StockSnapshot::empty(ticker)
            }
        };

        info!(bars = history.len(), "Loaded stock data");
        Ok(StockData { snapshot, history })
    }

    /// Current market basket
    pub async fn market_snapshot(&self) -> MarketSnapshot {
        fetch_market_snapshot(self.provider.as_ref(), self.config.market_period).await
    }

    /// Prompt text for a request
    ///
    /// Market-condition requests fetch the basket first and ignore `data`.
    pub async fn build_prompt(&self, request: &AnalysisRequest, data: &StockData) -> Result<String> {
        let ticker = request.ticker.as_str();
        match request.mode {
            AnalysisMode::InvestorStyle => {
                self.prompts
                    .investor(request.persona, ticker, &data.snapshot)
            }
            AnalysisMode::IntrinsicValue => self.prompts.intrinsic_value(ticker, &data.snapshot),
            AnalysisMode::Technical => self.prompts.technical(ticker, &data.history),
            AnalysisMode::ElliottWave => self.prompts.elliott_wave(ticker, &data.history),
            AnalysisMode::MarketCondition => {
                let market = self.market_snapshot().await;
                self.prompts.market_condition(&market)
            }
        }
    }

    /// Run one analysis: build the prompt, call the model once, style the answer
    #[instrument(skip(self, data), fields(ticker = %request.ticker, mode = %request.mode))]
    pub async fn analyze(&self, request: &AnalysisRequest, data: &StockData) -> Result<Analysis> {
        let llm = self.llm.as_ref().ok_or(StockError::MissingApiKey)?;

        let prompt = self.build_prompt(request, data).await?;

        let completion = CompletionRequest::builder(&self.config.model)
            .add_message(Message::user(prompt.clone()))
            .max_tokens(self.config.max_tokens)
            .build();

        let response = llm.complete(completion).await?;
        let raw_text = response
            .text()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or(LLMError::EmptyResponse)?
            .to_string();

        info!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Analysis complete"
        );

        Ok(Analysis {
            request: request.clone(),
            title: request.title(),
            formatted: format_response(&escape_markup(&raw_text)),
            prompt,
            raw_text,
            usage: response.usage,
            created_at: Utc::now(),
        })
    }
}

impl std::fmt::Debug for StockAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockAdvisor")
            .field("cache", &self.cache)
            .field("llm", &self.llm.as_ref().map(|llm| llm.name().to_string()))
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
