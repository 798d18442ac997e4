//! Configuration for the stock advisor

use crate::cache::DEFAULT_TTL;
use crate::error::{Result, StockError};
use crate::model::Period;
use advisor_utils::load_secrets;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Model used for every analysis
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_MAX_TOKENS: usize = 4000;
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Environment override for the model id
pub const MODEL_VAR: &str = "ADVISOR_MODEL";
/// Environment override for the dashboard bind address
pub const BIND_VAR: &str = "ADVISOR_BIND";

/// Configuration for the advisor service and its surfaces
#[derive(Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Model identifier sent to the provider
    pub model: String,

    /// Token cap for one analysis
    pub max_tokens: usize,

    /// Lifetime of cached ticker data
    pub cache_ttl: Duration,

    /// Timeout for market data requests
    pub request_timeout: Duration,

    /// Timeout for one model completion
    pub model_timeout: Duration,

    /// History window for the ticker view
    pub history_period: Period,

    /// History window for the market basket
    pub market_period: Period,

    /// Dashboard listen address
    pub bind_addr: String,

    /// Anthropic API key, `None` when not configured
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            cache_ttl: DEFAULT_TTL,
            request_timeout: Duration::from_secs(30),
            model_timeout: Duration::from_secs(120),
            history_period: Period::OneYear,
            market_period: Period::OneMonth,
            bind_addr: DEFAULT_BIND.to_string(),
            api_key: None,
        }
    }
}

impl std::fmt::Debug for AdvisorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisorConfig")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("cache_ttl", &self.cache_ttl)
            .field("request_timeout", &self.request_timeout)
            .field("model_timeout", &self.model_timeout)
            .field("history_period", &self.history_period)
            .field("market_period", &self.market_period)
            .field("bind_addr", &self.bind_addr)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AdvisorConfig {
    /// Create a new configuration builder
    pub fn builder() -> AdvisorConfigBuilder {
        AdvisorConfigBuilder::default()
    }

    /// Defaults plus secrets from `env_file` and environment overrides
    pub fn from_env(env_file: impl AsRef<Path>) -> Result<Self> {
        let secrets = load_secrets(env_file)?;
        let config = Self {
            api_key: secrets.anthropic_api_key,
            ..Self::default()
        }
        .with_overrides(
            std::env::var(MODEL_VAR).ok(),
            std::env::var(BIND_VAR).ok(),
        );

        config.validate()?;
        Ok(config)
    }

    /// Replace the model and bind address with non-empty override values
    pub fn with_overrides(mut self, model: Option<String>, bind_addr: Option<String>) -> Self {
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.model = model.trim().to_string();
        }
        if let Some(bind_addr) = bind_addr.filter(|b| !b.trim().is_empty()) {
            self.bind_addr = bind_addr.trim().to_string();
        }
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Parsed dashboard listen address, checked only when serving
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .map_err(|e| StockError::ConfigError(format!("Invalid bind address '{}': {e}", self.bind_addr)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(StockError::ConfigError("model must not be empty".to_string()));
        }

        if self.max_tokens == 0 {
            return Err(StockError::ConfigError(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.cache_ttl.is_zero() {
            return Err(StockError::ConfigError(
                "cache_ttl must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() || self.model_timeout.is_zero() {
            return Err(StockError::ConfigError(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AdvisorConfig
#[derive(Debug, Default)]
pub struct AdvisorConfigBuilder {
    model: Option<String>,
    max_tokens: Option<usize>,
    cache_ttl: Option<Duration>,
    request_timeout: Option<Duration>,
    model_timeout: Option<Duration>,
    history_period: Option<Period>,
    market_period: Option<Period>,
    bind_addr: Option<String>,
    api_key: Option<String>,
}

impl AdvisorConfigBuilder {
    /// Set the model id
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the token cap
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the cache TTL
    pub fn cache_ttl(mut self, duration: Duration) -> Self {
        self.cache_ttl = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the model completion timeout
    pub fn model_timeout(mut self, duration: Duration) -> Self {
        self.model_timeout = Some(duration);
        self
    }

    pub fn history_period(mut self, period: Period) -> Self {
        self.history_period = Some(period);
        self
    }

    pub fn market_period(mut self, period: Period) -> Self {
        self.market_period = Some(period);
        self
    }

    /// Set the dashboard listen address
    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = Some(addr.into());
        self
    }

    /// Set the Anthropic API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AdvisorConfig> {
        let defaults = AdvisorConfig::default();

        let config = AdvisorConfig {
            model: self.model.unwrap_or(defaults.model),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            model_timeout: self.model_timeout.unwrap_or(defaults.model_timeout),
            history_period: self.history_period.unwrap_or(defaults.history_period),
            market_period: self.market_period.unwrap_or(defaults.market_period),
            bind_addr: self.bind_addr.unwrap_or(defaults.bind_addr),
            api_key: self.api_key,
        };

        config.validate()?;
        Ok(config)
    }
}
