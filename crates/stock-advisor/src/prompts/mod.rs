//! Prompt builders for the five analysis modes
//!
//! Templates live in [`templates`] and are rendered through a
//! [`PromptRegistry`]. Values are pre-formatted before rendering: a missing
//! fundamental renders as `N/A`, and currency fields only gain a `$` prefix
//! when a value is present.

mod templates;

pub use templates::*;

use crate::engine::Persona;
use crate::error::Result;
use crate::market::MarketSnapshot;
use crate::model::{PriceBar, PriceHistory, StockSnapshot};
use advisor_prompt::PromptRegistry;
use serde_json::json;

/// Bars of history embedded in the technical prompt
pub const TECHNICAL_BARS: usize = 50;
/// Bars of history embedded in the Elliott Wave prompt
pub const ELLIOTT_BARS: usize = 250;

const NOT_AVAILABLE: &str = "N/A";

/// Register all analysis prompts with the given registry
pub fn register_prompts(registry: &PromptRegistry) -> advisor_prompt::Result<()> {
    registry.register(investor_preamble()?);
    registry.register(buffett()?);
    registry.register(lynch()?);
    registry.register(munger()?);
    registry.register(dalio()?);
    registry.register(wood()?);
    registry.register(generic()?);

    registry.register(intrinsic_value()?);
    registry.register(technical()?);
    registry.register(elliott_wave()?);
    registry.register(market_condition()?);

    Ok(())
}

/// Registry name of a persona's instruction block
pub fn persona_template(persona: Persona) -> &'static str {
    match persona {
        Persona::Buffett => "investor.buffett",
        Persona::Lynch => "investor.lynch",
        Persona::Munger => "investor.munger",
        Persona::Dalio => "investor.dalio",
        Persona::Wood => "investor.wood",
        Persona::Generic => "investor.generic",
    }
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

fn currency(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("${v}"))
}

/// Bars as a JSON array of `{date, open, high, low, close, volume}` rows
pub fn history_json(bars: &[PriceBar]) -> Result<String> {
    Ok(serde_json::to_string(bars)?)
}

/// Builds prompt text for each analysis mode
#[derive(Debug)]
pub struct PromptBuilder {
    registry: PromptRegistry,
}

impl PromptBuilder {
    /// Create a builder with every analysis template registered
    pub fn new() -> Result<Self> {
        let registry = PromptRegistry::new();
        register_prompts(&registry)?;
        Ok(Self { registry })
    }

    pub fn registry(&self) -> &PromptRegistry {
        &self.registry
    }

    /// Fundamentals read in a persona's style
    pub fn investor(&self, persona: Persona, ticker: &str, snapshot: &StockSnapshot) -> Result<String> {
        let vars = json!({
            "ticker": ticker,
            "name": snapshot.display_name(),
            "investor": persona.display_name(),
            "business_summary": snapshot
                .business_summary
                .as_deref()
                .unwrap_or("No business summary available."),
            "current_price": currency(snapshot.current_price),
            "pe_ratio": number(snapshot.pe_ratio),
            "forward_pe": number(snapshot.forward_pe),
            "peg_ratio": number(snapshot.peg_ratio),
            "dividend_yield": number(snapshot.dividend_yield),
            "market_cap": currency(snapshot.market_cap),
            "eps": currency(snapshot.eps),
            "book_value": currency(snapshot.book_value),
            "price_to_book": number(snapshot.price_to_book),
            "debt_to_equity": number(snapshot.debt_to_equity),
            "return_on_equity": number(snapshot.return_on_equity),
            "free_cash_flow": currency(snapshot.free_cash_flow),
            "operating_margins": number(snapshot.operating_margin),
            "profit_margins": number(snapshot.profit_margin),
            "revenue_growth": number(snapshot.revenue_growth),
            "earnings_growth": number(snapshot.earnings_growth),
            "sector": snapshot.sector.as_deref().unwrap_or("Unknown"),
            "industry": snapshot.industry.as_deref().unwrap_or("Unknown"),
        });

        let preamble = self.registry.render("investor.preamble", &vars)?;
        let block = self.registry.render(persona_template(persona), &vars)?;

        Ok(format!("{preamble}\n\n{block}\n"))
    }

    /// Multi-method intrinsic value estimate
    pub fn intrinsic_value(&self, ticker: &str, snapshot: &StockSnapshot) -> Result<String> {
        let vars = json!({
            "ticker": ticker,
            "name": snapshot.display_name(),
            "current_price": currency(snapshot.current_price),
            "eps": currency(snapshot.eps),
            "forward_eps": currency(snapshot.forward_eps),
            "book_value": currency(snapshot.book_value),
            "free_cash_flow": currency(snapshot.free_cash_flow),
            "earnings_growth": number(snapshot.earnings_growth),
            "earnings_quarterly_growth": number(snapshot.earnings_quarterly_growth),
            "pe_ratio": number(snapshot.pe_ratio),
            "dividend_yield": number(snapshot.dividend_yield),
            "beta": number(snapshot.beta),
        });

        Ok(self.registry.render("intrinsic_value", &vars)? + "\n")
    }

    /// Indicator-driven technical read over the last 50 bars
    pub fn technical(&self, ticker: &str, history: &PriceHistory) -> Result<String> {
        let vars = json!({
            "ticker": ticker,
            "history": history_json(history.tail(TECHNICAL_BARS))?,
        });

        Ok(self.registry.render("technical", &vars)? + "\n")
    }

    /// Elliott Wave count over the last 250 bars
    pub fn elliott_wave(&self, ticker: &str, history: &PriceHistory) -> Result<String> {
        let vars = json!({
            "ticker": ticker,
            "history": history_json(history.tail(ELLIOTT_BARS))?,
        });

        Ok(self.registry.render("elliott_wave", &vars)? + "\n")
    }

    /// Broad market review from a basket snapshot
    pub fn market_condition(&self, market: &MarketSnapshot) -> Result<String> {
        let vars = json!({
            "spy": MarketSnapshot::format_return(market.spy),
            "qqq": MarketSnapshot::format_return(market.qqq),
            "iwm": MarketSnapshot::format_return(market.iwm),
            "vix": market.vix_display(),
            "sectors": market.sector_block()?,
        });

        Ok(self.registry.render("market_condition", &vars)? + "\n")
    }
}
