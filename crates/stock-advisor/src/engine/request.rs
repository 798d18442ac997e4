//! Analysis requests: which ticker, which mode, which persona

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Kind of analysis to request from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalysisMode {
    /// Fundamentals read through a famous investor's lens
    InvestorStyle,
    IntrinsicValue,
    Technical,
    ElliottWave,
    /// Broad market conditions, independent of the ticker
    MarketCondition,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 5] = [
        AnalysisMode::InvestorStyle,
        AnalysisMode::IntrinsicValue,
        AnalysisMode::Technical,
        AnalysisMode::ElliottWave,
        AnalysisMode::MarketCondition,
    ];

    /// Short identifier used by the CLI and the dashboard form
    pub fn slug(&self) -> &'static str {
        match self {
            AnalysisMode::InvestorStyle => "investor",
            AnalysisMode::IntrinsicValue => "intrinsic",
            AnalysisMode::Technical => "technical",
            AnalysisMode::ElliottWave => "elliott",
            AnalysisMode::MarketCondition => "market",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisMode::InvestorStyle => "Famous Investor Style",
            AnalysisMode::IntrinsicValue => "Intrinsic Value",
            AnalysisMode::Technical => "Technical Analysis",
            AnalysisMode::ElliottWave => "Elliott Wave",
            AnalysisMode::MarketCondition => "Market Conditions",
        }
    }

    /// Whether the mode is rendered per persona
    pub fn uses_persona(&self) -> bool {
        matches!(self, AnalysisMode::InvestorStyle)
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for AnalysisMode {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "investor" | "investor-style" | "famous-investor-style" => Ok(AnalysisMode::InvestorStyle),
            "intrinsic" | "intrinsic-value" => Ok(AnalysisMode::IntrinsicValue),
            "technical" | "technical-analysis" => Ok(AnalysisMode::Technical),
            "elliott" | "elliott-wave" => Ok(AnalysisMode::ElliottWave),
            "market" | "market-condition" | "market-conditions" => Ok(AnalysisMode::MarketCondition),
            _ => Err(StockError::InvalidRequest(format!("Unknown analysis mode: {s}"))),
        }
    }
}

/// Investing style used by [`AnalysisMode::InvestorStyle`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Persona {
    #[default]
    Buffett,
    Lynch,
    Munger,
    Dalio,
    Wood,
    /// Plain fundamentals review for names that match no persona
    Generic,
}

impl Persona {
    /// Personas offered by the surfaces
    pub const NAMED: [Persona; 5] = [
        Persona::Buffett,
        Persona::Lynch,
        Persona::Munger,
        Persona::Dalio,
        Persona::Wood,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Persona::Buffett => "Warren Buffett",
            Persona::Lynch => "Peter Lynch",
            Persona::Munger => "Charlie Munger",
            Persona::Dalio => "Ray Dalio",
            Persona::Wood => "Cathie Wood",
            Persona::Generic => "an Independent Analyst",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Persona::Buffett => "buffett",
            Persona::Lynch => "lynch",
            Persona::Munger => "munger",
            Persona::Dalio => "dalio",
            Persona::Wood => "wood",
            Persona::Generic => "generic",
        }
    }

    /// Map a free-form name to a persona; anything unknown is [`Persona::Generic`]
    pub fn parse(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        Persona::NAMED
            .into_iter()
            .find(|p| name == p.slug() || name == p.display_name().to_lowercase())
            .unwrap_or(Persona::Generic)
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Persona {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Persona::parse(s))
    }
}

/// A single analysis request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub ticker: String,
    pub mode: AnalysisMode,
    /// Only consulted for [`AnalysisMode::InvestorStyle`]
    pub persona: Persona,
}

impl AnalysisRequest {
    pub fn new(ticker: impl Into<String>, mode: AnalysisMode) -> Self {
        Self {
            ticker: ticker.into(),
            mode,
            persona: Persona::default(),
        }
    }

    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    /// Heading shown above the analysis
    pub fn title(&self) -> String {
        match self.mode {
            AnalysisMode::InvestorStyle => match self.persona {
                Persona::Generic => "Stock Analysis".to_string(),
                persona => format!("{}'s Analysis", persona.display_name()),
            },
            AnalysisMode::IntrinsicValue => "Intrinsic Value Analysis".to_string(),
            AnalysisMode::Technical => "Technical Analysis".to_string(),
            AnalysisMode::ElliottWave => "Elliott Wave Analysis".to_string(),
            AnalysisMode::MarketCondition => "Market Condition Analysis".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("investor".parse::<AnalysisMode>().unwrap(), AnalysisMode::InvestorStyle);
        assert_eq!("Elliott Wave".parse::<AnalysisMode>().unwrap(), AnalysisMode::ElliottWave);
        assert_eq!("intrinsic_value".parse::<AnalysisMode>().unwrap(), AnalysisMode::IntrinsicValue);
        assert!(matches!(
            "astrology".parse::<AnalysisMode>(),
            Err(StockError::InvalidRequest(_))
        ));
        for mode in AnalysisMode::ALL {
            assert_eq!(mode.slug().parse::<AnalysisMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_persona_parse_falls_back_to_generic() {
        assert_eq!(Persona::parse("Warren Buffett"), Persona::Buffett);
        assert_eq!(Persona::parse(" lynch "), Persona::Lynch);
        assert_eq!(Persona::parse("CATHIE WOOD"), Persona::Wood);
        assert_eq!(Persona::parse("George Soros"), Persona::Generic);
        assert_eq!("".parse::<Persona>().unwrap(), Persona::Generic);
    }

    #[test]
    fn test_titles() {
        let request = AnalysisRequest::new("AAPL", AnalysisMode::InvestorStyle).with_persona(Persona::Dalio);
        assert_eq!(request.title(), "Ray Dalio's Analysis");

        let request = AnalysisRequest::new("AAPL", AnalysisMode::InvestorStyle).with_persona(Persona::Generic);
        assert_eq!(request.title(), "Stock Analysis");

        let request = AnalysisRequest::new("AAPL", AnalysisMode::ElliottWave);
        assert_eq!(request.title(), "Elliott Wave Analysis");
    }

    #[test]
    fn test_only_investor_mode_uses_persona() {
        let using: Vec<_> = AnalysisMode::ALL.iter().filter(|m| m.uses_persona()).collect();
        assert_eq!(using, vec![&AnalysisMode::InvestorStyle]);
    }
}
