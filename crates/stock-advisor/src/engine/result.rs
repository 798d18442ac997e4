//! Analysis result types

use super::request::AnalysisRequest;
use advisor_llm::TokenUsage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub request: AnalysisRequest,
    /// Heading shown above the analysis
    pub title: String,
    /// Prompt sent to the model
    pub prompt: String,
    /// Model text as received
    pub raw_text: String,
    /// Styled markup produced from `raw_text`
    pub formatted: String,
    pub usage: TokenUsage,
    pub created_at: DateTime<Utc>,
}

impl Analysis {
    pub fn summary(&self) -> String {
        format!(
            "{} for {} ({} tokens)",
            self.title,
            self.request.ticker,
            self.usage.total()
        )
    }
}
