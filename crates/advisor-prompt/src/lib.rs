//! Prompt template management for stock-advisor
//!
//! Templates use Jinja2 syntax rendered by MiniJinja and are kept in a
//! thread-safe [`PromptRegistry`] keyed by name.
//!
//! # Quick Start
//!
//! ```
//! use advisor_prompt::{JinjaTemplate, PromptRegistry};
//! use serde_json::json;
//!
//! let registry = PromptRegistry::new();
//! registry.register(JinjaTemplate::new("analyzer", "Analyze {{ symbol }}").unwrap());
//!
//! let prompt = registry.render("analyzer", &json!({ "symbol": "AAPL" })).unwrap();
//! assert_eq!(prompt, "Analyze AAPL");
//! ```

mod error;
mod jinja;
mod registry;
mod template;

pub use error::{PromptError, Result};
pub use jinja::JinjaTemplate;
pub use registry::PromptRegistry;
pub use template::PromptTemplate;
