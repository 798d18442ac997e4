//! Analysis service
//!
//! Coordinates data loading, prompt building, the model call and response
//! styling.

pub mod advisor;
pub mod request;
pub mod result;

pub use advisor::StockAdvisor;
pub use request::{AnalysisMode, AnalysisRequest, Persona};
pub use result::Analysis;
