//! Input routing: pasted text or uploaded document, then summary and sentiment.

mod service;
pub mod types;

pub use service::{AnalysisApi, SumItUp};
pub use types::{Analysis, AnalysisError, Origin, SourceText, SummaryLength};
