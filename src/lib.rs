#![deny(missing_docs)]

//! Core library for SumItUp, a text and document summarizer with sentiment scoring.

/// HTTP routing, the single-page UI and JSON handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Text extraction for `.txt`, `.pdf` and `.docx` uploads.
pub mod document;
/// Structured logging and tracing setup.
pub mod logging;
/// Usage counters exposed on `/metrics`.
pub mod metrics;
/// Summarization model abstraction and backends.
pub mod model;
/// Request routing from raw input to summary and sentiment.
pub mod pipeline;
/// Lexicon-based sentiment scoring.
pub mod sentiment;
/// Summarization facade over the loaded model.
pub mod summarizer;
