//! Pre-trained summarization models reached through a single generate call.
//!
//! The facade in [`crate::summarizer`] only sees the [`SummarizationModel`] trait. The Ollama
//! adapter talks to a local runtime over HTTP; the extractive model runs in-process and needs no
//! runtime at all. Both are built once by [`load_model`] and shared read-only afterwards.

mod extractive;
mod ollama;

pub use extractive::ExtractiveModel;
pub use ollama::OllamaModel;

use crate::config::{Config, SummarizationProvider};
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a model while generating a summary.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Runtime could not be reached.
    #[error("Summarization provider unavailable: {0}")]
    Unavailable(String),
    /// Runtime returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Runtime response could not be used.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Errors raised while constructing a model. These abort startup.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    /// Runtime could not be reached while checking for the checkpoint.
    #[error("Failed to reach summarization runtime at {url}: {reason}")]
    Unreachable {
        /// Runtime base URL.
        url: String,
        /// Transport error description.
        reason: String,
    },
    /// Checkpoint is missing and offline mode forbids fetching it.
    #[error("Model '{0}' is not available locally and offline mode is enabled")]
    NotAvailableOffline(String),
    /// Runtime refused to provide the checkpoint.
    #[error("Failed to load summarization model '{model}': {reason}")]
    LoadFailed {
        /// Checkpoint name.
        model: String,
        /// Runtime response description.
        reason: String,
    },
}

/// A single summarization call with its length bounds.
///
/// `min_length` never exceeds `max_length`; [`SummaryRequest::new`] clamps it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    /// Text handed to the model.
    pub text: String,
    /// Upper bound on the summary length.
    pub max_length: u32,
    /// Lower bound on the summary length.
    pub min_length: u32,
}

impl SummaryRequest {
    /// Build a request, clamping `min_length` down to `max_length`.
    pub fn new(text: impl Into<String>, max_length: u32, min_length: u32) -> Self {
        Self {
            text: text.into(),
            max_length,
            min_length: min_length.min(max_length),
        }
    }
}

/// Interface implemented by summarization backends.
#[async_trait]
pub trait SummarizationModel: Send + Sync {
    /// Produce a summary for the request. Decoding is deterministic.
    async fn generate(&self, request: &SummaryRequest) -> Result<String, ModelError>;

    /// Identifier of the checkpoint behind this model, for logs and responses.
    fn name(&self) -> &str;
}

/// Construct the model selected by configuration.
pub async fn load_model(
    config: &Config,
) -> Result<Box<dyn SummarizationModel>, ModelLoadError> {
    match config.summarization_provider {
        SummarizationProvider::Extractive => {
            tracing::info!("Using extractive summarization model");
            Ok(Box::new(ExtractiveModel::new()))
        }
        SummarizationProvider::Ollama => {
            tracing::info!(
                model = %config.summarization_model,
                url = %config.ollama_url,
                offline = config.offline,
                force_cpu = config.force_cpu,
                "Loading summarization model"
            );
            let model = OllamaModel::connect(
                &config.ollama_url,
                &config.summarization_model,
                config.offline,
                config.force_cpu,
            )
            .await?;
            Ok(Box::new(model))
        }
    }
}
