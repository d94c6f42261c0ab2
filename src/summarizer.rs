//! Summarization facade over a loaded [`SummarizationModel`].

use crate::model::{ModelError, SummarizationModel, SummaryRequest};
use serde::Serialize;
use thiserror::Error;

/// Failures reported by [`Summarizer::summarize`].
///
/// The `Display` output is the sentence shown to the user.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Input was empty or whitespace only.
    #[error("No text provided for summarization.")]
    EmptyInput,
    /// Model call failed.
    #[error("Error during summarization: {0}")]
    Inference(#[from] ModelError),
}

/// A generated summary and the parameters that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Summary text returned by the model.
    pub text: String,
    /// Checkpoint that produced the summary.
    pub model: String,
    /// Maximum length requested.
    pub max_length: u32,
    /// Minimum length actually sent to the model, after clamping.
    pub min_length: u32,
    /// Whether the input was cut to the character budget before inference.
    pub truncated: bool,
}

/// Owns a model instance and applies the input rules before every call.
pub struct Summarizer {
    model: Box<dyn SummarizationModel>,
    input_char_limit: Option<usize>,
}

impl Summarizer {
    /// Wrap a loaded model. `input_char_limit` truncates long inputs when set.
    pub fn new(model: Box<dyn SummarizationModel>, input_char_limit: Option<usize>) -> Self {
        Self {
            model,
            input_char_limit,
        }
    }

    /// Name of the underlying checkpoint.
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Summarize `text` between `min_length` and `max_length`.
    ///
    /// `min_length` is clamped to `max_length`. The model is called once.
    pub async fn summarize(
        &self,
        text: &str,
        max_length: u32,
        min_length: u32,
    ) -> Result<Summary, SummarizeError> {
        if text.trim().is_empty() {
            return Err(SummarizeError::EmptyInput);
        }
        // The character budget applies to content, not leading padding.
        let text = text.trim_start();

        let (input, truncated) = match self.input_char_limit {
            Some(limit) => truncate_chars(text, limit),
            None => (text, false),
        };
        if truncated {
            tracing::warn!(
                original_chars = text.chars().count(),
                limit = ?self.input_char_limit,
                "Input truncated before summarization"
            );
        }

        let request = SummaryRequest::new(input, max_length, min_length);
        tracing::debug!(
            model = %self.model.name(),
            input_chars = input.chars().count(),
            max_length = request.max_length,
            min_length = request.min_length,
            "Generating summary"
        );

        let text = self.model.generate(&request).await.map_err(|error| {
            tracing::warn!(error = %error, model = %self.model.name(), "Summarization failed");
            SummarizeError::from(error)
        })?;

        Ok(Summary {
            text,
            model: self.model.name().to_string(),
            max_length: request.max_length,
            min_length: request.min_length,
            truncated,
        })
    }
}

/// Keep at most `limit` characters, cutting on a char boundary.
fn truncate_chars(text: &str, limit: usize) -> (&str, bool) {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => (&text[..cut], true),
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExtractiveModel;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingModel {
        requests: Arc<Mutex<Vec<SummaryRequest>>>,
        fail: bool,
    }

    #[async_trait]
    impl SummarizationModel for RecordingModel {
        async fn generate(&self, request: &SummaryRequest) -> Result<String, ModelError> {
            self.requests.lock().expect("lock").push(request.clone());
            if self.fail {
                Err(ModelError::GenerationFailed("Ollama returned 500".into()))
            } else {
                Ok("summary".into())
            }
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test]
    async fn blank_input_returns_empty_input_without_calling_model() {
        let model = RecordingModel::default();
        let summarizer = Summarizer::new(Box::new(model.clone()), None);

        for input in ["", "   ", "\n\t"] {
            let error = summarizer.summarize(input, 250, 125).await.expect_err("blank");
            assert!(matches!(error, SummarizeError::EmptyInput));
            assert_eq!(error.to_string(), "No text provided for summarization.");
        }
        assert!(model.requests.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn min_length_is_clamped_before_reaching_model() {
        let model = RecordingModel::default();
        let summarizer = Summarizer::new(Box::new(model.clone()), None);

        let summary = summarizer
            .summarize("Some text to summarize.", 100, 400)
            .await
            .expect("summary");

        assert_eq!(summary.min_length, 100);
        let requests = model.requests.lock().expect("lock");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].min_length, 100);
        assert_eq!(requests[0].max_length, 100);
    }

    #[tokio::test]
    async fn long_input_is_truncated_to_char_budget() {
        let model = RecordingModel::default();
        let summarizer = Summarizer::new(Box::new(model.clone()), Some(10));

        let summary = summarizer
            .summarize("ééééééééééééééé tail", 100, 50)
            .await
            .expect("summary");

        assert!(summary.truncated);
        let requests = model.requests.lock().expect("lock");
        assert_eq!(requests[0].text, "éééééééééé");
    }

    #[tokio::test]
    async fn leading_padding_does_not_consume_char_budget() {
        let model = RecordingModel::default();
        let summarizer = Summarizer::new(Box::new(model.clone()), Some(1024));
        let input = format!("{}Real content here. More content follows.", " ".repeat(1100));

        let summary = summarizer.summarize(&input, 100, 50).await.expect("summary");

        assert!(!summary.truncated);
        let requests = model.requests.lock().expect("lock");
        assert_eq!(requests[0].text, "Real content here. More content follows.");
    }

    #[tokio::test]
    async fn padded_document_still_summarizes_with_extractive_model() {
        let summarizer = Summarizer::new(Box::new(ExtractiveModel::new()), Some(1024));
        let input = format!("{}Real content here. More content follows.", "\n ".repeat(600));

        let summary = summarizer.summarize(&input, 100, 50).await.expect("summary");

        assert!(summary.text.contains("Real content"));
    }

    #[tokio::test]
    async fn model_failure_becomes_inference_error() {
        let model = RecordingModel {
            fail: true,
            ..RecordingModel::default()
        };
        let summarizer = Summarizer::new(Box::new(model), None);

        let error = summarizer
            .summarize("Some text.", 100, 50)
            .await
            .expect_err("failure");
        assert!(matches!(error, SummarizeError::Inference(_)));
        assert!(
            error
                .to_string()
                .starts_with("Error during summarization: ")
        );
    }

    #[tokio::test]
    async fn quick_brown_fox_summary_is_not_longer_than_input() {
        let summarizer = Summarizer::new(Box::new(ExtractiveModel::new()), Some(1024));
        let input = "The quick brown fox jumps over the lazy dog.";

        let summary = summarizer.summarize(input, 100, 50).await.expect("summary");

        assert!(!summary.text.is_empty());
        assert!(
            summary.text.split_whitespace().count() <= input.split_whitespace().count()
        );
        assert!(!summary.truncated);
    }

    #[test]
    fn truncate_chars_reports_untouched_input() {
        assert_eq!(truncate_chars("short", 10), ("short", false));
        assert_eq!(truncate_chars("exactly", 7), ("exactly", false));
        assert_eq!(truncate_chars("abcdef", 3), ("abc", true));
    }
}
