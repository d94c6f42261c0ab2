//! Service that routes a request through loading, summarization and sentiment scoring.

use crate::{
    config::Config,
    document::{DocumentKind, load_document},
    metrics::{MetricsSnapshot, UsageMetrics},
    model::{ModelLoadError, load_model},
    pipeline::types::{AnalysisError, Analysis, Origin, SourceText, SummaryLength},
    sentiment::SentimentScorer,
    summarizer::Summarizer,
};
use async_trait::async_trait;
use tracing::Instrument;
use uuid::Uuid;

/// Owns the summarizer and the sentiment scorer for the lifetime of the process.
///
/// Construct it once at startup and share it through an `Arc`; every request only reads it.
pub struct SumItUp {
    summarizer: Summarizer,
    scorer: SentimentScorer,
    metrics: UsageMetrics,
}

/// Abstraction over the analysis pipeline used by the HTTP surface.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Summarize pasted text.
    async fn analyze_text(
        &self,
        text: String,
        length: SummaryLength,
        with_sentiment: bool,
    ) -> Result<Analysis, AnalysisError>;

    /// Extract, then summarize, an uploaded document.
    async fn analyze_document(
        &self,
        file_name: String,
        bytes: Vec<u8>,
        length: SummaryLength,
        with_sentiment: bool,
    ) -> Result<Analysis, AnalysisError>;

    /// Retrieve the current usage counters.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl SumItUp {
    /// Assemble the pipeline around an already constructed summarizer.
    pub fn new(summarizer: Summarizer) -> Self {
        Self {
            summarizer,
            scorer: SentimentScorer::new(),
            metrics: UsageMetrics::new(),
        }
    }

    /// Load the configured model and build the pipeline. Fails when the model cannot be loaded.
    pub async fn from_config(config: &Config) -> Result<Self, ModelLoadError> {
        let model = load_model(config).await?;
        tracing::info!(model = %model.name(), "Summarization model ready");
        Ok(Self::new(Summarizer::new(model, config.input_char_limit)))
    }

    /// Name of the checkpoint in use.
    pub fn model_name(&self) -> &str {
        self.summarizer.model_name()
    }

    /// Summarize pasted text.
    pub async fn analyze_text(
        &self,
        text: String,
        length: SummaryLength,
        with_sentiment: bool,
    ) -> Result<Analysis, AnalysisError> {
        let span = tracing::info_span!("analyze_text", request_id = %Uuid::new_v4());
        async {
            let result = if text.trim().is_empty() {
                Err(AnalysisError::EmptyInput)
            } else {
                let source = SourceText {
                    text,
                    origin: Origin::Pasted,
                };
                self.analyze_source(source, length, with_sentiment).await
            };
            match &result {
                Ok(_) => self.metrics.record_text(),
                Err(_) => self.metrics.record_failure(),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Extract, then summarize, an uploaded document.
    ///
    /// The extension filter runs before any bytes are parsed.
    pub async fn analyze_document(
        &self,
        file_name: String,
        bytes: Vec<u8>,
        length: SummaryLength,
        with_sentiment: bool,
    ) -> Result<Analysis, AnalysisError> {
        let span = tracing::info_span!(
            "analyze_document",
            request_id = %Uuid::new_v4(),
            file_name = %file_name,
        );
        async {
            let result = self
                .load_and_run(file_name, bytes, length, with_sentiment)
                .await;
            match &result {
                Ok(_) => self.metrics.record_document(),
                Err(_) => self.metrics.record_failure(),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn load_and_run(
        &self,
        file_name: String,
        bytes: Vec<u8>,
        length: SummaryLength,
        with_sentiment: bool,
    ) -> Result<Analysis, AnalysisError> {
        let kind = DocumentKind::from_file_name(&file_name).inspect_err(|error| {
            tracing::warn!(error = %error, "Upload rejected by type filter");
        })?;
        let text = tokio::task::spawn_blocking(move || load_document(kind, &bytes))
            .await
            .map_err(|error| AnalysisError::Internal(error.to_string()))?
            .inspect_err(|error| tracing::warn!(error = %error, "Document extraction failed"))?;

        let source = SourceText {
            text,
            origin: Origin::Document {
                name: file_name,
                kind,
            },
        };
        self.analyze_source(source, length, with_sentiment).await
    }

    /// Summarize and score text that has already been obtained.
    pub async fn analyze_source(
        &self,
        source: SourceText,
        length: SummaryLength,
        with_sentiment: bool,
    ) -> Result<Analysis, AnalysisError> {
        let SourceText { text, origin } = source;
        let summary = self
            .summarizer
            .summarize(&text, length.max_length(), length.min_length())
            .await?;

        let sentiment = if with_sentiment {
            self.scorer.analyze(&text)
        } else {
            None
        };

        tracing::info!(
            input_chars = text.chars().count(),
            summary_chars = summary.text.chars().count(),
            truncated = summary.truncated,
            sentiment = ?sentiment.map(|result| result.label),
            "Analysis completed"
        );

        Ok(Analysis {
            source: origin,
            summary,
            sentiment,
        })
    }

    /// Return the current usage counters.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl AnalysisApi for SumItUp {
    async fn analyze_text(
        &self,
        text: String,
        length: SummaryLength,
        with_sentiment: bool,
    ) -> Result<Analysis, AnalysisError> {
        SumItUp::analyze_text(self, text, length, with_sentiment).await
    }

    async fn analyze_document(
        &self,
        file_name: String,
        bytes: Vec<u8>,
        length: SummaryLength,
        with_sentiment: bool,
    ) -> Result<Analysis, AnalysisError> {
        SumItUp::analyze_document(self, file_name, bytes, length, with_sentiment).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        SumItUp::metrics_snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentError;
    use crate::model::ExtractiveModel;
    use crate::sentiment::SentimentLabel;
    use crate::summarizer::SummarizeError;

    fn service() -> SumItUp {
        SumItUp::new(Summarizer::new(Box::new(ExtractiveModel::new()), Some(1024)))
    }

    #[tokio::test]
    async fn pasted_text_yields_summary_and_sentiment() {
        let service = service();
        let analysis = service
            .analyze_text(
                "The new release is excellent. Users report great stability.".into(),
                SummaryLength::default(),
                true,
            )
            .await
            .expect("analysis");

        assert_eq!(analysis.source, Origin::Pasted);
        assert!(!analysis.summary.text.is_empty());
        assert_eq!(analysis.summary.max_length, 250);
        assert_eq!(analysis.summary.min_length, 125);
        let sentiment = analysis.sentiment.expect("sentiment");
        assert_eq!(sentiment.label, SentimentLabel::Positive);
        assert_eq!(service.metrics_snapshot().texts_summarized, 1);
    }

    #[tokio::test]
    async fn sentiment_can_be_skipped() {
        let analysis = service()
            .analyze_text("A terrible day.".into(), SummaryLength::default(), false)
            .await
            .expect("analysis");
        assert!(analysis.sentiment.is_none());
    }

    #[tokio::test]
    async fn skipped_sentiment_leaves_no_sentiment_section() {
        let source = SourceText {
            text: "A wonderful, happy day in the park.".into(),
            origin: Origin::Pasted,
        };
        let analysis = service()
            .analyze_source(source, SummaryLength::default(), false)
            .await
            .expect("analysis");

        let report = analysis.render();
        assert!(report.starts_with("Summary\n"));
        assert!(!report.contains("Sentiment"), "{report}");
        assert!(!report.contains("No valid text"), "{report}");
    }

    #[tokio::test]
    async fn blank_pasted_text_is_rejected() {
        let service = service();
        let error = service
            .analyze_text("  ".into(), SummaryLength::default(), true)
            .await
            .expect_err("blank");
        assert!(matches!(error, AnalysisError::EmptyInput));
        assert_eq!(service.metrics_snapshot().failures, 1);
    }

    #[tokio::test]
    async fn text_document_is_summarized_with_origin() {
        let service = service();
        let analysis = service
            .analyze_document(
                "notes.TXT".into(),
                b"Quarterly revenue grew. The team shipped two features.".to_vec(),
                SummaryLength::default(),
                true,
            )
            .await
            .expect("analysis");

        assert_eq!(
            analysis.source,
            Origin::Document {
                name: "notes.TXT".into(),
                kind: DocumentKind::Text
            }
        );
        assert_eq!(service.metrics_snapshot().documents_summarized, 1);
    }

    #[tokio::test]
    async fn unsupported_upload_is_rejected_before_loading() {
        let error = service()
            .analyze_document(
                "slides.pptx".into(),
                b"irrelevant".to_vec(),
                SummaryLength::default(),
                true,
            )
            .await
            .expect_err("unsupported");
        assert!(matches!(
            error,
            AnalysisError::Document(DocumentError::UnsupportedType(_))
        ));
    }

    #[tokio::test]
    async fn empty_document_reports_no_text() {
        let error = service()
            .analyze_document(
                "empty.txt".into(),
                b"   ".to_vec(),
                SummaryLength::default(),
                true,
            )
            .await
            .expect_err("empty document");
        assert!(matches!(
            error,
            AnalysisError::Summarize(SummarizeError::EmptyInput)
        ));
        assert_eq!(error.to_string(), "No text provided for summarization.");
    }
}
