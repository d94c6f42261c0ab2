//! Request and result types shared by the HTTP surface and the CLI.

use crate::document::{DocumentError, DocumentKind};
use crate::sentiment::SentimentResult;
use crate::summarizer::{SummarizeError, Summary};
use serde::Serialize;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Errors returned by the analysis pipeline. `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Pasted text was blank.
    #[error("Please enter some text to summarize.")]
    EmptyInput,
    /// Requested summary length is outside the slider range.
    #[error("Summary length must be between 100 and 400, got {0}")]
    InvalidLength(u32),
    /// Uploaded document was rejected or could not be read.
    #[error("Error processing document: {0}")]
    Document(#[from] DocumentError),
    /// Summarization facade reported a failure.
    #[error(transparent)]
    Summarize(#[from] SummarizeError),
    /// Background extraction task did not complete.
    #[error("Error processing document: extraction task failed: {0}")]
    Internal(String),
}

/// Summary length chosen on the slider.
///
/// The model receives `max_length = value` and `min_length = value / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SummaryLength(u32);

impl SummaryLength {
    /// Allowed slider values.
    pub const RANGE: RangeInclusive<u32> = 100..=400;
    /// Slider position on first render.
    pub const DEFAULT: u32 = 250;

    /// Validate a slider value.
    pub fn new(value: u32) -> Result<Self, AnalysisError> {
        if Self::RANGE.contains(&value) {
            Ok(Self(value))
        } else {
            Err(AnalysisError::InvalidLength(value))
        }
    }

    /// Upper bound passed to the model.
    pub fn max_length(self) -> u32 {
        self.0
    }

    /// Lower bound passed to the model.
    pub fn min_length(self) -> u32 {
        self.0 / 2
    }
}

impl Default for SummaryLength {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Where the analysed text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Origin {
    /// Typed or pasted into the text area.
    Pasted,
    /// Extracted from an uploaded file.
    Document {
        /// Client-supplied file name.
        name: String,
        /// Type resolved from the extension.
        kind: DocumentKind,
    },
}

/// Text to analyse together with its origin.
#[derive(Debug, Clone)]
pub struct SourceText {
    /// Raw text.
    pub text: String,
    /// Origin of `text`.
    pub origin: Origin,
}

/// Everything rendered after a successful request.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Origin of the analysed text.
    pub source: Origin,
    /// Generated summary.
    pub summary: Summary,
    /// Sentiment of the full source text, when requested and the text is not blank.
    pub sentiment: Option<SentimentResult>,
}

impl Analysis {
    /// Render the analysis as the plain-text report printed by the CLI.
    pub fn render(&self) -> String {
        let mut report = format!("Summary\n{}\n", self.summary.text);
        if self.summary.truncated {
            report.push_str("(input was truncated before summarization)\n");
        }
        if let Some(sentiment) = &self.sentiment {
            report.push_str(&format!(
                "\nSentiment Analysis\nSentiment: {}\nPolarity: {:.2} (Range: -1 to 1)\nSubjectivity: {:.2} (Range: 0 to 1)\n",
                sentiment.label, sentiment.polarity, sentiment.subjectivity
            ));
        }
        report
    }
}
