//! HTTP surface for SumItUp.
//!
//! This module exposes a compact Axum router:
//!
//! - `GET /` – Single-page UI with "Paste Text" and "Upload Document" tabs and a length slider.
//! - `POST /summarize/text` – Summarize pasted text. Accepts `text`, optional `summary_length`
//!   (100–400) and optional `sentiment` (defaults to `true`).
//! - `POST /summarize/document` – Summarize an uploaded `txt`, `pdf` or `docx` file sent as
//!   multipart field `file`, with the same optional fields as form values.
//! - `GET /metrics` – Usage counters.
//! - `GET /commands` – Machine-readable command catalog.
//!
//! Failures are returned as `{ "error": "<message>" }` with the message the UI displays.

use crate::document::{DocumentError, SUPPORTED_EXTENSIONS};
use crate::metrics::MetricsSnapshot;
use crate::pipeline::{Analysis, AnalysisApi, AnalysisError, SummaryLength};
use crate::summarizer::SummarizeError;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

const PAGE: &str = include_str!("api/page.html");

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

struct ApiState<S> {
    service: Arc<S>,
    default_length: SummaryLength,
}

impl<S> Clone for ApiState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            default_length: self.default_length,
        }
    }
}

/// Build the HTTP router exposing the UI and the summarization endpoints.
pub fn create_router<S>(service: Arc<S>, default_length: SummaryLength) -> Router
where
    S: AnalysisApi + 'static,
{
    Router::new()
        .route("/", get(index_page::<S>))
        .route("/summarize/text", post(summarize_text::<S>))
        .route("/summarize/document", post(summarize_document::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(ApiState {
            service,
            default_length,
        })
}

/// Render the UI with the slider bounds and upload filter filled in.
async fn index_page<S>(State(state): State<ApiState<S>>) -> Html<String>
where
    S: AnalysisApi,
{
    let accept = SUPPORTED_EXTENSIONS
        .iter()
        .map(|extension| format!(".{extension}"))
        .collect::<Vec<_>>()
        .join(",");
    Html(
        PAGE.replace("__DEFAULT_LENGTH__", &state.default_length.max_length().to_string())
            .replace("__MIN_LENGTH__", &SummaryLength::RANGE.start().to_string())
            .replace("__MAX_LENGTH__", &SummaryLength::RANGE.end().to_string())
            .replace("__ACCEPT__", &accept),
    )
}

/// Request body for `POST /summarize/text`.
#[derive(Deserialize)]
struct TextRequest {
    /// Text to summarize.
    text: String,
    /// Slider value; defaults to the configured length.
    #[serde(default)]
    summary_length: Option<u32>,
    /// Whether to score sentiment; defaults to `true`.
    #[serde(default)]
    sentiment: Option<bool>,
}

/// Summarize pasted text.
async fn summarize_text<S>(
    State(state): State<ApiState<S>>,
    Json(request): Json<TextRequest>,
) -> Result<Json<Analysis>, AppError>
where
    S: AnalysisApi,
{
    let length = resolve_length(request.summary_length, state.default_length)?;
    let analysis = state
        .service
        .analyze_text(request.text, length, request.sentiment.unwrap_or(true))
        .await?;
    Ok(Json(analysis))
}

/// Summarize an uploaded document.
async fn summarize_document<S>(
    State(state): State<ApiState<S>>,
    mut multipart: Multipart,
) -> Result<Json<Analysis>, AppError>
where
    S: AnalysisApi,
{
    let mut upload = None;
    let mut summary_length = None;
    let mut sentiment = true;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                upload = Some((file_name, bytes.to_vec()));
            }
            "summary_length" => {
                let value = field.text().await?;
                summary_length = Some(value.trim().parse::<u32>().map_err(|_| {
                    AppError::BadRequest(format!("Invalid summary_length '{value}'"))
                })?);
            }
            "sentiment" => {
                let value = field.text().await?;
                sentiment = !matches!(value.trim(), "false" | "0" | "off");
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let Some((file_name, bytes)) = upload else {
        return Err(AppError::BadRequest("Missing multipart field 'file'".into()));
    };
    let length = resolve_length(summary_length, state.default_length)?;
    let analysis = state
        .service
        .analyze_document(file_name, bytes, length, sentiment)
        .await?;
    Ok(Json(analysis))
}

fn resolve_length(
    requested: Option<u32>,
    default: SummaryLength,
) -> Result<SummaryLength, AppError> {
    match requested {
        Some(value) => Ok(SummaryLength::new(value)?),
        None => Ok(default),
    }
}

/// Return the usage counters.
async fn get_metrics<S>(State(state): State<ApiState<S>>) -> Json<MetricsSnapshot>
where
    S: AnalysisApi,
{
    Json(state.service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "summarize_text",
                method: "POST",
                path: "/summarize/text",
                description: "Summarize pasted text and score its sentiment. Response returns { \"source\", \"summary\", \"sentiment\" }.",
                request_example: Some(json!({
                    "text": "Paste your text here.",
                    "summary_length": 250,
                    "sentiment": true
                })),
            },
            CommandDescriptor {
                name: "summarize_document",
                method: "POST",
                path: "/summarize/document",
                description: "Summarize an uploaded txt, pdf or docx file sent as multipart field 'file'. Optional form fields: summary_length, sentiment.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return usage counters since startup.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    Analysis(AnalysisError),
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Analysis(error) => match error {
                AnalysisError::EmptyInput
                | AnalysisError::InvalidLength(_)
                | AnalysisError::Summarize(SummarizeError::EmptyInput) => StatusCode::BAD_REQUEST,
                AnalysisError::Document(DocumentError::UnsupportedType(_)) => {
                    StatusCode::UNSUPPORTED_MEDIA_TYPE
                }
                AnalysisError::Document(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AnalysisError::Summarize(SummarizeError::Inference(_)) => StatusCode::BAD_GATEWAY,
                AnalysisError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Analysis(error) => error.to_string(),
            Self::BadRequest(message) => message,
        };
        tracing::info!(status = status.as_u16(), error = %message, "Request failed");
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<AnalysisError> for AppError {
    fn from(inner: AnalysisError) -> Self {
        Self::Analysis(inner)
    }
}

impl From<MultipartError> for AppError {
    fn from(inner: MultipartError) -> Self {
        Self::BadRequest(format!("Invalid multipart upload: {}", inner.body_text()))
    }
}
