use super::{ModelError, ModelLoadError, SummarizationModel, SummaryRequest};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

/// Pre-trained checkpoint served by an Ollama runtime.
pub struct OllamaModel {
    http: Client,
    base_url: String,
    model: String,
    force_cpu: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    done: bool,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    status: String,
}

impl OllamaModel {
    /// Connect to the runtime and make sure the checkpoint is present.
    ///
    /// A missing checkpoint is pulled unless `offline` is set, in which case loading fails.
    pub async fn connect(
        base_url: &str,
        model: &str,
        offline: bool,
        force_cpu: bool,
    ) -> Result<Self, ModelLoadError> {
        let http = Client::builder()
            .user_agent("sumitup/summary")
            .build()
            .map_err(|error| ModelLoadError::Unreachable {
                url: base_url.to_string(),
                reason: format!("failed to build HTTP client: {error}"),
            })?;
        let instance = Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            force_cpu,
        };

        if instance.is_present().await? {
            tracing::debug!(model, "Checkpoint already present");
            return Ok(instance);
        }
        if offline {
            return Err(ModelLoadError::NotAvailableOffline(model.to_string()));
        }
        instance.pull().await?;
        tracing::info!(model, "Checkpoint pulled");
        Ok(instance)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    fn unreachable(&self, error: reqwest::Error) -> ModelLoadError {
        ModelLoadError::Unreachable {
            url: self.base_url.clone(),
            reason: error.to_string(),
        }
    }

    async fn is_present(&self) -> Result<bool, ModelLoadError> {
        let response = self
            .http
            .post(self.endpoint("show"))
            .json(&json!({ "model": self.model }))
            .send()
            .await
            .map_err(|error| self.unreachable(error))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ModelLoadError::LoadFailed {
                    model: self.model.clone(),
                    reason: format!("show returned {status}: {body}"),
                })
            }
        }
    }

    async fn pull(&self) -> Result<(), ModelLoadError> {
        tracing::info!(model = %self.model, "Pulling checkpoint");
        let response = self
            .http
            .post(self.endpoint("pull"))
            .json(&json!({ "model": self.model, "stream": false }))
            .send()
            .await
            .map_err(|error| self.unreachable(error))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelLoadError::LoadFailed {
                model: self.model.clone(),
                reason: format!("pull returned {status}: {body}"),
            });
        }

        let body: PullResponse =
            response
                .json()
                .await
                .map_err(|error| ModelLoadError::LoadFailed {
                    model: self.model.clone(),
                    reason: format!("failed to decode pull response: {error}"),
                })?;
        if body.status != "success" {
            return Err(ModelLoadError::LoadFailed {
                model: self.model.clone(),
                reason: format!("pull finished with status '{}'", body.status),
            });
        }
        Ok(())
    }
}

/// Build the instruction sent alongside the source text.
fn build_prompt(request: &SummaryRequest) -> String {
    format!(
        "System: You write faithful, neutral summaries. Use only facts stated in the text. \
         Write between {min} and {max} words as a single paragraph. Output only the summary.\n\n\
         Text:\n{text}\n\nSummary:",
        min = request.min_length,
        max = request.max_length,
        text = request.text.trim(),
    )
}

#[async_trait]
impl SummarizationModel for OllamaModel {
    async fn generate(&self, request: &SummaryRequest) -> Result<String, ModelError> {
        let mut options = json!({
            // Greedy decoding.
            "temperature": 0.0,
            "num_predict": request.max_length,
        });
        if self.force_cpu {
            options["num_gpu"] = json!(0);
        }
        let payload = json!({
            "model": self.model,
            "prompt": build_prompt(request),
            "stream": false,
            "options": options,
        });

        let response = self
            .http
            .post(self.endpoint("generate"))
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                ModelError::Unavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ModelError::Unavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint("generate")
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|error| {
            ModelError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        if !body.done {
            return Err(ModelError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        let summary = body.response.trim();
        if summary.is_empty() {
            return Err(ModelError::InvalidResponse(
                "Ollama returned an empty summary".into(),
            ));
        }
        Ok(summary.to_string())
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn offline_client(server: &MockServer, force_cpu: bool) -> OllamaModel {
        OllamaModel {
            http: Client::builder()
                .user_agent("sumitup-test")
                .build()
                .expect("client"),
            base_url: server.base_url(),
            model: "llama3.2".into(),
            force_cpu,
        }
    }

    #[test]
    fn prompt_states_length_bounds() {
        let prompt = build_prompt(&SummaryRequest::new("  Body text.  ", 200, 100));
        assert!(prompt.contains("between 100 and 200 words"));
        assert!(prompt.contains("Text:\nBody text.\n"));
    }

    #[tokio::test]
    async fn generate_sends_deterministic_options() {
        let server = MockServer::start_async().await;
        let model = offline_client(&server, true);

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .json_body_partial(
                        r#"{"model":"llama3.2","stream":false,"options":{"temperature":0.0,"num_predict":120,"num_gpu":0}}"#,
                    );
                then.status(200).json_body(json!({
                    "response": "  A short summary.  ",
                    "done": true
                }));
            })
            .await;

        let summary = model
            .generate(&SummaryRequest::new("Long text", 120, 60))
            .await
            .expect("summary");

        mock.assert_async().await;
        assert_eq!(summary, "A short summary.");
    }

    #[tokio::test]
    async fn generate_reports_error_status() {
        let server = MockServer::start_async().await;
        let model = offline_client(&server, false);

        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(500).body("boom");
            })
            .await;

        let error = model
            .generate(&SummaryRequest::new("Long text", 120, 60))
            .await
            .expect_err("error response");

        assert!(matches!(error, ModelError::GenerationFailed(message) if message.contains("500")));
    }

    #[tokio::test]
    async fn generate_rejects_incomplete_response() {
        let server = MockServer::start_async().await;
        let model = offline_client(&server, false);

        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200)
                    .json_body(json!({ "response": "partial", "done": false }));
            })
            .await;

        let error = model
            .generate(&SummaryRequest::new("Long text", 120, 60))
            .await
            .expect_err("incomplete response");
        assert!(matches!(error, ModelError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn connect_accepts_present_checkpoint() {
        let server = MockServer::start_async().await;
        let show = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/show");
                then.status(200).json_body(json!({ "modelfile": "" }));
            })
            .await;

        let model = OllamaModel::connect(&server.base_url(), "llama3.2", true, false)
            .await
            .expect("model present");

        show.assert_async().await;
        assert_eq!(model.name(), "llama3.2");
    }

    #[tokio::test]
    async fn connect_offline_refuses_missing_checkpoint() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/show");
                then.status(404).json_body(json!({ "error": "model not found" }));
            })
            .await;
        let pull = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/pull");
                then.status(200).json_body(json!({ "status": "success" }));
            })
            .await;

        let error = OllamaModel::connect(&server.base_url(), "llama3.2", true, false)
            .await
            .err()
            .expect("offline load fails");

        assert!(matches!(error, ModelLoadError::NotAvailableOffline(name) if name == "llama3.2"));
        pull.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn connect_pulls_missing_checkpoint_when_online() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/show");
                then.status(404);
            })
            .await;
        let pull = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/pull")
                    .json_body(json!({ "model": "llama3.2", "stream": false }));
                then.status(200).json_body(json!({ "status": "success" }));
            })
            .await;

        OllamaModel::connect(&server.base_url(), "llama3.2", false, false)
            .await
            .expect("pulled model");
        pull.assert_async().await;
    }

    #[tokio::test]
    async fn connect_reports_unreachable_runtime() {
        // Port 9 (discard) is not expected to host an HTTP server.
        let error = OllamaModel::connect("http://127.0.0.1:9", "llama3.2", false, false)
            .await
            .err()
            .expect("unreachable runtime");
        assert!(matches!(error, ModelLoadError::Unreachable { .. }));
    }
}
