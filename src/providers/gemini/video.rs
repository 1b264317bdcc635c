//! Gemini Video Generation (Veo) binding.
//!
//! Official docs:
//! - https://ai.google.dev/gemini-api/docs/video
//!
//! The REST API uses `models/{model}:predictLongRunning` and returns a long-running
//! operation resource name (e.g. `operations/...`) that must be polled via `GET /{name}`.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::auth::CredentialProvider;
use crate::config::VeoConfig;
use crate::error::VeoError;
use crate::submission::JobSubmission;
use crate::traits::VideoOperations;
use crate::types::VideoOperation;

const HTTP_TARGET: &str = "veo_story::http";

fn normalize_gemini_model_id(model: &str) -> String {
    let trimmed = model.trim().trim_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }

    if let Some(pos) = trimmed.rfind("/models/") {
        return trimmed[(pos + "/models/".len())..].to_string();
    }
    if let Some(rest) = trimmed.strip_prefix("models/") {
        return rest.to_string();
    }

    trimmed.to_string()
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn build_predict_long_running_url(base_url: &str, model: &str) -> String {
    let model = normalize_gemini_model_id(model);
    join_url(base_url, &format!("models/{model}:predictLongRunning"))
}

fn build_operation_get_url(base_url: &str, op_name: &str) -> String {
    let trimmed = op_name.trim().trim_start_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return trimmed.to_string();
    }
    join_url(base_url, trimmed)
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Best-effort extraction of `error.message` from a Google API error body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => match (env.error.status, env.error.message) {
            (Some(status), Some(message)) => format!("{status}: {message}"),
            (None, Some(message)) => message,
            (Some(status), None) => status,
            (None, None) => body.to_string(),
        },
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// reqwest-backed implementation of [`VideoOperations`] for the Gemini API.
#[derive(Clone)]
pub struct GeminiVideoClient {
    config: VeoConfig,
    credentials: Arc<dyn CredentialProvider>,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for GeminiVideoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiVideoClient")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

impl GeminiVideoClient {
    /// Build a client with its own HTTP connection pool.
    pub fn new(
        config: VeoConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, VeoError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(std::time::Duration::from_secs(timeout));
        }
        if let Some(ua) = &config.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        let http_client = builder.build().map_err(|e| {
            VeoError::ConfigurationError(format!("Failed to build HTTP client: {e}"))
        })?;
        Ok(Self::with_http_client(config, credentials, http_client))
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_http_client(
        config: VeoConfig,
        credentials: Arc<dyn CredentialProvider>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            config,
            credentials,
            http_client,
        }
    }

    pub fn config(&self) -> &VeoConfig {
        &self.config
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, VeoError> {
        let key = self.credentials.api_key()?;
        Ok(builder.header("x-goog-api-key", key.expose_secret()))
    }

    async fn read_operation(
        response: reqwest::Response,
        context: &str,
    ) -> Result<VideoOperation, VeoError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| VeoError::ParseError(format!("Failed to parse {context}: {e}")))
    }
}

#[async_trait]
impl VideoOperations for GeminiVideoClient {
    async fn submit(&self, submission: &JobSubmission) -> Result<VideoOperation, VeoError> {
        let url = build_predict_long_running_url(&self.config.base_url, submission.model.id());
        let body = submission.to_request_body()?;
        tracing::debug!(target: HTTP_TARGET, url = %url, extension = submission.is_extension(), "submitting video job");

        let response = self
            .authorized(self.http_client.post(&url))?
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::debug!(target: HTTP_TARGET, url = %url, status = status.as_u16(), "submission rejected");
            return Err(VeoError::SubmissionRejected {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let op = Self::read_operation(response, "Gemini video operation response").await?;
        tracing::debug!(target: HTTP_TARGET, operation = %op.name, "video job accepted");
        Ok(op)
    }

    async fn poll(&self, operation: &VideoOperation) -> Result<VideoOperation, VeoError> {
        let url = build_operation_get_url(&self.config.base_url, &operation.name);
        tracing::trace!(target: HTTP_TARGET, url = %url, "polling operation");

        let response = self.authorized(self.http_client.get(&url))?.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(VeoError::ApiError {
                code: status.as_u16(),
                message: error_message(&text),
            });
        }

        Self::read_operation(response, "Gemini operation status").await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, VeoError> {
        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(target: HTTP_TARGET, status = status.as_u16(), "asset download failed");
            return Err(VeoError::AssetFetchFailed {
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        tracing::debug!(target: HTTP_TARGET, bytes = bytes.len(), "asset downloaded");
        Ok(bytes.to_vec())
    }

    fn provider_id(&self) -> &'static str {
        "gemini"
    }
}
