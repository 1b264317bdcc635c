use std::sync::Arc;
use std::time::Duration;

use super::VideoOrchestrator;
use crate::auth::{CredentialProvider, EnvCredential, StaticCredential};
use crate::config::{PollPolicy, VeoConfig};
use crate::error::VeoError;
use crate::providers::gemini::GeminiVideoClient;

/// Builds a [`VideoOrchestrator`] backed by the Gemini API.
///
/// Credentials resolve as: explicit `.api_key()`, then `.credentials()`,
/// then `GEMINI_API_KEY` / `API_KEY` from the environment.
#[derive(Default)]
pub struct OrchestratorBuilder {
    api_key: Option<String>,
    credentials: Option<Arc<dyn CredentialProvider>>,
    config: VeoConfig,
    http_client: Option<reqwest::Client>,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from environment-derived configuration.
    pub fn from_env() -> Result<Self, VeoError> {
        Ok(Self {
            config: VeoConfig::from_env()?,
            ..Self::default()
        })
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn credentials(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(provider);
        self
    }

    pub fn config(mut self, config: VeoConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Per-request HTTP timeout in seconds.
    pub fn timeout(mut self, secs: u64) -> Self {
        self.config.timeout = Some(secs);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    pub fn poll_policy(mut self, poll: PollPolicy) -> Self {
        self.config.poll = poll;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll.interval = interval;
        self
    }

    pub fn max_poll_attempts(mut self, attempts: u32) -> Self {
        self.config.poll.max_attempts = Some(attempts);
        self
    }

    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.config.poll.timeout = Some(timeout);
        self
    }

    /// Reuse an existing HTTP client (its own timeout/user agent win).
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<VideoOrchestrator, VeoError> {
        self.config.validate()?;

        let credentials: Arc<dyn CredentialProvider> = match (self.api_key, self.credentials) {
            (Some(key), _) => Arc::new(StaticCredential::new(key)),
            (None, Some(provider)) => provider,
            (None, None) => Arc::new(EnvCredential::default()),
        };
        // Fail at build time rather than on the first request.
        credentials.api_key()?;

        let poll = self.config.poll;
        let client = match self.http_client {
            Some(http) => GeminiVideoClient::with_http_client(self.config, credentials.clone(), http),
            None => GeminiVideoClient::new(self.config, credentials.clone())?,
        };

        tracing::debug!(?poll, "video orchestrator built");
        Ok(VideoOrchestrator::new(Arc::new(client), credentials).with_poll_policy(poll))
    }
}
