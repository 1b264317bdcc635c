//! Client and polling configuration.

use std::time::Duration;

use crate::error::VeoError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// How the orchestrator waits for a remote job.
///
/// The default polls every ten seconds with no attempt cap and no deadline,
/// so a job that never finishes is waited on forever unless the caller
/// cancels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
    pub timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
            timeout: None,
        }
    }
}

impl PollPolicy {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_attempts.is_none() && self.timeout.is_none()
    }
}

/// Settings for the HTTP binding and orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VeoConfig {
    pub base_url: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout: Option<u64>,
    pub user_agent: Option<String>,
    pub poll: PollPolicy,
}

impl Default for VeoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(60),
            user_agent: None,
            poll: PollPolicy::default(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(var: &str) -> Result<Option<T>, VeoError> {
    match std::env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map(Some).map_err(|_| {
            VeoError::ConfigurationError(format!("Invalid value for {var}: {raw}"))
        }),
        _ => Ok(None),
    }
}

impl VeoConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Defaults overridden by environment variables.
    ///
    /// - `VEO_BASE_URL`
    /// - `VEO_HTTP_TIMEOUT_SECS`
    /// - `VEO_POLL_INTERVAL_SECS`
    /// - `VEO_POLL_MAX_ATTEMPTS`
    /// - `VEO_POLL_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, VeoError> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("VEO_BASE_URL")
            && !base_url.trim().is_empty()
        {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(timeout) = parse_env::<u64>("VEO_HTTP_TIMEOUT_SECS")? {
            config.timeout = Some(timeout);
        }
        if let Some(secs) = parse_env::<u64>("VEO_POLL_INTERVAL_SECS")? {
            config.poll.interval = Duration::from_secs(secs);
        }
        config.poll.max_attempts = parse_env::<u32>("VEO_POLL_MAX_ATTEMPTS")?;
        config.poll.timeout = parse_env::<u64>("VEO_POLL_TIMEOUT_SECS")?.map(Duration::from_secs);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), VeoError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(VeoError::ConfigurationError(format!(
                "Base URL must be http(s): {}",
                self.base_url
            )));
        }
        if self.poll.interval.is_zero() {
            return Err(VeoError::ConfigurationError(
                "Poll interval must be greater than zero".to_string(),
            ));
        }
        if self.poll.max_attempts == Some(0) {
            return Err(VeoError::ConfigurationError(
                "Poll max attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
