//! Credential providers.
//!
//! The API key is an explicit dependency: the HTTP binding uses it for the
//! `x-goog-api-key` header and the orchestrator appends it to asset downloads.

use secrecy::{ExposeSecret, SecretString};

use crate::error::VeoError;

/// Environment variables consulted by [`EnvCredential::default`], in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Supplies the API key for authenticated calls.
pub trait CredentialProvider: Send + Sync {
    fn api_key(&self) -> Result<SecretString, VeoError>;
}

/// A fixed key, useful for tests and when the key is managed by the caller.
#[derive(Clone)]
pub struct StaticCredential {
    key: SecretString,
}

impl StaticCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: SecretString::from(key.into()),
        }
    }
}

impl std::fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredential")
            .field("key_present", &!self.key.expose_secret().is_empty())
            .finish()
    }
}

impl CredentialProvider for StaticCredential {
    fn api_key(&self) -> Result<SecretString, VeoError> {
        if self.key.expose_secret().is_empty() {
            return Err(VeoError::ConfigurationError(
                "API key is empty".to_string(),
            ));
        }
        Ok(self.key.clone())
    }
}

/// Reads the key from the environment on every call.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    vars: Vec<String>,
}

impl EnvCredential {
    /// Look the key up in `vars`, first non-empty match wins.
    pub fn new<I, S>(vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for EnvCredential {
    fn default() -> Self {
        Self::new(API_KEY_ENV_VARS)
    }
}

impl CredentialProvider for EnvCredential {
    fn api_key(&self) -> Result<SecretString, VeoError> {
        self.vars
            .iter()
            .filter_map(|v| std::env::var(v).ok())
            .find(|k| !k.trim().is_empty())
            .map(SecretString::from)
            .ok_or_else(|| {
                VeoError::ConfigurationError(format!(
                    "API key not specified (missing {})",
                    self.vars.join(" / ")
                ))
            })
    }
}
