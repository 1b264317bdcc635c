//! Error Handling Module
//!
//! Every failure a `generate` call can surface is a variant of [`VeoError`].
//! None of them are retried by the orchestrator; a failure on any step of a
//! story sequence aborts the whole call.

use thiserror::Error;

/// Errors produced while building, submitting, polling or fetching a video job.
#[derive(Error, Debug)]
pub enum VeoError {
    /// `ExtendVideo` was requested without a prior video handle.
    #[error("Extension requested without a source video")]
    MissingExtensionSource,

    /// The submission endpoint returned a non-success response.
    #[error("Submission rejected ({status}): {message}")]
    SubmissionRejected { status: u16, message: String },

    /// The remote job finished without a usable response body.
    #[error("Video generation failed: {0}")]
    GenerationFailed(String),

    /// The terminal response contained no generated assets.
    #[error("Generation finished but produced no videos")]
    NoAssetsProduced,

    /// The first generated asset has no retrievable location.
    #[error("Generated video has no URI")]
    MissingAssetLocator,

    /// The authenticated download of the generated asset failed.
    #[error("Failed to fetch generated video (status {status})")]
    AssetFetchFailed { status: u16 },

    /// A story step ran without a result from its predecessor.
    #[error("Story step {step} has no predecessor result to extend")]
    ChainBroken { step: usize },

    /// Non-success response from a status query.
    #[error("API error {code}: {message}")]
    ApiError { code: u16, message: String },

    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// A response body could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Missing or invalid configuration (credentials, env values).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The configured maximum number of status queries was reached.
    #[error("Operation {operation} still running after {attempts} status checks")]
    PollBudgetExhausted { operation: String, attempts: u32 },

    /// The configured polling deadline elapsed.
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// The caller cancelled the orchestration.
    #[error("Generation cancelled")]
    Cancelled,

    /// Local filesystem failure while persisting an asset.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VeoError {
    /// Whether the remote service refused or failed the job, as opposed to a
    /// local or transport failure.
    pub fn is_remote_rejection(&self) -> bool {
        matches!(
            self,
            Self::SubmissionRejected { .. }
                | Self::GenerationFailed(_)
                | Self::NoAssetsProduced
                | Self::ApiError { .. }
        )
    }

    /// HTTP status carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::SubmissionRejected { status, .. } | Self::AssetFetchFailed { status } => {
                Some(*status)
            }
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for VeoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::ParseError(err.to_string())
        } else if err.is_timeout() {
            Self::TimeoutError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for VeoError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_is_exposed_for_http_failures() {
        assert_eq!(
            VeoError::AssetFetchFailed { status: 403 }.status_code(),
            Some(403)
        );
        assert_eq!(
            VeoError::SubmissionRejected {
                status: 400,
                message: "bad".into()
            }
            .status_code(),
            Some(400)
        );
        assert_eq!(VeoError::NoAssetsProduced.status_code(), None);
    }

    #[test]
    fn remote_rejections_are_classified() {
        assert!(VeoError::GenerationFailed("x".into()).is_remote_rejection());
        assert!(!VeoError::Cancelled.is_remote_rejection());
        assert!(!VeoError::MissingExtensionSource.is_remote_rejection());
    }
}
