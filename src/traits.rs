//! Capability seams between the orchestrator and the remote service.

use async_trait::async_trait;

use crate::error::VeoError;
use crate::submission::JobSubmission;
use crate::types::VideoOperation;

/// Remote long-running video operations.
///
/// Video generation is a task-based flow:
/// 1. Submit a job and receive an operation handle
/// 2. Refresh the handle until it reports `done`
/// 3. Download the generated file
#[async_trait]
pub trait VideoOperations: Send + Sync {
    /// Submit a job. Non-success responses map to
    /// [`VeoError::SubmissionRejected`].
    async fn submit(&self, submission: &JobSubmission) -> Result<VideoOperation, VeoError>;

    /// Refresh an operation handle.
    async fn poll(&self, operation: &VideoOperation) -> Result<VideoOperation, VeoError>;

    /// Fetch raw bytes from an already authenticated URL. Non-success
    /// responses map to [`VeoError::AssetFetchFailed`].
    async fn download(&self, url: &str) -> Result<Vec<u8>, VeoError>;

    /// Provider identifier used in logs.
    fn provider_id(&self) -> &'static str {
        "veo"
    }
}
