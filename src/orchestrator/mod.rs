//! Generation orchestrator
//!
//! Turns one [`GenerationRequest`] into a single [`GenerationResult`]:
//! - single-step modes run one remote job cycle
//! - story sequences run one cycle per prompt, each extending the video of
//!   the previous step, and return only the final step's result
//!
//! Cycles never overlap: step k+1 is not submitted until step k has fetched
//! its video. Nothing is retried; the first error aborts the whole call.

mod builder;
mod cycle;
pub mod story;

use std::sync::Arc;

use tracing::Instrument;

pub use builder::OrchestratorBuilder;
use cycle::RemoteJobCycle;

use crate::auth::CredentialProvider;
use crate::config::PollPolicy;
use crate::error::VeoError;
use crate::submission::build_submission;
use crate::traits::VideoOperations;
use crate::types::{GenerationRequest, GenerationResult};
use crate::utils::cancel::CancelHandle;

/// Drives video jobs against a [`VideoOperations`] backend.
#[derive(Clone)]
pub struct VideoOrchestrator {
    operations: Arc<dyn VideoOperations>,
    credentials: Arc<dyn CredentialProvider>,
    poll: PollPolicy,
}

impl std::fmt::Debug for VideoOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoOrchestrator")
            .field("provider", &self.operations.provider_id())
            .field("poll", &self.poll)
            .finish()
    }
}

impl VideoOrchestrator {
    pub fn new(
        operations: Arc<dyn VideoOperations>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            operations,
            credentials,
            poll: PollPolicy::default(),
        }
    }

    /// Builder wiring a [`crate::providers::gemini::GeminiVideoClient`].
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.poll
    }

    pub(crate) fn cycle<'a>(&'a self, cancel: &'a CancelHandle) -> RemoteJobCycle<'a> {
        RemoteJobCycle {
            operations: self.operations.as_ref(),
            credentials: self.credentials.as_ref(),
            poll: self.poll,
            cancel,
        }
    }

    /// Generate a video and wait for it, however long the remote job takes.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, VeoError> {
        self.generate_with_cancel(request, &CancelHandle::new()).await
    }

    /// Like [`Self::generate`], but resolves with [`VeoError::Cancelled`] once
    /// `cancel` fires. The remote job is left running.
    pub async fn generate_with_cancel(
        &self,
        request: &GenerationRequest,
        cancel: &CancelHandle,
    ) -> Result<GenerationResult, VeoError> {
        let span = tracing::info_span!(
            "generate",
            mode = %request.mode,
            steps = request.story_prompts.len().max(1),
        );

        async {
            let result = if request.is_story() {
                story::run_story(self, request, cancel).await
            } else {
                match build_submission(request, None, None) {
                    Ok(submission) => self.cycle(cancel).run(submission).await,
                    Err(e) => Err(e),
                }
            };

            match &result {
                Ok(r) => tracing::info!(asset = %r.local_handle(), source = %r.remote_video.uri, "generation complete"),
                Err(e) => tracing::error!(error = %e, "generation failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}
