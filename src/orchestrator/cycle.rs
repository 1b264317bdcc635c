//! Remote job cycle: submit, poll until done, fetch the asset.

use secrecy::{ExposeSecret, SecretString};
use tokio::time::Instant;

use crate::auth::CredentialProvider;
use crate::config::PollPolicy;
use crate::error::VeoError;
use crate::submission::JobSubmission;
use crate::traits::VideoOperations;
use crate::types::{GenerationResult, LocalAsset, VideoOperation};
use crate::utils::cancel::CancelHandle;

/// States of one cycle. `Failed` is the `Err` arm of [`RemoteJobCycle::run`].
#[derive(Debug)]
enum CycleState {
    Submitting(JobSubmission),
    Polling {
        operation: VideoOperation,
        attempts: u32,
    },
    Fetching(VideoOperation),
    Done(GenerationResult),
}

impl CycleState {
    fn name(&self) -> &'static str {
        match self {
            Self::Submitting(_) => "submitting",
            Self::Polling { .. } => "polling",
            Self::Fetching(_) => "fetching",
            Self::Done(_) => "done",
        }
    }
}

/// Percent-decode the asset location.
fn decode_locator(uri: &str) -> Result<String, VeoError> {
    urlencoding::decode(uri)
        .map(|s| s.into_owned())
        .map_err(|_| VeoError::MissingAssetLocator)
}

/// Set the API key as the `key` query parameter, replacing any existing one.
pub(crate) fn authenticated_url(location: &str, key: &SecretString) -> Result<String, VeoError> {
    let mut url = reqwest::Url::parse(location).map_err(|e| {
        tracing::warn!(error = %e, "generated video location is not a URL");
        VeoError::MissingAssetLocator
    })?;
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| name != "key")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("key", key.expose_secret());
    Ok(url.into())
}

/// One submit/poll/fetch round trip against the remote service.
pub(crate) struct RemoteJobCycle<'a> {
    pub(crate) operations: &'a dyn VideoOperations,
    pub(crate) credentials: &'a dyn CredentialProvider,
    pub(crate) poll: PollPolicy,
    pub(crate) cancel: &'a CancelHandle,
}

impl RemoteJobCycle<'_> {
    pub(crate) async fn run(&self, submission: JobSubmission) -> Result<GenerationResult, VeoError> {
        let deadline = self.poll.timeout.map(|t| Instant::now() + t);
        let mut state = CycleState::Submitting(submission);

        loop {
            tracing::trace!(state = state.name(), "job cycle transition");
            state = match state {
                CycleState::Submitting(submission) => {
                    let operation = self
                        .cancel
                        .run(self.operations.submit(&submission))
                        .await?;
                    tracing::info!(operation = %operation.name, provider = self.operations.provider_id(), "video job submitted");
                    CycleState::Polling {
                        operation,
                        attempts: 0,
                    }
                }
                CycleState::Polling {
                    operation,
                    attempts,
                } => {
                    if operation.done {
                        CycleState::Fetching(operation)
                    } else {
                        self.check_budget(&operation, attempts, deadline)?;
                        let refreshed = self
                            .cancel
                            .run(self.wait_and_poll(&operation, deadline))
                            .await
                            .inspect_err(|e| {
                                if matches!(e, VeoError::Cancelled) {
                                    tracing::warn!(operation = %operation.name, "polling cancelled; remote job keeps running");
                                }
                            })?;
                        tracing::debug!(operation = %refreshed.name, attempt = attempts + 1, done = refreshed.done, "polled video job");
                        CycleState::Polling {
                            operation: refreshed,
                            attempts: attempts + 1,
                        }
                    }
                }
                CycleState::Fetching(operation) => CycleState::Done(self.fetch(operation).await?),
                CycleState::Done(result) => return Ok(result),
            };
        }
    }

    fn check_budget(
        &self,
        operation: &VideoOperation,
        attempts: u32,
        deadline: Option<Instant>,
    ) -> Result<(), VeoError> {
        if let Some(max) = self.poll.max_attempts
            && attempts >= max
        {
            tracing::warn!(operation = %operation.name, attempts, "poll budget exhausted; remote job keeps running");
            return Err(VeoError::PollBudgetExhausted {
                operation: operation.name.clone(),
                attempts,
            });
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(self.deadline_exceeded(operation));
        }
        Ok(())
    }

    /// Sleep one interval, then poll. Neither step runs past `deadline`.
    async fn wait_and_poll(
        &self,
        operation: &VideoOperation,
        deadline: Option<Instant>,
    ) -> Result<VideoOperation, VeoError> {
        let wake = Instant::now() + self.poll.interval;
        let Some(deadline) = deadline else {
            tokio::time::sleep_until(wake).await;
            return self.operations.poll(operation).await;
        };

        tokio::time::sleep_until(wake.min(deadline)).await;
        if Instant::now() >= deadline {
            return Err(self.deadline_exceeded(operation));
        }
        tokio::time::timeout_at(deadline, self.operations.poll(operation))
            .await
            .map_err(|_| self.deadline_exceeded(operation))?
    }

    fn deadline_exceeded(&self, operation: &VideoOperation) -> VeoError {
        let timeout = self.poll.timeout.unwrap_or_default();
        tracing::warn!(operation = %operation.name, ?timeout, "poll deadline reached; remote job keeps running");
        VeoError::TimeoutError(format!(
            "operation {} not done after {:?}",
            operation.name, timeout
        ))
    }

    async fn fetch(&self, operation: VideoOperation) -> Result<GenerationResult, VeoError> {
        let response = match (&operation.error, &operation.response) {
            (None, Some(response)) => response,
            _ => {
                let reason = operation.failure_reason();
                tracing::warn!(operation = %operation.name, %reason, "video job failed");
                return Err(VeoError::GenerationFailed(reason));
            }
        };

        let descriptor = response
            .videos()
            .first()
            .ok_or(VeoError::NoAssetsProduced)?;
        let remote_video = descriptor
            .video
            .as_ref()
            .filter(|v| v.has_locator())
            .ok_or(VeoError::MissingAssetLocator)?
            .clone();

        let source_uri = decode_locator(&remote_video.uri)?;
        let key = self.credentials.api_key()?;
        let url = authenticated_url(&source_uri, &key)?;

        let bytes = self.cancel.run(self.operations.download(&url)).await?;
        let asset = LocalAsset::new(bytes, &source_uri);
        tracing::info!(operation = %operation.name, asset = %asset.handle(), bytes = asset.len(), "video fetched");

        Ok(GenerationResult {
            asset,
            source_uri,
            remote_video,
        })
    }
}
