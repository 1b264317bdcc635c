//! Story sequences: a fold over prompts where each step extends the video
//! produced by the step before it.

use futures::{TryStreamExt, stream};
use tracing::Instrument;

use super::VideoOrchestrator;
use crate::error::VeoError;
use crate::submission::build_submission;
use crate::types::{GenerationRequest, GenerationResult};
use crate::utils::cancel::CancelHandle;

/// One step of a story sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryStep<'a> {
    /// 1-based position in the sequence.
    pub number: usize,
    pub total: usize,
    pub prompt: &'a str,
}

impl StoryStep<'_> {
    pub fn is_first(&self) -> bool {
        self.number == 1
    }
}

/// Steps for `request.story_prompts`, in order.
pub fn plan(request: &GenerationRequest) -> Vec<StoryStep<'_>> {
    let total = request.story_prompts.len();
    request
        .story_prompts
        .iter()
        .enumerate()
        .map(|(i, prompt)| StoryStep {
            number: i + 1,
            total,
            prompt: prompt.as_str(),
        })
        .collect()
}

/// Run every step in order and return only the last step's result.
pub(crate) async fn run_story(
    orchestrator: &VideoOrchestrator,
    request: &GenerationRequest,
    cancel: &CancelHandle,
) -> Result<GenerationResult, VeoError> {
    let last = stream::iter(plan(request).into_iter().map(Ok::<_, VeoError>))
        .try_fold(
            None::<GenerationResult>,
            move |previous, step| async move {
                let prior = match (step.is_first(), previous) {
                    (true, _) => None,
                    (false, Some(prev)) => Some(prev.remote_video),
                    (false, None) => return Err(VeoError::ChainBroken { step: step.number }),
                };

                let span = tracing::info_span!("story_step", step = step.number, total = step.total);
                async {
                    let submission = build_submission(request, Some(step.prompt), prior.as_ref())?;
                    let result = orchestrator.cycle(cancel).run(submission).await?;
                    tracing::info!(step = step.number, total = step.total, "story step complete");
                    Ok::<_, VeoError>(Some(result))
                }
                .instrument(span)
                .await
            },
        )
        .await?;

    last.ok_or(VeoError::ChainBroken { step: 1 })
}
