//! Job submission builder.
//!
//! Turns a [`GenerationRequest`] (plus per-step overrides) into the payload of
//! one `predictLongRunning` call. Pure: no I/O, no hidden state, identical
//! inputs give byte-identical payloads.

use serde::{Deserialize, Serialize};

use crate::error::VeoError;
use crate::modes::resolve_settings;
use crate::types::{
    AspectRatio, EncodedImage, GenerationMode, GenerationRequest, ModelVariant, Resolution,
    VideoHandle,
};

/// Role of an entry in the reference-image list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Asset,
    Style,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceInput {
    pub image: EncodedImage,
    #[serde(rename = "referenceType")]
    pub reference_type: ReferenceKind,
}

/// Numeric and enum knobs of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionConfig {
    pub number_of_videos: u32,
    pub resolution: Resolution,
    /// Absent for extensions; the service derives it from the source video.
    pub aspect_ratio: Option<AspectRatio>,
    pub last_frame: Option<EncodedImage>,
    pub reference_images: Option<Vec<ReferenceInput>>,
}

/// Payload of one remote job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSubmission {
    pub model: ModelVariant,
    pub prompt: Option<String>,
    pub image: Option<EncodedImage>,
    pub video: Option<VideoHandle>,
    pub config: SubmissionConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Instance<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a EncodedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_frame: Option<&'a EncodedImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video: Option<&'a VideoHandle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_images: Option<&'a [ReferenceInput]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters {
    sample_count: u32,
    resolution: Resolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<AspectRatio>,
}

#[derive(Serialize)]
struct PredictLongRunningBody<'a> {
    instances: [Instance<'a>; 1],
    parameters: Parameters,
}

impl JobSubmission {
    /// Whether this submission extends an existing video.
    pub fn is_extension(&self) -> bool {
        self.video.is_some()
    }

    fn wire_body(&self) -> PredictLongRunningBody<'_> {
        PredictLongRunningBody {
            instances: [Instance {
                prompt: self.prompt.as_deref(),
                image: self.image.as_ref(),
                last_frame: self.config.last_frame.as_ref(),
                video: self.video.as_ref(),
                reference_images: self.config.reference_images.as_deref(),
            }],
            parameters: Parameters {
                sample_count: self.config.number_of_videos,
                resolution: self.config.resolution,
                aspect_ratio: self.config.aspect_ratio,
            },
        }
    }

    /// JSON body for `models/{model}:predictLongRunning`.
    pub fn to_request_body(&self) -> Result<serde_json::Value, VeoError> {
        serde_json::to_value(self.wire_body())
            .map_err(|e| VeoError::ParseError(format!("Failed to serialize Veo request: {e}")))
    }

    /// Serialized body bytes, stable across calls.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, VeoError> {
        serde_json::to_vec(&self.wire_body())
            .map_err(|e| VeoError::ParseError(format!("Failed to serialize Veo request: {e}")))
    }
}

/// Base prompt followed by `(Reference N: label)` for each labelled reference image.
fn effective_prompt(request: &GenerationRequest, base: &str, is_extension: bool) -> String {
    if is_extension {
        return base.to_string();
    }

    let labels: Vec<String> = request
        .reference_images
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.label_text().map(|l| format!("(Reference {}: {l})", i + 1)))
        .collect();

    match (base.is_empty(), labels.is_empty()) {
        (_, true) => base.to_string(),
        (true, false) => labels.join(" "),
        (false, false) => format!("{base} {}", labels.join(" ")),
    }
}

fn reference_inputs(request: &GenerationRequest) -> Option<Vec<ReferenceInput>> {
    let list: Vec<ReferenceInput> = request
        .reference_images
        .iter()
        .map(|r| ReferenceInput {
            image: r.image.clone(),
            reference_type: ReferenceKind::Asset,
        })
        .chain(request.style_image.iter().map(|img| ReferenceInput {
            image: img.clone(),
            reference_type: ReferenceKind::Style,
        }))
        .collect();

    (!list.is_empty()).then_some(list)
}

/// Build the submission for one step.
///
/// `prompt_override` replaces `request.prompt`; `prior_video` turns the step
/// into an extension of that video and takes precedence over every
/// mode-specific input.
pub fn build_submission(
    request: &GenerationRequest,
    prompt_override: Option<&str>,
    prior_video: Option<&VideoHandle>,
) -> Result<JobSubmission, VeoError> {
    let is_extension = request.mode == GenerationMode::ExtendVideo || prior_video.is_some();
    let settings = resolve_settings(request);

    let base = prompt_override
        .or(request.prompt.as_deref())
        .unwrap_or_default();
    let prompt = effective_prompt(request, base, is_extension);

    let mut image = None;
    let mut video = None;
    let mut last_frame = None;
    let mut reference_images = None;

    if let Some(prior) = prior_video {
        video = Some(prior.clone());
    } else {
        match request.mode {
            GenerationMode::FramesToVideo => {
                image = request.start_frame.clone();
                let end = if request.looping {
                    request.start_frame.as_ref()
                } else {
                    request.end_frame.as_ref()
                };
                last_frame = end.cloned();
            }
            GenerationMode::ReferencesToVideo => {
                reference_images = reference_inputs(request);
            }
            GenerationMode::StorySequence if !request.reference_images.is_empty() => {
                reference_images = reference_inputs(request);
            }
            GenerationMode::ExtendVideo => {
                let source = request
                    .input_video
                    .as_ref()
                    .ok_or(VeoError::MissingExtensionSource)?;
                video = Some(source.clone());
            }
            _ => {}
        }
    }

    Ok(JobSubmission {
        model: settings.model,
        prompt: (!prompt.is_empty()).then_some(prompt),
        image,
        video,
        config: SubmissionConfig {
            number_of_videos: 1,
            resolution: settings.resolution,
            aspect_ratio: (!is_extension).then_some(settings.aspect_ratio),
            last_frame,
            reference_images,
        },
    })
}
