//! Generation request types.

use serde::{Deserialize, Serialize};

use super::media::{EncodedImage, ReferenceImage, VideoHandle};

/// What kind of generation a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    TextToVideo,
    FramesToVideo,
    ReferencesToVideo,
    ExtendVideo,
    StorySequence,
}

impl GenerationMode {
    pub const ALL: [GenerationMode; 5] = [
        Self::TextToVideo,
        Self::FramesToVideo,
        Self::ReferencesToVideo,
        Self::ExtendVideo,
        Self::StorySequence,
    ];
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TextToVideo => write!(f, "Text to Video"),
            Self::FramesToVideo => write!(f, "Frames to Video"),
            Self::ReferencesToVideo => write!(f, "References to Video"),
            Self::ExtendVideo => write!(f, "Extend Video"),
            Self::StorySequence => write!(f, "Story Sequence"),
        }
    }
}

/// Veo model variants accepted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelVariant {
    #[default]
    #[serde(rename = "veo-3.1-fast-generate-preview")]
    Veo31Fast,
    #[serde(rename = "veo-3.1-generate-preview")]
    Veo31,
}

impl ModelVariant {
    /// Model ID used in request paths.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Veo31Fast => "veo-3.1-fast-generate-preview",
            Self::Veo31 => "veo-3.1-generate-preview",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P720 => "720p",
            Self::P1080 => "1080p",
        }
    }
}

/// A declarative generation request as collected from the user.
///
/// Which optional fields are consulted depends on [`GenerationMode`]; the
/// rest are carried but ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub mode: GenerationMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Ordered prompts, one per story step. Only read in `StorySequence` mode.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub story_prompts: Vec<String>,
    #[serde(default)]
    pub model: ModelVariant,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_frame: Option<EncodedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_frame: Option<EncodedImage>,
    /// Reuse the start frame as the end frame.
    #[serde(default)]
    pub looping: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_images: Vec<ReferenceImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_image: Option<EncodedImage>,
    /// Source video for `ExtendVideo`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_video: Option<VideoHandle>,
}

impl GenerationRequest {
    pub fn new(mode: GenerationMode) -> Self {
        Self {
            mode,
            prompt: None,
            story_prompts: Vec::new(),
            model: ModelVariant::default(),
            aspect_ratio: AspectRatio::default(),
            resolution: Resolution::default(),
            start_frame: None,
            end_frame: None,
            looping: false,
            reference_images: Vec::new(),
            style_image: None,
            input_video: None,
        }
    }

    /// Plain text-to-video request.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self::new(GenerationMode::TextToVideo).with_prompt(prompt)
    }

    /// Story request with one prompt per step.
    pub fn story<I, S>(prompts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(GenerationMode::StorySequence).with_story_prompts(prompts)
    }

    /// Extension of a previously generated video.
    pub fn extend(video: VideoHandle, prompt: impl Into<String>) -> Self {
        Self::new(GenerationMode::ExtendVideo)
            .with_input_video(video)
            .with_prompt(prompt)
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_story_prompts<I, S>(mut self, prompts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.story_prompts = prompts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_model(mut self, model: ModelVariant) -> Self {
        self.model = model;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_start_frame(mut self, image: EncodedImage) -> Self {
        self.start_frame = Some(image);
        self
    }

    pub fn with_end_frame(mut self, image: EncodedImage) -> Self {
        self.end_frame = Some(image);
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_reference_image(mut self, reference: ReferenceImage) -> Self {
        self.reference_images.push(reference);
        self
    }

    pub fn with_style_image(mut self, image: EncodedImage) -> Self {
        self.style_image = Some(image);
        self
    }

    pub fn with_input_video(mut self, video: VideoHandle) -> Self {
        self.input_video = Some(video);
        self
    }

    /// Whether this request runs as a chained story sequence.
    pub fn is_story(&self) -> bool {
        self.mode == GenerationMode::StorySequence && !self.story_prompts.is_empty()
    }
}
