//! Per-mode configuration locks.
//!
//! Some modes only work with a specific model, aspect ratio or resolution.
//! Each mode owns one row in [`MODE_PROFILES`]; the submission builder reads
//! the row instead of branching on the mode.

use crate::types::{AspectRatio, GenerationMode, GenerationRequest, ModelVariant, Resolution};

/// Forced overrides for one generation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeProfile {
    pub mode: GenerationMode,
    pub model: Option<ModelVariant>,
    pub aspect_ratio: Option<AspectRatio>,
    pub resolution: Option<Resolution>,
}

impl ModeProfile {
    const fn unlocked(mode: GenerationMode) -> Self {
        Self {
            mode,
            model: None,
            aspect_ratio: None,
            resolution: None,
        }
    }
}

pub const MODE_PROFILES: [ModeProfile; 5] = [
    ModeProfile::unlocked(GenerationMode::TextToVideo),
    ModeProfile::unlocked(GenerationMode::FramesToVideo),
    ModeProfile {
        mode: GenerationMode::ReferencesToVideo,
        model: Some(ModelVariant::Veo31),
        aspect_ratio: Some(AspectRatio::Landscape),
        resolution: Some(Resolution::P720),
    },
    // Extensions inherit the source aspect ratio; only model and size are pinned.
    ModeProfile {
        mode: GenerationMode::ExtendVideo,
        model: Some(ModelVariant::Veo31),
        aspect_ratio: None,
        resolution: Some(Resolution::P720),
    },
    ModeProfile {
        mode: GenerationMode::StorySequence,
        model: Some(ModelVariant::Veo31),
        aspect_ratio: Some(AspectRatio::Landscape),
        resolution: Some(Resolution::P720),
    },
];

/// Look up the profile row for `mode`.
pub fn profile_for(mode: GenerationMode) -> &'static ModeProfile {
    MODE_PROFILES
        .iter()
        .find(|p| p.mode == mode)
        .unwrap_or(&MODE_PROFILES[0])
}

/// Model, aspect ratio and resolution after applying mode locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub model: ModelVariant,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
}

/// Apply the profile of `request.mode` to the request's own choices.
pub fn resolve_settings(request: &GenerationRequest) -> ResolvedSettings {
    let profile = profile_for(request.mode);
    ResolvedSettings {
        model: profile.model.unwrap_or(request.model),
        aspect_ratio: profile.aspect_ratio.unwrap_or(request.aspect_ratio),
        resolution: profile.resolution.unwrap_or(request.resolution),
    }
}
