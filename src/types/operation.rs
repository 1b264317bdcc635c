//! Long-running operation resources returned by the video endpoints.
//!
//! `predictLongRunning` answers with an operation resource (`operations/...`)
//! that is refreshed via `GET /{name}` until `done` flips to true.

use serde::{Deserialize, Serialize};

use super::media::VideoHandle;

/// Error block attached to a finished operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One generated asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedVideo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoHandle>,
}

impl GeneratedVideo {
    pub fn new(video: VideoHandle) -> Self {
        Self { video: Some(video) }
    }
}

/// Payload of `generateVideoResponse`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default, alias = "generatedVideos")]
    pub generated_samples: Vec<GeneratedVideo>,
}

/// Response block of a finished operation.
///
/// The REST API nests samples under `generateVideoResponse`; SDK-shaped
/// payloads put `generatedVideos` directly on the response. Both decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_video_response: Option<GenerateVideoResponse>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generated_videos: Vec<GeneratedVideo>,
}

impl OperationResponse {
    /// Build a response holding the given assets.
    pub fn with_videos(videos: Vec<GeneratedVideo>) -> Self {
        Self {
            generate_video_response: Some(GenerateVideoResponse {
                generated_samples: videos,
            }),
            generated_videos: Vec::new(),
        }
    }

    /// Generated assets, whichever shape carried them.
    pub fn videos(&self) -> &[GeneratedVideo] {
        match &self.generate_video_response {
            Some(inner) if !inner.generated_samples.is_empty() => &inner.generated_samples,
            _ => &self.generated_videos,
        }
    }
}

/// Handle to a remote job, refreshed by polling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoOperation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<OperationResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
}

impl VideoOperation {
    /// A freshly accepted, still-running operation.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A finished operation carrying `videos`.
    pub fn completed(name: impl Into<String>, videos: Vec<GeneratedVideo>) -> Self {
        Self {
            name: name.into(),
            done: true,
            response: Some(OperationResponse::with_videos(videos)),
            error: None,
        }
    }

    /// A finished operation with an error and no response.
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: true,
            response: None,
            error: Some(OperationError {
                code: None,
                message: Some(message.into()),
            }),
        }
    }

    /// Human readable reason for a terminal failure.
    pub fn failure_reason(&self) -> String {
        self.error
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| "operation finished without a response".to_string())
    }
}
