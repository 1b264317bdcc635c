//! Generation output types.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::media::VideoHandle;
use crate::error::VeoError;

/// Downloaded video bytes with a process-local address.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalAsset {
    pub id: Uuid,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub fetched_at: DateTime<Utc>,
}

impl LocalAsset {
    /// Wrap fetched bytes, sniffing their MIME type (`uri` is the fallback hint).
    pub fn new(bytes: Vec<u8>, uri: &str) -> Self {
        let mime_type = crate::utils::mime::guess_video_mime(&bytes, uri);
        Self {
            id: Uuid::new_v4(),
            mime_type,
            bytes,
            fetched_at: Utc::now(),
        }
    }

    /// Locally addressable handle, e.g. `asset://6f1c...`.
    pub fn handle(&self) -> String {
        format!("asset://{}", self.id)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Suggested file name derived from the id and MIME type.
    pub fn file_name(&self) -> String {
        let ext = crate::utils::mime::extension_for_mime(&self.mime_type).unwrap_or("bin");
        format!("{}.{ext}", self.id)
    }

    /// Write the bytes to `path`. A directory path gets [`Self::file_name`] appended.
    pub async fn save_to(&self, path: impl AsRef<Path>) -> Result<PathBuf, VeoError> {
        let path = path.as_ref();
        let target = if tokio::fs::metadata(path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            path.join(self.file_name())
        } else {
            path.to_path_buf()
        };
        tokio::fs::write(&target, &self.bytes).await?;
        tracing::debug!(asset = %self.handle(), path = %target.display(), bytes = self.bytes.len(), "saved video asset");
        Ok(target)
    }
}

/// Final output of one `generate` call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    /// The downloaded video.
    pub asset: LocalAsset,
    /// Decoded location the bytes were fetched from.
    pub source_uri: String,
    /// Remote handle usable as the source of a follow-up extension.
    pub remote_video: VideoHandle,
}

impl GenerationResult {
    pub fn local_handle(&self) -> String {
        self.asset.handle()
    }
}
