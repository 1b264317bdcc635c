//! # veo-story
//!
//! Client-side orchestration for Veo video generation.
//!
//! A [`GenerationRequest`] describes what to generate (text, first/last
//! frames, reference images, an extension of an earlier video, or a
//! multi-prompt story). [`VideoOrchestrator::generate`] submits the matching
//! long-running job, polls it until it finishes, downloads the video and
//! returns one [`GenerationResult`]. Story sequences chain one job per prompt,
//! feeding each step's remote video into the next step as its source.
//!
//! ```rust,no_run
//! use veo_story::prelude::*;
//!
//! # async fn example() -> Result<(), VeoError> {
//! let orchestrator = VideoOrchestrator::builder()
//!     .api_key("your-api-key")
//!     .build()?;
//!
//! let request = GenerationRequest::story([
//!     "A lighthouse keeper spots a strange light at sea",
//!     "The light rises from the water and approaches the shore",
//! ]);
//! let result = orchestrator.generate(&request).await?;
//! result.asset.save_to("story.mp4").await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod modes;
pub mod orchestrator;
pub mod providers;
pub mod submission;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod utils;

pub use auth::{CredentialProvider, EnvCredential, StaticCredential};
pub use config::{PollPolicy, VeoConfig};
pub use error::VeoError;
pub use orchestrator::{OrchestratorBuilder, VideoOrchestrator};
pub use providers::gemini::GeminiVideoClient;
pub use submission::{JobSubmission, ReferenceInput, ReferenceKind, build_submission};
pub use traits::VideoOperations;
pub use types::*;
pub use utils::cancel::CancelHandle;

/// Commonly used items.
pub mod prelude {
    pub use crate::auth::{CredentialProvider, StaticCredential};
    pub use crate::config::{PollPolicy, VeoConfig};
    pub use crate::error::VeoError;
    pub use crate::orchestrator::VideoOrchestrator;
    pub use crate::submission::{JobSubmission, build_submission};
    pub use crate::traits::VideoOperations;
    pub use crate::types::{
        AspectRatio, EncodedImage, GenerationMode, GenerationRequest, GenerationResult,
        ModelVariant, ReferenceImage, Resolution, VideoHandle, VideoOperation,
    };
    pub use crate::utils::cancel::CancelHandle;
}
