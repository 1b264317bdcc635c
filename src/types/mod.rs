//! Request, operation and result types.

pub mod media;
pub mod operation;
pub mod request;
pub mod result;

pub use media::{EncodedImage, ReferenceImage, VideoHandle};
pub use operation::{
    GenerateVideoResponse, GeneratedVideo, OperationError, OperationResponse, VideoOperation,
};
pub use request::{AspectRatio, GenerationMode, GenerationRequest, ModelVariant, Resolution};
pub use result::{GenerationResult, LocalAsset};
