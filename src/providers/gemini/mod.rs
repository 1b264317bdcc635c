//! Google Gemini API binding for Veo video generation.

pub mod video;

pub use video::GeminiVideoClient;
