//! Utility modules for veo-story
//!
//! Cancellation handles and MIME sniffing shared by the orchestrator and the
//! HTTP binding.

pub mod cancel;
pub mod mime;

pub use cancel::{CancelHandle, new_cancel_handle};
