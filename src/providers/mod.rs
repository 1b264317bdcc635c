//! Remote service bindings.

pub mod gemini;
