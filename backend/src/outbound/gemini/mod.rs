//! Gemini outbound adapter.
//!
//! Implements the `WasteClassifier` port against the `generateContent` REST
//! endpoint.

mod dto;
mod http_classifier;

pub use http_classifier::{GeminiConfig, GeminiWasteClassifier};
