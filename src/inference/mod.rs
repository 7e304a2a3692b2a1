//! Inference Service Boundary
//!
//! Access to the external natural-language inference service:
//! - `InferenceClient` trait
//! - Gemini HTTP client
//! - Prompt construction and response parsing

pub mod client;
pub mod gemini;
pub mod prompt;

pub use client::InferenceClient;
pub use gemini::GeminiClient;
pub use prompt::{SelectionResponse, SuggestionResponse};
