//! LLM provider layer for Aura.
//!
//! # Architecture
//!
//! - [`traits::AiProvider`]: trait that all backend adapters implement
//! - [`registry`]: static specs for the supported backends, in registration order
//! - [`gemini::GeminiProvider`] / [`openai::OpenAiProvider`]: HTTP adapters
//! - [`prompt`]: context/history/prompt assembly shared by the adapters

use std::time::Duration;

pub mod config;
pub mod gemini;
pub mod openai;
pub mod prompt;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use config::ProviderConfig;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use registry::{find_by_name, BackendKind, BackendSpec, BACKENDS};
pub use traits::AiProvider;

/// Per-request timeout for backend HTTP clients.
pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Pull a human-readable reason out of an API error body.
///
/// Both Gemini and OpenAI wrap errors as `{"error": {"message": "..."}}`;
/// anything else is returned trimmed.
pub(crate) fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}
