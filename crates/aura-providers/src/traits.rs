//! AI provider trait — the uniform capability every backend adapter exposes.

use async_trait::async_trait;

use aura_core::error::Result;
use aura_core::types::{ChatMessage, Context};

/// Trait that all LLM backends implement.
///
/// Adapters validate their configuration synchronously in their constructor,
/// so a live instance is always usable from the caller's point of view.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Generate a reply to `prompt`.
    ///
    /// Issues exactly one backend call. Backend failures come back as
    /// [`AuraError::Provider`](aura_core::AuraError::Provider) carrying the
    /// failure reason.
    async fn generate_response(
        &self,
        prompt: &str,
        context: Option<&Context>,
        history: Option<&[ChatMessage]>,
    ) -> Result<String>;

    /// Stable lowercase identifier (e.g. `"gemini"`, `"gpt"`).
    fn provider_name(&self) -> &str;

    /// Whether a credential and model are configured. Does not touch the network.
    fn is_available(&self) -> bool;
}
