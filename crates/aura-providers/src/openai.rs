//! OpenAI chat completions adapter.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. Context is
//! folded into a leading system message; history is replayed as-is.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, error};

use aura_core::error::{AuraError, Result};
use aura_core::types::{ChatMessage, Context};

use crate::config::ProviderConfig;
use crate::prompt::build_messages;
use crate::traits::AiProvider;
use crate::HTTP_TIMEOUT;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

/// Request body for an OpenAI-compatible chat completion API.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

// ─────────────────────────────────────────────
// OpenAiProvider
// ─────────────────────────────────────────────

/// Adapter for OpenAI GPT models.
pub struct OpenAiProvider {
    config: ProviderConfig,
    api_base: String,
    /// Built on first use; connection-pooled afterwards.
    client: OnceCell<reqwest::Client>,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.config.model)
            .finish()
    }
}

impl OpenAiProvider {
    pub const NAME: &'static str = "gpt";

    /// Validate `config` and create the adapter. No network access.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        config.validate("GPT")?;
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| OPENAI_API_BASE.to_string());
        Ok(OpenAiProvider {
            config,
            api_base,
            client: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Build the full chat completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }

    async fn client(&self) -> Result<&reqwest::Client> {
        self.client
            .get_or_try_init(|| async {
                reqwest::Client::builder()
                    .timeout(HTTP_TIMEOUT)
                    .build()
                    .map_err(|e| {
                        AuraError::Provider(format!("Failed to initialize OpenAI client: {e}"))
                    })
            })
            .await
    }

    fn request_body(&self, messages: Vec<ChatMessage>) -> Result<serde_json::Value> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        let mut body = serde_json::to_value(&request).map_err(failed)?;
        self.config.merge_params_into(&mut body);
        Ok(body)
    }
}

fn failed(reason: impl std::fmt::Display) -> AuraError {
    AuraError::Provider(format!("GPT generation failed: {reason}"))
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    async fn generate_response(
        &self,
        prompt: &str,
        context: Option<&Context>,
        history: Option<&[ChatMessage]>,
    ) -> Result<String> {
        let client = self.client().await?;
        let messages = build_messages(prompt, context, history);

        debug!(
            provider = Self::NAME,
            model = %self.config.model,
            messages = messages.len(),
            "Calling LLM"
        );

        let body = self.request_body(messages)?;
        let response = client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = Self::NAME, error = %e, "HTTP request failed");
                failed(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(provider = Self::NAME, status = %status, body = %error_text, "API error");
            return Err(failed(format!("{status}: {}", crate::error_detail(&error_text))));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!(provider = Self::NAME, error = %e, "Failed to parse LLM response");
            failed(e)
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| failed("no choices in response"))?;

        debug!(
            provider = Self::NAME,
            finish_reason = choice.finish_reason.as_deref().unwrap_or("?"),
            "LLM response received"
        );

        choice
            .message
            .content
            .ok_or_else(|| failed("response contained no content"))
    }

    fn provider_name(&self) -> &str {
        Self::NAME
    }

    fn is_available(&self) -> bool {
        !self.config.api_key.is_empty() && !self.config.model.is_empty()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
