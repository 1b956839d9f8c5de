//! Google Gemini adapter (Generative Language API, `generateContent`).
//!
//! Gemini is driven single-turn: context, history, and prompt are flattened
//! into one text part by [`prompt::build_prompt`](crate::prompt::build_prompt).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, error};

use aura_core::error::{AuraError, Result};
use aura_core::types::{ChatMessage, Context};

use crate::config::ProviderConfig;
use crate::prompt::build_prompt;
use crate::traits::AiProvider;
use crate::HTTP_TIMEOUT;

/// Default API base for Google AI Studio keys.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: Option<String>,
    /// May be empty when the model stops early (e.g. MAX_TOKENS).
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    fn text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let text: String = candidate
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ─────────────────────────────────────────────
// GeminiProvider
// ─────────────────────────────────────────────

/// Adapter for Google Gemini models.
pub struct GeminiProvider {
    config: ProviderConfig,
    api_base: String,
    /// Built on first use.
    client: OnceCell<reqwest::Client>,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.config.model)
            .finish()
    }
}

impl GeminiProvider {
    pub const NAME: &'static str = "gemini";

    /// Validate `config` and create the adapter. No network access.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        config.validate("Gemini")?;
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| GEMINI_API_BASE.to_string());
        Ok(GeminiProvider {
            config,
            api_base,
            client: OnceCell::new(),
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn endpoint_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/models/{}:generateContent", base, self.config.model)
    }

    async fn client(&self) -> Result<&reqwest::Client> {
        self.client
            .get_or_try_init(|| async {
                reqwest::Client::builder()
                    .timeout(HTTP_TIMEOUT)
                    .build()
                    .map_err(|e| {
                        AuraError::Provider(format!("Failed to initialize Gemini client: {e}"))
                    })
            })
            .await
    }

    fn request_body(&self, full_prompt: String) -> Result<serde_json::Value> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(full_prompt),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
            },
        };
        let mut body = serde_json::to_value(&request).map_err(failed)?;
        self.config.merge_params_into(&mut body["generationConfig"]);
        Ok(body)
    }
}

fn failed(reason: impl std::fmt::Display) -> AuraError {
    AuraError::Provider(format!("Gemini generation failed: {reason}"))
}

#[async_trait]
impl AiProvider for GeminiProvider {
    async fn generate_response(
        &self,
        prompt: &str,
        context: Option<&Context>,
        history: Option<&[ChatMessage]>,
    ) -> Result<String> {
        let client = self.client().await?;
        let body = self.request_body(build_prompt(prompt, context, history))?;

        debug!(
            provider = Self::NAME,
            model = %self.config.model,
            history = history.map_or(0, |h| h.len()),
            "Calling LLM"
        );

        let response = client
            .post(self.endpoint_url())
            .header("x-goog-api-key", &self.config.api_key)
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

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(provider = Self::NAME, error = %e, "Failed to parse LLM response");
            failed(e)
        })?;

        let finish_reason = parsed
            .candidates
            .first()
            .and_then(|c| c.finish_reason.clone());
        debug!(
            provider = Self::NAME,
            finish_reason = finish_reason.as_deref().unwrap_or("?"),
            "LLM response received"
        );

        parsed.text().ok_or_else(|| {
            failed(format!(
                "response contained no text (finish reason: {})",
                finish_reason.as_deref().unwrap_or("unknown")
            ))
        })
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
