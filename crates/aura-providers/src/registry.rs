//! Backend registry — static specs for every supported LLM backend.
//!
//! The table order is significant: it is the order providers are registered
//! in, and therefore which one becomes the fallback default.

use std::sync::Arc;

use aura_core::config::{Config, DEFAULT_GEMINI_MODEL, DEFAULT_OPENAI_MODEL};
use aura_core::error::Result;

use crate::config::ProviderConfig;
use crate::gemini::{GeminiProvider, GEMINI_API_BASE};
use crate::openai::{OpenAiProvider, OPENAI_API_BASE};
use crate::traits::AiProvider;

/// Which adapter implements a backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Gemini,
    OpenAi,
}

/// Static specification describing one backend.
#[derive(Clone, Debug)]
pub struct BackendSpec {
    /// Registry key and provider name (e.g. `"gpt"`).
    pub name: &'static str,
    /// Config section holding this backend's settings (e.g. `"openai"`).
    pub config_key: &'static str,
    /// Human-readable name for logs.
    pub display_name: &'static str,
    /// Environment variable holding the API key.
    pub env_key: &'static str,
    /// Model used when the section does not name one.
    pub default_model: &'static str,
    /// API base used when the section does not set `api_base`.
    pub default_api_base: &'static str,
    pub kind: BackendKind,
}

/// All supported backends, in registration order.
pub static BACKENDS: &[BackendSpec] = &[
    BackendSpec {
        name: GeminiProvider::NAME,
        config_key: "gemini",
        display_name: "Gemini",
        env_key: "GEMINI_API_KEY",
        default_model: DEFAULT_GEMINI_MODEL,
        default_api_base: GEMINI_API_BASE,
        kind: BackendKind::Gemini,
    },
    BackendSpec {
        name: OpenAiProvider::NAME,
        config_key: "openai",
        display_name: "GPT",
        env_key: "OPENAI_API_KEY",
        default_model: DEFAULT_OPENAI_MODEL,
        default_api_base: OPENAI_API_BASE,
        kind: BackendKind::OpenAi,
    },
];

/// Find a backend spec by registry name.
pub fn find_by_name(name: &str) -> Option<&'static BackendSpec> {
    BACKENDS.iter().find(|spec| spec.name == name)
}

impl BackendSpec {
    /// Read this backend's settings from `config`.
    ///
    /// `Ok(None)` means the section exists but carries no API key, so the
    /// backend is simply not configured. A missing section is an error.
    pub fn provider_config(&self, config: &Config) -> Result<Option<ProviderConfig>> {
        let section = config.get_provider_config(self.config_key)?;
        let provider_config = ProviderConfig::from_section(section, self.default_model)?;
        if provider_config.is_configured() {
            Ok(Some(provider_config))
        } else {
            Ok(None)
        }
    }

    /// Fill in the table's API base when `config` does not carry one.
    pub fn resolve_api_base(&self, config: ProviderConfig) -> ProviderConfig {
        match config.api_base {
            Some(_) => config,
            None => config.with_api_base(self.default_api_base),
        }
    }

    /// Instantiate the adapter for this backend.
    pub fn build(&self, config: ProviderConfig) -> Result<Arc<dyn AiProvider>> {
        let config = self.resolve_api_base(config);
        let provider: Arc<dyn AiProvider> = match self.kind {
            BackendKind::Gemini => Arc::new(GeminiProvider::new(config)?),
            BackendKind::OpenAi => Arc::new(OpenAiProvider::new(config)?),
        };
        Ok(provider)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
