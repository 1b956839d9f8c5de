//! Per-backend settings handed to each adapter at construction.

use serde_json::{Map, Value};

use aura_core::error::{AuraError, Result};

/// Sampling temperature used when a section does not set one.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Keys of a config section that map onto named fields.
const KNOWN_KEYS: &[&str] = &["api_key", "model", "temperature", "max_tokens", "api_base"];

/// Settings for one provider instance.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier (e.g. `"gemini-pro"`, `"gpt-4o"`).
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum output tokens. `None` lets the backend decide.
    pub max_tokens: Option<u32>,
    /// Custom API base URL (overrides the backend default).
    pub api_base: Option<String>,
    /// Extra request parameters merged into the backend request body.
    pub additional_params: Map<String, Value>,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        ProviderConfig {
            api_key: api_key.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            api_base: None,
            additional_params: Map::new(),
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.additional_params.insert(key.into(), value.into());
        self
    }

    /// Build from a config section such as `{"api_key": "...", "model": "..."}`.
    ///
    /// Missing `model` falls back to `default_model`; unknown keys land in
    /// `additional_params`. A known key holding the wrong JSON type is an
    /// [`AuraError::InvalidConfig`].
    pub fn from_section(section: &Map<String, Value>, default_model: &str) -> Result<Self> {
        let field = |key: &str| section.get(key).filter(|v| !v.is_null());

        let api_key = match field("api_key") {
            Some(v) => expect_str(v, "api_key")?.to_string(),
            None => String::new(),
        };
        let model = match field("model") {
            Some(v) => expect_str(v, "model")?.to_string(),
            None => default_model.to_string(),
        };
        let temperature = match field("temperature") {
            Some(v) => v
                .as_f64()
                .ok_or_else(|| wrong_type("temperature", "a number"))?,
            None => DEFAULT_TEMPERATURE,
        };
        let max_tokens = match field("max_tokens") {
            Some(v) => Some(
                v.as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| wrong_type("max_tokens", "a positive integer"))?,
            ),
            None => None,
        };
        let api_base = match field("api_base") {
            Some(v) => Some(expect_str(v, "api_base")?.to_string()),
            None => None,
        };

        let additional_params = section
            .iter()
            .filter(|(k, _)| !KNOWN_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(ProviderConfig {
            api_key,
            model,
            temperature,
            max_tokens,
            api_base,
            additional_params,
        })
    }

    /// Whether an API key is set.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Fail unless both the API key and model are non-empty.
    pub fn validate(&self, provider: &str) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(AuraError::InvalidConfig(format!(
                "{provider} provider requires an API key"
            )));
        }
        if self.model.trim().is_empty() {
            return Err(AuraError::InvalidConfig(format!(
                "{provider} provider requires a model name"
            )));
        }
        Ok(())
    }

    /// Copy `additional_params` into `target` without replacing keys already set.
    pub(crate) fn merge_params_into(&self, target: &mut Value) {
        if let Value::Object(map) = target {
            for (key, value) in &self.additional_params {
                map.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
    }
}

fn expect_str<'a>(value: &'a Value, key: &str) -> Result<&'a str> {
    value.as_str().ok_or_else(|| wrong_type(key, "a string"))
}

fn wrong_type(key: &str, expected: &str) -> AuraError {
    AuraError::InvalidConfig(format!("'{key}' must be {expected}"))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
