//! Config loader — reads a JSON file or the process environment.
//!
//! # Loading precedence
//! 1. An explicit file path: the whole config comes from that JSON file.
//! 2. Otherwise: a fixed set of environment variables with defaults.
//!
//! Unlike a layered loader, the two sources are never merged.

use std::path::Path;

use serde_json::{json, Value};
use tracing::{debug, info};

use super::store::Config;
use crate::error::{AuraError, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_LOG_PATH: &str = "logs/interactions.log";

impl Config {
    /// Load from `path` when given, else from the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::from_env()),
        }
    }

    /// Load a JSON config file.
    ///
    /// A missing file, malformed JSON, or a non-object root is a
    /// [`AuraError::Config`].
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AuraError::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                AuraError::Config(format!(
                    "Failed to read configuration file {}: {e}",
                    path.display()
                ))
            }
        })?;

        let raw: Value = serde_json::from_str(&content).map_err(|e| {
            AuraError::Config(format!("Invalid JSON in configuration file: {e}"))
        })?;

        Self::from_value(raw)
    }

    /// Build the config from the process environment.
    ///
    /// Recognized variables:
    /// - `GEMINI_API_KEY`, `GEMINI_MODEL` (default `gemini-pro`), `GEMINI_API_BASE`
    /// - `OPENAI_API_KEY`, `OPENAI_MODEL` (default `gpt-3.5-turbo`), `OPENAI_API_BASE`
    /// - `DEFAULT_AI_PROVIDER` (default `gemini`)
    /// - `LOG_LEVEL` (default `INFO`), `LOG_PATH` (default `logs/interactions.log`)
    pub fn from_env() -> Self {
        info!("No config file given, reading settings from environment");
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let mut config = Config::new();
        config.set("gemini", provider_section(&lookup, "GEMINI", DEFAULT_GEMINI_MODEL));
        config.set("openai", provider_section(&lookup, "OPENAI", DEFAULT_OPENAI_MODEL));
        config.set("default_provider", var_or("DEFAULT_AI_PROVIDER", DEFAULT_PROVIDER));
        config.set("log_level", var_or("LOG_LEVEL", DEFAULT_LOG_LEVEL));
        config.set("log_path", var_or("LOG_PATH", DEFAULT_LOG_PATH));
        config
    }
}

/// One backend section: `{api_key, model[, api_base]}`.
///
/// An unset key is stored as `null` so the section itself still exists.
fn provider_section<F>(lookup: &F, prefix: &str, default_model: &str) -> Value
where
    F: Fn(&str) -> Option<String>,
{
    let mut section = json!({
        "api_key": lookup(&format!("{prefix}_API_KEY")),
        "model": lookup(&format!("{prefix}_MODEL")).unwrap_or_else(|| default_model.to_string()),
    });
    if let Some(base) = lookup(&format!("{prefix}_API_BASE")) {
        section["api_base"] = Value::String(base);
    }
    section
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
                "gemini": { "api_key": "g-123", "model": "gemini-1.5-pro" },
                "openai": { "api_key": "sk-456", "temperature": 0.3 },
                "default_provider": "gpt",
                "log_level": "DEBUG"
            }"#,
        );

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.get_str("gemini.model"), Some("gemini-1.5-pro"));
        assert_eq!(config.get_f64("openai.temperature"), Some(0.3));
        assert_eq!(config.get_str("default_provider"), Some("gpt"));
        assert!(config.get("log_path").is_none());
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = Config::from_file(Path::new("/nonexistent/path/config.json")).unwrap_err();
        assert!(matches!(err, AuraError::Config(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_invalid_json_is_config_error() {
        let file = write_temp_json("not valid json {{{");
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AuraError::Config(_)));
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    fn test_load_non_object_root_is_config_error() {
        let file = write_temp_json("[1, 2, 3]");
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AuraError::Config(_)));
    }

    #[test]
    fn test_load_prefers_explicit_path() {
        let file = write_temp_json(r#"{ "default_provider": "gpt" }"#);
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.get_str("default_provider"), Some("gpt"));
        assert!(config.get("gemini").is_none());
    }

    #[test]
    fn test_env_defaults() {
        let config = Config::from_env_with(env_from(&[]));

        assert_eq!(config.get_str("gemini.model"), Some(DEFAULT_GEMINI_MODEL));
        assert_eq!(config.get_str("openai.model"), Some(DEFAULT_OPENAI_MODEL));
        assert_eq!(config.get_str("default_provider"), Some("gemini"));
        assert_eq!(config.get_str("log_level"), Some("INFO"));
        assert_eq!(config.get_str("log_path"), Some("logs/interactions.log"));
        // Unset key is null, section still present
        assert!(config.get("gemini.api_key").is_none());
        assert!(config.get_provider_config("gemini").is_ok());
        assert!(config.get("gemini.api_base").is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_env_with(env_from(&[
            ("GEMINI_API_KEY", "g-env"),
            ("OPENAI_API_KEY", "sk-env"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("OPENAI_API_BASE", "http://localhost:8080/v1"),
            ("DEFAULT_AI_PROVIDER", "gpt"),
            ("LOG_LEVEL", "warning"),
            ("LOG_PATH", "/tmp/aura.log"),
        ]));

        assert_eq!(config.get_str("gemini.api_key"), Some("g-env"));
        assert_eq!(config.get_str("openai.api_key"), Some("sk-env"));
        assert_eq!(config.get_str("openai.model"), Some("gpt-4o"));
        assert_eq!(config.get_str("openai.api_base"), Some("http://localhost:8080/v1"));
        assert_eq!(config.get_str("default_provider"), Some("gpt"));
        assert_eq!(config.get_str("log_level"), Some("warning"));
        assert_eq!(config.get_str("log_path"), Some("/tmp/aura.log"));
    }
}
