//! Error taxonomy shared by every Aura crate.
//!
//! Only [`AuraError::Validation`] ever escapes request processing; provider
//! and unexpected failures are turned into failure envelopes by the processor.

use thiserror::Error;

/// Errors produced by configuration, providers, and request validation.
#[derive(Debug, Error)]
pub enum AuraError {
    /// Bad caller input (empty or missing request text).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A provider was constructed from an unusable `ProviderConfig`.
    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(String),

    /// A backend call failed. The message is the backend's failure reason.
    #[error("{0}")]
    Provider(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AuraError {
    /// Short tag used in structured error records.
    pub fn kind(&self) -> &'static str {
        match self {
            AuraError::Validation(_) => "validation_error",
            AuraError::Config(_) => "config_error",
            AuraError::InvalidConfig(_) => "invalid_config",
            AuraError::Provider(_) => "provider_error",
            AuraError::Io(_) | AuraError::Json(_) | AuraError::Other(_) => "unexpected_error",
        }
    }

    /// Whether this error was reported by a backend call.
    pub fn is_provider(&self) -> bool {
        matches!(self, AuraError::Provider(_))
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, AuraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_displays_reason_verbatim() {
        let err = AuraError::Provider("GPT generation failed: 429".to_string());
        assert_eq!(err.to_string(), "GPT generation failed: 429");
        assert!(err.is_provider());
        assert_eq!(err.kind(), "provider_error");
    }

    #[test]
    fn test_validation_error_message() {
        let err = AuraError::Validation("Request must be a non-empty string".into());
        assert!(err.to_string().contains("non-empty string"));
        assert!(!err.is_provider());
    }

    #[test]
    fn test_from_serde_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{{").unwrap_err();
        let err: AuraError = json_err.into();
        assert!(matches!(err, AuraError::Json(_)));
        assert_eq!(err.kind(), "unexpected_error");
    }

    #[test]
    fn test_from_anyhow() {
        let err: AuraError = anyhow::anyhow!("boom").into();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.kind(), "unexpected_error");
    }
}
