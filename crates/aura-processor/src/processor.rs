//! Request processor: registry initialization, provider selection with
//! fallback, and mapping backend outcomes onto response envelopes.
//!
//! # Flow
//! 1. Validate the request text (the only failure returned as `Err`)
//! 2. Pick a provider: explicit name → default, with a warning on a miss
//! 3. Call the provider once
//! 4. Log the interaction or error and return a [`ProcessResponse`]

use std::sync::{Arc, RwLock};

use serde_json::{json, Value};
use tracing::debug;

use aura_core::config::{Config, DEFAULT_LOG_LEVEL, DEFAULT_LOG_PATH, DEFAULT_PROVIDER};
use aura_core::error::{AuraError, Result};
use aura_core::logger::{InteractionLogger, LogLevel};
use aura_core::types::{ChatMessage, Context, ProcessRequest, ProcessResponse};
use aura_core::utils::truncate_string;
use aura_providers::registry::BACKENDS;
use aura_providers::AiProvider;

/// Error text of the failure envelope when no provider can be resolved.
pub const NO_PROVIDER_ERROR: &str = "No AI provider available";

const INVALID_REQUEST: &str = "Request must be a non-empty string";

/// Error tag for adapter failures that are not provider errors.
const UNEXPECTED_ERROR: &str = "unexpected_error";

// ─────────────────────────────────────────────
// RequestProcessor
// ─────────────────────────────────────────────

/// Routes requests to registered providers and normalizes the results.
///
/// The provider list is fixed at construction. Only the default provider
/// name can change afterwards, via [`switch_default_provider`].
///
/// [`switch_default_provider`]: RequestProcessor::switch_default_provider
pub struct RequestProcessor {
    /// Registered providers, in registration order. Names are unique.
    providers: Vec<Arc<dyn AiProvider>>,
    default_provider: RwLock<Option<String>>,
    logger: InteractionLogger,
}

impl std::fmt::Debug for RequestProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestProcessor")
            .field("providers", &self.available_providers())
            .field("default_provider", &self.default_provider_name())
            .finish()
    }
}

impl RequestProcessor {
    /// Build a processor that logs to the file named by `log_path`.
    ///
    /// Fails only if the log file cannot be opened.
    pub fn new(config: &Config) -> Result<Self> {
        let log_path = config.get_str("log_path").unwrap_or(DEFAULT_LOG_PATH);
        let log_level = LogLevel::parse(config.get_str("log_level").unwrap_or(DEFAULT_LOG_LEVEL));
        let logger = InteractionLogger::to_file(log_path, log_level)?;
        Ok(Self::with_logger(config, logger))
    }

    /// Build a processor around a caller-supplied logging handle.
    ///
    /// Never fails: backends that cannot be initialized are skipped with a
    /// warning, and an empty registry is reported as an error record.
    pub fn with_logger(config: &Config, logger: InteractionLogger) -> Self {
        let providers = initialize_providers(config, &logger);
        let default_name = config
            .get_str("default_provider")
            .unwrap_or(DEFAULT_PROVIDER)
            .to_string();
        Self::assemble(providers, Some(&default_name), logger)
    }

    /// Build a processor from already-constructed providers.
    ///
    /// Registration follows the order of `providers`; a later provider with a
    /// name already taken is dropped with a warning.
    pub fn from_providers(
        providers: Vec<Arc<dyn AiProvider>>,
        default_provider: Option<&str>,
        logger: InteractionLogger,
    ) -> Self {
        let mut unique: Vec<Arc<dyn AiProvider>> = Vec::with_capacity(providers.len());
        for provider in providers {
            if unique.iter().any(|p| p.provider_name() == provider.provider_name()) {
                logger.log_warning(format!(
                    "Duplicate provider '{}' ignored",
                    provider.provider_name()
                ));
                continue;
            }
            unique.push(provider);
        }
        Self::assemble(unique, default_provider, logger)
    }

    fn assemble(
        providers: Vec<Arc<dyn AiProvider>>,
        default_name: Option<&str>,
        logger: InteractionLogger,
    ) -> Self {
        let registered = |name: &str| providers.iter().any(|p| p.provider_name() == name);
        let first = providers.first().map(|p| p.provider_name().to_string());

        let default_provider = match default_name {
            Some(name) if registered(name) => Some(name.to_string()),
            Some(name) => {
                logger.log_warning(format!(
                    "Default provider '{name}' not available. Using first available provider."
                ));
                first
            }
            None => first,
        };

        if default_provider.is_none() {
            logger.log_error(
                "No AI providers available",
                "initialization_error",
                json!({ "configured_providers": [] }),
            );
        }

        RequestProcessor {
            providers,
            default_provider: RwLock::new(default_provider),
            logger,
        }
    }

    // ────────────── Introspection ──────────────

    /// Names of registered providers, in registration order.
    pub fn available_providers(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|p| p.provider_name().to_string())
            .collect()
    }

    /// Name of the current default provider, if any.
    pub fn default_provider_name(&self) -> Option<String> {
        self.default_provider
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Look up a registered provider by name.
    pub fn provider(&self, name: &str) -> Option<Arc<dyn AiProvider>> {
        self.providers
            .iter()
            .find(|p| p.provider_name() == name)
            .cloned()
    }

    pub fn logger(&self) -> &InteractionLogger {
        &self.logger
    }

    // ────────────── Switching ──────────────

    /// Make `name` the default provider. Returns `false` (and leaves the
    /// default unchanged) if no such provider is registered.
    pub fn switch_default_provider(&self, name: &str) -> bool {
        if self.provider(name).is_none() {
            self.logger
                .log_warning(format!("Cannot switch to unavailable provider: {name}"));
            return false;
        }

        *self
            .default_provider
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(name.to_string());
        self.logger
            .log_info(format!("Default provider switched to: {name}"));
        true
    }

    // ────────────── Processing ──────────────

    /// Process a serialized request envelope.
    pub async fn process(&self, request: &ProcessRequest) -> Result<ProcessResponse> {
        let text = request
            .request
            .as_deref()
            .ok_or_else(|| AuraError::Validation(INVALID_REQUEST.to_string()))?;
        self.process_request(
            text,
            request.context.as_ref(),
            request.history.as_deref(),
            request.provider.as_deref(),
        )
        .await
    }

    /// Route `request` to a provider and return the normalized envelope.
    ///
    /// Returns `Err` only for an empty or whitespace-only request; every
    /// runtime failure is reported inside the envelope.
    pub async fn process_request(
        &self,
        request: &str,
        context: Option<&Context>,
        history: Option<&[ChatMessage]>,
        provider_name: Option<&str>,
    ) -> Result<ProcessResponse> {
        if request.trim().is_empty() {
            return Err(AuraError::Validation(INVALID_REQUEST.to_string()));
        }

        let provider = match self.select_provider(provider_name) {
            Some(p) => p,
            None => {
                let err = AuraError::Provider(NO_PROVIDER_ERROR.to_string());
                self.logger
                    .log_error(NO_PROVIDER_ERROR, err.kind(), Value::Null);
                return Ok(ProcessResponse::failure(request, NO_PROVIDER_ERROR, None));
            }
        };
        let name = provider.provider_name().to_string();

        self.logger
            .log_info(format!("Processing request with {name} provider"));
        debug!(provider = %name, request = %truncate_string(request, 80), "dispatching request");

        match provider.generate_response(request, context, history).await {
            Ok(response) => {
                self.logger.log_interaction(
                    request,
                    &response,
                    &name,
                    json!({
                        "context": context,
                        "has_history": history.is_some_and(|h| !h.is_empty()),
                    }),
                );
                Ok(ProcessResponse::success(request, response, name))
            }
            Err(e) if e.is_provider() => {
                let message = e.to_string();
                self.logger.log_error(
                    &message,
                    e.kind(),
                    json!({ "provider": name, "request": request }),
                );
                Ok(ProcessResponse::failure(request, message, Some(name)))
            }
            // Any non-provider error from an adapter is unexpected, whatever
            // its kind.
            Err(e) => {
                let message = e.to_string();
                self.logger.log_error(
                    &message,
                    UNEXPECTED_ERROR,
                    json!({ "provider": name, "request": request }),
                );
                Ok(ProcessResponse::failure(
                    request,
                    format!("Unexpected error: {message}"),
                    Some(name),
                ))
            }
        }
    }

    /// Explicit name if registered, else the default.
    fn select_provider(&self, provider_name: Option<&str>) -> Option<Arc<dyn AiProvider>> {
        if let Some(name) = provider_name.filter(|n| !n.is_empty()) {
            if let Some(provider) = self.provider(name) {
                return Some(provider);
            }
            self.logger.log_warning(format!(
                "Requested provider '{name}' not available. Falling back to default."
            ));
        }

        let default = self.default_provider_name()?;
        self.provider(&default)
    }
}

/// Instantiate every configured backend, in table order.
///
/// A backend without an API key is skipped silently; one whose section is
/// missing or whose construction fails is skipped with a warning.
fn initialize_providers(config: &Config, logger: &InteractionLogger) -> Vec<Arc<dyn AiProvider>> {
    let mut providers = Vec::new();

    for spec in BACKENDS {
        let built = spec
            .provider_config(config)
            .and_then(|pc| pc.map(|pc| spec.build(pc)).transpose());

        match built {
            Ok(Some(provider)) => {
                logger.log_info(format!(
                    "{} provider initialized successfully",
                    spec.display_name
                ));
                providers.push(provider);
            }
            Ok(None) => debug!(backend = spec.name, "no API key configured, skipping"),
            Err(e) => logger.log_warning(format!(
                "Failed to initialize {} provider: {e}",
                spec.display_name
            )),
        }
    }

    providers
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
