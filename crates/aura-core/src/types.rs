//! Core types — request/response envelopes and chat messages.
//!
//! Envelopes are plain serde structs so callers can move them across process
//! boundaries as JSON; absent optional fields are omitted on the wire.

use serde::{Deserialize, Serialize};

/// Caller-supplied key/value data folded into the prompt.
///
/// Insertion order is preserved (`serde_json` is built with `preserve_order`).
pub type Context = serde_json::Map<String, serde_json::Value>;

// ─────────────────────────────────────────────
// Chat messages
// ─────────────────────────────────────────────

/// A single `{role, content}` turn of conversation history.
///
/// Also the wire shape for OpenAI-style chat requests. Missing fields fall
/// back to `role = "user"` and `content = ""`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

fn default_role() -> String {
    "user".to_string()
}

impl ChatMessage {
    /// Create a message with an arbitrary role.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        ChatMessage {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

// ─────────────────────────────────────────────
// Request envelope
// ─────────────────────────────────────────────

/// Serialized form of a request to the processor.
///
/// `request` is optional here so that a missing field surfaces as a
/// validation error instead of a deserialization failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ProcessRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<ChatMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl ProcessRequest {
    /// Create a request with only the text set.
    pub fn new(request: impl Into<String>) -> Self {
        ProcessRequest {
            request: Some(request.into()),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }
}

// ─────────────────────────────────────────────
// Response envelope
// ─────────────────────────────────────────────

/// Normalized result of request processing.
///
/// `response` is present iff `success`; `error` is present iff not.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProcessResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Name of the provider actually used, when one was resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// The original request text, echoed back.
    pub request: String,
}

impl ProcessResponse {
    /// Build a success envelope.
    pub fn success(
        request: impl Into<String>,
        response: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        ProcessResponse {
            success: true,
            response: Some(response.into()),
            error: None,
            provider: Some(provider.into()),
            request: request.into(),
        }
    }

    /// Build a failure envelope.
    pub fn failure(
        request: impl Into<String>,
        error: impl Into<String>,
        provider: Option<String>,
    ) -> Self {
        ProcessResponse {
            success: false,
            response: None,
            error: Some(error.into()),
            provider,
            request: request.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
