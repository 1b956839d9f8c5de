//! The settings store: nested JSON objects addressed by dotted keys.
//!
//! `gemini.api_key` walks `root["gemini"]["api_key"]`. A `null` leaf counts
//! as absent, so unset environment variables behave like missing keys.

use serde_json::{Map, Value};

use crate::error::{AuraError, Result};

/// Nested key/value configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    root: Map<String, Value>,
}

impl Config {
    /// An empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON value. The root must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Config { root }),
            other => Err(AuraError::Config(format!(
                "Configuration root must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Borrow the whole tree.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Resolve a dotted key. `None` if any segment is missing, `null`, or
    /// the walk hits a non-object before the last segment.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;

        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }

        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }

    /// Like [`get`](Self::get) but falls back to `default`.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).cloned().unwrap_or(default)
    }

    /// String value at `key`, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Numeric value at `key` as `f64`.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// Non-negative integer value at `key`.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    /// Set a dotted key, creating intermediate objects as needed.
    ///
    /// An intermediate segment holding a non-object value is replaced by an
    /// empty object.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let mut segments: Vec<&str> = key.split('.').collect();
        let last = match segments.pop() {
            Some(last) => last,
            None => return,
        };

        let mut current = &mut self.root;
        for segment in segments {
            if !matches!(current.get(segment), Some(Value::Object(_))) {
                current.insert(segment.to_string(), Value::Object(Map::new()));
            }
            current = match current.get_mut(segment) {
                Some(Value::Object(map)) => map,
                _ => return,
            };
        }

        current.insert(last.to_string(), value.into());
    }

    /// The settings section for one backend (e.g. `"gemini"`, `"openai"`).
    ///
    /// Fails if the section is missing, not an object, or empty.
    pub fn get_provider_config(&self, provider_name: &str) -> Result<&Map<String, Value>> {
        match self.get(provider_name) {
            Some(Value::Object(section)) if !section.is_empty() => Ok(section),
            _ => Err(AuraError::Config(format!(
                "No configuration found for provider: {provider_name}"
            ))),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
