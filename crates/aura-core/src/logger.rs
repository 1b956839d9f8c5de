//! Interaction logging — an append-only event recorder owned by the processor.
//!
//! Every event goes to two places: the configured [`LogSink`] (usually a
//! file) and `tracing`, so a subscriber installed by the binary also sees it
//! on the console.
//!
//! File line format:
//! ```text
//! 2024-05-01 12:00:00 - aura - INFO - Interaction: {"timestamp":"...","request":"..."}
//! ```

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::utils;

/// Logger name written into every file line.
const LOGGER_NAME: &str = "aura";

// ─────────────────────────────────────────────
// Levels
// ─────────────────────────────────────────────

/// Severity threshold, ordered from most to least verbose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Parse a level name case-insensitively. Unknown names mean `Info`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => LogLevel::Debug,
            "WARNING" | "WARN" => LogLevel::Warning,
            "ERROR" => LogLevel::Error,
            "CRITICAL" => LogLevel::Critical,
            _ => LogLevel::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────

/// A completed request/response exchange.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct InteractionRecord {
    pub timestamp: String,
    pub request: String,
    pub response: String,
    pub provider: String,
    pub metadata: Value,
}

/// A failure worth recording, tagged with a short `error_type`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ErrorRecord {
    pub timestamp: String,
    pub error_type: String,
    pub error_message: String,
    pub details: Value,
}

/// One entry in the log.
#[derive(Clone, Debug, PartialEq)]
pub enum LogEvent {
    Debug(String),
    Info(String),
    Warning(String),
    Interaction(InteractionRecord),
    Error(ErrorRecord),
}

impl LogEvent {
    pub fn level(&self) -> LogLevel {
        match self {
            LogEvent::Debug(_) => LogLevel::Debug,
            LogEvent::Info(_) | LogEvent::Interaction(_) => LogLevel::Info,
            LogEvent::Warning(_) => LogLevel::Warning,
            LogEvent::Error(_) => LogLevel::Error,
        }
    }

    /// Rendered message text; structured records become `"<Kind>: <json>"`.
    pub fn message(&self) -> String {
        match self {
            LogEvent::Debug(msg) | LogEvent::Info(msg) | LogEvent::Warning(msg) => msg.clone(),
            LogEvent::Interaction(record) => format!("Interaction: {}", to_json(record)),
            LogEvent::Error(record) => format!("Error: {}", to_json(record)),
        }
    }
}

fn to_json<T: Serialize>(record: &T) -> String {
    serde_json::to_string(record).unwrap_or_else(|e| format!("<unserializable record: {e}>"))
}

// ─────────────────────────────────────────────
// Sinks
// ─────────────────────────────────────────────

/// Destination for log events. Implementations must only append.
pub trait LogSink: Send + Sync {
    fn write(&self, event: &LogEvent) -> std::io::Result<()>;
}

/// Appends formatted lines to a file, creating its parent directory.
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!(path = %path.display(), "opened interaction log");
        Ok(FileSink {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for FileSink {
    fn write(&self, event: &LogEvent) -> std::io::Result<()> {
        let line = format!(
            "{} - {} - {} - {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            LOGGER_NAME,
            event.level(),
            event.message()
        );
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        file.write_all(line.as_bytes())?;
        file.flush()
    }
}

/// Keeps events in memory. Useful for embedding and tests.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Plain-text warnings recorded so far.
    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                LogEvent::Warning(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    /// Structured error records recorded so far.
    pub fn errors(&self) -> Vec<ErrorRecord> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                LogEvent::Error(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Interaction records recorded so far.
    pub fn interactions(&self) -> Vec<InteractionRecord> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                LogEvent::Interaction(record) => Some(record),
                _ => None,
            })
            .collect()
    }
}

impl LogSink for MemorySink {
    fn write(&self, event: &LogEvent) -> std::io::Result<()> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
        Ok(())
    }
}

// ─────────────────────────────────────────────
// InteractionLogger
// ─────────────────────────────────────────────

/// Logging handle. Cheap to clone; clones share the same sink.
#[derive(Clone)]
pub struct InteractionLogger {
    sink: Arc<dyn LogSink>,
    level: LogLevel,
}

impl fmt::Debug for InteractionLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionLogger")
            .field("level", &self.level)
            .finish()
    }
}

impl InteractionLogger {
    pub fn new(sink: Arc<dyn LogSink>, level: LogLevel) -> Self {
        Self { sink, level }
    }

    /// Log to an append-only file at `path`.
    pub fn to_file(path: impl AsRef<Path>, level: LogLevel) -> std::io::Result<Self> {
        Ok(Self::new(Arc::new(FileSink::open(path)?), level))
    }

    /// Log into memory; returns the sink so callers can inspect it.
    pub fn in_memory(level: LogLevel) -> (Self, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (Self::new(sink.clone(), level), sink)
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Record a completed exchange.
    pub fn log_interaction(&self, request: &str, response: &str, provider: &str, metadata: Value) {
        self.emit(LogEvent::Interaction(InteractionRecord {
            timestamp: utils::timestamp(),
            request: request.to_string(),
            response: response.to_string(),
            provider: provider.to_string(),
            metadata: object_or_empty(metadata),
        }));
    }

    /// Record an error tagged with `error_type`.
    pub fn log_error(&self, error_message: &str, error_type: &str, details: Value) {
        self.emit(LogEvent::Error(ErrorRecord {
            timestamp: utils::timestamp(),
            error_type: error_type.to_string(),
            error_message: error_message.to_string(),
            details: object_or_empty(details),
        }));
    }

    pub fn log_info(&self, message: impl Into<String>) {
        self.emit(LogEvent::Info(message.into()));
    }

    pub fn log_warning(&self, message: impl Into<String>) {
        self.emit(LogEvent::Warning(message.into()));
    }

    pub fn log_debug(&self, message: impl Into<String>) {
        self.emit(LogEvent::Debug(message.into()));
    }

    fn emit(&self, event: LogEvent) {
        if event.level() < self.level {
            return;
        }

        let message = event.message();
        match event.level() {
            LogLevel::Debug => debug!(target: "aura", "{message}"),
            LogLevel::Info => info!(target: "aura", "{message}"),
            LogLevel::Warning => warn!(target: "aura", "{message}"),
            LogLevel::Error | LogLevel::Critical => error!(target: "aura", "{message}"),
        }

        if let Err(e) = self.sink.write(&event) {
            warn!(error = %e, "failed to write interaction log");
        }
    }
}

/// `null` metadata/details become `{}`.
fn object_or_empty(value: Value) -> Value {
    if value.is_null() {
        Value::Object(Default::default())
    } else {
        value
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
