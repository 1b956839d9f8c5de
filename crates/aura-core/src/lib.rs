//! Aura core — shared types, error taxonomy, configuration, and logging.
//!
//! - [`config`]: dot-addressable settings loaded from JSON or the environment
//! - [`error`]: [`AuraError`] used across every crate
//! - [`logger`]: the [`InteractionLogger`] handle owned by the request processor
//! - [`types`]: request/response envelopes and chat messages

pub mod config;
pub mod error;
pub mod logger;
pub mod types;
pub mod utils;

pub use config::Config;
pub use error::{AuraError, Result};
pub use logger::{InteractionLogger, LogEvent, LogLevel, LogSink};
pub use types::{ChatMessage, Context, ProcessRequest, ProcessResponse};
