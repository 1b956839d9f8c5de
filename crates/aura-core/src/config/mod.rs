//! Configuration system — a dot-addressable settings store plus loaders.
//!
//! # Usage
//! ```no_run
//! use aura_core::config::Config;
//!
//! let cfg = Config::load(None).unwrap();
//! println!("Default provider: {}", cfg.get_str("default_provider").unwrap_or("gemini"));
//! ```

pub mod loader;
pub mod store;

pub use loader::{
    DEFAULT_GEMINI_MODEL, DEFAULT_LOG_LEVEL, DEFAULT_LOG_PATH, DEFAULT_OPENAI_MODEL,
    DEFAULT_PROVIDER,
};
pub use store::Config;
