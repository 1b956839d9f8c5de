//! Request routing for Aura: provider registry, selection with fallback,
//! and response envelopes.

pub mod processor;

pub use processor::{RequestProcessor, NO_PROVIDER_ERROR};
