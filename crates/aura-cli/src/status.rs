//! `aura status` — show configuration source and per-backend credential status.
//!
//! Reads the configuration only; no provider is constructed and no log file
//! is opened.

use std::path::Path;

use anyhow::{Context as _, Result};
use colored::Colorize;

use aura_core::config::{Config, DEFAULT_LOG_LEVEL, DEFAULT_LOG_PATH, DEFAULT_PROVIDER};
use aura_core::error::AuraError;
use aura_providers::registry::{BackendSpec, BACKENDS};

/// Credential status of one backend.
#[derive(Debug, PartialEq, Eq)]
enum BackendStatus {
    /// API key present; carries the model that would be used.
    Ready(String),
    NotConfigured,
    /// Section present but unusable.
    Invalid(String),
}

fn backend_status(config: &Config, spec: &BackendSpec) -> BackendStatus {
    match spec.provider_config(config) {
        Ok(Some(pc)) if pc.model.is_empty() => {
            BackendStatus::Invalid("model name is empty".to_string())
        }
        Ok(Some(pc)) => BackendStatus::Ready(pc.model),
        Ok(None) => BackendStatus::NotConfigured,
        Err(AuraError::Config(_)) => BackendStatus::NotConfigured,
        Err(e) => BackendStatus::Invalid(e.to_string()),
    }
}

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path).context("failed to load configuration")?;

    println!();
    println!("{}", "✨ Aura Status".cyan().bold());
    println!();

    let source = match config_path {
        Some(path) => format!("{} {}", path.display(), "✓".green()),
        None => "environment".dimmed().to_string(),
    };
    println!("  {:<18} {}", "Config:".bold(), source);
    println!(
        "  {:<18} {}",
        "Default provider:".bold(),
        config.get_str("default_provider").unwrap_or(DEFAULT_PROVIDER)
    );
    println!(
        "  {:<18} {} {}",
        "Log:".bold(),
        config.get_str("log_path").unwrap_or(DEFAULT_LOG_PATH),
        format!("({})", config.get_str("log_level").unwrap_or(DEFAULT_LOG_LEVEL)).dimmed()
    );

    println!();
    println!("  {}", "Providers:".bold());
    for spec in BACKENDS {
        let status = match backend_status(&config, spec) {
            BackendStatus::Ready(model) => format!("{} (key set, model: {model})", "✓".green()),
            BackendStatus::NotConfigured => format!(
                "{}",
                format!("· not configured (set {})", spec.env_key).dimmed()
            ),
            BackendStatus::Invalid(reason) => format!("{} {reason}", "✗".red()),
        };
        println!("    {:<20} {}", format!("{} [{}]", spec.display_name, spec.name), status);
    }
    println!();

    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
