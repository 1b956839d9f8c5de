//! Aura CLI — entry point.
//!
//! # Commands
//!
//! - `aura ask MESSAGE [-p PROVIDER] [-c KEY=VALUE]... [--history FILE] [--json]`
//! - `aura chat [-p PROVIDER]`: interactive REPL
//! - `aura status`: show configuration and provider status
//! - `aura providers`: list initialized providers

mod helpers;
mod repl;
mod status;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use aura_core::config::Config;
use aura_core::utils::expand_home;
use aura_processor::RequestProcessor;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// ✨ Aura, a financial assistant over pluggable LLM backends
#[derive(Parser, Debug)]
#[command(name = "aura", version, about, long_about = None)]
struct Cli {
    /// JSON configuration file. Omit to read settings from the environment.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question and print the reply
    Ask {
        message: String,

        /// Provider to use instead of the default
        #[arg(short, long)]
        provider: Option<String>,

        /// Context entry (repeatable), e.g. -c user_type=investor
        #[arg(short = 'c', long = "context", value_name = "KEY=VALUE")]
        context: Vec<String>,

        /// JSON file with prior conversation messages
        #[arg(long, value_name = "FILE")]
        history: Option<PathBuf>,

        /// Print the full response envelope as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Interactive chat session
    Chat {
        /// Provider to start with
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Show configuration and provider status
    Status,

    /// List initialized providers
    Providers,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.logs);

    let config_path = cli.config.as_deref().map(|p| expand_home(&p.to_string_lossy()));

    match cli.command {
        Commands::Ask {
            message,
            provider,
            context,
            history,
            json,
        } => {
            let processor = build_processor(config_path.as_deref())?;
            let args = AskArgs {
                message,
                provider,
                context,
                history,
                json,
            };
            let succeeded = run_ask(&processor, args).await?;
            Ok(if succeeded {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Chat { provider } => {
            let processor = build_processor(config_path.as_deref())?;
            repl::run(processor, provider).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Status => {
            status::run(config_path.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Providers => {
            let processor = build_processor(config_path.as_deref())?;
            list_providers(&processor);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load configuration and initialize the processor (and its log file).
fn build_processor(config_path: Option<&Path>) -> Result<RequestProcessor> {
    let config = Config::load(config_path).context("failed to load configuration")?;
    let processor =
        RequestProcessor::new(&config).context("failed to open interaction log")?;
    info!(providers = ?processor.available_providers(), "processor ready");
    Ok(processor)
}

// ─────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────

struct AskArgs {
    message: String,
    provider: Option<String>,
    context: Vec<String>,
    history: Option<PathBuf>,
    json: bool,
}

/// Returns whether the envelope reported success.
async fn run_ask(processor: &RequestProcessor, args: AskArgs) -> Result<bool> {
    let context = helpers::parse_context(&args.context)?;
    let history = match &args.history {
        Some(path) => Some(helpers::load_history(path)?),
        None => None,
    };

    let envelope = processor
        .process_request(
            &args.message,
            context.as_ref(),
            history.as_deref(),
            args.provider.as_deref(),
        )
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else if envelope.success {
        helpers::print_response(
            envelope.response.as_deref().unwrap_or_default(),
            envelope.provider.as_deref().unwrap_or("?"),
        );
    } else {
        helpers::print_failure(&envelope);
    }

    Ok(envelope.success)
}

fn list_providers(processor: &RequestProcessor) {
    let names = processor.available_providers();
    if names.is_empty() {
        println!("{}", "No providers available. Run `aura status` for details.".yellow());
        return;
    }

    let default = processor.default_provider_name();
    for name in names {
        if default.as_deref() == Some(name.as_str()) {
            println!("{} {}", name.bold(), "(default)".green());
        } else {
            println!("{name}");
        }
    }
}

/// Initialize tracing. `RUST_LOG` wins over the `--logs` switch.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let fallback = if verbose { "aura=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_options() {
        let cli = Cli::try_parse_from([
            "aura", "ask", "What is an ETF?", "-p", "gpt", "-c", "user_type=investor", "-c",
            "age=30", "--json", "--config", "aura.json",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("aura.json")));
        match cli.command {
            Commands::Ask {
                message,
                provider,
                context,
                history,
                json,
            } => {
                assert_eq!(message, "What is an ETF?");
                assert_eq!(provider.as_deref(), Some("gpt"));
                assert_eq!(context, vec!["user_type=investor", "age=30"]);
                assert!(history.is_none());
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_chat_and_status() {
        let cli = Cli::try_parse_from(["aura", "chat", "--provider", "gemini"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat { provider: Some(ref p) } if p == "gemini"));

        let cli = Cli::try_parse_from(["aura", "--logs", "status"]).unwrap();
        assert!(cli.logs);
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_ask_requires_message() {
        assert!(Cli::try_parse_from(["aura", "ask"]).is_err());
    }

    #[tokio::test]
    async fn test_ask_exit_code_without_providers() {
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("aura.json");
        let log_path = dir.path().join("interactions.log");
        std::fs::write(
            &config_file,
            serde_json::json!({
                "gemini": { "api_key": null },
                "openai": { "api_key": null },
                "log_path": log_path.to_string_lossy()
            })
            .to_string(),
        )
        .unwrap();

        let processor = build_processor(Some(&config_file)).unwrap();
        let args = AskArgs {
            message: "Hello".into(),
            provider: None,
            context: Vec::new(),
            history: None,
            json: true,
        };

        let succeeded = run_ask(&processor, args).await.unwrap();
        assert!(!succeeded);
        assert!(log_path.exists());
    }

    #[tokio::test]
    async fn test_ask_rejects_blank_message() {
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("aura.json");
        std::fs::write(
            &config_file,
            serde_json::json!({
                "gemini": { "api_key": null },
                "openai": { "api_key": null },
                "log_path": dir.path().join("i.log").to_string_lossy()
            })
            .to_string(),
        )
        .unwrap();

        let processor = build_processor(Some(&config_file)).unwrap();
        let args = AskArgs {
            message: "   ".into(),
            provider: None,
            context: Vec::new(),
            history: None,
            json: false,
        };
        assert!(run_ask(&processor, args).await.is_err());
    }

    #[test]
    fn test_build_processor_missing_config_file() {
        let err = build_processor(Some(Path::new("/nonexistent/aura.json"))).unwrap_err();
        assert!(format!("{err:#}").contains("Configuration file not found"));
    }
}
