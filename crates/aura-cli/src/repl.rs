//! Interactive REPL.
//!
//! Uses `rustyline` for readline-style editing with persistent history. The
//! conversation so far is replayed to the provider on every turn.

use anyhow::Result;
use colored::Colorize;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use aura_core::types::ChatMessage;
use aura_processor::RequestProcessor;

use crate::helpers;

/// Exit commands (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// A line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Exit,
    ListProviders,
    Use(&'a str),
    /// `/use` without a name.
    UseMissingName,
    Message(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    if is_exit_command(line) {
        return Input::Exit;
    }
    if line == "/providers" {
        return Input::ListProviders;
    }
    if let Some(rest) = line.strip_prefix("/use") {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return match rest.trim() {
                "" => Input::UseMissingName,
                name => Input::Use(name),
            };
        }
    }
    Input::Message(line)
}

/// Run the interactive REPL loop.
pub async fn run(processor: RequestProcessor, provider: Option<String>) -> Result<()> {
    if let Some(name) = provider.as_deref() {
        if !processor.switch_default_provider(name) {
            eprintln!("{}", format!("Provider '{name}' is not available.").yellow());
        }
    }

    helpers::print_banner(processor.default_provider_name().as_deref());

    let mut editor = create_editor()?;
    let mut history: Vec<ChatMessage> = Vec::new();

    loop {
        let input = match editor.readline("You: ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(trimmed);

        match parse_input(trimmed) {
            Input::Exit => {
                println!("\nGoodbye! 👋");
                break;
            }
            Input::ListProviders => print_providers(&processor),
            Input::UseMissingName => eprintln!("{}", "Usage: /use <provider>".yellow()),
            Input::Use(name) => {
                if processor.switch_default_provider(name) {
                    println!("{}", format!("Switched to {name}.").green());
                } else {
                    eprintln!("{}", format!("Provider '{name}' is not available.").yellow());
                }
            }
            Input::Message(text) => {
                debug!(turns = history.len(), "processing input");
                helpers::print_thinking();
                let result = processor
                    .process_request(text, None, Some(&history), None)
                    .await;
                helpers::clear_thinking();

                match result {
                    Ok(envelope) if envelope.success => {
                        let reply = envelope.response.unwrap_or_default();
                        helpers::print_response(&reply, envelope.provider.as_deref().unwrap_or("?"));
                        history.push(ChatMessage::user(text));
                        history.push(ChatMessage::assistant(reply));
                    }
                    Ok(envelope) => helpers::print_failure(&envelope),
                    Err(e) => eprintln!("\n❌ Error: {e}\n"),
                }
            }
        }
    }

    save_history(&mut editor);
    Ok(())
}

fn print_providers(processor: &RequestProcessor) {
    let default = processor.default_provider_name();
    let names = processor.available_providers();
    if names.is_empty() {
        println!("{}", "No providers available.".dimmed());
        return;
    }
    for name in names {
        if default.as_deref() == Some(name.as_str()) {
            println!("  {} {}", "●".green(), name.bold());
        } else {
            println!("  {} {}", "·".dimmed(), name);
        }
    }
}

fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    let history_path = history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

/// `~/.aura/history/chat_history`
fn history_path() -> std::path::PathBuf {
    helpers::data_dir().join("history").join("chat_history")
}

fn is_exit_command(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
