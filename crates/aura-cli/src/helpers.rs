//! Shared CLI helpers — data directory, argument parsing, response printing.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use colored::Colorize;
use serde_json::Value;

use aura_core::types::{ChatMessage, Context, ProcessResponse};
use aura_core::utils::{expand_home, home_dir};

/// Per-user data directory (e.g. `~/.aura/`).
pub fn data_dir() -> PathBuf {
    home_dir().join(".aura")
}

/// Parse repeated `KEY=VALUE` arguments into a request context.
///
/// Values that parse as JSON keep their type (`age=42` → number); anything
/// else is taken as a plain string.
pub fn parse_context(pairs: &[String]) -> Result<Option<Context>> {
    if pairs.is_empty() {
        return Ok(None);
    }

    let mut context = Context::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            bail!("invalid context entry '{pair}': expected KEY=VALUE");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("invalid context entry '{pair}': empty key");
        }
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        context.insert(key.to_string(), value);
    }
    Ok(Some(context))
}

/// Read a conversation history from a JSON file holding an array of
/// `{"role": ..., "content": ...}` objects.
pub fn load_history(path: &Path) -> Result<Vec<ChatMessage>> {
    let path = expand_home(&path.to_string_lossy());
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read history file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid history file: {}", path.display()))
}

/// Print an assistant reply to stdout.
pub fn print_response(response: &str, provider: &str) {
    println!();
    println!("{} {}", "✨ Aura".cyan().bold(), format!("({provider})").dimmed());
    if response.is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{response}");
    }
    println!();
}

/// Print a failure envelope to stderr.
pub fn print_failure(envelope: &ProcessResponse) {
    let error = envelope.error.as_deref().unwrap_or("unknown error");
    match &envelope.provider {
        Some(provider) => eprintln!("\n❌ {} {}\n", error.red(), format!("({provider})").dimmed()),
        None => eprintln!("\n❌ {}\n", error.red()),
    }
}

/// Print the banner shown at REPL start.
pub fn print_banner(default_provider: Option<&str>) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "✨ Aura".cyan().bold(), version.dimmed());
    if let Some(name) = default_provider {
        println!("{}", format!("Using provider: {name}").dimmed());
    }
    println!(
        "{}",
        "Type a question, /providers, /use <name>, or \"exit\" to quit.".dimmed()
    );
    println!();
}

pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_data_dir_name() {
        assert!(data_dir().ends_with(".aura"));
    }

    #[test]
    fn test_parse_context_empty_is_none() {
        assert!(parse_context(&[]).unwrap().is_none());
    }

    #[test]
    fn test_parse_context_types_and_order() {
        let ctx = parse_context(&args(&["user_type=investor", "age=42", "risk=\"low\"", "note=a=b"]))
            .unwrap()
            .unwrap();

        let keys: Vec<&str> = ctx.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["user_type", "age", "risk", "note"]);
        assert_eq!(ctx["user_type"], json!("investor"));
        assert_eq!(ctx["age"], json!(42));
        assert_eq!(ctx["risk"], json!("low"));
        assert_eq!(ctx["note"], json!("a=b"));
    }

    #[test]
    fn test_parse_context_rejects_malformed() {
        assert!(parse_context(&args(&["novalue"])).is_err());
        assert!(parse_context(&args(&["=x"])).is_err());
    }

    #[test]
    fn test_load_history() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"role": "user", "content": "Hi"}}, {{"role": "assistant", "content": "Hello"}}, {{"content": "bare"}}]"#
        )
        .unwrap();

        let history = load_history(file.path()).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[1], ChatMessage::assistant("Hello"));
        assert_eq!(history[2].role, "user");
    }

    #[test]
    fn test_load_history_errors() {
        assert!(load_history(Path::new("/nonexistent/history.json")).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = load_history(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid history file"));
    }
}
