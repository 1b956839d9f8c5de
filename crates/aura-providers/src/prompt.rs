//! Prompt assembly shared by the adapters.
//!
//! Two shapes, same ordering (context, then history, then the new prompt):
//! - [`build_prompt`]: one text blob for single-turn backends (Gemini)
//! - [`build_messages`]: role-tagged messages for chat backends (OpenAI)

use serde_json::Value;

use aura_core::types::{ChatMessage, Context};

/// Identity given to chat backends as the leading system message.
pub const SYSTEM_PROMPT: &str = "You are Aura, an intelligent financial assistant.";

/// Render context as `key: value` lines. Strings are written unquoted.
pub fn render_context(context: &Context) -> String {
    context
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("{key}: {s}"),
            other => format!("{key}: {other}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render history as `role: content` lines.
pub fn render_history(history: &[ChatMessage]) -> String {
    history
        .iter()
        .map(|msg| format!("{}: {}", msg.role, msg.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single-turn prompt: optional context block, optional history block, then
/// `User: <prompt>`.
pub fn build_prompt(
    prompt: &str,
    context: Option<&Context>,
    history: Option<&[ChatMessage]>,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(context) = context.filter(|c| !c.is_empty()) {
        parts.push(format!("Context:\n{}\n", render_context(context)));
    }

    if let Some(history) = history.filter(|h| !h.is_empty()) {
        parts.push(format!("Previous conversation:\n{}\n", render_history(history)));
    }

    parts.push(format!("User: {prompt}"));
    parts.join("\n")
}

/// Chat prompt: system message (with context folded in), history, user turn.
pub fn build_messages(
    prompt: &str,
    context: Option<&Context>,
    history: Option<&[ChatMessage]>,
) -> Vec<ChatMessage> {
    let mut system = SYSTEM_PROMPT.to_string();
    if let Some(context) = context.filter(|c| !c.is_empty()) {
        system.push_str("\n\nContext:\n");
        system.push_str(&render_context(context));
    }

    let history = history.unwrap_or_default();
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(prompt));
    messages
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> Context {
        let mut ctx = Context::new();
        ctx.insert("user_type".into(), json!("investor"));
        ctx.insert("expertise_level".into(), json!("beginner"));
        ctx.insert("age".into(), json!(34));
        ctx
    }

    fn history() -> Vec<ChatMessage> {
        vec![
            ChatMessage::user("What is an ETF?"),
            ChatMessage::assistant("An exchange-traded fund."),
        ]
    }

    #[test]
    fn test_render_context_unquotes_strings() {
        assert_eq!(
            render_context(&context()),
            "user_type: investor\nexpertise_level: beginner\nage: 34"
        );
    }

    #[test]
    fn test_build_prompt_bare() {
        assert_eq!(build_prompt("Hello", None, None), "User: Hello");
    }

    #[test]
    fn test_build_prompt_full_ordering() {
        let ctx = context();
        let hist = history();
        let prompt = build_prompt("Should I buy one?", Some(&ctx), Some(&hist));

        assert_eq!(
            prompt,
            "Context:\nuser_type: investor\nexpertise_level: beginner\nage: 34\n\n\
             Previous conversation:\nuser: What is an ETF?\nassistant: An exchange-traded fund.\n\n\
             User: Should I buy one?"
        );
    }

    #[test]
    fn test_build_prompt_skips_empty_sections() {
        let empty = Context::new();
        let prompt = build_prompt("Hi", Some(&empty), Some(&[]));
        assert_eq!(prompt, "User: Hi");
    }

    #[test]
    fn test_build_messages_bare() {
        let messages = build_messages("Hello", None, None);
        assert_eq!(
            messages,
            vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user("Hello")]
        );
    }

    #[test]
    fn test_build_messages_context_in_system_and_order() {
        let ctx = context();
        let hist = history();
        let messages = build_messages("Should I buy one?", Some(&ctx), Some(&hist));

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.starts_with(SYSTEM_PROMPT));
        assert!(messages[0].content.ends_with("Context:\nuser_type: investor\nexpertise_level: beginner\nage: 34"));
        assert_eq!(messages[1], hist[0]);
        assert_eq!(messages[2], hist[1]);
        assert_eq!(messages[3], ChatMessage::user("Should I buy one?"));
    }
}
