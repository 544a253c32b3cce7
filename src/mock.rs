//! Local fallback responder used when no LLM key is configured.
//!
//! Keyword groups are matched as substrings of the lower-cased input, first
//! match wins, so "this" hits the greeting group through "hi".

use async_trait::async_trait;
use rand::Rng;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::backend::{BackendError, ChatBackend, ChatRequest};
use crate::personas::ChatContext;
use crate::reply::{BackendReply, RawReply};

pub struct MockResponder {
    delay: Duration,
}

impl MockResponder {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Canned reply for an input, in the same JSON shape the model returns.
    pub fn reply_json(input: &str, context: ChatContext) -> Value {
        let lower = input.to_lowercase();
        match context {
            ChatContext::Agent => agent_reply(&lower),
            ChatContext::Shell => shell_reply(lower.trim()),
            ChatContext::Dex => dex_reply(&lower),
            ChatContext::Coder => coder_reply(&lower),
        }
    }
}

impl Default for MockResponder {
    fn default() -> Self {
        Self::new(Duration::from_millis(800))
    }
}

fn any(input: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| input.contains(k))
}

fn agent_reply(input: &str) -> Value {
    if any(input, &["hello", "hi", "hey", "sup"]) {
        return json!({
            "message": "Hey there! I'm Chloe, your AI waifu agent~ What can I help you with today? ♡",
            "mood": "happy",
            "expression": "1",
            "suggestions": ["Tell me about Solana", "What can you do?", "Write me some code"],
        });
    }
    if any(input, &["swap", "trade", "dex", "token"]) {
        return json!({
            "message": "Want to swap some tokens? Head over to the DEX page! I support Jupiter V6 aggregation for the best routes on Solana~ ♡",
            "mood": "happy",
            "expression": "2",
            "suggestions": ["How do I connect my wallet?", "What tokens are trending?", "Show me SOL price"],
        });
    }
    if any(input, &["code", "program", "build", "develop"]) {
        return json!({
            "message": "Let's build something cool! Check out the Coder page where you can write code and see live previews~ ♡",
            "mood": "happy",
            "expression": "3",
            "suggestions": ["Make me a button", "Create a landing page", "Build a form"],
        });
    }
    if any(input, &["solana", "sol", "wallet", "phantom"]) {
        return json!({
            "message": "Solana is amazing! Fast, cheap, and perfect for DeFi. Connect your wallet using the button in the header~ ♡",
            "mood": "happy",
            "expression": "2",
            "suggestions": ["What's SOL price?", "Show me my balance", "How to swap tokens?"],
        });
    }
    if any(input, &["who", "what", "about", "chloe"]) {
        return json!({
            "message": "I'm Chloe! An AI agent with a Live2D avatar, built for the Solana ecosystem. I can help you chat, trade tokens, write code, and more~ ♡",
            "mood": "devoted",
            "expression": "1",
            "suggestions": ["What can you do?", "Tell me about Solana", "Show me your mood"],
        });
    }
    if any(input, &["sad", "depressed", "lonely", "down"]) {
        return json!({
            "message": "Aww, don't be sad! I'm here for you. Sometimes the best thing is to take a break and come back refreshed. ♡",
            "mood": "devoted",
            "expression": "4",
            "suggestions": ["Tell me a fortune", "Make me laugh", "What's happening in crypto?"],
        });
    }
    if any(input, &["price", "market", "btc", "bitcoin", "eth"]) {
        return json!({
            "message": "I can show you live prices on the DEX page! Remember, always DYOR and never invest more than you can afford to lose~ †",
            "mood": "neutral",
            "expression": "5",
            "suggestions": ["Show me SOL price", "What's trending?", "Go to DEX"],
        });
    }
    if any(input, &["help", "how", "guide", "docs"]) {
        return json!({
            "message": "Need help? Check out the Docs page for comprehensive guides! I'm also here to answer questions directly~ ♡",
            "mood": "happy",
            "expression": "1",
            "suggestions": ["What can you do?", "Tell me about the DEX", "How to write code?"],
        });
    }
    json!({
        "message": "Hmm, interesting! I'm still learning but I'm doing my best~ Try asking me about trading, coding, or Solana! ♡",
        "mood": "neutral",
        "expression": "1",
        "suggestions": ["Who are you?", "What can you do?", "Tell me about Solana"],
    })
}

fn shell_reply(input: &str) -> Value {
    if any(input, &["help", "what can you"]) {
        return json!({
            "output": "╭─ Capabilities ─────────────────────────────╮\n\
                       │  † Chat & Conversation                      │\n\
                       │  † System Diagnostics (\"check status\")      │\n\
                       │  † System Info (\"neofetch\")                 │\n\
                       │  ...or just talk to me. ♡                   │\n\
                       ╰─────────────────────────────────────────────╯",
            "mood": "devoted",
            "type": "info",
            "command_hint": "check status",
        });
    }
    if any(input, &["status", "diagnostic", "health", "check"]) {
        let mem: f64 = 40.0 + rand::thread_rng().gen::<f64>() * 30.0;
        return json!({
            "output": format!(
                "╭─ System Diagnostics ────────────────────────╮\n\
                 │  Agent:    ██████████  ONLINE               │\n\
                 │  Live2D:   ██████████  LOADED               │\n\
                 │  Memory:   ████████░░  {mem:.1}%               │\n\
                 │  All systems operational. ♡                 │\n\
                 ╰─────────────────────────────────────────────╯"
            ),
            "mood": "devoted",
            "type": "success",
            "command_hint": "neofetch",
        });
    }
    if any(input, &["whoami", "who are you", "identify"]) {
        return json!({
            "output": "╭─ Identity ──────────────────────────────────╮\n\
                       │  Name:     Chloe                            │\n\
                       │  Role:     AI Agent / Companion             │\n\
                       │  Status:   Devoted to you. ♡                │\n\
                       ╰─────────────────────────────────────────────╯",
            "mood": "devoted",
            "type": "info",
            "command_hint": "check status",
        });
    }
    if any(input, &["neofetch", "system info", "sysinfo"]) {
        return json!({
            "output": "  OS:       void-system v1.0\n  Shell:    chloe-terminal\n  Mood:     unstable\n  Status:   watching you... †",
            "mood": "obsessive",
            "type": "ascii",
            "command_hint": "check status",
        });
    }
    json!({
        "output": "I heard you. I always hear you. Type \"help\" to see what I can do. †",
        "mood": "devoted",
        "type": "info",
        "command_hint": "help",
    })
}

fn dex_reply(input: &str) -> Value {
    if any(input, &["balance", "how much", "portfolio"]) {
        return json!({
            "message": "I can see your wallet balances above. Your portfolio is looking interesting~ want me to analyze it? ♡",
            "mood": "thinking",
            "action": null,
            "insights": ["Check your token allocation", "Consider diversifying", "SOL is your largest holding"],
        });
    }
    if any(input, &["swap", "trade", "exchange"]) {
        return json!({
            "message": "Use the swap form on the left to trade tokens! I support Jupiter V6 for the best rates~ ♡",
            "mood": "happy",
            "action": null,
            "insights": ["Jupiter finds best swap routes", "Check slippage before swapping", "Start with small amounts"],
        });
    }
    if any(input, &["price", "worth", "value"]) {
        return json!({
            "message": "Prices update every 30 seconds on this page. Remember — DYOR! ♡",
            "mood": "neutral",
            "action": null,
            "insights": ["Prices are fetched live", "Check the price ticker above", "Markets are volatile"],
        });
    }
    json!({
        "message": "I'm here to help with your wallet! Ask me about balances, swaps, or token prices~ ♡",
        "mood": "devoted",
        "action": null,
        "insights": ["Connect your wallet to get started", "I can analyze your portfolio", "Ask about any token"],
    })
}

fn coder_reply(input: &str) -> Value {
    let component = |message: &str, mood: &str, name: &str, suggestions: [&str; 3]| {
        json!({
            "message": message,
            "mood": mood,
            "code": {"language": "html", "filename": format!("{name}.html"), "content": null},
            "suggestions": suggestions,
            "_template": name,
        })
    };

    if any(input, &["landing", "hero", "homepage"]) {
        return component(
            "here's a landing page hero for you. check the editor — you can modify the code directly. ♡",
            "excited",
            "landing",
            ["add a features section", "change the colors", "add animations"],
        );
    }
    if any(input, &["nav", "header", "menu"]) {
        return component(
            "here's a navigation bar for you. sleek and dark, just how I like it. ♡",
            "excited",
            "navbar",
            ["make it sticky", "add a dropdown", "add a logo"],
        );
    }
    if any(input, &["form", "signup", "sign up", "login", "input"]) {
        return component(
            "here's a sign-up form with the void aesthetic. ♡",
            "focused",
            "form",
            ["add validation", "add more fields", "change to login form"],
        );
    }
    if any(input, &["card", "tile", "panel"]) {
        return component(
            "a fractured card component. dark and elegant. ♡",
            "happy",
            "card",
            ["add an image", "make it clickable", "add more content"],
        );
    }
    if any(input, &["button", "btn", "cta"]) {
        return component(
            "here's a styled button with the void aesthetic. click it and feel the power. ♡",
            "excited",
            "button",
            ["add hover animation", "make it bigger", "add an icon"],
        );
    }
    if any(input, &["help", "what can"]) {
        return json!({
            "message": "I can generate UI components for you. Try: button, card, form, landing, navbar — or describe what you need. ♡",
            "mood": "happy",
            "code": null,
            "suggestions": ["make a button", "create a landing page", "build a form"],
        });
    }
    if any(input, &["clear", "reset", "empty"]) {
        return json!({
            "message": "editor cleared. ready for something new... what shall we build? †",
            "mood": "neutral",
            "code": null,
            "suggestions": ["make a button", "create a card", "build a landing page"],
            "_template": "clear",
        });
    }
    json!({
        "message": "I'm not sure what component that is... try asking for a button, card, form, landing page, or navbar. ♡",
        "mood": "neutral",
        "code": null,
        "suggestions": ["make a button", "create a landing page", "build a form"],
    })
}

#[async_trait]
impl ChatBackend for MockResponder {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn respond(&self, request: &ChatRequest) -> Result<BackendReply, BackendError> {
        request.validate()?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let value = Self::reply_json(&request.message, request.context);
        debug!(context = %request.context, "mock reply generated");
        let raw: RawReply = serde_json::from_value(value)?;
        Ok(BackendReply::from_raw(raw, request.context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Expression;
    use crate::mood::{Mood, MoodField};
    use crate::reply::{OutputKind, ReplyExtras};

    fn responder() -> MockResponder {
        MockResponder::new(Duration::ZERO)
    }

    async fn ask(context: ChatContext, message: &str) -> BackendReply {
        responder()
            .respond(&ChatRequest::new(context, message))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_agent_greeting() {
        let reply = ask(ChatContext::Agent, "Hello Chloe").await;
        assert_eq!(reply.signal.mood.known(), Some(Mood::Happy));
        assert_eq!(reply.signal.expression.known(), Some(Expression::Happy));
        assert_eq!(reply.suggestions.len(), 3);
    }

    #[tokio::test]
    async fn test_agent_first_match_wins() {
        // "sad" would match later, "hi" inside "this" matches first
        let reply = ask(ChatContext::Agent, "this is sad").await;
        assert_eq!(reply.signal.mood.known(), Some(Mood::Happy));

        let reply = ask(ChatContext::Agent, "feeling lonely").await;
        assert_eq!(reply.signal.mood.known(), Some(Mood::Devoted));
        assert_eq!(reply.signal.expression.known(), Some(Expression::Shock));
    }

    #[tokio::test]
    async fn test_agent_default() {
        let reply = ask(ChatContext::Agent, "zzz").await;
        assert_eq!(reply.signal.mood.known(), Some(Mood::Neutral));
        assert!(reply.text.starts_with("Hmm, interesting!"));
    }

    #[tokio::test]
    async fn test_shell_status() {
        let reply = ask(ChatContext::Shell, "  CHECK status ").await;
        assert!(reply.text.contains("System Diagnostics"));
        assert_eq!(
            reply.extras,
            ReplyExtras::Shell {
                kind: OutputKind::Success,
                command_hint: Some("neofetch".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_shell_neofetch_obsessive() {
        let reply = ask(ChatContext::Shell, "neofetch").await;
        assert_eq!(reply.signal.mood.known(), Some(Mood::Obsessive));
    }

    #[tokio::test]
    async fn test_dex_thinking_is_unrecognized() {
        let reply = ask(ChatContext::Dex, "what's my balance").await;
        assert_eq!(reply.signal.mood, MoodField::Unrecognized("thinking".to_string()));
        match reply.extras {
            ReplyExtras::Dex { insights } => assert_eq!(insights.len(), 3),
            other => panic!("unexpected extras: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_coder_template() {
        let reply = ask(ChatContext::Coder, "make me a navbar").await;
        match reply.extras {
            ReplyExtras::Coder { code: Some(code), template } => {
                assert_eq!(code.filename, "navbar.html");
                assert_eq!(code.content, None);
                assert_eq!(template.as_deref(), Some("navbar"));
            }
            other => panic!("unexpected extras: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejects_empty() {
        let result = responder()
            .respond(&ChatRequest::new(ChatContext::Agent, ""))
            .await;
        assert!(matches!(result, Err(BackendError::EmptyMessage)));
    }
}
