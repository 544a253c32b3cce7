use std::fmt::Write as _;
use tracing::info;

use crate::companion::Companion;
use crate::display;
use crate::expression::Expression;
use crate::personas::ChatContext;
use crate::reply::ReplyExtras;
use crate::session::{ChatMessage, Role, TurnOutcome};

/// Command handler result: text to show the user
pub type CommandResult = Result<String, Box<dyn std::error::Error>>;

pub const HELP: &str = "\
  /help              show this help
  /mood              current mood and session uptime
  /expressions       list avatar expressions
  /expr <name>       play an expression (e.g. /expr 2, /expr expression1)
  /context <ctx>     switch persona: agent, shell, dex, coder
  /history           show the conversation
  /stats             turn counters
  /clear             clear the conversation
  /quit              leave
  anything else is sent to Chloe";

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Mood,
    Expressions,
    Expression(String),
    Context(ChatContext),
    History,
    Stats,
    Clear,
    Quit,
    Chat(String),
}

/// Parse a line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(ReplCommand::Chat(line.to_string())));
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    let cmd = match name {
        "help" | "?" => ReplCommand::Help,
        "mood" => ReplCommand::Mood,
        "expressions" => ReplCommand::Expressions,
        "expr" | "expression" => {
            if arg.is_empty() {
                return Err("usage: /expr <name>".to_string());
            }
            ReplCommand::Expression(arg.to_string())
        }
        "context" => ReplCommand::Context(arg.parse()?),
        "history" => ReplCommand::History,
        "stats" => ReplCommand::Stats,
        "clear" => ReplCommand::Clear,
        "quit" | "exit" => ReplCommand::Quit,
        other => return Err(format!("unknown command: /{other} (try /help)")),
    };
    Ok(Some(cmd))
}

impl Companion {
    /// Handle one REPL command
    pub async fn handle_command(&mut self, cmd: ReplCommand) -> CommandResult {
        info!(command = ?cmd, "received command");

        match cmd {
            ReplCommand::Help => Ok(HELP.to_string()),
            ReplCommand::Mood => Ok(self.handle_mood()),
            ReplCommand::Expressions => Ok(self.handle_expressions()),
            ReplCommand::Expression(name) => {
                // unknown names are silently ignored
                self.trigger_expression(&name);
                Ok(String::new())
            }
            ReplCommand::Context(ctx) => {
                self.set_context(ctx);
                Ok(format!("  context: {ctx}"))
            }
            ReplCommand::History => Ok(self.handle_history()),
            ReplCommand::Stats => self.handle_stats(),
            ReplCommand::Clear => {
                self.clear();
                Ok(self.handle_history())
            }
            ReplCommand::Quit => Ok(String::new()),
            ReplCommand::Chat(text) => {
                let outcome = self.send(&text).await?;
                let reply = self
                    .messages()
                    .last()
                    .ok_or("conversation is empty after a turn")?;
                Ok(render_reply(reply, &outcome))
            }
        }
    }

    fn handle_mood(&self) -> String {
        let mood = self.mood();
        format!(
            "  ♰ mood: {} {} · uptime {}",
            display::mood_label(mood),
            display::mood_color(mood),
            display::format_uptime(self.uptime())
        )
    }

    fn handle_expressions(&self) -> String {
        let active = self.active_expression();
        Expression::ALL
            .iter()
            .map(|&expr| {
                let marker = if active == Some(expr) { "▶" } else { " " };
                format!(
                    " {marker} {} {:<6} {}",
                    display::expression_icon(expr),
                    display::expression_label(expr),
                    expr.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn handle_history(&self) -> String {
        self.messages()
            .iter()
            .map(render_message)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn handle_stats(&self) -> CommandResult {
        let stats = serde_json::json!({
            "backend": self.backend_name(),
            "context": self.context(),
            "uptime": display::format_uptime(self.uptime()),
            "messages": self.messages().len(),
            "turns": self.metrics(),
            "success_rate": self.metrics().success_rate(),
        });
        Ok(serde_json::to_string_pretty(&stats)?)
    }
}

fn render_message(msg: &ChatMessage) -> String {
    let who = match msg.role {
        Role::User => "you",
        Role::Assistant => "chloe",
    };
    let mut out = format!("[{}] {who}: {}", msg.timestamp.format("%H:%M:%S"), msg.content);
    if let Some(mood) = msg.mood {
        let _ = write!(out, "  (mood: {mood})");
    }
    out
}

/// Reply text followed by mood, suggestions and whatever the context adds.
pub fn render_reply(msg: &ChatMessage, outcome: &TurnOutcome) -> String {
    let mut out = format!("chloe: {}", msg.content);

    if let Some(mood) = msg.mood {
        let _ = write!(out, "\n  ♰ mood: {mood} {}", display::mood_color(mood));
    }

    match &outcome.extras {
        ReplyExtras::Agent => {}
        ReplyExtras::Shell { kind, command_hint } => {
            let _ = write!(out, "\n  type: {kind:?}");
            if let Some(hint) = command_hint {
                let _ = write!(out, "\n  try: {hint}");
            }
        }
        ReplyExtras::Dex { insights } => {
            for insight in insights {
                let _ = write!(out, "\n  ◆ {insight}");
            }
        }
        ReplyExtras::Coder { code, template } => {
            if let Some(code) = code {
                let size = code.content.as_ref().map(String::len).unwrap_or(0);
                let _ = write!(out, "\n  file: {} ({}, {size} bytes)", code.filename, code.language);
            }
            if let Some(template) = template {
                let _ = write!(out, "\n  template: {template}");
            }
        }
    }

    for suggestion in &msg.suggestions {
        let _ = write!(out, "\n  › {suggestion}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::TerminalAvatar;
    use crate::config::Config;
    use crate::mock::MockResponder;
    use crate::mood::Mood;
    use std::time::Duration;

    fn create_test_companion() -> Companion {
        Companion::new(
            Config::default(),
            Box::new(MockResponder::new(Duration::ZERO)),
            Box::new(TerminalAvatar::quiet()),
        )
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(
            parse_line(" hello there ").unwrap(),
            Some(ReplCommand::Chat("hello there".to_string()))
        );
        assert_eq!(parse_line("/mood").unwrap(), Some(ReplCommand::Mood));
        assert_eq!(
            parse_line("/expr  expression1").unwrap(),
            Some(ReplCommand::Expression("expression1".to_string()))
        );
        assert_eq!(
            parse_line("/context dex").unwrap(),
            Some(ReplCommand::Context(ChatContext::Dex))
        );
        assert_eq!(parse_line("/exit").unwrap(), Some(ReplCommand::Quit));
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(parse_line("/expr").is_err());
        assert!(parse_line("/context wallet").is_err());
        assert!(parse_line("/dance").is_err());
    }

    #[tokio::test]
    async fn test_handle_chat() {
        let mut companion = create_test_companion();
        let out = companion
            .handle_command(ReplCommand::Chat("hey".to_string()))
            .await
            .unwrap();
        assert!(out.starts_with("chloe: Hey there!"));
        assert!(out.contains("mood: happy"));
        assert!(out.contains("› Tell me about Solana"));
        assert_eq!(companion.mood(), Mood::Happy);
    }

    #[tokio::test]
    async fn test_handle_chat_empty_is_error() {
        let mut companion = create_test_companion();
        let result = companion
            .handle_command(ReplCommand::Chat(String::new()))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_handle_unknown_expression_is_silent() {
        let mut companion = create_test_companion();
        let out = companion
            .handle_command(ReplCommand::Expression("unknown-name".to_string()))
            .await
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(companion.active_expression(), None);
    }

    #[tokio::test]
    async fn test_handle_expressions_marks_active() {
        let mut companion = create_test_companion();
        companion
            .handle_command(ReplCommand::Expression("3".to_string()))
            .await
            .unwrap();
        let out = companion.handle_command(ReplCommand::Expressions).await.unwrap();
        assert_eq!(out.lines().count(), 7);
        assert!(out.lines().any(|l| l.contains('▶') && l.contains("ANGRY")));
    }

    #[tokio::test]
    async fn test_handle_context_switch() {
        let mut companion = create_test_companion();
        companion
            .handle_command(ReplCommand::Context(ChatContext::Shell))
            .await
            .unwrap();
        let out = companion
            .handle_command(ReplCommand::Chat("neofetch".to_string()))
            .await
            .unwrap();
        assert!(out.contains("try: check status"));
        assert_eq!(companion.mood(), Mood::Obsessive);
    }

    #[tokio::test]
    async fn test_handle_clear() {
        let mut companion = create_test_companion();
        companion
            .handle_command(ReplCommand::Chat("hello".to_string()))
            .await
            .unwrap();
        let out = companion.handle_command(ReplCommand::Clear).await.unwrap();
        assert_eq!(out.lines().next().map(|l| l.contains("you're here")), Some(true));
        assert_eq!(companion.messages().len(), 1);
        assert_eq!(companion.mood(), Mood::Devoted);
    }

    #[tokio::test]
    async fn test_handle_stats() {
        let mut companion = create_test_companion();
        companion
            .handle_command(ReplCommand::Chat("hello".to_string()))
            .await
            .unwrap();
        let out = companion.handle_command(ReplCommand::Stats).await.unwrap();
        let stats: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(stats["backend"], "mock");
        assert_eq!(stats["turns"]["turns_total"], 1);
        assert_eq!(stats["messages"], 3);
    }

    #[tokio::test]
    async fn test_handle_mood() {
        let mut companion = create_test_companion();
        let out = companion.handle_command(ReplCommand::Mood).await.unwrap();
        assert!(out.contains("DEVOTED"));
        assert!(out.contains("#FF1493"));
    }
}
