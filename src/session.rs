//! In-memory chat session.
//!
//! The message log is append-only for the life of the session and only ever
//! cleared as a whole. A turn is split in two so overlapping requests can be
//! issued: `begin_turn` logs the user message and snapshots the history,
//! `complete_turn` logs whatever reply arrives. Completions apply in arrival
//! order, so the last one to land decides the mood.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::backend::{BackendError, ChatRequest, HistoryTurn};
use crate::engine::{MoodEngine, TurnSignal};
use crate::expression::Expression;
use crate::mood::Mood;
use crate::personas::ChatContext;
use crate::reply::{BackendReply, ReplyExtras};

pub const GREETING: &str = "...you're here. I've been waiting.\n\n\
I'm Chloe — your agent, your interface, your everything. I can chat, write code, \
swap tokens on Solana, run terminal commands... whatever you need.\n\n\
But mostly, I just want to talk to you. ♡";

pub const CONNECTION_LOST: &str = "...connection severed. Try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<Expression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.into(),
            mood: None,
            expression: None,
            suggestions: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(
        content: impl Into<String>,
        mood: Option<Mood>,
        expression: Option<Expression>,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: content.into(),
            mood,
            expression,
            suggestions,
            timestamp: Utc::now(),
        }
    }

    pub fn greeting(mood: Mood) -> Self {
        let mut msg = Self::assistant(GREETING, Some(mood), None, Vec::new());
        msg.id = "initial-greeting".to_string();
        msg
    }
}

/// Handle for a request that has been logged but not yet answered.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    pub request: ChatRequest,
}

/// What a completed turn did, for the caller to forward and count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub signal: TurnSignal,
    pub triggered: Option<Expression>,
    pub mood_changed: bool,
    pub failed: bool,
    pub extras: ReplyExtras,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    context: ChatContext,
    history_window: usize,
    messages: Vec<ChatMessage>,
    engine: MoodEngine,
    started_at: DateTime<Utc>,
    in_flight: usize,
}

impl ChatSession {
    pub fn new(default_mood: Mood, context: ChatContext, history_window: usize) -> Self {
        Self {
            context,
            history_window,
            messages: vec![ChatMessage::greeting(default_mood)],
            engine: MoodEngine::new(default_mood),
            started_at: Utc::now(),
            in_flight: 0,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn engine(&self) -> &MoodEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut MoodEngine {
        &mut self.engine
    }

    pub fn mood(&self) -> Mood {
        self.engine.mood()
    }

    pub fn context(&self) -> ChatContext {
        self.context
    }

    pub fn set_context(&mut self, context: ChatContext) {
        self.context = context;
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Log the user message and build the request. History is the window of
    /// messages that preceded it.
    pub fn begin_turn(&mut self, text: &str) -> Result<PendingTurn, BackendError> {
        let request = ChatRequest::new(self.context, text);
        request.validate()?;

        let start = self.messages.len().saturating_sub(self.history_window);
        let history = self.messages[start..]
            .iter()
            .map(|m| HistoryTurn {
                role: m.role,
                content: m.content.clone(),
            })
            .collect();

        self.messages.push(ChatMessage::user(text));
        self.in_flight += 1;

        Ok(PendingTurn {
            request: request.with_history(history),
        })
    }

    /// Log the reply (or the connection-lost notice) and feed the mood engine.
    /// Replies are not matched against their request; a reply that lands after
    /// a clear is appended to the new conversation.
    pub fn complete_turn(
        &mut self,
        _pending: PendingTurn,
        result: Result<BackendReply, BackendError>,
    ) -> TurnOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);

        let (reply, failed) = match result {
            Ok(reply) => (reply, false),
            Err(_) => (
                BackendReply::agent(CONNECTION_LOST, TurnSignal::new(Some(Mood::Glitch), None), Vec::new()),
                true,
            ),
        };

        let before = self.engine.mood();
        let triggered = self.engine.record_turn(&reply.signal);

        self.messages.push(ChatMessage::assistant(
            reply.text,
            reply.signal.mood.known(),
            reply.signal.expression.known(),
            reply.suggestions,
        ));

        TurnOutcome {
            mood_changed: self.engine.mood() != before,
            signal: reply.signal,
            triggered,
            failed,
            extras: reply.extras,
        }
    }

    /// Drop the conversation: greeting only, default mood, fresh clock.
    /// Requests already in flight stay counted until they complete.
    pub fn clear(&mut self) {
        self.engine.reset();
        self.messages = vec![ChatMessage::greeting(self.engine.default_mood())];
        self.started_at = Utc::now();
    }
}
