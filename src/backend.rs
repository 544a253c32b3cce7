use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::personas::ChatContext;
use crate::reply::BackendReply;
use crate::session::Role;

/// Errors from a chat backend call.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("message is required")]
    EmptyMessage,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("LLM API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One prior message sent along as conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub context: ChatContext,
    pub message: String,
    pub history: Vec<HistoryTurn>,
}

impl ChatRequest {
    pub fn new(context: ChatContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<HistoryTurn>) -> Self {
        self.history = history;
        self
    }

    /// Reject empty input before it reaches any backend.
    pub fn validate(&self) -> Result<(), BackendError> {
        if self.message.trim().is_empty() {
            return Err(BackendError::EmptyMessage);
        }
        Ok(())
    }
}

/// Something that turns a chat request into a reply: the LLM or the local responder.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn respond(&self, request: &ChatRequest) -> Result<BackendReply, BackendError>;
}
