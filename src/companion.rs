use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::avatar::AvatarRenderer;
use crate::backend::{BackendError, ChatBackend};
use crate::config::Config;
use crate::expression::Expression;
use crate::llm::LlmClient;
use crate::metrics::TurnMetrics;
use crate::mock::MockResponder;
use crate::mood::Mood;
use crate::personas::ChatContext;
use crate::reply::BackendReply;
use crate::session::{ChatMessage, ChatSession, PendingTurn, TurnOutcome};

/// A backend call that has finished, waiting to be applied with `complete_turn`.
pub type TurnResult = (PendingTurn, Result<BackendReply, BackendError>);

/// Owns one chat session and is the only thing that mutates it.
pub struct Companion {
    pub config: Config,
    backend: Arc<dyn ChatBackend>,
    avatar: Box<dyn AvatarRenderer>,
    session: ChatSession,
    metrics: TurnMetrics,
}

impl Companion {
    pub fn new(
        config: Config,
        backend: Box<dyn ChatBackend>,
        avatar: Box<dyn AvatarRenderer>,
    ) -> Self {
        let session = ChatSession::new(
            config.companion.default_mood,
            config.companion.context,
            config.companion.history_window,
        );
        Self {
            config,
            backend: Arc::from(backend),
            avatar,
            session,
            metrics: TurnMetrics::new(),
        }
    }

    /// Pick the LLM backend when a key is configured, otherwise the local responder.
    pub fn from_config(
        config: Config,
        avatar: Box<dyn AvatarRenderer>,
        force_mock: bool,
    ) -> Result<Self, BackendError> {
        let llm = if force_mock {
            None
        } else {
            LlmClient::from_config(&config.llm)?
        };

        let backend: Box<dyn ChatBackend> = match llm {
            Some(client) => {
                info!(model = %client.model(), "using LLM backend");
                Box::new(client)
            }
            None => {
                info!("no API key configured, using local responder");
                Box::new(MockResponder::new(Duration::from_millis(config.mock.delay_ms)))
            }
        };

        Ok(Self::new(config, backend, avatar))
    }

    /// Run one turn to completion: log the user message, ask the backend, log
    /// the reply. Only empty input is returned as an error.
    pub async fn send(&mut self, text: &str) -> Result<TurnOutcome, BackendError> {
        let pending = self.session.begin_turn(text)?;
        let result = self.backend.respond(&pending.request).await;
        Ok(self.complete_turn(pending, result))
    }

    /// Log the user message and run the backend call on `turns`, so the caller
    /// keeps the controller while the request is outstanding.
    pub fn spawn_turn(
        &mut self,
        text: &str,
        turns: &mut JoinSet<TurnResult>,
    ) -> Result<(), BackendError> {
        let pending = self.session.begin_turn(text)?;
        let backend = Arc::clone(&self.backend);
        turns.spawn(async move {
            let result = backend.respond(&pending.request).await;
            (pending, result)
        });
        debug!(in_flight = turns.len(), "chat request started");
        Ok(())
    }

    /// Apply a finished backend call: log the reply, update mood and
    /// expression, count it. Failures become the glitch notice.
    pub fn complete_turn(
        &mut self,
        pending: PendingTurn,
        result: Result<BackendReply, BackendError>,
    ) -> TurnOutcome {
        if let Err(e) = &result {
            warn!(backend = %self.backend.name(), error = %e, "chat request failed");
        }

        let outcome = self.session.complete_turn(pending, result);
        self.metrics.record_turn(&outcome);

        if let Some(expression) = outcome.triggered {
            self.avatar.play(expression);
        }
        if outcome.mood_changed {
            info!(mood = %self.session.mood(), "mood changed");
        }
        outcome
    }

    /// Expression control pressed. Unknown names do nothing.
    pub fn trigger_expression(&mut self, name: &str) -> Option<Expression> {
        let expression = self.session.engine_mut().trigger_expression_manually(name)?;
        self.metrics.record_manual_expression();
        self.avatar.play(expression);
        Some(expression)
    }

    pub fn clear(&mut self) {
        self.session.clear();
        info!("conversation cleared");
    }

    pub fn set_context(&mut self, context: ChatContext) {
        self.session.set_context(context);
    }

    pub fn context(&self) -> ChatContext {
        self.session.context()
    }

    pub fn mood(&self) -> Mood {
        self.session.mood()
    }

    pub fn active_expression(&self) -> Option<Expression> {
        self.session.engine().active_expression()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.session.messages()
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    pub fn uptime(&self) -> Duration {
        (Utc::now() - self.session.started_at())
            .to_std()
            .unwrap_or_default()
    }

    pub fn metrics(&self) -> &TurnMetrics {
        &self.metrics
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}
