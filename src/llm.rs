use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

use crate::backend::{BackendError, ChatBackend, ChatRequest};
use crate::config::LlmConfig;
use crate::personas::{self, ChatContext};
use crate::reply::{BackendReply, RawReply};

/// LLM client for OpenAI-compatible chat completion APIs
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Clone, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<CompletionMessage>,
    max_completion_tokens: u32,
    reasoning_effort: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    verbosity: Option<String>,
    response_format: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CompletionMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

impl LlmClient {
    /// Create a new LLM client
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Create a client from config. `None` when the configured key variable is unset.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>, BackendError> {
        let api_key = match std::env::var(&config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => return Ok(None),
        };
        let client = Self::new(
            &config.base_url,
            &api_key,
            &config.model,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Some(client))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &ChatRequest) -> CompletionRequest {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(CompletionMessage {
            role: "developer".to_string(),
            content: personas::system_prompt(request.context),
        });
        messages.extend(request.history.iter().map(|turn| CompletionMessage {
            role: turn.role.as_str().to_string(),
            content: turn.content.clone(),
        }));
        messages.push(CompletionMessage {
            role: "user".to_string(),
            content: request.message.clone(),
        });

        CompletionRequest {
            model: self.model.clone(),
            messages,
            max_completion_tokens: personas::max_tokens(request.context),
            reasoning_effort: "none".to_string(),
            // long code answers would get truncated at low verbosity
            verbosity: match request.context {
                ChatContext::Coder => None,
                _ => Some("low".to_string()),
            },
            response_format: json!({"type": "json_object"}),
        }
    }
}

/// Extract the reply JSON from a completion body. Content that is not a JSON
/// object becomes the reply text with a neutral mood.
fn parse_completion(body: &str, context: ChatContext) -> Result<BackendReply, BackendError> {
    let completion: CompletionResponse = serde_json::from_str(body)?;

    if let Some(usage) = &completion.usage {
        info!(
            model = completion.model.as_deref().unwrap_or("unknown"),
            input_tokens = usage.prompt_tokens,
            output_tokens = usage.completion_tokens,
            "LLM response received"
        );
    }

    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "{}".to_string());

    let raw = match serde_json::from_str::<RawReply>(&content) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "model reply was not a JSON object, using raw text");
            RawReply {
                message: Some(json!(content)),
                mood: Some(json!("neutral")),
                ..RawReply::default()
            }
        }
    };

    Ok(BackendReply::from_raw(raw, context))
}

#[async_trait]
impl ChatBackend for LlmClient {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn respond(&self, request: &ChatRequest) -> Result<BackendReply, BackendError> {
        request.validate()?;

        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request(request);

        info!(
            model = %self.model,
            context = %request.context,
            history = request.history.len(),
            prompt_length = request.message.len(),
            "sending LLM request"
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.message)
                .unwrap_or(text);
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_completion(&text, request.context)
    }
}
