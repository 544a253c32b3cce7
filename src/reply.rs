//! Chat backend reply shapes.
//!
//! `RawReply` mirrors the loose JSON the model (or the fallback responder) returns.
//! `BackendReply` is the typed view the session works with: reply text, the
//! mood/expression signal and per-context extras.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::TurnSignal;
use crate::expression::ExpressionField;
use crate::mood::MoodField;
use crate::personas::ChatContext;

/// Text used when a reply carries no message at all.
pub const EMPTY_REPLY_TEXT: &str = "...";

/// Loose wire form. Every field is optional and may have the wrong type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub output_type: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_hint: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Value>,
    #[serde(rename = "_template", default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Value>,
}

/// Category of a shell-context reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    #[default]
    Info,
    Warning,
    Error,
    Success,
    Ascii,
}

impl OutputKind {
    pub fn parse(raw: &str) -> Option<OutputKind> {
        match raw {
            "info" => Some(OutputKind::Info),
            "warning" => Some(OutputKind::Warning),
            "error" => Some(OutputKind::Error),
            "success" => Some(OutputKind::Success),
            "ascii" => Some(OutputKind::Ascii),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeArtifact {
    pub language: String,
    pub filename: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Context-specific payload riding along with the reply text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReplyExtras {
    #[default]
    Agent,
    Shell {
        kind: OutputKind,
        command_hint: Option<String>,
    },
    Dex {
        insights: Vec<String>,
    },
    Coder {
        code: Option<CodeArtifact>,
        template: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReply {
    pub text: String,
    pub signal: TurnSignal,
    pub suggestions: Vec<String>,
    pub extras: ReplyExtras,
}

impl BackendReply {
    /// Plain agent reply, mostly for responders that build replies in code.
    pub fn agent(text: impl Into<String>, signal: TurnSignal, suggestions: Vec<String>) -> Self {
        Self {
            text: text.into(),
            signal,
            suggestions,
            extras: ReplyExtras::Agent,
        }
    }

    pub fn from_raw(raw: RawReply, context: ChatContext) -> Self {
        let text = non_empty(&raw.message)
            .or_else(|| non_empty(&raw.content))
            .or_else(|| non_empty(&raw.output))
            .unwrap_or_else(|| EMPTY_REPLY_TEXT.to_string());

        let signal = TurnSignal {
            mood: match tag(&raw.mood) {
                Tag::Absent => MoodField::Absent,
                Tag::Text(s) => MoodField::from_raw(Some(s)),
                Tag::Other(v) => MoodField::Unrecognized(v),
            },
            expression: match tag(&raw.expression) {
                Tag::Absent => ExpressionField::Absent,
                Tag::Text(s) => ExpressionField::from_raw(Some(s)),
                Tag::Other(v) => ExpressionField::Unrecognized(v),
            },
        };

        let extras = match context {
            ChatContext::Agent => ReplyExtras::Agent,
            ChatContext::Shell => ReplyExtras::Shell {
                kind: scalar(&raw.output_type)
                    .and_then(|t| OutputKind::parse(&t))
                    .unwrap_or_default(),
                command_hint: scalar(&raw.command_hint),
            },
            ChatContext::Dex => ReplyExtras::Dex {
                insights: string_list(&raw.insights),
            },
            ChatContext::Coder => ReplyExtras::Coder {
                code: raw
                    .code
                    .clone()
                    .filter(|v| !v.is_null())
                    .and_then(|v| serde_json::from_value(v).ok()),
                template: scalar(&raw.template),
            },
        };

        Self {
            text,
            signal,
            suggestions: string_list(&raw.suggestions),
            extras,
        }
    }
}

/// Strings pass through; numbers and booleans are stringified; null and
/// structured values count as missing.
fn scalar(value: &Option<Value>) -> Option<String> {
    match value.as_ref()? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn non_empty(value: &Option<Value>) -> Option<String> {
    scalar(value).filter(|t| !t.is_empty())
}

enum Tag<'a> {
    Absent,
    Text(&'a str),
    Other(String),
}

/// Mood and expression names must be JSON strings. Anything else that is not
/// null is kept verbatim so it can be reported as unrecognized.
fn tag(value: &Option<Value>) -> Tag<'_> {
    match value {
        None | Some(Value::Null) => Tag::Absent,
        Some(Value::String(s)) => Tag::Text(s),
        Some(other) => Tag::Other(other.to_string()),
    }
}

/// Non-array values yield an empty list; non-string items are skipped.
fn string_list(value: &Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
