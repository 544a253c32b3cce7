use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::mood::Mood;
use crate::personas::ChatContext;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Companion configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub companion: CompanionConfig,

    /// OpenAI-compatible backend; only used when its key variable is set
    #[serde(default)]
    pub llm: LlmConfig,

    /// Local fallback responder
    #[serde(default)]
    pub mock: MockConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Mood a session starts in and returns to on clear
    #[serde(default)]
    pub default_mood: Mood,
    /// Prior messages sent with each request
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    #[serde(default)]
    pub context: ChatContext,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    #[serde(default = "default_mock_delay")]
    pub delay_ms: u64,
}

fn default_name() -> String {
    "Chloe".to_string()
}

fn default_history_window() -> usize {
    10
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-5.2".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_mock_delay() -> u64 {
    800
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            default_mood: Mood::default(),
            history_window: default_history_window(),
            context: ChatContext::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout(),
        }
    }
}

impl LlmConfig {
    /// `OPENAI_BASE_URL` and `OPENAI_MODEL` take precedence over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            self.base_url = base_url;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            self.model = model;
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_mock_delay(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(
            name = %config.companion.name,
            default_mood = %config.companion.default_mood,
            context = %config.companion.context,
            "configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.companion.name, "Chloe");
        assert_eq!(config.companion.default_mood, Mood::Devoted);
        assert_eq!(config.companion.history_window, 10);
        assert_eq!(config.companion.context, ChatContext::Agent);
        assert_eq!(config.llm.model, "gpt-5.2");
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.mock.delay_ms, 800);
    }

    #[test]
    fn test_from_file_partial() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(
            tmp,
            r#"
[companion]
default_mood = "neutral"
context = "shell"

[mock]
delay_ms = 0
"#
        )
        .unwrap();

        let config = Config::from_file(tmp.path()).unwrap();
        assert_eq!(config.companion.default_mood, Mood::Neutral);
        assert_eq!(config.companion.context, ChatContext::Shell);
        assert_eq!(config.companion.history_window, 10);
        assert_eq!(config.mock.delay_ms, 0);
        assert_eq!(config.llm.base_url, "https://api.openai.com");
    }

    #[test]
    fn test_from_file_rejects_unknown_mood() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "[companion]\ndefault_mood = \"sleepy\"").unwrap();
        assert!(matches!(
            Config::from_file(tmp.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("OPENAI_MODEL", "local-test-model");
        let mut llm = LlmConfig::default();
        llm.apply_env_overrides();
        std::env::remove_var("OPENAI_MODEL");

        assert_eq!(llm.model, "local-test-model");
        assert_eq!(llm.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_from_file_missing() {
        assert!(matches!(
            Config::from_file("/nonexistent/chloe.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
