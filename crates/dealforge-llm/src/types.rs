//! Common types for generation requests

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when calling a generation backend
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Provider not available: {provider}")]
    ProviderNotAvailable { provider: String },

    #[error("Request failed: {message}")]
    RequestFailed { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

pub type Result<T> = std::result::Result<T, LlmError>;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A message in a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request to complete a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model to use (provider-specific; provider default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// System message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Max tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            model: None,
            system: None,
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// All prompt text joined - used by the deterministic provider to pick
    /// a reply shape
    pub fn prompt_text(&self) -> String {
        let mut text = String::new();
        if let Some(ref system) = self.system {
            text.push_str(system);
            text.push('\n');
        }
        for msg in &self.messages {
            text.push_str(&msg.content);
            text.push('\n');
        }
        text
    }
}

/// Response from a completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated content
    pub content: String,
    /// Which model produced it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl CompletionResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: None,
        }
    }
}

/// Provider kind for routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Ollama local model
    Ollama,
    /// Any OpenAI-compatible endpoint (LM Studio, OpenRouter, vLLM)
    OpenAiCompat,
    /// Canned replies, no backend
    Deterministic,
}

impl ProviderKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai_compat" | "openai-compat" | "lm_studio" | "openrouter" => {
                Some(Self::OpenAiCompat)
            }
            "deterministic" | "none" | "fallback" => Some(Self::Deterministic),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::OpenAiCompat => write!(f, "openai_compat"),
            Self::Deterministic => write!(f, "deterministic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let request = CompletionRequest::new(vec![ChatMessage::user("hi")])
            .with_system("be brief")
            .with_temperature(0.3)
            .with_max_tokens(100);

        assert_eq!(request.system.as_deref(), Some("be brief"));
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.max_tokens, Some(100));
    }

    #[test]
    fn provider_kind_parsing() {
        assert_eq!(ProviderKind::from_str("ollama"), Some(ProviderKind::Ollama));
        assert_eq!(
            ProviderKind::from_str("lm_studio"),
            Some(ProviderKind::OpenAiCompat)
        );
        assert_eq!(
            ProviderKind::from_str("openrouter"),
            Some(ProviderKind::OpenAiCompat)
        );
        assert_eq!(ProviderKind::from_str("unknown"), None);
    }
}
