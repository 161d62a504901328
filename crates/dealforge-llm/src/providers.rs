//! Generation provider implementations

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Trait for generation providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Get the provider kind
    fn kind(&self) -> ProviderKind;

    /// Check if the provider is reachable
    async fn is_available(&self) -> bool;

    /// Complete a conversation
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

// ============================================================================
// Ollama Provider
// ============================================================================

/// Configuration for the Ollama provider
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("DEALFORGE_OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            model: std::env::var("DEALFORGE_OLLAMA_MODEL")
                .unwrap_or_else(|_| "llama3.1:8b".to_string()),
        }
    }
}

/// Ollama local model provider
pub struct OllamaProvider {
    config: OllamaConfig,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(OllamaConfig::default())
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.config.base_url);
        self.client.get(&url).send().await.is_ok()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        // Flatten the chat into a single prompt; Ollama's generate endpoint
        // takes system separately
        let prompt = request
            .messages
            .iter()
            .map(|m| match m.role {
                ChatRole::User => format!("User: {}", m.content),
                ChatRole::Assistant => format!("Assistant: {}", m.content),
                ChatRole::System => format!("System: {}", m.content),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
            + "\n\nAssistant:";

        let ollama_request = OllamaRequest {
            model: request.model.unwrap_or_else(|| self.config.model.clone()),
            prompt,
            stream: false,
            system: request.system,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(LlmError::RequestFailed {
                message: format!("HTTP {}", response.status()),
            });
        }

        let ollama_response: OllamaResponse =
            response
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponse {
                    message: e.to_string(),
                })?;

        Ok(CompletionResponse {
            content: ollama_response.response.trim().to_string(),
            model: Some(self.config.model.clone()),
        })
    }
}

// ============================================================================
// OpenAI-Compatible Provider (LM Studio, OpenRouter, vLLM, ...)
// ============================================================================

/// Configuration for the OpenAI-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for OpenAiCompatConfig {
    fn default() -> Self {
        Self {
            // LM Studio's default local endpoint
            base_url: std::env::var("DEALFORGE_OPENAI_COMPAT_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:1234/v1".to_string()),
            api_key: std::env::var("DEALFORGE_OPENAI_COMPAT_API_KEY").ok(),
            model: std::env::var("DEALFORGE_OPENAI_COMPAT_MODEL")
                .unwrap_or_else(|_| "default".to_string()),
        }
    }
}

/// OpenAI-compatible chat-completions provider
pub struct OpenAiCompatProvider {
    config: OpenAiCompatConfig,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn new(config: OpenAiCompatConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(OpenAiCompatConfig::default())
    }
}

#[derive(Serialize)]
struct ChatCompletionsRequest {
    model: String,
    messages: Vec<WireChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct WireChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatCompletionsChoice>,
}

#[derive(Deserialize)]
struct ChatCompletionsChoice {
    message: WireChatMessage,
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &'static str {
        "OpenAI-Compatible"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAiCompat
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/models", self.config.base_url);
        let mut req = self.client.get(&url);
        if let Some(ref key) = self.config.api_key {
            req = req.bearer_auth(key);
        }
        req.send().await.is_ok()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let mut messages: Vec<WireChatMessage> = vec![];

        if let Some(ref system) = request.system {
            messages.push(WireChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        for msg in &request.messages {
            messages.push(WireChatMessage {
                role: match msg.role {
                    ChatRole::System => "system",
                    ChatRole::User => "user",
                    ChatRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            });
        }

        let chat_request = ChatCompletionsRequest {
            model: request.model.unwrap_or_else(|| self.config.model.clone()),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let mut req = self.client.post(&url).json(&chat_request);
        if let Some(ref key) = self.config.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::RequestFailed {
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let chat_response: ChatCompletionsResponse =
            response
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponse {
                    message: e.to_string(),
                })?;

        let content = chat_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            model: Some(self.config.model.clone()),
        })
    }
}

// ============================================================================
// Deterministic Provider (Fallback)
// ============================================================================

/// Canned negotiation-shaped replies when no backend is configured
///
/// Reply shape is picked from markers the prompt layer embeds: a decision
/// prompt always continues, a seller prompt offers at its list price, and
/// anything else gets a buyer-style push for a lower price. Demos and tests
/// run offline and end, at worst, in a clean "max rounds reached".
pub struct DeterministicProvider;

impl DeterministicProvider {
    pub fn new() -> Self {
        Self
    }

    /// Pull the first dollar amount that follows `label`
    fn price_after(text: &str, label: &str) -> Option<f64> {
        let idx = text.find(label)?;
        let rest = &text[idx + label.len()..];
        let start = rest.find('$')? + 1;
        let digits: String = rest[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        digits.parse().ok()
    }
}

impl Default for DeterministicProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for DeterministicProvider {
    fn name(&self) -> &'static str {
        "Deterministic"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Deterministic
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let prompt = request.prompt_text();

        let content = if prompt.contains("ACCEPT") && prompt.contains("CONTINUE") {
            // Decision prompt: the conservative answer is always to keep going
            "CONTINUE".to_string()
        } else if prompt.contains("Your Inventory:") {
            // Seller prompt: offer the list price
            match Self::price_after(&prompt, "Selling price:") {
                Some(price) => format!(
                    "That item is in stock. I can do my list price today.\n\
                     ```json\n{{\"offer\": {{\"price\": {:.2}, \"quantity\": 1}}}}\n```",
                    price
                ),
                None => "That item is in stock. Let me know what you had in mind.".to_string(),
            }
        } else {
            // Buyer prompt: push on price without naming anyone
            "Thanks, but that is still more than I want to spend. Can anyone do better on price?"
                .to_string()
        };

        Ok(CompletionResponse {
            content,
            model: Some("deterministic".to_string()),
        })
    }
}
