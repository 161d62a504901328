//! Router - selects a generation provider from configuration

use std::sync::Arc;

use crate::providers::*;
use crate::types::*;

/// Selects and wraps a generation provider
pub struct LlmRouter {
    provider: Arc<dyn LlmProvider>,
    kind: ProviderKind,
}

impl LlmRouter {
    /// Create a router around a specific provider
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        let kind = provider.kind();
        Self { provider, kind }
    }

    /// Create a router from environment variables
    ///
    /// Reads `DEALFORGE_LLM_PROVIDER`:
    /// - `ollama`: local Ollama instance
    /// - `openai_compat` (aliases `lm_studio`, `openrouter`): any
    ///   OpenAI-compatible endpoint
    /// - `deterministic` (default): no backend, canned replies
    pub fn from_env() -> Self {
        // Load .env if present (ignore errors)
        let _ = dotenvy::dotenv();

        let provider_name =
            std::env::var("DEALFORGE_LLM_PROVIDER").unwrap_or_else(|_| "deterministic".to_string());

        let kind = match ProviderKind::from_str(&provider_name) {
            Some(kind) => kind,
            None => {
                tracing::warn!(
                    provider = %provider_name,
                    "unknown provider name, using deterministic fallback"
                );
                ProviderKind::Deterministic
            }
        };

        Self::from_kind(kind)
    }

    /// Create a router for a specific provider kind with env configuration
    pub fn from_kind(kind: ProviderKind) -> Self {
        let provider: Arc<dyn LlmProvider> = match kind {
            ProviderKind::Ollama => Arc::new(OllamaProvider::from_env()),
            ProviderKind::OpenAiCompat => Arc::new(OpenAiCompatProvider::from_env()),
            ProviderKind::Deterministic => Arc::new(DeterministicProvider::new()),
        };

        Self { provider, kind }
    }

    /// Get the wrapped provider
    pub fn provider(&self) -> Arc<dyn LlmProvider> {
        self.provider.clone()
    }

    /// Get the provider kind
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Check if the provider is reachable
    pub async fn is_available(&self) -> bool {
        self.provider.is_available().await
    }

    /// Complete a request using the wrapped provider
    pub async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.provider.complete(request).await
    }
}

impl Default for LlmRouter {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deterministic_router_completes() {
        let router = LlmRouter::from_kind(ProviderKind::Deterministic);
        assert!(router.is_available().await);
        assert_eq!(router.kind(), ProviderKind::Deterministic);

        let request = CompletionRequest::new(vec![ChatMessage::user("Hello")]);
        let response = router.complete(request).await.unwrap();
        assert!(!response.content.is_empty());
    }
}
