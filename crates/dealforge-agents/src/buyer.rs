//! Buyer Agent - produces the buyer's next negotiation message

use std::sync::Arc;

use thiserror::Error;

use dealforge_llm::{LlmError, LlmProvider};
use dealforge_types::{BuyerConstraints, Message, Seller, SellerId};

use crate::cleanup::sanitize_reply;
use crate::mentions::parse_mentions;
use crate::prompts::render_buyer_prompt;

/// Errors that can occur during a buyer turn
#[derive(Error, Debug)]
pub enum BuyerTurnError {
    #[error("Generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("Buyer produced an empty message")]
    EmptyMessage,
}

/// Result of a buyer turn
#[derive(Debug, Clone, PartialEq)]
pub struct BuyerTurn {
    pub message: String,
    pub mentioned_sellers: Vec<SellerId>,
}

/// The buyer persona
///
/// Stateless between turns: the conversation lives in the room's log and is
/// passed in (already visibility-filtered) on every call.
pub struct BuyerAgent {
    provider: Arc<dyn LlmProvider>,
    constraints: BuyerConstraints,
    temperature: f32,
    max_tokens: u32,
}

impl BuyerAgent {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        constraints: BuyerConstraints,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            provider,
            constraints,
            temperature,
            max_tokens,
        }
    }

    /// Generate the buyer's next message and the sellers it addresses
    pub async fn run_turn(
        &self,
        buyer_name: &str,
        sellers: &[Seller],
        history: &[Message],
        deal_context_text: Option<&str>,
    ) -> Result<BuyerTurn, BuyerTurnError> {
        let request = render_buyer_prompt(
            buyer_name,
            &self.constraints,
            history,
            sellers,
            deal_context_text,
        )
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens);

        let response = self.provider.complete(request).await?;
        let message = sanitize_reply(&response.content);
        if message.is_empty() {
            return Err(BuyerTurnError::EmptyMessage);
        }

        let mentioned_sellers = parse_mentions(&message, sellers);
        tracing::debug!(
            mentions = mentioned_sellers.len(),
            "buyer turn produced message"
        );

        Ok(BuyerTurn {
            message,
            mentioned_sellers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dealforge_llm::{CompletionRequest, CompletionResponse, ProviderKind, Result as LlmResult};
    use dealforge_types::{ProductRef, SellerPriority, SellerProfile, SpeakingStyle, SellerStrategy};

    struct FixedProvider(&'static str);

    #[async_trait]
    impl LlmProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "Fixed"
        }
        fn kind(&self) -> ProviderKind {
            ProviderKind::Deterministic
        }
        async fn is_available(&self) -> bool {
            true
        }
        async fn complete(&self, _request: CompletionRequest) -> LlmResult<CompletionResponse> {
            Ok(CompletionResponse::new(self.0))
        }
    }

    fn constraints() -> BuyerConstraints {
        BuyerConstraints {
            item_id: "item_1".to_string(),
            item_name: "Laptop".to_string(),
            product: ProductRef::unspecified(),
            quantity_needed: 2,
            min_price_per_unit: 30.0,
            max_price_per_unit: 50.0,
        }
    }

    fn sellers() -> Vec<Seller> {
        vec![Seller {
            id: SellerId::new("seller_1"),
            name: "TechStore".to_string(),
            profile: SellerProfile {
                priority: SellerPriority::MaximizeProfit,
                speaking_style: SpeakingStyle::Professional,
                strategy: SellerStrategy::FirmPricing,
            },
            inventory: vec![],
        }]
    }

    #[tokio::test]
    async fn turn_extracts_mentions() {
        let agent = BuyerAgent::new(
            Arc::new(FixedProvider("@TechStore can you do $40?")),
            constraints(),
            0.7,
            500,
        );
        let turn = agent
            .run_turn("Alice", &sellers(), &[], None)
            .await
            .unwrap();
        assert_eq!(turn.mentioned_sellers, vec![SellerId::new("seller_1")]);
    }

    #[tokio::test]
    async fn empty_reply_is_an_error() {
        let agent = BuyerAgent::new(
            Arc::new(FixedProvider("<think>only thoughts</think>")),
            constraints(),
            0.7,
            500,
        );
        let result = agent.run_turn("Alice", &sellers(), &[], None).await;
        assert!(matches!(result, Err(BuyerTurnError::EmptyMessage)));
    }
}
