//! Seller Agent - produces one seller's reply and optional offer

use std::sync::Arc;

use thiserror::Error;

use dealforge_llm::{LlmError, LlmProvider};
use dealforge_types::{BuyerConstraints, InventoryItem, Message, Offer, Seller};

use crate::cleanup::sanitize_reply;
use crate::offer_block::{enforce_bounds, extract_offer};
use crate::prompts::render_seller_prompt;

/// Errors that can occur during a seller turn
#[derive(Error, Debug)]
pub enum SellerTurnError {
    #[error("Generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("Seller produced an empty message")]
    EmptyMessage,
}

/// Result of a seller turn
#[derive(Debug, Clone, PartialEq)]
pub struct SellerReply {
    pub message: String,
    /// Bounds-checked offer, if the seller made one
    pub offer: Option<Offer>,
}

/// One seller persona, bound to the inventory item matched for this room
pub struct SellerAgent {
    provider: Arc<dyn LlmProvider>,
    seller: Seller,
    inventory_item: InventoryItem,
    temperature: f32,
    max_tokens: u32,
}

impl SellerAgent {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        seller: Seller,
        inventory_item: InventoryItem,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            provider,
            seller,
            inventory_item,
            temperature,
            max_tokens,
        }
    }

    /// Generate this seller's reply to the current conversation
    pub async fn respond(
        &self,
        buyer_name: &str,
        constraints: &BuyerConstraints,
        history: &[Message],
        deal_context_text: Option<&str>,
    ) -> Result<SellerReply, SellerTurnError> {
        let request = render_seller_prompt(
            &self.seller,
            &self.inventory_item,
            constraints,
            history,
            buyer_name,
            deal_context_text,
        )
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens);

        let response = self.provider.complete(request).await?;
        let sanitized = sanitize_reply(&response.content);
        let (message, raw_offer) = extract_offer(&sanitized);
        if message.is_empty() {
            return Err(SellerTurnError::EmptyMessage);
        }

        let offer = raw_offer.and_then(|o| enforce_bounds(o, &self.inventory_item));

        Ok(SellerReply { message, offer })
    }
}
