//! Parallel seller dispatch with per-seller failure isolation
//!
//! All routed sellers run concurrently under a counting semaphore. Each
//! seller turn is fully isolated: an error (or panic) in one turn yields
//! `None` for that seller only and neither cancels siblings nor aborts the
//! round. The dispatcher always joins every task before returning.
//!
//! A seller with no matching inventory never reaches the provider - it is
//! marked `None` immediately.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;

use dealforge_agents::SellerAgent;
use dealforge_llm::LlmProvider;
use dealforge_rewards::{compute_deal_context, format_deal_context_for_seller, CardWallet};
use dealforge_types::{
    BuyerConstraints, Message, MessageId, Offer, Seller, SellerId, SenderType,
};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::matcher::match_inventory;
use crate::room::{ConversationLog, NegotiationRoom};
use crate::standing::latest_offers_per_seller;
use crate::visibility::filter_history;

/// Result of one seller's turn
#[derive(Debug, Clone, PartialEq)]
pub struct SellerTurnOutcome {
    pub seller_id: SellerId,
    pub seller_name: String,
    pub message: String,
    pub offer: Option<Offer>,
}

/// Everything a spawned seller task needs, owned so tasks are `'static`
struct TurnContext {
    provider: Arc<dyn LlmProvider>,
    config: EngineConfig,
    constraints: BuyerConstraints,
    buyer_id: String,
    buyer_name: String,
    sellers: Vec<Seller>,
    log: ConversationLog,
    round: u32,
    wallet: Option<CardWallet>,
}

/// Runs the per-seller response step concurrently for a round
pub struct ParallelSellerDispatcher {
    provider: Arc<dyn LlmProvider>,
    config: EngineConfig,
}

impl ParallelSellerDispatcher {
    pub fn new(provider: Arc<dyn LlmProvider>, config: EngineConfig) -> Self {
        Self { provider, config }
    }

    /// Run the selected sellers concurrently; the map has one entry per
    /// selected seller, `None` where the turn produced nothing
    pub async fn dispatch(
        &self,
        room: &NegotiationRoom,
        sellers: Vec<Seller>,
        wallet: Option<CardWallet>,
    ) -> HashMap<SellerId, Option<SellerTurnOutcome>> {
        let semaphore = Arc::new(Semaphore::new(self.config.parallel_seller_limit));
        let context = Arc::new(TurnContext {
            provider: self.provider.clone(),
            config: self.config.clone(),
            constraints: room.constraints.clone(),
            buyer_id: room.buyer_id.as_str().to_string(),
            buyer_name: room.buyer_name.clone(),
            sellers: room.sellers.clone(),
            log: room.log.clone(),
            round: room.current_round,
            wallet,
        });

        let mut handles = Vec::with_capacity(sellers.len());
        for seller in sellers {
            let context = context.clone();
            let semaphore = semaphore.clone();
            let seller_id = seller.id.clone();
            let handle = tokio::spawn(run_seller_turn(context, seller, semaphore));
            handles.push((seller_id, handle));
        }

        // Full barrier: every task resolves, success or isolated failure
        let mut results = HashMap::with_capacity(handles.len());
        for (seller_id, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    tracing::error!(
                        seller_id = %seller_id,
                        error = %join_error,
                        "seller task panicked; isolating failure"
                    );
                    None
                }
            };
            results.insert(seller_id, outcome);
        }
        results
    }
}

async fn run_seller_turn(
    context: Arc<TurnContext>,
    seller: Seller,
    semaphore: Arc<Semaphore>,
) -> Option<SellerTurnOutcome> {
    let _permit = semaphore.acquire_owned().await.ok()?;

    let inventory_item = match match_inventory(&seller, &context.constraints) {
        Some(item) => item.clone(),
        None => {
            tracing::warn!(
                seller = %seller.name,
                item = %context.constraints.item_name,
                "seller has no matching inventory, skipping turn"
            );
            return None;
        }
    };

    let snapshot = context.log.snapshot().await;
    let history = filter_history(&snapshot, seller.id.as_str(), SenderType::Seller);

    // Deal context from this seller's standing offer, or list price if none yet
    let deal_context_text = context.wallet.as_ref().map(|wallet| {
        let standing = latest_offers_per_seller(&snapshot, &context.sellers, &context.constraints);
        let mine = standing.iter().find(|o| o.seller_id == seller.id);
        let (price, quantity, cost) = match mine {
            Some(o) => (
                o.offer.price_per_unit,
                o.offer.quantity,
                o.seller_cost_per_unit,
            ),
            None => (
                inventory_item.selling_price,
                context.constraints.quantity_needed,
                inventory_item.cost_price,
            ),
        };
        let deal = compute_deal_context(
            price,
            quantity,
            &context.constraints.item_name,
            &seller.name,
            cost,
            wallet,
        );
        format_deal_context_for_seller(&deal)
    });

    let agent = SellerAgent::new(
        context.provider.clone(),
        seller.clone(),
        inventory_item,
        context.config.temperature,
        context.config.max_tokens,
    );

    let reply = match agent
        .respond(
            &context.buyer_name,
            &context.constraints,
            &history,
            deal_context_text.as_deref(),
        )
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            let isolated = EngineError::SellerTurnFailed {
                seller_id: seller.id.as_str().to_string(),
                reason: e.to_string(),
            };
            tracing::error!(error = %isolated, "isolating seller failure");
            return None;
        }
    };

    let message = Message {
        id: MessageId::new(format!("msg_r{}_{}", context.round, seller.id)),
        round: context.round,
        timestamp: Utc::now(),
        sender_id: seller.id.as_str().to_string(),
        sender_type: SenderType::Seller,
        sender_name: seller.name.clone(),
        content: reply.message.clone(),
        offer: reply.offer.clone(),
        mentioned_sellers: vec![],
        visibility: vec![
            context.buyer_id.clone(),
            seller.id.as_str().to_string(),
        ],
    };
    context.log.append(message).await;

    tracing::info!(seller = %seller.name, "seller turn completed");
    Some(SellerTurnOutcome {
        seller_id: seller.id.clone(),
        seller_name: seller.name,
        message: reply.message,
        offer: reply.offer,
    })
}
