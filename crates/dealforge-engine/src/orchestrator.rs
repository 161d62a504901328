//! Round orchestrator - the negotiation state machine
//!
//! One orchestrator instance drives one room at a time; rounds are strictly
//! sequential. Within a round only the seller turns run concurrently, and
//! the decision step waits for every seller task to resolve.
//!
//! The run is exposed as a lazy, finite stream of [`NegotiationEvent`]s.
//! Exactly one terminal event is emitted (`negotiation_complete` or
//! `error`) and nothing follows it. Failure policy per step:
//!
//! - buyer turn fails → fatal, `error`, room aborted
//! - nobody routed to respond → fatal, `error`, room aborted
//! - a seller fails → isolated inside the dispatcher, round continues
//! - decision classification fails → swallowed, negotiation continues
//! - round limit exhausted → `negotiation_complete` with a null selection

use std::sync::Arc;

use chrono::Utc;
use futures::Stream;
use rand::rngs::StdRng;
use rand::SeedableRng;

use dealforge_agents::{BuyerAgent, BuyerTurn};
use dealforge_llm::LlmProvider;
use dealforge_rewards::{
    compute_deal_context, format_deal_context_for_buyer, CardWallet, WalletStore,
};
use dealforge_types::{Message, MessageId, RoomStatus, SenderType};

use crate::config::EngineConfig;
use crate::decision::DecisionEngine;
use crate::dispatch::ParallelSellerDispatcher;
use crate::error::EngineError;
use crate::events::{EventKind, NegotiationEvent};
use crate::matcher::match_inventory;
use crate::room::NegotiationRoom;
use crate::routing::route;
use crate::standing::latest_offers_per_seller;
use crate::visibility::filter_history;

/// Drives a room from `pending` to a terminal state
pub struct RoundOrchestrator {
    provider: Arc<dyn LlmProvider>,
    config: EngineConfig,
    wallets: Arc<WalletStore>,
}

impl RoundOrchestrator {
    pub fn new(provider: Arc<dyn LlmProvider>, config: EngineConfig) -> Self {
        Self {
            provider,
            config,
            wallets: Arc::new(WalletStore::new()),
        }
    }

    /// Use a shared wallet store for session wallet lookups
    pub fn with_wallets(mut self, wallets: Arc<WalletStore>) -> Self {
        self.wallets = wallets;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the room to completion, yielding events as they happen
    pub fn run(&self, mut room: NegotiationRoom) -> impl Stream<Item = NegotiationEvent> {
        let provider = self.provider.clone();
        let config = self.config.clone();
        let wallets = self.wallets.clone();
        let dispatcher = ParallelSellerDispatcher::new(provider.clone(), config.clone());
        let decision_engine = DecisionEngine::new(provider.clone(), config.clone());

        async_stream::stream! {
            if room.status.is_terminal() {
                yield NegotiationEvent::now(EventKind::Error {
                    error: EngineError::RoomFinished { status: room.status }.to_string(),
                    round: room.current_round,
                });
                return;
            }
            if room.status == RoomStatus::Pending {
                room.status = RoomStatus::Active;
            }

            let mut rng = room.seed.map(StdRng::seed_from_u64);
            let wallet: Option<CardWallet> =
                room.session_id.as_ref().map(|sid| wallets.get(sid));

            tracing::info!(
                room = %room.id,
                sellers = room.sellers.len(),
                max_rounds = room.max_rounds,
                "starting negotiation"
            );
            yield NegotiationEvent::now(EventKind::Heartbeat {
                message: "Negotiation started".to_string(),
                round: room.current_round,
            });

            let mut terminal_emitted = false;

            while room.current_round < room.max_rounds {
                room.current_round += 1;
                tracing::info!(
                    round = room.current_round,
                    max_rounds = room.max_rounds,
                    "starting round"
                );
                yield NegotiationEvent::now(EventKind::RoundStart {
                    round_number: room.current_round,
                    max_rounds: room.max_rounds,
                });

                // Node 1: buyer turn - fatal when it fails
                let turn = match buyer_turn(&provider, &config, &room, wallet.as_ref()).await {
                    Ok(turn) => turn,
                    Err(e) => {
                        tracing::error!(error = %e, "buyer turn failed, aborting room");
                        room.status = RoomStatus::Aborted;
                        yield NegotiationEvent::now(EventKind::Error {
                            error: e.to_string(),
                            round: room.current_round,
                        });
                        terminal_emitted = true;
                        break;
                    }
                };
                yield NegotiationEvent::now(EventKind::BuyerMessage {
                    sender_id: room.buyer_id.as_str().to_string(),
                    sender_name: room.buyer_name.clone(),
                    sender_type: SenderType::Buyer,
                    message: turn.message.clone(),
                    mentioned_sellers: turn.mentioned_sellers.clone(),
                    round: room.current_round,
                });

                // Node 2: routing - fatal when nobody can respond
                let responding = route(&turn.mentioned_sellers, &room.sellers);
                if responding.is_empty() {
                    let e = EngineError::NoRespondingSellers {
                        round: room.current_round,
                    };
                    tracing::error!(error = %e, "aborting room");
                    room.status = RoomStatus::Aborted;
                    yield NegotiationEvent::now(EventKind::Error {
                        error: e.to_string(),
                        round: room.current_round,
                    });
                    terminal_emitted = true;
                    break;
                }

                // Node 3: parallel seller responses, failures isolated
                let results = dispatcher
                    .dispatch(&room, responding, wallet.clone())
                    .await;
                for seller in &room.sellers {
                    if let Some(Some(outcome)) = results.get(&seller.id) {
                        yield NegotiationEvent::now(EventKind::SellerResponse {
                            seller_id: outcome.seller_id.clone(),
                            sender_name: outcome.seller_name.clone(),
                            sender_type: SenderType::Seller,
                            message: outcome.message.clone(),
                            offer: outcome.offer.clone(),
                            round: room.current_round,
                        });
                    }
                }

                // Node 4: decision check
                if let Some(decision) = decision_engine.decide(&room, &mut rng).await {
                    room.status = RoomStatus::Completed;

                    let seller_cost = room
                        .sellers
                        .iter()
                        .find(|s| s.id == decision.seller_id)
                        .and_then(|s| match_inventory(s, &room.constraints))
                        .map(|item| item.cost_price)
                        .unwrap_or(0.0);
                    let total_cost = decision.offer.total();
                    let (effective_total, recommended_card, card_savings) = match wallet.as_ref() {
                        Some(wallet) => {
                            let deal = compute_deal_context(
                                decision.offer.price_per_unit,
                                decision.offer.quantity,
                                &room.constraints.item_name,
                                &decision.seller_name,
                                seller_cost,
                                wallet,
                            );
                            (
                                deal.buyer_effective_total,
                                deal.recommended_card_name,
                                deal.buyer_savings,
                            )
                        }
                        None => (total_cost, None, 0.0),
                    };

                    tracing::info!(
                        seller = %decision.seller_name,
                        price = decision.offer.price_per_unit,
                        "negotiation completed with a deal"
                    );
                    yield NegotiationEvent::now(EventKind::Decision {
                        decision: "accept".to_string(),
                        chosen_seller_id: decision.seller_id.clone(),
                        chosen_seller_name: decision.seller_name.clone(),
                        final_price: decision.offer.price_per_unit,
                        final_quantity: decision.offer.quantity,
                        total_cost,
                        effective_total,
                        recommended_card,
                        card_savings,
                        reason: decision.reason.clone(),
                    });
                    yield NegotiationEvent::now(EventKind::NegotiationComplete {
                        selected_seller_id: Some(decision.seller_id.clone()),
                        selected_seller_name: Some(decision.seller_name.clone()),
                        final_offer: Some(decision.offer.clone()),
                        reason: Some(decision.reason.clone()),
                        rounds: room.current_round,
                    });
                    room.decision = Some(decision);
                    terminal_emitted = true;
                    break;
                }

                yield NegotiationEvent::now(EventKind::Heartbeat {
                    message: format!("Round {} complete", room.current_round),
                    round: room.current_round,
                });
            }

            // Round limit exhausted without a decision
            if !terminal_emitted {
                room.status = RoomStatus::Aborted;
                tracing::info!(rounds = room.current_round, "round limit reached, no deal");
                yield NegotiationEvent::now(EventKind::NegotiationComplete {
                    selected_seller_id: None,
                    selected_seller_name: None,
                    final_offer: None,
                    reason: Some("Max rounds reached".to_string()),
                    rounds: room.current_round,
                });
            }
        }
    }
}

/// Produce the buyer's message for this round and append it to the log
async fn buyer_turn(
    provider: &Arc<dyn LlmProvider>,
    config: &EngineConfig,
    room: &NegotiationRoom,
    wallet: Option<&CardWallet>,
) -> Result<BuyerTurn, EngineError> {
    let snapshot = room.log.snapshot().await;
    let history = filter_history(&snapshot, room.buyer_id.as_str(), SenderType::Buyer);

    // Standing offers formatted per seller, reward-aware
    let deal_context_text = wallet.and_then(|wallet| {
        let offers = latest_offers_per_seller(&snapshot, &room.sellers, &room.constraints);
        if offers.is_empty() {
            return None;
        }
        let parts: Vec<String> = offers
            .iter()
            .map(|o| {
                let deal = compute_deal_context(
                    o.offer.price_per_unit,
                    o.offer.quantity,
                    &room.constraints.item_name,
                    &o.seller_name,
                    o.seller_cost_per_unit,
                    wallet,
                );
                format!("[{}] {}", o.seller_name, format_deal_context_for_buyer(&deal))
            })
            .collect();
        Some(parts.join("\n"))
    });

    let agent = BuyerAgent::new(
        provider.clone(),
        room.constraints.clone(),
        config.temperature,
        config.max_tokens,
    );
    let turn = agent
        .run_turn(
            &room.buyer_name,
            &room.sellers,
            &history,
            deal_context_text.as_deref(),
        )
        .await
        .map_err(|e| EngineError::BuyerTurnFailed {
            round: room.current_round,
            reason: e.to_string(),
        })?;

    let message = Message {
        id: MessageId::new(format!("msg_r{}_buyer", room.current_round)),
        round: room.current_round,
        timestamp: Utc::now(),
        sender_id: room.buyer_id.as_str().to_string(),
        sender_type: SenderType::Buyer,
        sender_name: room.buyer_name.clone(),
        content: turn.message.clone(),
        offer: None,
        mentioned_sellers: turn.mentioned_sellers.clone(),
        // Buyer messages are public to the whole room
        visibility: room.all_party_ids(),
    };
    room.log.append(message).await;

    Ok(turn)
}
