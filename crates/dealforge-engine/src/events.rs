//! Typed event stream emitted by the orchestrator
//!
//! The stream is lazy, finite, and non-restartable. Exactly one terminal
//! event (`negotiation_complete` or `error`) is emitted per run, and
//! nothing follows it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use dealforge_types::{Offer, SellerId, SenderType};

/// Event payloads, tagged as `{"type": ..., "data": {...}}` on the wire
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventKind {
    /// Liveness signal; no state change
    Heartbeat { message: String, round: u32 },
    RoundStart {
        round_number: u32,
        max_rounds: u32,
    },
    BuyerMessage {
        sender_id: String,
        sender_name: String,
        sender_type: SenderType,
        message: String,
        mentioned_sellers: Vec<SellerId>,
        round: u32,
    },
    /// Zero or more per round; unordered among sellers within a round
    SellerResponse {
        seller_id: SellerId,
        sender_name: String,
        sender_type: SenderType,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        offer: Option<Offer>,
        round: u32,
    },
    /// Emitted at most once, immediately before `negotiation_complete`
    Decision {
        decision: String,
        chosen_seller_id: SellerId,
        chosen_seller_name: String,
        final_price: f64,
        final_quantity: u32,
        total_cost: f64,
        effective_total: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        recommended_card: Option<String>,
        card_savings: f64,
        reason: String,
    },
    /// Terminal: a selection was made, or selection is null on round
    /// exhaustion
    NegotiationComplete {
        selected_seller_id: Option<SellerId>,
        selected_seller_name: Option<String>,
        final_offer: Option<Offer>,
        reason: Option<String>,
        rounds: u32,
    },
    /// Terminal: a caught orchestrator-level failure
    Error { error: String, round: u32 },
}

/// One event with its emission timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NegotiationEvent {
    #[serde(flatten)]
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
}

impl NegotiationEvent {
    pub fn now(kind: EventKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
        }
    }

    /// Whether this event ends the stream
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::NegotiationComplete { .. } | EventKind::Error { .. }
        )
    }
}
