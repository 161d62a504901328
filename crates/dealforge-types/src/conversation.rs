//! Conversation messages and offers
//!
//! Messages are append-only: the node that produces a message appends it
//! exactly once and it is never mutated afterwards. Visibility is an
//! explicit allowlist of party ids so each agent's view of the
//! conversation can be projected without guessing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{MessageId, SellerId};

/// Who sent a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderType {
    Buyer,
    Seller,
}

/// A seller's proposed (price, quantity) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub price_per_unit: f64,
    pub quantity: u32,
}

impl Offer {
    pub fn new(price_per_unit: f64, quantity: u32) -> Self {
        Self {
            price_per_unit,
            quantity,
        }
    }

    /// Total at this price and quantity
    pub fn total(&self) -> f64 {
        self.price_per_unit * self.quantity as f64
    }
}

/// One entry in a room's conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    /// Round the message was produced in
    pub round: u32,
    pub timestamp: DateTime<Utc>,
    pub sender_id: String,
    pub sender_type: SenderType,
    pub sender_name: String,
    pub content: String,
    /// Structured offer extracted from the message, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<Offer>,
    /// Sellers the buyer addressed with @Name mentions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mentioned_sellers: Vec<SellerId>,
    /// Party ids allowed to read this message
    pub visibility: Vec<String>,
}

impl Message {
    /// Whether the given party may read this message
    pub fn visible_to(&self, party_id: &str) -> bool {
        self.sender_id == party_id || self.visibility.iter().any(|v| v == party_id)
    }
}
