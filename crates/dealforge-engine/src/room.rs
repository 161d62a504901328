//! Negotiation room state and the shared conversation log
//!
//! The room is owned by a single orchestrator instance; only the
//! conversation log is shared with concurrent seller tasks, which append to
//! it and never touch any other field. Appends are atomic under the log's
//! write lock, so a message is either fully in the log or not at all.

use std::sync::Arc;

use tokio::sync::RwLock;

use dealforge_types::{
    BuyerConstraints, BuyerId, Decision, Message, RoomId, RoomStatus, Seller, SessionId,
};

use crate::error::{EngineError, Result};

/// Append-only conversation log, safe under concurrent appenders
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    inner: Arc<RwLock<Vec<Message>>>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message as an atomic unit
    pub async fn append(&self, message: Message) {
        self.inner.write().await.push(message);
    }

    /// Snapshot the log for reading; appenders are not blocked afterwards
    pub async fn snapshot(&self) -> Vec<Message> {
        self.inner.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

/// One buyer-vs-N-sellers negotiation instance for a single item
#[derive(Debug, Clone)]
pub struct NegotiationRoom {
    pub id: RoomId,
    /// Session the room belongs to; used to look up the buyer's wallet
    pub session_id: Option<SessionId>,
    pub buyer_id: BuyerId,
    pub buyer_name: String,
    pub constraints: BuyerConstraints,
    pub sellers: Vec<Seller>,
    pub log: ConversationLog,
    pub current_round: u32,
    pub max_rounds: u32,
    pub status: RoomStatus,
    /// Set at most once, when the room completes
    pub decision: Option<Decision>,
    /// Room-level seed for deterministic tie-breaking
    pub seed: Option<u64>,
}

impl NegotiationRoom {
    /// Create a pending room; constraints and inventories are validated
    pub fn new(
        buyer_id: BuyerId,
        buyer_name: impl Into<String>,
        constraints: BuyerConstraints,
        sellers: Vec<Seller>,
        max_rounds: u32,
    ) -> Result<Self> {
        constraints
            .validate()
            .map_err(|e| EngineError::InvalidRoom {
                reason: e.to_string(),
            })?;
        for seller in &sellers {
            for item in &seller.inventory {
                item.validate().map_err(|e| EngineError::InvalidRoom {
                    reason: e.to_string(),
                })?;
            }
        }
        if max_rounds == 0 {
            return Err(EngineError::InvalidRoom {
                reason: "max_rounds must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            id: RoomId::generate(),
            session_id: None,
            buyer_id,
            buyer_name: buyer_name.into(),
            constraints,
            sellers,
            log: ConversationLog::new(),
            current_round: 0,
            max_rounds,
            status: RoomStatus::Pending,
            decision: None,
            seed: None,
        })
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Move the room to a new status, enforcing forward-only transitions
    pub fn transition(&mut self, next: RoomStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(EngineError::RoomFinished {
                status: self.status,
            });
        }
        self.status = next;
        Ok(())
    }

    /// All party ids that can see a public (buyer) message
    pub fn all_party_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .sellers
            .iter()
            .map(|s| s.id.as_str().to_string())
            .collect();
        ids.push(self.buyer_id.as_str().to_string());
        ids
    }
}
