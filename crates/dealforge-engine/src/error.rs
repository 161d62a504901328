//! Engine error taxonomy
//!
//! Propagation policy: failures local to one seller never escape the
//! dispatcher; buyer-turn and routing failures end the room; decision
//! classification failures are swallowed as "keep negotiating".

use thiserror::Error;

use dealforge_types::RoomStatus;

/// Errors surfaced by the orchestration engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Fatal: the round cannot proceed without a buyer message
    #[error("Buyer turn failed in round {round}: {reason}")]
    BuyerTurnFailed { round: u32, reason: String },

    /// Fatal: nobody is left to negotiate with
    #[error("No sellers available to respond in round {round}")]
    NoRespondingSellers { round: u32 },

    /// Isolated: that seller is simply absent this round
    #[error("Seller turn failed for {seller_id}: {reason}")]
    SellerTurnFailed { seller_id: String, reason: String },

    /// The room is already terminal and cannot be run again
    #[error("Room is already {status}")]
    RoomFinished { status: RoomStatus },

    #[error("Invalid room: {reason}")]
    InvalidRoom { reason: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
