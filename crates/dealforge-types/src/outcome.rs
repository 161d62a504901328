//! Room lifecycle and negotiation outcome

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::conversation::Offer;
use crate::identity::SellerId;

/// Lifecycle state of a negotiation room
///
/// Transitions are forward-only: `Pending → Active → {Completed | Aborted}`.
/// Once a room is terminal it is immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Pending,
    Active,
    Completed,
    Aborted,
}

impl RoomStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }

    /// Whether `next` is a legal transition from this state
    pub fn can_transition_to(&self, next: RoomStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Active)
                | (Self::Active, Self::Completed)
                | (Self::Active, Self::Aborted)
        )
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// Terminal accept decision - produced at most once per room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub seller_id: SellerId,
    pub seller_name: String,
    pub offer: Offer,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!RoomStatus::Pending.is_terminal());
        assert!(!RoomStatus::Active.is_terminal());
        assert!(RoomStatus::Completed.is_terminal());
        assert!(RoomStatus::Aborted.is_terminal());
    }

    #[test]
    fn transitions_only_move_forward() {
        assert!(RoomStatus::Pending.can_transition_to(RoomStatus::Active));
        assert!(RoomStatus::Active.can_transition_to(RoomStatus::Completed));
        assert!(RoomStatus::Active.can_transition_to(RoomStatus::Aborted));
        assert!(!RoomStatus::Completed.can_transition_to(RoomStatus::Active));
        assert!(!RoomStatus::Aborted.can_transition_to(RoomStatus::Completed));
        assert!(!RoomStatus::Pending.can_transition_to(RoomStatus::Completed));
    }
}
