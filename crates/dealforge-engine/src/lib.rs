//! Dealforge Engine - the round orchestration core
//!
//! A negotiation room holds one buyer and N sellers. The engine drives the
//! room through bounded rounds:
//!
//! ```text
//! BuyerTurn → Routing → ParallelSellers → DecisionCheck → loop or stop
//! ```
//!
//! Each round: the buyer speaks (fatal if it fails), mentions select which
//! sellers respond, selected sellers respond concurrently with per-seller
//! failure isolation, and a decision check either accepts a valid offer or
//! continues. The whole run is exposed as a lazy, finite stream of typed
//! events with exactly one terminal event.
//!
//! Hard guarantees, enforced in code rather than by any model:
//!
//! - no offer above the buyer's price ceiling is ever accepted
//! - the round counter never exceeds the configured limit
//! - a failing seller never aborts the round; a failing buyer always does

pub mod config;
pub mod decision;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod matcher;
pub mod orchestrator;
pub mod room;
pub mod routing;
pub mod standing;
pub mod validator;
pub mod visibility;

pub use config::EngineConfig;
pub use decision::DecisionEngine;
pub use dispatch::{ParallelSellerDispatcher, SellerTurnOutcome};
pub use error::{EngineError, Result};
pub use events::{EventKind, NegotiationEvent};
pub use matcher::match_inventory;
pub use orchestrator::RoundOrchestrator;
pub use room::{ConversationLog, NegotiationRoom};
pub use routing::route;
pub use standing::{latest_offers_per_seller, StandingOffer};
pub use validator::is_valid_offer;
pub use visibility::filter_history;
