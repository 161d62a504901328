//! Dealforge Types - Canonical domain types for multi-party negotiation
//!
//! This crate contains all foundational types for Dealforge with zero
//! dependencies on other dealforge crates. It defines the type system for:
//!
//! - Identity types (RoomId, SellerId, MessageId, etc.)
//! - Buyer constraints and seller inventory (the catalog)
//! - Seller behavioral profiles (priority, speaking style, strategy)
//! - Conversation messages and offers
//! - Negotiation outcomes and room status
//!
//! # Architectural Invariants
//!
//! These types back the engine's hard guarantees:
//!
//! 1. A buyer's `max_price_per_unit` is a hard ceiling: no offer above it
//!    is ever accepted, regardless of what a language model says
//! 2. Inventory prices satisfy `cost_price < least_price < selling_price`
//! 3. Messages are append-only; once recorded they are never mutated
//! 4. Room status only moves forward and is immutable once terminal

pub mod catalog;
pub mod conversation;
pub mod error;
pub mod identity;
pub mod outcome;
pub mod seller;

pub use catalog::*;
pub use conversation::*;
pub use error::*;
pub use identity::*;
pub use outcome::*;
pub use seller::*;

/// Version of the Dealforge types schema
pub const TYPES_VERSION: &str = "0.1.0";
