//! Identity types for Dealforge
//!
//! All identity types are strongly typed wrappers around strings to prevent
//! accidental mixing of different ID types. Callers may supply their own
//! identifiers (e.g. `"seller_1"` from a scenario file) or mint fresh
//! prefixed ULIDs via `generate()`.

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Macro to generate ID types with common implementations
macro_rules! define_id_type {
    ($name:ident, $prefix:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an existing identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Mint a fresh prefixed identifier
            pub fn generate() -> Self {
                Self(format!(concat!($prefix, "_{}"), Ulid::new()))
            }

            /// Get the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

define_id_type!(RoomId, "room", "Unique identifier for a negotiation room");
define_id_type!(BuyerId, "buyer", "Unique identifier for a buyer");
define_id_type!(SellerId, "seller", "Unique identifier for a seller");
define_id_type!(MessageId, "msg", "Unique identifier for a conversation message");
define_id_type!(SessionId, "session", "Unique identifier for a marketplace session");
