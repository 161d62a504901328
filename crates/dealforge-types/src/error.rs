//! Domain-level validation errors

use thiserror::Error;

/// Errors raised when domain invariants are violated
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid buyer constraints: {reason}")]
    InvalidConstraints { reason: String },

    #[error("Invalid inventory item '{item}': {reason}")]
    InvalidInventory { item: String, reason: String },
}

pub type Result<T> = std::result::Result<T, DomainError>;
