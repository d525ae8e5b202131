//! Budget domain errors

use core_kernel::{MoneyError, StoreError};
use thiserror::Error;

/// Errors that can occur in the budget domain
#[derive(Debug, Error)]
pub enum BudgetError {
    /// An active or realized commitment already exists for the reference
    #[error("Duplicate commitment for reference {reference_type}/{reference_id}")]
    DuplicateReference {
        reference_type: String,
        reference_id: String,
    },

    /// The commitment is not in the Active state
    #[error("Commitment is not active (status: {status})")]
    NotActive { status: String },

    /// Commitment not found
    #[error("Commitment not found: {0}")]
    CommitmentNotFound(String),

    /// General validation failure
    #[error("Validation error: {0}")]
    Validation(String),

    /// Money operation failed
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Store operation failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl BudgetError {
    pub fn validation(message: impl Into<String>) -> Self {
        BudgetError::Validation(message.into())
    }
}
