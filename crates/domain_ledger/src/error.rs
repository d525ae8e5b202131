//! Ledger domain errors

use core_kernel::{MoneyError, StoreError};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account code already exists in the chart
    #[error("Duplicate account code: {0}")]
    DuplicateAccountCode(String),

    /// Parent chain would form a cycle
    #[error("Account hierarchy cycle involving: {0}")]
    AccountCycle(String),

    /// Journal entry not found
    #[error("Journal entry not found: {0}")]
    EntryNotFound(String),

    /// Entry has fewer than two lines
    #[error("Journal entry must have at least two lines")]
    EmptyEntry,

    /// A line fails validation
    #[error("Invalid journal line: {0}")]
    InvalidLine(String),

    /// Debits do not equal credits
    #[error("Unbalanced entry: debits={debits}, credits={credits}")]
    Unbalanced { debits: Decimal, credits: Decimal },

    /// Status transition not allowed
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Entry is no longer a draft and cannot be mutated
    #[error("Entry is locked: {0}")]
    EntryLocked(String),

    /// Trial balance does not balance
    #[error("Books are unbalanced: difference={difference}")]
    BooksUnbalanced { difference: Decimal },

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

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub fn invalid_line(message: impl Into<String>) -> Self {
        LedgerError::InvalidLine(message.into())
    }
}
