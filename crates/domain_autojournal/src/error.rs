//! Auto-journal errors

use core_kernel::StoreError;
use domain_ledger::LedgerError;
use thiserror::Error;

/// Errors that can occur while generating journal entries from events
#[derive(Debug, Error)]
pub enum AutoJournalError {
    /// No mapping exists for the module and transaction type
    #[error("No account mapping configured for {source_module}/{transaction_type}")]
    NoMappingConfigured {
        source_module: String,
        transaction_type: String,
    },

    /// A mapping exists but is switched off
    #[error("Account mapping for {source_module}/{transaction_type} is inactive")]
    MappingInactive {
        source_module: String,
        transaction_type: String,
    },

    /// No rule matched a non-zero amount, so no lines were generated
    #[error("Event produced no journal lines")]
    EmptyGeneration,

    /// The generated entry was rejected by the ledger
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Store operation failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
