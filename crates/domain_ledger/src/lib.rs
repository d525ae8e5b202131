//! Ledger Domain - Double-entry posting engine
//!
//! This crate implements the core accounting flow:
//! - Chart of accounts with hierarchy and code uniqueness
//! - Journal entry aggregate with a Draft -> Posted -> Reversed lifecycle
//! - General ledger projection with per-account running balances
//! - Trial balance generation and verification
//! - The `JournalService` orchestrating the lifecycle over a `LedgerStore`

pub mod account;
pub mod config;
pub mod entry;
pub mod error;
pub mod general_ledger;
pub mod ports;
pub mod service;
pub mod trial_balance;

pub use account::{Account, AccountType, ChartOfAccounts};
pub use config::LedgerConfig;
pub use entry::{EntrySource, EntryStatus, JournalEntry, JournalEntryLine};
pub use error::LedgerError;
pub use general_ledger::{project_entry, recompute_running, GeneralLedgerRow};
pub use ports::LedgerStore;
pub use service::{JournalService, LineInput, NewJournalEntry};
pub use trial_balance::{TrialBalance, TrialBalanceAccount, TrialBalanceSummary};
