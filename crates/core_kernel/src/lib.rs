//! Core Kernel - Foundational types for the ERP ledger engine
//!
//! This crate provides the fundamental building blocks used across all
//! domain modules:
//! - Money types with precise decimal arithmetic and exchange-rate conversion
//! - Strongly-typed identifiers
//! - Durable store abstractions shared by the domain ports

pub mod identifiers;
pub mod money;
pub mod store;

pub use identifiers::{
    AccountId, AutoJournalConfigId, AutoJournalLogId, BudgetId, CommitmentId, CompanyId,
    JournalEntryId, JournalLineId, LedgerRowId, RealizationId, TrialBalanceId, UserId,
};
pub use money::{Currency, ExchangeRate, Money, MoneyError};
pub use store::{DomainStore, StoreError};
