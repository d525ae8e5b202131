//! Ledger store port
//!
//! The durable-store boundary for the ledger domain. Adapters must honor
//! the atomicity notes on each operation; the posting invariant depends on
//! `post_entry` being all-or-nothing.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::account::Account;
use crate::entry::{EntryStatus, JournalEntry};
use crate::general_ledger::GeneralLedgerRow;
use crate::trial_balance::TrialBalance;
use core_kernel::{AccountId, CompanyId, DomainStore, JournalEntryId, StoreError, TrialBalanceId};

/// Durable store for accounts, journal entries, ledger rows and trial
/// balance snapshots
#[async_trait]
pub trait LedgerStore: DomainStore {
    // -- accounts --

    /// Persists a new account; fails with Conflict on a duplicate code
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError>;

    /// Loads an account by id
    async fn get_account(&self, id: AccountId) -> Result<Account, StoreError>;

    /// All accounts for a company, ordered by code
    async fn accounts_for_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<Account>, StoreError>;

    // -- journal entries --

    /// Persists a new draft entry with its lines
    async fn insert_entry(&self, entry: &JournalEntry) -> Result<(), StoreError>;

    /// Replaces a stored entry (lines included)
    async fn update_entry(&self, entry: &JournalEntry) -> Result<(), StoreError>;

    /// Deletes an entry and its lines
    async fn delete_entry(&self, id: JournalEntryId) -> Result<(), StoreError>;

    /// Loads an entry by id
    async fn get_entry(&self, id: JournalEntryId) -> Result<JournalEntry, StoreError>;

    /// Entries for a company with the given status
    async fn entries_by_status(
        &self,
        company_id: CompanyId,
        status: EntryStatus,
    ) -> Result<Vec<JournalEntry>, StoreError>;

    /// Entries for a company with entry_date in [from, to]
    async fn entries_by_date_range(
        &self,
        company_id: CompanyId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<JournalEntry>, StoreError>;

    /// Next value of the per-company, per-period entry sequence
    ///
    /// `period` is the year-month key (e.g. "202501"). Consecutive calls
    /// return 1, 2, 3, ... and the counter survives across entries.
    async fn next_sequence(
        &self,
        company_id: CompanyId,
        period: &str,
    ) -> Result<u32, StoreError>;

    // -- posting --

    /// Atomically marks the entry posted and appends its ledger rows
    ///
    /// Either the status flip and every row land together, or nothing
    /// does. Fails with Conflict if the stored entry is no longer a draft.
    async fn post_entry(
        &self,
        entry: &JournalEntry,
        rows: &[GeneralLedgerRow],
    ) -> Result<(), StoreError>;

    // -- general ledger --

    /// All rows for an account, ordered by (transaction_date, created_at)
    async fn rows_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<GeneralLedgerRow>, StoreError>;

    /// All rows for a company, ordered by (transaction_date, created_at)
    async fn rows_for_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<GeneralLedgerRow>, StoreError>;

    /// Replaces the running balances of an account's rows
    ///
    /// Must be exclusive with respect to concurrent appends for the same
    /// account so a repair cannot interleave with a posting.
    async fn rewrite_running_balances(
        &self,
        account_id: AccountId,
        rows: &[GeneralLedgerRow],
    ) -> Result<(), StoreError>;

    /// The running balance after the account's latest row, if any
    async fn latest_balance(&self, account_id: AccountId)
        -> Result<Option<Decimal>, StoreError>;

    // -- trial balances --

    /// Persists a generated snapshot
    async fn insert_trial_balance(&self, trial_balance: &TrialBalance)
        -> Result<(), StoreError>;

    /// Loads a snapshot by id
    async fn get_trial_balance(&self, id: TrialBalanceId) -> Result<TrialBalance, StoreError>;
}
