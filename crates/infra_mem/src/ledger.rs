//! In-memory ledger store
//!
//! Reference adapter for `LedgerStore`. One `RwLock` guards the whole
//! state, so `post_entry` and `rewrite_running_balances` are trivially
//! atomic and mutually exclusive.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use core_kernel::{
    AccountId, CompanyId, DomainStore, JournalEntryId, StoreError, TrialBalanceId,
};
use domain_ledger::{
    Account, EntryStatus, GeneralLedgerRow, JournalEntry, LedgerStore, TrialBalance,
};

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<AccountId, Account>,
    account_codes: HashMap<(CompanyId, String), AccountId>,
    entries: HashMap<JournalEntryId, JournalEntry>,
    rows: Vec<GeneralLedgerRow>,
    trial_balances: HashMap<TrialBalanceId, TrialBalance>,
    sequences: HashMap<(CompanyId, String), u32>,
}

impl LedgerState {
    fn sorted_rows_for_account(&self, account_id: AccountId) -> Vec<GeneralLedgerRow> {
        let mut rows: Vec<GeneralLedgerRow> = self
            .rows
            .iter()
            .filter(|r| r.account_id == account_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.transaction_date, r.created_at));
        rows
    }
}

/// In-memory `LedgerStore` adapter
#[derive(Default)]
pub struct MemoryLedgerStore {
    state: RwLock<LedgerState>,
}

impl MemoryLedgerStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainStore for MemoryLedgerStore {}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let code_key = (account.company_id, account.code.clone());
        if state.account_codes.contains_key(&code_key) {
            return Err(StoreError::conflict(format!(
                "account code already exists: {}",
                account.code
            )));
        }
        state.account_codes.insert(code_key, account.id);
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn get_account(&self, id: AccountId) -> Result<Account, StoreError> {
        let state = self.state.read().await;
        state
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Account", id))
    }

    async fn accounts_for_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<Account>, StoreError> {
        let state = self.state.read().await;
        let mut accounts: Vec<Account> = state
            .accounts
            .values()
            .filter(|a| a.company_id == company_id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    async fn insert_entry(&self, entry: &JournalEntry) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.entries.contains_key(&entry.id) {
            return Err(StoreError::conflict(format!(
                "entry already exists: {}",
                entry.id
            )));
        }
        state.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn update_entry(&self, entry: &JournalEntry) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        match state.entries.get(&entry.id) {
            None => return Err(StoreError::not_found("JournalEntry", entry.id)),
            // drafts are freely editable; a posted entry only accepts its
            // reversal flag. A stale draft copy must not clobber a posted
            // entry while its ledger rows remain.
            Some(stored)
                if stored.status != EntryStatus::Draft
                    && !stored.status.can_transition_to(entry.status) =>
            {
                return Err(StoreError::conflict(format!(
                    "entry {} is {} and cannot be overwritten",
                    stored.entry_number, stored.status
                )));
            }
            Some(_) => {}
        }
        state.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn delete_entry(&self, id: JournalEntryId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state
            .entries
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("JournalEntry", id))
    }

    async fn get_entry(&self, id: JournalEntryId) -> Result<JournalEntry, StoreError> {
        let state = self.state.read().await;
        state
            .entries
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("JournalEntry", id))
    }

    async fn entries_by_status(
        &self,
        company_id: CompanyId,
        status: EntryStatus,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        let state = self.state.read().await;
        let mut entries: Vec<JournalEntry> = state
            .entries
            .values()
            .filter(|e| e.company_id == company_id && e.status == status)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.entry_number.cmp(&b.entry_number));
        Ok(entries)
    }

    async fn entries_by_date_range(
        &self,
        company_id: CompanyId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<JournalEntry>, StoreError> {
        let state = self.state.read().await;
        let mut entries: Vec<JournalEntry> = state
            .entries
            .values()
            .filter(|e| {
                e.company_id == company_id && e.entry_date >= from && e.entry_date <= to
            })
            .cloned()
            .collect();
        entries.sort_by_key(|e| (e.entry_date, e.entry_number.clone()));
        Ok(entries)
    }

    async fn next_sequence(
        &self,
        company_id: CompanyId,
        period: &str,
    ) -> Result<u32, StoreError> {
        let mut state = self.state.write().await;
        let counter = state
            .sequences
            .entry((company_id, period.to_string()))
            .or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn post_entry(
        &self,
        entry: &JournalEntry,
        rows: &[GeneralLedgerRow],
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        match state.entries.get(&entry.id) {
            None => return Err(StoreError::not_found("JournalEntry", entry.id)),
            Some(stored) if stored.status != EntryStatus::Draft => {
                return Err(StoreError::conflict(format!(
                    "entry {} is not a draft",
                    stored.entry_number
                )));
            }
            Some(_) => {}
        }
        // status flip and row append land together under the same lock
        state.entries.insert(entry.id, entry.clone());
        state.rows.extend_from_slice(rows);
        Ok(())
    }

    async fn rows_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<GeneralLedgerRow>, StoreError> {
        let state = self.state.read().await;
        Ok(state.sorted_rows_for_account(account_id))
    }

    async fn rows_for_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<GeneralLedgerRow>, StoreError> {
        let state = self.state.read().await;
        let mut rows: Vec<GeneralLedgerRow> = state
            .rows
            .iter()
            .filter(|r| r.company_id == company_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.transaction_date, r.created_at));
        Ok(rows)
    }

    async fn rewrite_running_balances(
        &self,
        account_id: AccountId,
        rows: &[GeneralLedgerRow],
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let balances: HashMap<_, _> = rows.iter().map(|r| (r.id, r.running_balance)).collect();
        for row in state
            .rows
            .iter_mut()
            .filter(|r| r.account_id == account_id)
        {
            if let Some(balance) = balances.get(&row.id) {
                row.running_balance = *balance;
            }
        }
        Ok(())
    }

    async fn latest_balance(
        &self,
        account_id: AccountId,
    ) -> Result<Option<Decimal>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .sorted_rows_for_account(account_id)
            .last()
            .map(|r| r.running_balance))
    }

    async fn insert_trial_balance(
        &self,
        trial_balance: &TrialBalance,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state
            .trial_balances
            .insert(trial_balance.id, trial_balance.clone());
        Ok(())
    }

    async fn get_trial_balance(&self, id: TrialBalanceId) -> Result<TrialBalance, StoreError> {
        let state = self.state.read().await;
        state
            .trial_balances
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("TrialBalance", id))
    }
}
