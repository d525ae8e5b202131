//! Chart of accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::LedgerError;
use core_kernel::{AccountId, CompanyId};

/// Account classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountType {
    /// Returns true for accounts whose normal balance is a debit
    ///
    /// Asset and Expense accounts increase on the debit side; Liability,
    /// Equity and Revenue accounts increase on the credit side.
    pub fn is_debit_normal(&self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Expense)
    }
}

/// An account in the chart of accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,
    /// Company this account belongs to
    pub company_id: CompanyId,
    /// Account code, unique within the chart
    pub code: String,
    /// Account name
    pub name: String,
    /// Classification
    pub account_type: AccountType,
    /// Optional parent for hierarchical charts
    pub parent_id: Option<AccountId>,
    /// Whether the account accepts new postings
    pub is_active: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new active account
    pub fn new(
        company_id: CompanyId,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new_v7(),
            company_id,
            code: code.into(),
            name: name.into(),
            account_type,
            parent_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the parent account
    pub fn with_parent(mut self, parent_id: AccountId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Deactivates the account
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}

/// The chart of accounts for one company
///
/// Enforces account-code uniqueness and rejects parent chains that would
/// form a cycle.
#[derive(Debug, Default)]
pub struct ChartOfAccounts {
    accounts: HashMap<AccountId, Account>,
    by_code: HashMap<String, AccountId>,
}

impl ChartOfAccounts {
    /// Creates an empty chart
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account to the chart
    ///
    /// # Errors
    ///
    /// - `DuplicateAccountCode` if the code is already present
    /// - `AccountNotFound` if the parent does not exist
    /// - `AccountCycle` if the parent chain would loop back to this account
    pub fn add(&mut self, account: Account) -> Result<(), LedgerError> {
        if self.by_code.contains_key(&account.code) {
            return Err(LedgerError::DuplicateAccountCode(account.code.clone()));
        }
        if let Some(parent_id) = account.parent_id {
            self.ensure_no_cycle(account.id, parent_id)?;
        }

        self.by_code.insert(account.code.clone(), account.id);
        self.accounts.insert(account.id, account);
        Ok(())
    }

    /// Gets an account by ID
    pub fn get(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// Gets an account by code
    pub fn by_code(&self, code: &str) -> Option<&Account> {
        self.by_code.get(code).and_then(|id| self.accounts.get(id))
    }

    /// Returns all active accounts
    pub fn active_accounts(&self) -> Vec<&Account> {
        let mut active: Vec<&Account> = self
            .accounts
            .values()
            .filter(|a| a.is_active)
            .collect();
        active.sort_by(|a, b| a.code.cmp(&b.code));
        active
    }

    /// Returns all accounts
    pub fn all(&self) -> Vec<&Account> {
        self.accounts.values().collect()
    }

    /// Number of accounts in the chart
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the chart is empty
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Deactivates an account
    pub fn deactivate(&mut self, id: &AccountId) -> Result<(), LedgerError> {
        let account = self
            .accounts
            .get_mut(id)
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))?;
        account.deactivate();
        Ok(())
    }

    fn ensure_no_cycle(
        &self,
        new_id: AccountId,
        parent_id: AccountId,
    ) -> Result<(), LedgerError> {
        if parent_id == new_id {
            return Err(LedgerError::AccountCycle(new_id.to_string()));
        }

        let mut current = Some(parent_id);
        while let Some(id) = current {
            if id == new_id {
                return Err(LedgerError::AccountCycle(new_id.to_string()));
            }
            let parent = self
                .accounts
                .get(&id)
                .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))?;
            current = parent.parent_id;
        }
        Ok(())
    }
}
