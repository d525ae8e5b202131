//! Journal posting service
//!
//! Orchestrates the journal entry lifecycle over a `LedgerStore`: draft
//! creation with generated entry numbers, atomic posting into the general
//! ledger, reversal flags, running-balance repair, and trial balance
//! generation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::account::Account;
use crate::config::LedgerConfig;
use crate::entry::{EntrySource, EntryStatus, JournalEntry, JournalEntryLine};
use crate::error::LedgerError;
use crate::general_ledger::{project_entry, recompute_running, GeneralLedgerRow};
use crate::ports::LedgerStore;
use crate::trial_balance::{TrialBalance, TrialBalanceAccount};
use core_kernel::{
    AccountId, CompanyId, Currency, ExchangeRate, JournalEntryId, JournalLineId, Money,
    StoreError, UserId,
};

/// Input for one line of a new entry
#[derive(Debug, Clone)]
pub struct LineInput {
    /// Account to debit or credit
    pub account_id: AccountId,
    /// Debit amount in the entry currency (zero when crediting)
    pub debit: Decimal,
    /// Credit amount in the entry currency (zero when debiting)
    pub credit: Decimal,
    /// Optional line description
    pub description: Option<String>,
}

impl LineInput {
    /// A debit line
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// A credit line
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }
}

/// Input for creating a draft entry
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    /// Company the entry belongs to
    pub company_id: CompanyId,
    /// Accounting date
    pub entry_date: NaiveDate,
    /// Description
    pub description: String,
    /// Transaction currency
    pub currency: Currency,
    /// Rate to the base currency; unity when absent
    pub exchange_rate: Option<ExchangeRate>,
    /// Originating document, for generated entries
    pub source: Option<EntrySource>,
    /// Lines
    pub lines: Vec<LineInput>,
}

/// Application service for the journal entry lifecycle
pub struct JournalService<S: LedgerStore> {
    store: Arc<S>,
    config: LedgerConfig,
}

impl<S: LedgerStore> JournalService<S> {
    /// Creates a service over the given store
    pub fn new(store: Arc<S>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// The configured base currency
    pub fn base_currency(&self) -> Currency {
        self.config.base_currency
    }

    // -- accounts --

    /// Persists a new account
    pub async fn create_account(&self, account: Account) -> Result<Account, LedgerError> {
        self.store.insert_account(&account).await?;
        Ok(account)
    }

    /// Loads an account
    pub async fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.store
            .get_account(id)
            .await
            .map_err(|e| not_found_as(e, || LedgerError::AccountNotFound(id.to_string())))
    }

    // -- drafts --

    /// Creates a draft entry with its lines
    ///
    /// Assigns the next entry number for the company and period, applies
    /// the exchange rate (unity fallback), and computes base amounts and
    /// totals before the entry is persisted.
    pub async fn create_with_lines(
        &self,
        request: NewJournalEntry,
    ) -> Result<JournalEntry, LedgerError> {
        let entry_number = self
            .next_entry_number(request.company_id, request.entry_date)
            .await?;

        let mut entry = JournalEntry::new(
            request.company_id,
            entry_number,
            request.entry_date,
            request.description,
            request.currency,
            self.config.base_currency,
        );
        if let Some(source) = request.source {
            entry = entry.with_source(source);
        }
        entry.set_exchange_rate(request.exchange_rate.unwrap_or_default())?;

        for input in request.lines {
            entry.add_line(build_line(&input, request.currency))?;
        }

        self.store.insert_entry(&entry).await?;
        info!(
            entry_number = %entry.entry_number,
            lines = entry.lines.len(),
            "created draft journal entry"
        );
        Ok(entry)
    }

    /// Replaces a draft entry's header fields and lines
    pub async fn update_with_lines(
        &self,
        entry_id: JournalEntryId,
        entry_date: NaiveDate,
        description: String,
        lines: Vec<LineInput>,
    ) -> Result<JournalEntry, LedgerError> {
        let mut entry = self.get(entry_id).await?;
        if entry.status != EntryStatus::Draft {
            return Err(LedgerError::EntryLocked(entry.entry_number));
        }

        entry.entry_date = entry_date;
        entry.description = description;
        let currency = entry.currency;
        let new_lines = lines
            .iter()
            .map(|input| build_line(input, currency))
            .collect();
        entry.replace_lines(new_lines)?;

        self.store.update_entry(&entry).await?;
        Ok(entry)
    }

    /// Appends a line to a draft entry
    pub async fn add_line(
        &self,
        entry_id: JournalEntryId,
        input: LineInput,
    ) -> Result<JournalEntry, LedgerError> {
        let mut entry = self.get(entry_id).await?;
        let currency = entry.currency;
        entry.add_line(build_line(&input, currency))?;
        self.store.update_entry(&entry).await?;
        Ok(entry)
    }

    /// Removes a line from a draft entry
    pub async fn remove_line(
        &self,
        entry_id: JournalEntryId,
        line_id: JournalLineId,
    ) -> Result<JournalEntry, LedgerError> {
        let mut entry = self.get(entry_id).await?;
        entry.remove_line(line_id)?;
        self.store.update_entry(&entry).await?;
        Ok(entry)
    }

    /// Deletes a draft entry and its lines
    pub async fn delete_entry(&self, entry_id: JournalEntryId) -> Result<(), LedgerError> {
        let entry = self.get(entry_id).await?;
        if entry.status != EntryStatus::Draft {
            return Err(LedgerError::EntryLocked(entry.entry_number));
        }
        self.store.delete_entry(entry_id).await?;
        info!(entry_number = %entry.entry_number, "deleted draft journal entry");
        Ok(())
    }

    // -- queries --

    /// Loads an entry
    pub async fn get(&self, entry_id: JournalEntryId) -> Result<JournalEntry, LedgerError> {
        self.store
            .get_entry(entry_id)
            .await
            .map_err(|e| not_found_as(e, || LedgerError::EntryNotFound(entry_id.to_string())))
    }

    /// Entries with the given status
    pub async fn list_by_status(
        &self,
        company_id: CompanyId,
        status: EntryStatus,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        Ok(self.store.entries_by_status(company_id, status).await?)
    }

    /// Entries with entry_date in [from, to]
    pub async fn list_by_date_range(
        &self,
        company_id: CompanyId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        Ok(self.store.entries_by_date_range(company_id, from, to).await?)
    }

    /// Draft entries awaiting posting
    pub async fn unposted_entries(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        self.list_by_status(company_id, EntryStatus::Draft).await
    }

    // -- posting --

    /// Posts a draft entry into the general ledger
    ///
    /// Re-validates the entry, projects one ledger row per line with
    /// running balances continuing from each account's latest balance,
    /// then persists the status flip and the rows in a single atomic
    /// store operation.
    pub async fn post(
        &self,
        entry_id: JournalEntryId,
        user: UserId,
    ) -> Result<JournalEntry, LedgerError> {
        let mut entry = self.get(entry_id).await?;
        entry.post(user)?;

        let mut opening: HashMap<AccountId, Decimal> = HashMap::new();
        for line in &entry.lines {
            if opening.contains_key(&line.account_id) {
                continue;
            }
            if let Some(balance) = self.store.latest_balance(line.account_id).await? {
                opening.insert(line.account_id, balance);
            }
        }

        let rows = project_entry(&entry, &opening);
        self.store.post_entry(&entry, &rows).await?;

        info!(
            entry_number = %entry.entry_number,
            total_debit = %entry.total_debit,
            rows = rows.len(),
            "posted journal entry"
        );
        Ok(entry)
    }

    /// Flags a posted entry as reversed
    ///
    /// No contra-entry is created; callers needing the offsetting amounts
    /// post a separate entry referencing this one.
    pub async fn reverse(
        &self,
        entry_id: JournalEntryId,
        user: UserId,
    ) -> Result<JournalEntry, LedgerError> {
        let mut entry = self.get(entry_id).await?;
        entry.reverse(user)?;
        self.store.update_entry(&entry).await?;

        info!(entry_number = %entry.entry_number, "reversed journal entry");
        Ok(entry)
    }

    // -- general ledger --

    /// Rebuilds the running balances of an account from its row history
    ///
    /// Idempotent: applying it to an untampered history reproduces the
    /// stored balances. Returns the final balance.
    pub async fn recompute_running_balances(
        &self,
        account_id: AccountId,
    ) -> Result<Decimal, LedgerError> {
        let rows = self.store.rows_for_account(account_id).await?;
        let recomputed = recompute_running(rows);
        let balance = recomputed
            .last()
            .map(|r| r.running_balance)
            .unwrap_or(Decimal::ZERO);
        self.store
            .rewrite_running_balances(account_id, &recomputed)
            .await?;

        info!(%account_id, %balance, "recomputed running balances");
        Ok(balance)
    }

    /// The account balance as of a date (inclusive)
    ///
    /// Derived as the sum of debit minus credit over rows with
    /// transaction_date on or before `as_of`.
    pub async fn account_balance(
        &self,
        account_id: AccountId,
        as_of: NaiveDate,
    ) -> Result<Decimal, LedgerError> {
        let rows = self.store.rows_for_account(account_id).await?;
        Ok(rows
            .iter()
            .filter(|r| r.transaction_date <= as_of)
            .map(GeneralLedgerRow::signed_amount)
            .sum())
    }

    // -- trial balance --

    /// Generates and persists a trial balance snapshot for a period
    ///
    /// Only accounts with period activity or a non-zero opening balance
    /// are included; a period with no postings yields an empty, balanced
    /// snapshot. Deactivated accounts are not filtered out: one that
    /// still carries a balance or activity must stay in the report or the
    /// books would stop balancing. An unbalanced result is still persisted so the books can
    /// be inspected; `TrialBalance::verify` surfaces the failure.
    pub async fn generate_trial_balance(
        &self,
        company_id: CompanyId,
        period_start: NaiveDate,
        period_end: NaiveDate,
        user: UserId,
    ) -> Result<TrialBalance, LedgerError> {
        if period_start > period_end {
            return Err(LedgerError::validation(
                "period_start must not be after period_end",
            ));
        }

        let accounts = self.store.accounts_for_company(company_id).await?;
        let rows = self.store.rows_for_company(company_id).await?;

        let mut sections = Vec::new();
        for account in &accounts {
            let section = account_section(account, &rows, period_start, period_end);
            if !section.is_empty() {
                sections.push(section);
            }
        }

        let trial_balance = TrialBalance::new(
            company_id,
            period_start,
            period_end,
            self.config.base_currency,
            sections,
            user,
        );

        let summary = trial_balance.summary();
        if !summary.is_balanced {
            warn!(
                difference = %summary.difference,
                %period_start,
                %period_end,
                "generated trial balance does not balance"
            );
        }

        self.store.insert_trial_balance(&trial_balance).await?;
        info!(
            accounts = trial_balance.accounts.len(),
            balanced = summary.is_balanced,
            "generated trial balance"
        );
        Ok(trial_balance)
    }

    async fn next_entry_number(
        &self,
        company_id: CompanyId,
        date: NaiveDate,
    ) -> Result<String, LedgerError> {
        let period = date.format("%Y%m").to_string();
        let sequence = self.store.next_sequence(company_id, &period).await?;
        Ok(format!(
            "{}-{}-{:04}",
            self.config.entry_prefix, period, sequence
        ))
    }
}

fn build_line(input: &LineInput, currency: Currency) -> JournalEntryLine {
    let mut line = JournalEntryLine::debit(input.account_id, Money::new(input.debit, currency));
    line.credit_amount = Money::new(input.credit, currency);
    if let Some(description) = &input.description {
        line.description = Some(description.clone());
    }
    line
}

fn account_section(
    account: &Account,
    rows: &[GeneralLedgerRow],
    period_start: NaiveDate,
    period_end: NaiveDate,
) -> TrialBalanceAccount {
    let mut opening = Decimal::ZERO;
    let mut base_opening = Decimal::ZERO;
    let mut debit_total = Decimal::ZERO;
    let mut credit_total = Decimal::ZERO;
    let mut base_debit_total = Decimal::ZERO;
    let mut base_credit_total = Decimal::ZERO;

    for row in rows.iter().filter(|r| r.account_id == account.id) {
        if row.transaction_date < period_start {
            opening += row.signed_amount();
            base_opening += row.base_debit_amount.amount() - row.base_credit_amount.amount();
        } else if row.transaction_date <= period_end {
            debit_total += row.debit_amount.amount();
            credit_total += row.credit_amount.amount();
            base_debit_total += row.base_debit_amount.amount();
            base_credit_total += row.base_credit_amount.amount();
        }
    }

    TrialBalanceAccount {
        account_id: account.id,
        account_code: account.code.clone(),
        account_name: account.name.clone(),
        account_type: account.account_type,
        opening_balance: opening,
        debit_total,
        credit_total,
        closing_balance: opening + debit_total - credit_total,
        base_opening_balance: base_opening,
        base_debit_total,
        base_credit_total,
        base_closing_balance: base_opening + base_debit_total - base_credit_total,
    }
}

fn not_found_as(error: StoreError, map: impl FnOnce() -> LedgerError) -> LedgerError {
    if error.is_not_found() {
        map()
    } else {
        LedgerError::Store(error)
    }
}
