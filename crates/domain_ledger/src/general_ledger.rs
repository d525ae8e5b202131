//! General ledger projection
//!
//! Posting a journal entry appends one immutable row per line to the
//! general ledger, each carrying a running balance for its account.
//! Running balances are signed, debit-positive: running = previous +
//! debit - credit, with credit-normal accounts naturally going negative.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::entry::JournalEntry;
use core_kernel::{AccountId, CompanyId, Currency, ExchangeRate, JournalEntryId, LedgerRowId, Money};

/// One immutable row of the general ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralLedgerRow {
    /// Unique identifier
    pub id: LedgerRowId,
    /// Account this row belongs to
    pub account_id: AccountId,
    /// Journal entry that produced this row
    pub journal_entry_id: JournalEntryId,
    /// Entry number of the producing entry
    pub entry_number: String,
    /// Company
    pub company_id: CompanyId,
    /// Accounting date of the producing entry
    pub transaction_date: NaiveDate,
    /// Description (line description, falling back to the entry's)
    pub description: String,
    /// Debit amount in the transaction currency
    pub debit_amount: Money,
    /// Credit amount in the transaction currency
    pub credit_amount: Money,
    /// Signed running balance for the account after this row
    pub running_balance: Decimal,
    /// Transaction currency
    pub currency: Currency,
    /// Rate used for base conversion
    pub exchange_rate: ExchangeRate,
    /// Debit amount in the base currency
    pub base_debit_amount: Money,
    /// Credit amount in the base currency
    pub base_credit_amount: Money,
    /// Created timestamp, used as the tiebreaker for ordering
    pub created_at: DateTime<Utc>,
}

impl GeneralLedgerRow {
    /// The signed contribution of this row to its account balance
    pub fn signed_amount(&self) -> Decimal {
        self.debit_amount.amount() - self.credit_amount.amount()
    }
}

/// Projects a journal entry into general ledger rows
///
/// A pure fold over the entry's lines in line-number order: each row's
/// running balance is the previous balance for that account plus debit
/// minus credit. `opening_balances` supplies the latest balance per
/// account before this entry; missing accounts start at zero.
pub fn project_entry(
    entry: &JournalEntry,
    opening_balances: &HashMap<AccountId, Decimal>,
) -> Vec<GeneralLedgerRow> {
    let mut running: HashMap<AccountId, Decimal> = opening_balances.clone();
    let mut lines = entry.lines.clone();
    lines.sort_by_key(|l| l.line_number);

    let now = Utc::now();
    lines
        .into_iter()
        .map(|line| {
            let balance = running.entry(line.account_id).or_insert(Decimal::ZERO);
            *balance += line.debit_amount.amount() - line.credit_amount.amount();

            GeneralLedgerRow {
                id: LedgerRowId::new_v7(),
                account_id: line.account_id,
                journal_entry_id: entry.id,
                entry_number: entry.entry_number.clone(),
                company_id: entry.company_id,
                transaction_date: entry.entry_date,
                description: line
                    .description
                    .clone()
                    .unwrap_or_else(|| entry.description.clone()),
                debit_amount: line.debit_amount,
                credit_amount: line.credit_amount,
                running_balance: *balance,
                currency: entry.currency,
                exchange_rate: entry.exchange_rate,
                base_debit_amount: line.base_debit_amount,
                base_credit_amount: line.base_credit_amount,
                created_at: now,
            }
        })
        .collect()
}

/// Recomputes running balances over an account's full row history
///
/// Rows must already be in ledger order (transaction_date, created_at).
/// Returns the same rows with running balances rebuilt from zero. Applying
/// this to an untampered history reproduces the stored balances exactly.
pub fn recompute_running(mut rows: Vec<GeneralLedgerRow>) -> Vec<GeneralLedgerRow> {
    let mut balance = Decimal::ZERO;
    for row in &mut rows {
        balance += row.signed_amount();
        row.running_balance = balance;
    }
    rows
}
