//! Ledger domain scenario tests
//!
//! Exercises the journal entry lifecycle, general ledger projection and
//! trial balance identity without a store; store-backed flows are covered
//! by the adapter crate's integration tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use core_kernel::{AccountId, CompanyId, Currency, ExchangeRate, Money, UserId};
use domain_ledger::{
    project_entry, Account, AccountType, ChartOfAccounts, EntryStatus, JournalEntry,
    JournalEntryLine, LedgerError, TrialBalance, TrialBalanceAccount,
};

struct Books {
    company_id: CompanyId,
    cash: Account,
    revenue: Account,
    expense: Account,
}

fn setup_books() -> (ChartOfAccounts, Books) {
    let company_id = CompanyId::new();
    let cash = Account::new(company_id, "1000", "Cash", AccountType::Asset);
    let revenue = Account::new(company_id, "4000", "Sales Revenue", AccountType::Revenue);
    let expense = Account::new(company_id, "5000", "Operating Expense", AccountType::Expense);

    let mut chart = ChartOfAccounts::new();
    chart.add(cash.clone()).unwrap();
    chart.add(revenue.clone()).unwrap();
    chart.add(expense.clone()).unwrap();

    (
        chart,
        Books {
            company_id,
            cash,
            revenue,
            expense,
        },
    )
}

fn balanced_entry(books: &Books, date: NaiveDate, amount: Decimal) -> JournalEntry {
    let mut entry = JournalEntry::new(
        books.company_id,
        format!("JE-{}-0001", date.format("%Y%m")),
        date,
        "Cash sale",
        Currency::IDR,
        Currency::IDR,
    );
    entry
        .add_line(JournalEntryLine::debit(
            books.cash.id,
            Money::new(amount, Currency::IDR),
        ))
        .unwrap();
    entry
        .add_line(JournalEntryLine::credit(
            books.revenue.id,
            Money::new(amount, Currency::IDR),
        ))
        .unwrap();
    entry
}

fn section_from_rows(
    account: &Account,
    rows: &[domain_ledger::GeneralLedgerRow],
) -> TrialBalanceAccount {
    let mut debit_total = Decimal::ZERO;
    let mut credit_total = Decimal::ZERO;
    for row in rows.iter().filter(|r| r.account_id == account.id) {
        debit_total += row.debit_amount.amount();
        credit_total += row.credit_amount.amount();
    }
    TrialBalanceAccount {
        account_id: account.id,
        account_code: account.code.clone(),
        account_name: account.name.clone(),
        account_type: account.account_type,
        opening_balance: Decimal::ZERO,
        debit_total,
        credit_total,
        closing_balance: debit_total - credit_total,
        base_opening_balance: Decimal::ZERO,
        base_debit_total: debit_total,
        base_credit_total: credit_total,
        base_closing_balance: debit_total - credit_total,
    }
}

#[test]
fn posting_a_sale_moves_both_balances() {
    let (_, books) = setup_books();
    let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let mut entry = balanced_entry(&books, date, dec!(100));

    entry.post(UserId::new()).unwrap();
    let rows = project_entry(&entry, &HashMap::new());

    let cash_row = rows.iter().find(|r| r.account_id == books.cash.id).unwrap();
    let revenue_row = rows
        .iter()
        .find(|r| r.account_id == books.revenue.id)
        .unwrap();

    assert_eq!(cash_row.running_balance, dec!(100));
    assert_eq!(revenue_row.running_balance, dec!(-100));
    assert_eq!(cash_row.entry_number, entry.entry_number);
}

#[test]
fn unbalanced_entry_never_reaches_the_ledger() {
    let (_, books) = setup_books();
    let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let mut entry = JournalEntry::new(
        books.company_id,
        "JE-202503-0002",
        date,
        "Fat-fingered sale",
        Currency::IDR,
        Currency::IDR,
    );
    entry
        .add_line(JournalEntryLine::debit(
            books.cash.id,
            Money::new(dec!(100), Currency::IDR),
        ))
        .unwrap();
    entry
        .add_line(JournalEntryLine::credit(
            books.revenue.id,
            Money::new(dec!(90), Currency::IDR),
        ))
        .unwrap();

    assert!(matches!(
        entry.post(UserId::new()),
        Err(LedgerError::Unbalanced { .. })
    ));
    assert_eq!(entry.status, EntryStatus::Draft);
}

#[test]
fn lifecycle_runs_forward_only() {
    let (_, books) = setup_books();
    let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
    let mut entry = balanced_entry(&books, date, dec!(250));
    let user = UserId::new();

    entry.post(user).unwrap();
    entry.reverse(user).unwrap();

    // terminal state: nothing else is allowed
    assert!(matches!(
        entry.post(user),
        Err(LedgerError::InvalidTransition { .. })
    ));
    assert!(matches!(
        entry.reverse(user),
        Err(LedgerError::InvalidTransition { .. })
    ));
    assert!(matches!(
        entry.remove_line(entry.lines[0].id),
        Err(LedgerError::EntryLocked(_))
    ));
}

#[test]
fn foreign_currency_entry_carries_base_amounts_into_rows() {
    let (_, books) = setup_books();
    let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
    let mut entry = JournalEntry::new(
        books.company_id,
        "JE-202504-0001",
        date,
        "USD consulting invoice",
        Currency::USD,
        Currency::IDR,
    );
    entry
        .add_line(JournalEntryLine::debit(
            books.expense.id,
            Money::new(dec!(20), Currency::USD),
        ))
        .unwrap();
    entry
        .add_line(JournalEntryLine::credit(
            books.cash.id,
            Money::new(dec!(20), Currency::USD),
        ))
        .unwrap();
    entry
        .set_exchange_rate(ExchangeRate::new(dec!(16000)).unwrap())
        .unwrap();
    entry.post(UserId::new()).unwrap();

    let rows = project_entry(&entry, &HashMap::new());
    let expense_row = rows
        .iter()
        .find(|r| r.account_id == books.expense.id)
        .unwrap();
    assert_eq!(expense_row.debit_amount.amount(), dec!(20));
    assert_eq!(expense_row.base_debit_amount.amount(), dec!(320000));
    assert_eq!(expense_row.base_debit_amount.currency(), Currency::IDR);
}

#[test]
fn trial_balance_identity_holds_over_many_entries() {
    let (chart, books) = setup_books();
    let user = UserId::new();
    let mut all_rows = Vec::new();
    let mut balances: HashMap<AccountId, Decimal> = HashMap::new();

    for (day, amount) in [(1, dec!(100)), (5, dec!(75)), (9, dec!(1250.50))] {
        let date = NaiveDate::from_ymd_opt(2025, 5, day).unwrap();
        let mut entry = balanced_entry(&books, date, amount);
        entry.post(user).unwrap();
        let rows = project_entry(&entry, &balances);
        for row in &rows {
            balances.insert(row.account_id, row.running_balance);
        }
        all_rows.extend(rows);
    }

    let sections: Vec<TrialBalanceAccount> = chart
        .active_accounts()
        .into_iter()
        .map(|account| section_from_rows(account, &all_rows))
        .filter(|s| !s.is_empty())
        .collect();

    let tb = TrialBalance::new(
        books.company_id,
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
        Currency::IDR,
        sections,
        user,
    );

    let summary = tb.summary();
    assert!(summary.is_balanced);
    assert_eq!(summary.total_debits, summary.total_credits);
    // expense account had no activity, so only cash and revenue appear
    assert_eq!(tb.accounts.len(), 2);
    assert!(tb.verify().is_ok());
}
