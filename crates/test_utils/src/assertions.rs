//! Custom test assertions
//!
//! Domain assertions with more useful failure messages than bare
//! `assert_eq!`.

use core_kernel::Money;
use domain_ledger::{JournalEntry, TrialBalance};

/// Asserts two Money values agree to the minor unit
pub fn assert_money_eq(actual: &Money, expected: &Money) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );
    assert_eq!(
        actual.minor_units(),
        expected.minor_units(),
        "amounts differ: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts an entry balances and passes validation
pub fn assert_entry_balanced(entry: &JournalEntry) {
    assert!(
        entry.is_balanced(),
        "entry {} is unbalanced: debits={}, credits={}",
        entry.entry_number,
        entry.total_debit,
        entry.total_credit
    );
    if let Err(error) = entry.validate() {
        panic!("entry {} failed validation: {}", entry.entry_number, error);
    }
}

/// Asserts a trial balance satisfies the double-entry identity
pub fn assert_books_balanced(trial_balance: &TrialBalance) {
    let summary = trial_balance.summary();
    assert!(
        summary.is_balanced,
        "books are unbalanced: debit-normal closings={}, credit-normal closings={}, difference={}",
        summary.debit_normal_closings,
        summary.credit_normal_closings,
        summary.difference
    );
}
