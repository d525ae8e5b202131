//! Trial balance snapshots
//!
//! A trial balance captures, per account, the opening balance, period
//! activity, and closing balance for a date range. Closing balances are
//! signed and debit-positive, so a balanced book has closings summing to
//! zero in minor units.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::AccountType;
use crate::error::LedgerError;
use core_kernel::{AccountId, CompanyId, Currency, Money, TrialBalanceId, UserId};

/// One account's section of a trial balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceAccount {
    /// Account identifier
    pub account_id: AccountId,
    /// Account code
    pub account_code: String,
    /// Account name
    pub account_name: String,
    /// Classification
    pub account_type: AccountType,
    /// Signed balance before the period (debit-positive)
    pub opening_balance: Decimal,
    /// Total debits during the period
    pub debit_total: Decimal,
    /// Total credits during the period
    pub credit_total: Decimal,
    /// opening + debits - credits
    pub closing_balance: Decimal,
    /// Opening balance in the base currency
    pub base_opening_balance: Decimal,
    /// Period debits in the base currency
    pub base_debit_total: Decimal,
    /// Period credits in the base currency
    pub base_credit_total: Decimal,
    /// Closing balance in the base currency
    pub base_closing_balance: Decimal,
}

impl TrialBalanceAccount {
    /// Returns true if this account had no activity and no balance
    pub fn is_empty(&self) -> bool {
        self.opening_balance.is_zero()
            && self.debit_total.is_zero()
            && self.credit_total.is_zero()
    }
}

/// Aggregate totals for a trial balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceSummary {
    /// Sum of all period debits
    pub total_debits: Decimal,
    /// Sum of all period credits
    pub total_credits: Decimal,
    /// Sum of closing balances of debit-normal accounts
    pub debit_normal_closings: Decimal,
    /// Sum of closing balances of credit-normal accounts, as a positive
    /// credit-side magnitude
    pub credit_normal_closings: Decimal,
    /// Signed difference between the two sides
    pub difference: Decimal,
    /// Whether the books balance, compared in minor units
    pub is_balanced: bool,
}

/// A generated trial balance snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Unique identifier
    pub id: TrialBalanceId,
    /// Company
    pub company_id: CompanyId,
    /// First day of the period, inclusive
    pub period_start: NaiveDate,
    /// Last day of the period, inclusive
    pub period_end: NaiveDate,
    /// Base currency the balances are stated in
    pub base_currency: Currency,
    /// Per-account sections, ordered by account code
    pub accounts: Vec<TrialBalanceAccount>,
    /// Who requested the generation
    pub generated_by: UserId,
    /// When the snapshot was generated
    pub generated_at: DateTime<Utc>,
}

impl TrialBalance {
    /// Creates a snapshot from per-account sections
    pub fn new(
        company_id: CompanyId,
        period_start: NaiveDate,
        period_end: NaiveDate,
        base_currency: Currency,
        mut accounts: Vec<TrialBalanceAccount>,
        generated_by: UserId,
    ) -> Self {
        accounts.sort_by(|a, b| a.account_code.cmp(&b.account_code));
        Self {
            id: TrialBalanceId::new_v7(),
            company_id,
            period_start,
            period_end,
            base_currency,
            accounts,
            generated_by,
            generated_at: Utc::now(),
        }
    }

    /// Computes the aggregate totals
    ///
    /// The balance test is: sum of debit-normal closing balances equals
    /// the credit-side magnitude of credit-normal closing balances, both
    /// rounded to the base currency's minor units. An empty account list
    /// is balanced.
    pub fn summary(&self) -> TrialBalanceSummary {
        let mut total_debits = Decimal::ZERO;
        let mut total_credits = Decimal::ZERO;
        let mut debit_normal = Decimal::ZERO;
        let mut credit_normal = Decimal::ZERO;

        for account in &self.accounts {
            total_debits += account.debit_total;
            total_credits += account.credit_total;
            if account.account_type.is_debit_normal() {
                debit_normal += account.closing_balance;
            } else {
                // closing is debit-positive; flip to a credit magnitude
                credit_normal -= account.closing_balance;
            }
        }

        let difference = debit_normal - credit_normal;
        let is_balanced = Money::new(difference, self.base_currency)
            .minor_units()
            == 0;

        TrialBalanceSummary {
            total_debits,
            total_credits,
            debit_normal_closings: debit_normal,
            credit_normal_closings: credit_normal,
            difference,
            is_balanced,
        }
    }

    /// Verifies the double-entry identity
    ///
    /// # Errors
    ///
    /// `BooksUnbalanced` with the signed difference when the two sides
    /// disagree.
    pub fn verify(&self) -> Result<(), LedgerError> {
        let summary = self.summary();
        if !summary.is_balanced {
            return Err(LedgerError::BooksUnbalanced {
                difference: summary.difference,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn section(
        code: &str,
        account_type: AccountType,
        opening: Decimal,
        debits: Decimal,
        credits: Decimal,
    ) -> TrialBalanceAccount {
        TrialBalanceAccount {
            account_id: AccountId::new(),
            account_code: code.to_string(),
            account_name: code.to_string(),
            account_type,
            opening_balance: opening,
            debit_total: debits,
            credit_total: credits,
            closing_balance: opening + debits - credits,
            base_opening_balance: opening,
            base_debit_total: debits,
            base_credit_total: credits,
            base_closing_balance: opening + debits - credits,
        }
    }

    fn snapshot(accounts: Vec<TrialBalanceAccount>) -> TrialBalance {
        TrialBalance::new(
            CompanyId::new(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            Currency::IDR,
            accounts,
            UserId::new(),
        )
    }

    #[test]
    fn balanced_books_verify() {
        // Cash debited 100, revenue credited 100
        let tb = snapshot(vec![
            section("1000", AccountType::Asset, dec!(0), dec!(100), dec!(0)),
            section("4000", AccountType::Revenue, dec!(0), dec!(0), dec!(100)),
        ]);

        let summary = tb.summary();
        assert!(summary.is_balanced);
        assert_eq!(summary.debit_normal_closings, dec!(100));
        assert_eq!(summary.credit_normal_closings, dec!(100));
        assert!(tb.verify().is_ok());
    }

    #[test]
    fn unbalanced_books_report_difference() {
        let tb = snapshot(vec![
            section("1000", AccountType::Asset, dec!(0), dec!(100), dec!(0)),
            section("4000", AccountType::Revenue, dec!(0), dec!(0), dec!(90)),
        ]);

        match tb.verify() {
            Err(LedgerError::BooksUnbalanced { difference }) => {
                assert_eq!(difference, dec!(10));
            }
            other => panic!("expected BooksUnbalanced, got {:?}", other),
        }
    }

    #[test]
    fn empty_period_is_balanced() {
        let tb = snapshot(Vec::new());
        assert!(tb.summary().is_balanced);
        assert!(tb.verify().is_ok());
    }

    #[test]
    fn accounts_are_sorted_by_code() {
        let tb = snapshot(vec![
            section("4000", AccountType::Revenue, dec!(0), dec!(0), dec!(50)),
            section("1000", AccountType::Asset, dec!(0), dec!(50), dec!(0)),
        ]);
        assert_eq!(tb.accounts[0].account_code, "1000");
        assert_eq!(tb.accounts[1].account_code, "4000");
    }

    #[test]
    fn opening_balances_carry_into_closings() {
        // opening 200 on cash matched by opening -200 on equity
        let tb = snapshot(vec![
            section("1000", AccountType::Asset, dec!(200), dec!(0), dec!(0)),
            section("3000", AccountType::Equity, dec!(-200), dec!(0), dec!(0)),
        ]);
        let summary = tb.summary();
        assert!(summary.is_balanced);
        assert_eq!(summary.debit_normal_closings, dec!(200));
        assert_eq!(summary.credit_normal_closings, dec!(200));
    }
}
