//! Pre-built test data
//!
//! Common fixtures for ledger tests: money shorthands, dates, and a
//! small standard chart of accounts.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use core_kernel::{CompanyId, Currency, Money};
use domain_ledger::{Account, AccountType};

/// Money shorthands
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// IDR amount
    pub fn idr(amount: Decimal) -> Money {
        Money::new(amount, Currency::IDR)
    }

    /// USD amount
    pub fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }
}

/// Date shorthands
pub struct DateFixtures;

impl DateFixtures {
    /// A mid-period posting date
    pub fn posting_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
    }

    /// Start of the standard test period
    pub fn period_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    /// End of the standard test period
    pub fn period_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date")
    }

    /// A date before the standard period
    pub fn prior_period_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).expect("valid date")
    }
}

/// A small standard chart of accounts for one test company
#[derive(Debug, Clone)]
pub struct StandardChart {
    pub company_id: CompanyId,
    pub cash: Account,
    pub receivable: Account,
    pub tax_payable: Account,
    pub revenue: Account,
    pub expense: Account,
}

impl StandardChart {
    /// Builds the chart for a fresh company
    pub fn new() -> Self {
        let company_id = CompanyId::new();
        Self {
            company_id,
            cash: Account::new(company_id, "1000", "Cash", AccountType::Asset),
            receivable: Account::new(
                company_id,
                "1200",
                "Accounts Receivable",
                AccountType::Asset,
            ),
            tax_payable: Account::new(company_id, "2100", "Tax Payable", AccountType::Liability),
            revenue: Account::new(company_id, "4000", "Sales Revenue", AccountType::Revenue),
            expense: Account::new(company_id, "5000", "Operating Expense", AccountType::Expense),
        }
    }

    /// All accounts in code order
    pub fn accounts(&self) -> Vec<Account> {
        vec![
            self.cash.clone(),
            self.receivable.clone(),
            self.tax_payable.clone(),
            self.revenue.clone(),
            self.expense.clone(),
        ]
    }
}

impl Default for StandardChart {
    fn default() -> Self {
        Self::new()
    }
}
