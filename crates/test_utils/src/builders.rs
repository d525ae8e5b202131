//! Test data builders
//!
//! Builders with sensible defaults so tests only specify the fields they
//! care about.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use uuid::Uuid;

use core_kernel::{
    AccountId, BudgetId, CompanyId, Currency, ExchangeRate, Money, UserId,
};
use domain_autojournal::{BusinessEvent, SourceModule};
use domain_budget::{NewCommitment, Reference};
use domain_ledger::{LineInput, NewJournalEntry};

use crate::fixtures::DateFixtures;

/// Builder for `NewJournalEntry` requests
pub struct EntryRequestBuilder {
    company_id: CompanyId,
    entry_date: NaiveDate,
    description: String,
    currency: Currency,
    exchange_rate: Option<ExchangeRate>,
    lines: Vec<LineInput>,
}

impl EntryRequestBuilder {
    /// Creates a builder with defaults
    pub fn new(company_id: CompanyId) -> Self {
        Self {
            company_id,
            entry_date: DateFixtures::posting_date(),
            description: "Test entry".to_string(),
            currency: Currency::IDR,
            exchange_rate: None,
            lines: Vec::new(),
        }
    }

    /// Sets the accounting date
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.entry_date = date;
        self
    }

    /// Sets the description
    pub fn describing(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the transaction currency
    pub fn in_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Sets the exchange rate
    pub fn at_rate(mut self, rate: ExchangeRate) -> Self {
        self.exchange_rate = Some(rate);
        self
    }

    /// Adds a debit line
    pub fn debit(mut self, account_id: AccountId, amount: Decimal) -> Self {
        self.lines.push(LineInput::debit(account_id, amount));
        self
    }

    /// Adds a credit line
    pub fn credit(mut self, account_id: AccountId, amount: Decimal) -> Self {
        self.lines.push(LineInput::credit(account_id, amount));
        self
    }

    /// Builds the request
    pub fn build(self) -> NewJournalEntry {
        NewJournalEntry {
            company_id: self.company_id,
            entry_date: self.entry_date,
            description: self.description,
            currency: self.currency,
            exchange_rate: self.exchange_rate,
            source: None,
            lines: self.lines,
        }
    }
}

/// Builder for `NewCommitment` requests
pub struct CommitmentBuilder {
    budget_id: BudgetId,
    account_id: AccountId,
    amount: Money,
    reference: Reference,
    description: Option<String>,
    committed_by: UserId,
}

impl CommitmentBuilder {
    /// Creates a builder with defaults
    pub fn new(budget_id: BudgetId, account_id: AccountId, amount: Money) -> Self {
        Self {
            budget_id,
            account_id,
            amount,
            reference: Reference::new("purchase_order", Uuid::new_v4(), "PO-TEST-1"),
            description: None,
            committed_by: UserId::new(),
        }
    }

    /// Sets the source reference
    pub fn referencing(mut self, reference: Reference) -> Self {
        self.reference = reference;
        self
    }

    /// Sets the description
    pub fn describing(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the committing user
    pub fn by(mut self, user: UserId) -> Self {
        self.committed_by = user;
        self
    }

    /// Builds the request
    pub fn build(self) -> NewCommitment {
        NewCommitment {
            budget_id: self.budget_id,
            account_id: self.account_id,
            amount: self.amount,
            reference: self.reference,
            description: self.description,
            committed_by: self.committed_by,
        }
    }
}

/// Builder for `BusinessEvent`s
pub struct EventBuilder {
    source_module: SourceModule,
    source_id: Uuid,
    transaction_type: String,
    transaction_date: NaiveDate,
    company_id: CompanyId,
    currency: Currency,
    exchange_rate: ExchangeRate,
    description: String,
    reference: Option<String>,
    amounts: BTreeMap<String, Decimal>,
}

impl EventBuilder {
    /// Creates a builder with defaults
    pub fn new(company_id: CompanyId, source_module: SourceModule) -> Self {
        Self {
            source_module,
            source_id: Uuid::new_v4(),
            transaction_type: "invoice_posted".to_string(),
            transaction_date: DateFixtures::posting_date(),
            company_id,
            currency: Currency::IDR,
            exchange_rate: ExchangeRate::unity(),
            description: "Test event".to_string(),
            reference: None,
            amounts: BTreeMap::new(),
        }
    }

    /// Sets the transaction type
    pub fn of_type(mut self, transaction_type: impl Into<String>) -> Self {
        self.transaction_type = transaction_type.into();
        self
    }

    /// Sets the source document id
    pub fn from_document(mut self, source_id: Uuid) -> Self {
        self.source_id = source_id;
        self
    }

    /// Sets the accounting date
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.transaction_date = date;
        self
    }

    /// Sets currency and rate
    pub fn in_currency(mut self, currency: Currency, rate: ExchangeRate) -> Self {
        self.currency = currency;
        self.exchange_rate = rate;
        self
    }

    /// Adds an amount field
    pub fn amount(mut self, field: impl Into<String>, value: Decimal) -> Self {
        self.amounts.insert(field.into(), value);
        self
    }

    /// Builds the event
    pub fn build(self) -> BusinessEvent {
        BusinessEvent {
            source_module: self.source_module,
            source_id: self.source_id,
            transaction_type: self.transaction_type,
            transaction_date: self.transaction_date,
            company_id: self.company_id,
            currency: self.currency,
            exchange_rate: self.exchange_rate,
            description: self.description,
            reference: self.reference,
            amounts: self.amounts,
        }
    }
}
