//! Business events
//!
//! Other modules announce financial activity as events; the engine turns
//! them into draft journal entries using the configured mappings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use core_kernel::{CompanyId, Currency, ExchangeRate};

/// The module an event originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceModule {
    Sales,
    Purchase,
    Inventory,
    Payroll,
    CashBank,
    FixedAssets,
    Tax,
}

impl SourceModule {
    /// The wire name of the module
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceModule::Sales => "sales",
            SourceModule::Purchase => "purchase",
            SourceModule::Inventory => "inventory",
            SourceModule::Payroll => "payroll",
            SourceModule::CashBank => "cash_bank",
            SourceModule::FixedAssets => "fixed_assets",
            SourceModule::Tax => "tax",
        }
    }
}

impl std::fmt::Display for SourceModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A financial event emitted by another module
///
/// `amounts` carries the event's monetary figures keyed by field name
/// (e.g. "subtotal", "tax_amount"); mapping rules pick fields from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessEvent {
    /// Originating module
    pub source_module: SourceModule,
    /// Identifier of the source document
    pub source_id: Uuid,
    /// Transaction type within the module (e.g. "invoice_posted")
    pub transaction_type: String,
    /// Accounting date for the generated entry
    pub transaction_date: NaiveDate,
    /// Company
    pub company_id: CompanyId,
    /// Transaction currency
    pub currency: Currency,
    /// Rate to the base currency
    pub exchange_rate: ExchangeRate,
    /// Description for the generated entry
    pub description: String,
    /// Human-readable document reference
    pub reference: Option<String>,
    /// Monetary figures by field name, in the transaction currency
    pub amounts: BTreeMap<String, Decimal>,
}

impl BusinessEvent {
    /// The upsert key for outcome logging
    pub fn log_key(&self) -> (SourceModule, Uuid, &str) {
        (self.source_module, self.source_id, &self.transaction_type)
    }

    /// Looks up an amount field
    pub fn amount(&self, field: &str) -> Option<Decimal> {
        self.amounts.get(field).copied()
    }
}
