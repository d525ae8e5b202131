//! Account mapping configuration
//!
//! A mapping describes, per (module, transaction type), which accounts to
//! debit and credit and which event amount field feeds each line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::SourceModule;
use core_kernel::{AccountId, AutoJournalConfigId};

/// Which side of the entry a rule produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntrySide {
    Debit,
    Credit,
}

/// One line-generation rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingRule {
    /// Account to debit or credit
    pub account_id: AccountId,
    /// Side of the entry
    pub side: EntrySide,
    /// Event amount field feeding this line
    pub amount_field: String,
    /// Optional line description
    pub description: Option<String>,
}

impl MappingRule {
    /// Creates a debit rule
    pub fn debit(account_id: AccountId, amount_field: impl Into<String>) -> Self {
        Self {
            account_id,
            side: EntrySide::Debit,
            amount_field: amount_field.into(),
            description: None,
        }
    }

    /// Creates a credit rule
    pub fn credit(account_id: AccountId, amount_field: impl Into<String>) -> Self {
        Self {
            account_id,
            side: EntrySide::Credit,
            amount_field: amount_field.into(),
            description: None,
        }
    }

    /// Sets the line description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The rule set applied to matching events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountMapping {
    /// Rules, applied in order
    pub rules: Vec<MappingRule>,
    /// Optional description of the mapping
    pub description: Option<String>,
}

/// Stored mapping configuration, one per (module, transaction type)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoJournalConfig {
    /// Unique identifier
    pub id: AutoJournalConfigId,
    /// Module the mapping applies to
    pub source_module: SourceModule,
    /// Transaction type the mapping applies to
    pub transaction_type: String,
    /// The rule set
    pub mapping: AccountMapping,
    /// Whether events should be processed
    pub is_active: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl AutoJournalConfig {
    /// Creates an active configuration
    pub fn new(
        source_module: SourceModule,
        transaction_type: impl Into<String>,
        rules: Vec<MappingRule>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AutoJournalConfigId::new_v7(),
            source_module,
            transaction_type: transaction_type.into(),
            mapping: AccountMapping {
                rules,
                description: None,
            },
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Switches the mapping off
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    /// The upsert key
    pub fn key(&self) -> (SourceModule, &str) {
        (self.source_module, &self.transaction_type)
    }
}
