//! Auto-journal outcome log
//!
//! Every processed event gets one log row, keyed by (module, source id,
//! transaction type). Reprocessing updates the row in place, so failures
//! stay retryable without piling up duplicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::{BusinessEvent, SourceModule};
use core_kernel::{AutoJournalLogId, JournalEntryId};

/// Processing outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AutoJournalLogStatus {
    /// Processing started
    Pending,
    /// A draft entry was generated
    Success,
    /// Generation failed; the event may be retried
    Failed,
}

/// One event's processing record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoJournalLog {
    /// Unique identifier
    pub id: AutoJournalLogId,
    /// Originating module
    pub source_module: SourceModule,
    /// Source document identifier
    pub source_id: Uuid,
    /// Transaction type
    pub transaction_type: String,
    /// The generated entry, on success
    pub journal_entry_id: Option<JournalEntryId>,
    /// Outcome
    pub status: AutoJournalLogStatus,
    /// Failure message, if any
    pub message: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl AutoJournalLog {
    /// Creates a pending log row for an event
    pub fn pending(event: &BusinessEvent) -> Self {
        let now = Utc::now();
        Self {
            id: AutoJournalLogId::new_v7(),
            source_module: event.source_module,
            source_id: event.source_id,
            transaction_type: event.transaction_type.clone(),
            journal_entry_id: None,
            status: AutoJournalLogStatus::Pending,
            message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the row successful
    pub fn succeed(&mut self, entry_id: JournalEntryId) {
        self.status = AutoJournalLogStatus::Success;
        self.journal_entry_id = Some(entry_id);
        self.message = None;
        self.updated_at = Utc::now();
    }

    /// Marks the row failed with the error message
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = AutoJournalLogStatus::Failed;
        self.message = Some(message.into());
        self.updated_at = Utc::now();
    }

    /// The upsert key
    pub fn key(&self) -> (SourceModule, Uuid, &str) {
        (self.source_module, self.source_id, &self.transaction_type)
    }
}
