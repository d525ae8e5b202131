//! Auto-Journal Domain - Event-driven entry generation
//!
//! Maps business events from other modules (sales, purchasing, payroll,
//! ...) to draft journal entries via configurable account mappings, and
//! keeps a retryable outcome log per event.

pub mod engine;
pub mod error;
pub mod event;
pub mod log;
pub mod mapping;
pub mod ports;

pub use engine::AutoJournalEngine;
pub use error::AutoJournalError;
pub use event::{BusinessEvent, SourceModule};
pub use log::{AutoJournalLog, AutoJournalLogStatus};
pub use mapping::{AccountMapping, AutoJournalConfig, EntrySide, MappingRule};
pub use ports::AutoJournalStore;
