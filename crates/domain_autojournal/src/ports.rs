//! Auto-journal store port

use async_trait::async_trait;
use uuid::Uuid;

use crate::event::SourceModule;
use crate::log::AutoJournalLog;
use crate::mapping::AutoJournalConfig;
use core_kernel::{DomainStore, StoreError};

/// Durable store for mapping configurations and outcome logs
#[async_trait]
pub trait AutoJournalStore: DomainStore {
    /// Inserts or replaces the configuration for its (module,
    /// transaction type) key
    async fn upsert_config(&self, config: &AutoJournalConfig) -> Result<(), StoreError>;

    /// The configuration for a (module, transaction type), if any
    async fn get_config(
        &self,
        source_module: SourceModule,
        transaction_type: &str,
    ) -> Result<Option<AutoJournalConfig>, StoreError>;

    /// All stored configurations
    async fn list_configs(&self) -> Result<Vec<AutoJournalConfig>, StoreError>;

    /// Inserts or updates the log row for its (module, source id,
    /// transaction type) key, preserving the original created_at
    async fn upsert_log(&self, log: &AutoJournalLog) -> Result<(), StoreError>;

    /// The log row for an event, if any
    async fn get_log(
        &self,
        source_module: SourceModule,
        source_id: Uuid,
        transaction_type: &str,
    ) -> Result<Option<AutoJournalLog>, StoreError>;
}
