//! In-memory auto-journal store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use core_kernel::{DomainStore, StoreError};
use domain_autojournal::{AutoJournalConfig, AutoJournalLog, AutoJournalStore, SourceModule};

#[derive(Default)]
struct AutoJournalState {
    configs: HashMap<(SourceModule, String), AutoJournalConfig>,
    logs: HashMap<(SourceModule, Uuid, String), AutoJournalLog>,
}

/// In-memory `AutoJournalStore` adapter
#[derive(Default)]
pub struct MemoryAutoJournalStore {
    state: RwLock<AutoJournalState>,
}

impl MemoryAutoJournalStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainStore for MemoryAutoJournalStore {}

#[async_trait]
impl AutoJournalStore for MemoryAutoJournalStore {
    async fn upsert_config(&self, config: &AutoJournalConfig) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let key = (config.source_module, config.transaction_type.clone());
        let mut stored = config.clone();
        if let Some(existing) = state.configs.get(&key) {
            stored.id = existing.id;
            stored.created_at = existing.created_at;
        }
        state.configs.insert(key, stored);
        Ok(())
    }

    async fn get_config(
        &self,
        source_module: SourceModule,
        transaction_type: &str,
    ) -> Result<Option<AutoJournalConfig>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .configs
            .get(&(source_module, transaction_type.to_string()))
            .cloned())
    }

    async fn list_configs(&self) -> Result<Vec<AutoJournalConfig>, StoreError> {
        let state = self.state.read().await;
        let mut configs: Vec<AutoJournalConfig> = state.configs.values().cloned().collect();
        configs.sort_by(|a, b| {
            (a.source_module.as_str(), &a.transaction_type)
                .cmp(&(b.source_module.as_str(), &b.transaction_type))
        });
        Ok(configs)
    }

    async fn upsert_log(&self, log: &AutoJournalLog) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let key = (log.source_module, log.source_id, log.transaction_type.clone());
        let mut stored = log.clone();
        if let Some(existing) = state.logs.get(&key) {
            stored.id = existing.id;
            stored.created_at = existing.created_at;
        }
        state.logs.insert(key, stored);
        Ok(())
    }

    async fn get_log(
        &self,
        source_module: SourceModule,
        source_id: Uuid,
        transaction_type: &str,
    ) -> Result<Option<AutoJournalLog>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .logs
            .get(&(source_module, source_id, transaction_type.to_string()))
            .cloned())
    }
}
