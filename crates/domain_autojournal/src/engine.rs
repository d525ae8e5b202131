//! Auto-journal engine
//!
//! Turns business events into draft journal entries through the
//! configured account mappings. Generated entries are never auto-posted;
//! an accountant reviews and posts them through the normal flow.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::AutoJournalError;
use crate::event::{BusinessEvent, SourceModule};
use crate::log::AutoJournalLog;
use crate::mapping::{AutoJournalConfig, EntrySide};
use crate::ports::AutoJournalStore;
use domain_ledger::{
    EntrySource, JournalEntry, JournalService, LedgerStore, LineInput, NewJournalEntry,
};

/// Generates draft journal entries from business events
pub struct AutoJournalEngine<A: AutoJournalStore, L: LedgerStore> {
    store: Arc<A>,
    journal: Arc<JournalService<L>>,
}

impl<A: AutoJournalStore, L: LedgerStore> AutoJournalEngine<A, L> {
    /// Creates an engine over the config store and the journal service
    pub fn new(store: Arc<A>, journal: Arc<JournalService<L>>) -> Self {
        Self { store, journal }
    }

    /// Stores a mapping configuration, replacing any existing one for the
    /// same (module, transaction type)
    pub async fn configure(
        &self,
        config: AutoJournalConfig,
    ) -> Result<AutoJournalConfig, AutoJournalError> {
        self.store.upsert_config(&config).await?;
        info!(
            source_module = %config.source_module,
            transaction_type = %config.transaction_type,
            rules = config.mapping.rules.len(),
            "stored auto-journal mapping"
        );
        Ok(config)
    }

    /// Resolves the active mapping for a (module, transaction type)
    pub async fn resolve(
        &self,
        source_module: SourceModule,
        transaction_type: &str,
    ) -> Result<AutoJournalConfig, AutoJournalError> {
        let config = self
            .store
            .get_config(source_module, transaction_type)
            .await?
            .ok_or_else(|| AutoJournalError::NoMappingConfigured {
                source_module: source_module.to_string(),
                transaction_type: transaction_type.to_string(),
            })?;
        if !config.is_active {
            return Err(AutoJournalError::MappingInactive {
                source_module: source_module.to_string(),
                transaction_type: transaction_type.to_string(),
            });
        }
        Ok(config)
    }

    /// Generates and persists a draft entry for an event
    ///
    /// Rules whose amount field is missing from the event or zero are
    /// skipped; if nothing remains the generation is empty and fails.
    pub async fn generate_entry(
        &self,
        event: &BusinessEvent,
    ) -> Result<JournalEntry, AutoJournalError> {
        let config = self
            .resolve(event.source_module, &event.transaction_type)
            .await?;
        let request = build_request(&config, event)?;
        let entry = self.journal.create_with_lines(request).await?;
        Ok(entry)
    }

    /// Processes an event end to end, recording the outcome
    ///
    /// Upserts a Pending log row before generating, then flips it to
    /// Success (with the entry id) or Failed (with the error message).
    /// The log row is keyed by the event, so retries update it in place.
    pub async fn process_event(
        &self,
        event: &BusinessEvent,
    ) -> Result<JournalEntry, AutoJournalError> {
        let mut log = AutoJournalLog::pending(event);
        self.store.upsert_log(&log).await?;

        match self.generate_entry(event).await {
            Ok(entry) => {
                log.succeed(entry.id);
                self.store.upsert_log(&log).await?;
                info!(
                    source_module = %event.source_module,
                    transaction_type = %event.transaction_type,
                    entry_number = %entry.entry_number,
                    "generated draft entry from event"
                );
                Ok(entry)
            }
            Err(error) => {
                log.fail(error.to_string());
                self.store.upsert_log(&log).await?;
                warn!(
                    source_module = %event.source_module,
                    transaction_type = %event.transaction_type,
                    error = %error,
                    "failed to generate entry from event"
                );
                Err(error)
            }
        }
    }
}

fn build_request(
    config: &AutoJournalConfig,
    event: &BusinessEvent,
) -> Result<NewJournalEntry, AutoJournalError> {
    let mut lines = Vec::new();
    for rule in &config.mapping.rules {
        let amount = match event.amount(&rule.amount_field) {
            Some(amount) if !amount.is_zero() => amount,
            _ => continue,
        };
        let mut line = match rule.side {
            EntrySide::Debit => LineInput::debit(rule.account_id, amount),
            EntrySide::Credit => LineInput::credit(rule.account_id, amount),
        };
        line.description = rule.description.clone();
        lines.push(line);
    }

    if lines.is_empty() {
        return Err(AutoJournalError::EmptyGeneration);
    }

    Ok(NewJournalEntry {
        company_id: event.company_id,
        entry_date: event.transaction_date,
        description: event.description.clone(),
        currency: event.currency,
        exchange_rate: Some(event.exchange_rate),
        source: Some(EntrySource {
            module: event.source_module.to_string(),
            source_id: event.source_id,
            transaction_type: event.transaction_type.clone(),
        }),
        lines,
    })
}
