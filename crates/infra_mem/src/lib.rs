//! In-memory store adapters
//!
//! Lock-guarded reference implementations of the domain store ports.
//! Each adapter keeps its whole state behind one `RwLock`, which gives
//! the multi-row atomicity and per-reference serialization the ports
//! require. They back the integration tests and any embedded usage that
//! does not need durability.

pub mod autojournal;
pub mod budget;
pub mod ledger;

pub use autojournal::MemoryAutoJournalStore;
pub use budget::MemoryBudgetStore;
pub use ledger::MemoryLedgerStore;
