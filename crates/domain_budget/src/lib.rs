//! Budget Domain - Commitment and realization tracking
//!
//! Tracks earmarked and consumed budget per budget line. Commitments are
//! Active until Released or Realized; available budget is always derived,
//! never stored.

pub mod commitment;
pub mod error;
pub mod ports;
pub mod realization;
pub mod tracker;

pub use commitment::{BudgetCommitment, CommitmentStatus, Reference};
pub use error::BudgetError;
pub use ports::{BudgetStore, BudgetTotals};
pub use realization::{BudgetLine, BudgetRealization};
pub use tracker::{BudgetAvailability, BudgetTracker, NewCommitment};
