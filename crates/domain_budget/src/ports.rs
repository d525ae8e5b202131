//! Budget store port

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::commitment::BudgetCommitment;
use crate::realization::BudgetRealization;
use core_kernel::{AccountId, BudgetId, CommitmentId, DomainStore, StoreError};

/// Sums of outstanding and consumed budget for one budget line, read in
/// a single snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetTotals {
    /// Sum of ACTIVE commitment amounts
    pub committed: Decimal,
    /// Sum of all realization amounts
    pub realized: Decimal,
}

/// Durable store for commitments and realizations
#[async_trait]
pub trait BudgetStore: DomainStore {
    /// Persists a new commitment
    ///
    /// Fails with Conflict when an Active or Realized commitment already
    /// exists for the same (reference_type, reference_id); concurrent
    /// inserts for one reference must be serialized so exactly one wins.
    /// Released commitments do not block re-commitment.
    async fn insert_commitment(&self, commitment: &BudgetCommitment) -> Result<(), StoreError>;

    /// Replaces a stored commitment
    async fn update_commitment(&self, commitment: &BudgetCommitment) -> Result<(), StoreError>;

    /// Loads a commitment by id
    async fn get_commitment(&self, id: CommitmentId) -> Result<BudgetCommitment, StoreError>;

    /// The commitment currently blocking a reference, if any
    async fn commitment_by_reference(
        &self,
        reference_type: &str,
        reference_id: Uuid,
    ) -> Result<Option<BudgetCommitment>, StoreError>;

    /// All commitments for a budget line
    async fn commitments_for_line(
        &self,
        budget_id: BudgetId,
        account_id: AccountId,
    ) -> Result<Vec<BudgetCommitment>, StoreError>;

    /// Atomically inserts the realization and flips the commitment to
    /// Realized; either both land or neither does
    async fn insert_realization_and_mark_realized(
        &self,
        realization: &BudgetRealization,
        commitment: &BudgetCommitment,
    ) -> Result<(), StoreError>;

    /// Inserts a direct realization with no commitment
    async fn insert_realization(&self, realization: &BudgetRealization)
        -> Result<(), StoreError>;

    /// All realizations for a budget line
    async fn realizations_for_line(
        &self,
        budget_id: BudgetId,
        account_id: AccountId,
    ) -> Result<Vec<BudgetRealization>, StoreError>;

    /// Committed and realized totals for a budget line, from one
    /// consistent snapshot
    async fn committed_and_realized_totals(
        &self,
        budget_id: BudgetId,
        account_id: AccountId,
    ) -> Result<BudgetTotals, StoreError>;
}
