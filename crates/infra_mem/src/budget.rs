//! In-memory budget store
//!
//! Reference adapter for `BudgetStore`. The reference index only holds
//! blocking commitments (Active or Realized); releasing a commitment
//! frees its reference for re-commitment.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use core_kernel::{AccountId, BudgetId, CommitmentId, DomainStore, StoreError};
use domain_budget::{
    BudgetCommitment, BudgetRealization, BudgetStore, BudgetTotals, CommitmentStatus,
};

#[derive(Default)]
struct BudgetState {
    commitments: HashMap<CommitmentId, BudgetCommitment>,
    reference_index: HashMap<(String, Uuid), CommitmentId>,
    realizations: Vec<BudgetRealization>,
}

/// In-memory `BudgetStore` adapter
#[derive(Default)]
pub struct MemoryBudgetStore {
    state: RwLock<BudgetState>,
}

impl MemoryBudgetStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainStore for MemoryBudgetStore {}

#[async_trait]
impl BudgetStore for MemoryBudgetStore {
    async fn insert_commitment(&self, commitment: &BudgetCommitment) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let key = (
            commitment.reference.reference_type.clone(),
            commitment.reference.reference_id,
        );
        // the index never holds Released commitments, so any hit blocks
        if state.reference_index.contains_key(&key) {
            return Err(StoreError::conflict(format!(
                "reference {}/{} already committed",
                key.0, key.1
            )));
        }
        state.reference_index.insert(key, commitment.id);
        state.commitments.insert(commitment.id, commitment.clone());
        Ok(())
    }

    async fn update_commitment(&self, commitment: &BudgetCommitment) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        match state.commitments.get(&commitment.id) {
            None => return Err(StoreError::not_found("BudgetCommitment", commitment.id)),
            // a terminal commitment can never be overwritten; a stale copy
            // must not re-run the other transition
            Some(stored) if !stored.is_active() => {
                return Err(StoreError::conflict(format!(
                    "commitment {} is {} and cannot be overwritten",
                    stored.id, stored.status
                )));
            }
            Some(_) => {}
        }
        if commitment.status == CommitmentStatus::Released {
            let key = (
                commitment.reference.reference_type.clone(),
                commitment.reference.reference_id,
            );
            if state.reference_index.get(&key) == Some(&commitment.id) {
                state.reference_index.remove(&key);
            }
        }
        state.commitments.insert(commitment.id, commitment.clone());
        Ok(())
    }

    async fn get_commitment(&self, id: CommitmentId) -> Result<BudgetCommitment, StoreError> {
        let state = self.state.read().await;
        state
            .commitments
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("BudgetCommitment", id))
    }

    async fn commitment_by_reference(
        &self,
        reference_type: &str,
        reference_id: Uuid,
    ) -> Result<Option<BudgetCommitment>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .reference_index
            .get(&(reference_type.to_string(), reference_id))
            .and_then(|id| state.commitments.get(id))
            .cloned())
    }

    async fn commitments_for_line(
        &self,
        budget_id: BudgetId,
        account_id: AccountId,
    ) -> Result<Vec<BudgetCommitment>, StoreError> {
        let state = self.state.read().await;
        let mut commitments: Vec<BudgetCommitment> = state
            .commitments
            .values()
            .filter(|c| c.budget_id == budget_id && c.account_id == account_id)
            .cloned()
            .collect();
        commitments.sort_by_key(|c| c.committed_at);
        Ok(commitments)
    }

    async fn insert_realization_and_mark_realized(
        &self,
        realization: &BudgetRealization,
        commitment: &BudgetCommitment,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        match state.commitments.get(&commitment.id) {
            None => return Err(StoreError::not_found("BudgetCommitment", commitment.id)),
            Some(stored) if stored.status != CommitmentStatus::Active => {
                return Err(StoreError::conflict(format!(
                    "commitment {} is not active",
                    commitment.id
                )));
            }
            Some(_) => {}
        }
        // both mutations land under the same lock
        state.commitments.insert(commitment.id, commitment.clone());
        state.realizations.push(realization.clone());
        Ok(())
    }

    async fn insert_realization(
        &self,
        realization: &BudgetRealization,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.realizations.push(realization.clone());
        Ok(())
    }

    async fn realizations_for_line(
        &self,
        budget_id: BudgetId,
        account_id: AccountId,
    ) -> Result<Vec<BudgetRealization>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .realizations
            .iter()
            .filter(|r| r.budget_id == budget_id && r.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn committed_and_realized_totals(
        &self,
        budget_id: BudgetId,
        account_id: AccountId,
    ) -> Result<BudgetTotals, StoreError> {
        // single lock acquisition; both sums come from one snapshot
        let state = self.state.read().await;
        let committed: Decimal = state
            .commitments
            .values()
            .filter(|c| {
                c.budget_id == budget_id
                    && c.account_id == account_id
                    && c.status == CommitmentStatus::Active
            })
            .map(|c| c.amount.amount())
            .sum();
        let realized: Decimal = state
            .realizations
            .iter()
            .filter(|r| r.budget_id == budget_id && r.account_id == account_id)
            .map(|r| r.amount.amount())
            .sum();
        Ok(BudgetTotals {
            committed,
            realized,
        })
    }
}
