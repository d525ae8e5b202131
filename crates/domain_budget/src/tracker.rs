//! Budget tracker service
//!
//! Orchestrates the commitment lifecycle over a `BudgetStore` and derives
//! available budget on demand. Available budget is never stored; it is
//! always budgeted minus active commitments minus all realizations, read
//! from one consistent snapshot.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::commitment::{BudgetCommitment, Reference};
use crate::error::BudgetError;
use crate::ports::BudgetStore;
use crate::realization::{BudgetLine, BudgetRealization};
use core_kernel::{AccountId, BudgetId, CommitmentId, Money, StoreError, UserId};

/// Input for creating a commitment
#[derive(Debug, Clone)]
pub struct NewCommitment {
    /// Budget to earmark against
    pub budget_id: BudgetId,
    /// Expense account
    pub account_id: AccountId,
    /// Amount to earmark
    pub amount: Money,
    /// Source document
    pub reference: Reference,
    /// Optional description
    pub description: Option<String>,
    /// Who is committing
    pub committed_by: UserId,
}

/// Breakdown returned by an availability check
#[derive(Debug, Clone)]
pub struct BudgetAvailability {
    /// Allocated amount for the line
    pub budgeted: Money,
    /// Sum of active commitments
    pub committed: Money,
    /// Sum of all realizations
    pub realized: Money,
    /// budgeted - committed - realized
    pub available: Money,
    /// Amount the caller wants to spend
    pub requested: Money,
    /// How far the request exceeds the available budget, if it does
    pub shortfall: Option<Money>,
}

impl BudgetAvailability {
    /// Returns true if the requested amount fits in the available budget
    pub fn is_available(&self) -> bool {
        self.shortfall.is_none()
    }
}

/// Application service for commitments and realizations
pub struct BudgetTracker<S: BudgetStore> {
    store: Arc<S>,
}

impl<S: BudgetStore> BudgetTracker<S> {
    /// Creates a tracker over the given store
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates an active commitment
    ///
    /// At most one Active or Realized commitment may exist per
    /// (reference_type, reference_id); the store serializes concurrent
    /// attempts so exactly one wins. A Released commitment does not block
    /// re-committing the same reference.
    pub async fn commit(
        &self,
        request: NewCommitment,
    ) -> Result<BudgetCommitment, BudgetError> {
        if !request.amount.is_positive() {
            return Err(BudgetError::validation(
                "commitment amount must be positive",
            ));
        }

        let mut commitment = BudgetCommitment::new(
            request.budget_id,
            request.account_id,
            request.amount,
            request.reference,
            request.committed_by,
        );
        commitment.description = request.description;

        self.store
            .insert_commitment(&commitment)
            .await
            .map_err(|e| conflict_as_duplicate(e, &commitment.reference))?;

        info!(
            commitment_id = %commitment.id,
            reference = %commitment.reference.reference_number,
            amount = %commitment.amount,
            "created budget commitment"
        );
        Ok(commitment)
    }

    /// Releases an active commitment, returning the earmark to the budget
    pub async fn release(
        &self,
        commitment_id: CommitmentId,
        released_by: UserId,
        reason: impl Into<String>,
    ) -> Result<BudgetCommitment, BudgetError> {
        let mut commitment = self.get(commitment_id).await?;
        commitment.release(released_by, reason)?;
        self.store.update_commitment(&commitment).await?;

        info!(
            commitment_id = %commitment.id,
            reason = commitment.release_reason.as_deref().unwrap_or(""),
            "released budget commitment"
        );
        Ok(commitment)
    }

    /// Realizes an active commitment
    ///
    /// Inserts the realization and flips the commitment to Realized in a
    /// single atomic store operation.
    pub async fn realize(
        &self,
        commitment_id: CommitmentId,
        amount: Money,
        reference: Reference,
        transaction_date: NaiveDate,
        realized_by: UserId,
    ) -> Result<BudgetRealization, BudgetError> {
        if !amount.is_positive() {
            return Err(BudgetError::validation(
                "realization amount must be positive",
            ));
        }

        let mut commitment = self.get(commitment_id).await?;
        commitment.mark_realized()?;

        let realization = BudgetRealization::from_commitment(
            commitment.id,
            commitment.budget_id,
            commitment.account_id,
            amount,
            reference,
            transaction_date,
            realized_by,
        );
        self.store
            .insert_realization_and_mark_realized(&realization, &commitment)
            .await?;

        info!(
            commitment_id = %commitment.id,
            realization_id = %realization.id,
            amount = %realization.amount,
            "realized budget commitment"
        );
        Ok(realization)
    }

    /// Records spend with no prior commitment
    pub async fn realize_direct(
        &self,
        budget_id: BudgetId,
        account_id: AccountId,
        amount: Money,
        reference: Reference,
        transaction_date: NaiveDate,
        realized_by: UserId,
    ) -> Result<BudgetRealization, BudgetError> {
        if !amount.is_positive() {
            return Err(BudgetError::validation(
                "realization amount must be positive",
            ));
        }

        let realization = BudgetRealization::direct(
            budget_id,
            account_id,
            amount,
            reference,
            transaction_date,
            realized_by,
        );
        self.store.insert_realization(&realization).await?;

        info!(
            realization_id = %realization.id,
            amount = %realization.amount,
            "recorded direct realization"
        );
        Ok(realization)
    }

    /// Loads a commitment
    pub async fn get(&self, id: CommitmentId) -> Result<BudgetCommitment, BudgetError> {
        self.store.get_commitment(id).await.map_err(|e| {
            if e.is_not_found() {
                BudgetError::CommitmentNotFound(id.to_string())
            } else {
                BudgetError::Store(e)
            }
        })
    }

    /// The remaining budget for a line
    ///
    /// budgeted - sum(active commitments) - sum(all realizations), from
    /// one snapshot read. May go negative; no floor is enforced here.
    pub async fn available_budget(&self, line: &BudgetLine) -> Result<Money, BudgetError> {
        let totals = self
            .store
            .committed_and_realized_totals(line.budget_id, line.account_id)
            .await?;
        let currency = line.budgeted_amount.currency();
        Ok(Money::new(
            line.budgeted_amount.amount() - totals.committed - totals.realized,
            currency,
        ))
    }

    /// Checks whether a requested amount fits the remaining budget
    ///
    /// Returns the full breakdown; enforcement is the caller's policy.
    pub async fn check_availability(
        &self,
        line: &BudgetLine,
        requested: Money,
    ) -> Result<BudgetAvailability, BudgetError> {
        let totals = self
            .store
            .committed_and_realized_totals(line.budget_id, line.account_id)
            .await?;
        let currency = line.budgeted_amount.currency();

        let committed = Money::new(totals.committed, currency);
        let realized = Money::new(totals.realized, currency);
        let available = Money::new(
            line.budgeted_amount.amount() - totals.committed - totals.realized,
            currency,
        );

        let shortfall = requested.checked_sub(&available)?;
        let shortfall = if shortfall.is_positive() {
            warn!(
                budget_id = %line.budget_id,
                account_id = %line.account_id,
                requested = %requested,
                available = %available,
                "requested amount exceeds available budget"
            );
            Some(shortfall)
        } else {
            None
        };

        Ok(BudgetAvailability {
            budgeted: line.budgeted_amount,
            committed,
            realized,
            available,
            requested,
            shortfall,
        })
    }
}

fn conflict_as_duplicate(error: StoreError, reference: &Reference) -> BudgetError {
    if error.is_conflict() {
        BudgetError::DuplicateReference {
            reference_type: reference.reference_type.clone(),
            reference_id: reference.reference_id.to_string(),
        }
    } else {
        BudgetError::Store(error)
    }
}
