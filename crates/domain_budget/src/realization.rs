//! Budget realizations

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::commitment::Reference;
use core_kernel::{AccountId, BudgetId, CommitmentId, Money, RealizationId, UserId};

/// Actual spend recorded against a budget line
///
/// Usually consumes a commitment; direct expenses carry no commitment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetRealization {
    /// Unique identifier
    pub id: RealizationId,
    /// The commitment consumed, if any
    pub commitment_id: Option<CommitmentId>,
    /// Budget the spend counts against
    pub budget_id: BudgetId,
    /// Expense account
    pub account_id: AccountId,
    /// Realized amount
    pub amount: Money,
    /// Source document
    pub reference: Reference,
    /// Date of the underlying transaction
    pub transaction_date: NaiveDate,
    /// Who recorded the realization
    pub realized_by: UserId,
    /// When it was recorded
    pub realized_at: DateTime<Utc>,
}

impl BudgetRealization {
    /// Creates a realization consuming a commitment
    pub fn from_commitment(
        commitment_id: CommitmentId,
        budget_id: BudgetId,
        account_id: AccountId,
        amount: Money,
        reference: Reference,
        transaction_date: NaiveDate,
        realized_by: UserId,
    ) -> Self {
        Self {
            id: RealizationId::new_v7(),
            commitment_id: Some(commitment_id),
            budget_id,
            account_id,
            amount,
            reference,
            transaction_date,
            realized_by,
            realized_at: Utc::now(),
        }
    }

    /// Creates a direct realization with no commitment
    pub fn direct(
        budget_id: BudgetId,
        account_id: AccountId,
        amount: Money,
        reference: Reference,
        transaction_date: NaiveDate,
        realized_by: UserId,
    ) -> Self {
        Self {
            id: RealizationId::new_v7(),
            commitment_id: None,
            budget_id,
            account_id,
            amount,
            reference,
            transaction_date,
            realized_by,
            realized_at: Utc::now(),
        }
    }
}

/// One account's allocation within a budget
///
/// A weak reference to the budgeting module: only the amount matters to
/// the tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetLine {
    /// Budget identifier
    pub budget_id: BudgetId,
    /// Expense account
    pub account_id: AccountId,
    /// Allocated amount
    pub budgeted_amount: Money,
}

impl BudgetLine {
    /// Creates a budget line
    pub fn new(budget_id: BudgetId, account_id: AccountId, budgeted_amount: Money) -> Self {
        Self {
            budget_id,
            account_id,
            budgeted_amount,
        }
    }
}
