//! Budget commitments
//!
//! A commitment earmarks budget for an expected expense (a purchase
//! order, a requisition). It is Active until it is either Released
//! (cancelled, budget returned) or Realized (the expense happened).
//! Both outcomes are terminal and happen exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::BudgetError;
use core_kernel::{AccountId, BudgetId, CommitmentId, Money, UserId};

/// Commitment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommitmentStatus {
    /// Earmarked, counts against available budget
    Active,
    /// Cancelled; the earmark no longer counts
    Released,
    /// Consumed by a realization
    Realized,
}

impl CommitmentStatus {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CommitmentStatus::Active)
    }
}

impl std::fmt::Display for CommitmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CommitmentStatus::Active => "ACTIVE",
            CommitmentStatus::Released => "RELEASED",
            CommitmentStatus::Realized => "REALIZED",
        };
        write!(f, "{}", s)
    }
}

/// The source document a commitment or realization points at
///
/// Two references are the same when their type and id match; the number
/// is display-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    /// Document kind (e.g. "purchase_order")
    pub reference_type: String,
    /// Document identifier
    pub reference_id: Uuid,
    /// Human-readable document number
    pub reference_number: String,
}

impl Reference {
    /// Creates a reference
    pub fn new(
        reference_type: impl Into<String>,
        reference_id: Uuid,
        reference_number: impl Into<String>,
    ) -> Self {
        Self {
            reference_type: reference_type.into(),
            reference_id,
            reference_number: reference_number.into(),
        }
    }

    /// The uniqueness key
    pub fn key(&self) -> (&str, Uuid) {
        (&self.reference_type, self.reference_id)
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Reference {}

/// An earmark against a budget line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetCommitment {
    /// Unique identifier
    pub id: CommitmentId,
    /// Budget this earmark counts against
    pub budget_id: BudgetId,
    /// Expense account
    pub account_id: AccountId,
    /// Earmarked amount
    pub amount: Money,
    /// Source document
    pub reference: Reference,
    /// Current status
    pub status: CommitmentStatus,
    /// Optional description
    pub description: Option<String>,
    /// Who created the earmark
    pub committed_by: UserId,
    /// When the earmark was created
    pub committed_at: DateTime<Utc>,
    /// Who released it, if released
    pub released_by: Option<UserId>,
    /// When it was released
    pub released_at: Option<DateTime<Utc>>,
    /// Why it was released
    pub release_reason: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl BudgetCommitment {
    /// Creates a new active commitment
    pub fn new(
        budget_id: BudgetId,
        account_id: AccountId,
        amount: Money,
        reference: Reference,
        committed_by: UserId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: CommitmentId::new_v7(),
            budget_id,
            account_id,
            amount,
            reference,
            status: CommitmentStatus::Active,
            description: None,
            committed_by,
            committed_at: now,
            released_by: None,
            released_at: None,
            release_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Releases the commitment, returning the earmark to the budget
    pub fn release(
        &mut self,
        released_by: UserId,
        reason: impl Into<String>,
    ) -> Result<(), BudgetError> {
        self.ensure_active()?;

        let now = Utc::now();
        self.status = CommitmentStatus::Released;
        self.released_by = Some(released_by);
        self.released_at = Some(now);
        self.release_reason = Some(reason.into());
        self.updated_at = now;
        Ok(())
    }

    /// Marks the commitment realized
    ///
    /// Only the tracker calls this, together with inserting the
    /// realization in one atomic store operation.
    pub fn mark_realized(&mut self) -> Result<(), BudgetError> {
        self.ensure_active()?;
        self.status = CommitmentStatus::Realized;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Returns true if the earmark still counts against the budget
    pub fn is_active(&self) -> bool {
        self.status == CommitmentStatus::Active
    }

    fn ensure_active(&self) -> Result<(), BudgetError> {
        if self.status != CommitmentStatus::Active {
            return Err(BudgetError::NotActive {
                status: self.status.to_string(),
            });
        }
        Ok(())
    }
}
