//! Durable store abstractions
//!
//! Every domain defines its own async store port; adapters (in-memory,
//! SQL, ...) implement them against this shared error type. The engine
//! only requires that a store provide per-aggregate atomic multi-row
//! writes and the uniqueness constraints each port documents.

use std::fmt;
use thiserror::Error;

/// Error type for store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// The write conflicts with existing data (uniqueness, stale state)
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// A stored value could not be decoded
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// An internal store failure
    #[error("Internal store error: {message}")]
    Internal { message: String },
}

impl StoreError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        StoreError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        StoreError::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates the record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Returns true if this error indicates a uniqueness/state conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Marker trait for all domain store ports
///
/// Store traits extend this marker to ensure they are thread-safe and
/// usable from async contexts.
pub trait DomainStore: Send + Sync + 'static {}
