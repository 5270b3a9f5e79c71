//! Error types for barangay record-store operations

use crate::EntityType;
use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Entity not found: {entity_type:?} with id {id}")]
    NotFound { entity_type: EntityType, id: String },

    #[error("Backend unavailable: {reason}")]
    Backend { reason: String },

    #[error("Family head {family_head_id} still has {member_count} members")]
    FamilyNotEmpty {
        family_head_id: String,
        member_count: usize,
    },

    #[error("No free display id after {attempts} attempts")]
    DisplayIdExhausted { attempts: u32 },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    /// Whether a bounded retry against the backend is worthwhile.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Backend { .. })
    }
}

/// Decode errors raised when a stored field map does not match its
/// declared entity shape. Only surfaced under strict reads; healing reads
/// substitute defaults instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Missing required field {field} on {entity_type:?} {id}")]
    MissingField {
        entity_type: EntityType,
        id: String,
        field: String,
    },

    #[error("Invalid value for {field} on {entity_type:?} {id}: {value}")]
    InvalidValue {
        entity_type: EntityType,
        id: String,
        field: String,
        value: String,
    },

    #[error("Record {id} is typed {found:?}, expected {entity_type:?}")]
    TypeMismatch {
        entity_type: EntityType,
        id: String,
        found: String,
    },
}

/// Master error type for barangay record-store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BarangayError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Result type alias for barangay record-store operations.
pub type BarangayResult<T> = Result<T, BarangayError>;

// =============================================================================
// TESTS
// =============================================================================
