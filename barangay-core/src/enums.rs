//! Enumerations shared across the record store.

use serde::{Deserialize, Serialize};

/// Entity type discriminator.
///
/// The key prefix doubles as the stored `type` field value, so the casing
/// here must match what earlier deployments wrote into the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Resident,
    FamilyHead,
    Announcement,
    Event,
    DocumentRequest,
    User,
}

impl EntityType {
    /// Key prefix used for `"{prefix}:{id}"` storage keys.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            EntityType::Resident => "resident",
            EntityType::FamilyHead => "familyHead",
            EntityType::Announcement => "announcement",
            EntityType::Event => "event",
            EntityType::DocumentRequest => "documentRequest",
            EntityType::User => "user",
        }
    }
}

/// Lifecycle status of a document request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DocumentStatus {
    #[default]
    Pending,
    Processing,
    Ready,
    Released,
    Rejected,
}

impl DocumentStatus {
    /// Stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "Pending",
            DocumentStatus::Processing => "Processing",
            DocumentStatus::Ready => "Ready",
            DocumentStatus::Released => "Released",
            DocumentStatus::Rejected => "Rejected",
        }
    }

    /// Parse a stored status value. Returns None for unknown values so the
    /// caller can decide between healing and rejecting the record.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(DocumentStatus::Pending),
            "Processing" => Some(DocumentStatus::Processing),
            "Ready" => Some(DocumentStatus::Ready),
            "Released" => Some(DocumentStatus::Released),
            "Rejected" => Some(DocumentStatus::Rejected),
            _ => None,
        }
    }
}
