//! Core entity structures
//!
//! Each entity type is a distinct struct with its fields declared statically.
//! Date-like fields stay `String` on purpose: the backend stores whatever the
//! original data entry wrote, and consumers parse leniently via [`crate::dates`].

use crate::DocumentStatus;
use serde::{Deserialize, Serialize};

/// Resident - one registered inhabitant, always attached to a family head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    /// `R-{year}{counter}` minted from the residents counter.
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birth_date: String,
    pub address: String,
    pub contact_number: String,
    /// Denormalized parent reference; must agree with the family's
    /// membership set. Both are written in one backend batch.
    pub family_head_id: String,
    pub registration_date: String,
}

/// FamilyHead - registered head of household, parent of zero or more residents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyHead {
    /// `F-{year}{counter}` minted from the family heads counter.
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birth_date: String,
    pub address: String,
    pub contact_number: String,
    pub registration_date: String,
}

/// Announcement posted to the community board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Opaque random token.
    pub id: String,
    pub title: String,
    pub content: String,
    /// Posting date; listings sort newest-first on this field.
    pub date: String,
    pub posted_by: String,
}

/// Scheduled community event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Opaque random token.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Listings sort ascending on this field (soonest first).
    pub event_date: String,
    pub location: String,
}

/// Request for an official barangay document (clearance, certificate, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRequest {
    /// Opaque random token, the storage identity.
    pub id: String,
    /// Human-facing `REQ-{year}{3 digits}` identifier shown on receipts.
    pub display_id: String,
    pub resident_name: String,
    pub document_type: String,
    pub purpose: String,
    pub status: DocumentStatus,
    pub request_date: String,
}

/// Staff account. Keyed by username, not a minted ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    /// Hash as issued by the (out-of-scope) auth layer; opaque here.
    pub password: String,
    pub role: String,
}

/// Trimmed "First Last"; "Unnamed" when both parts are blank.
pub fn full_name(first: &str, last: &str) -> String {
    let name = format!("{} {}", first.trim(), last.trim());
    let name = name.trim().to_string();
    if name.is_empty() {
        "Unnamed".to_string()
    } else {
        name
    }
}

impl Resident {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

impl FamilyHead {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_trims() {
        assert_eq!(full_name("  Juan ", " Dela Cruz "), "Juan Dela Cruz");
        assert_eq!(full_name("Juan", ""), "Juan");
        assert_eq!(full_name("", "Reyes"), "Reyes");
    }

    #[test]
    fn test_full_name_blank_is_unnamed() {
        assert_eq!(full_name("", ""), "Unnamed");
        assert_eq!(full_name("   ", "  "), "Unnamed");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The display name is never blank and never carries padding,
            /// whatever the stored name parts look like.
            #[test]
            fn prop_full_name_never_blank_or_padded(
                first in "[A-Za-z ]{0,12}",
                last in "[A-Za-z ]{0,12}",
            ) {
                let name = full_name(&first, &last);
                prop_assert!(!name.is_empty());
                prop_assert!(!name.starts_with(' '));
                prop_assert!(!name.ends_with(' '));
            }
        }
    }
}
