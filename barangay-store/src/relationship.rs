//! Family membership: the one-to-many FamilyHead -> Resident association.
//!
//! Materialized as the backend set `familyMembers:{familyHeadId}`, kept in
//! step with the denormalized `familyHeadId` field on each resident. The
//! [`crate::store::RecordStore`] writes both sides in one atomic batch; this
//! module stays policy-free and only wraps the set operations.

use crate::backend::KvBackend;
use barangay_core::{keys, BarangayResult};
use std::collections::BTreeSet;

/// Add a resident to a family's membership set. Idempotent; the backend's
/// native create-if-absent semantics handle first-member initialization.
pub async fn add_member(
    backend: &dyn KvBackend,
    family_head_id: &str,
    resident_id: &str,
) -> BarangayResult<bool> {
    backend
        .set_add(&keys::family_members_key(family_head_id), resident_id)
        .await
}

/// Remove a resident from a family's membership set. Idempotent.
pub async fn remove_member(
    backend: &dyn KvBackend,
    family_head_id: &str,
    resident_id: &str,
) -> BarangayResult<bool> {
    backend
        .set_remove(&keys::family_members_key(family_head_id), resident_id)
        .await
}

/// All resident IDs registered under a family head. No ordering guarantee
/// beyond the set's own.
pub async fn list_members(
    backend: &dyn KvBackend,
    family_head_id: &str,
) -> BarangayResult<BTreeSet<String>> {
    backend
        .set_members(&keys::family_members_key(family_head_id))
        .await
}
