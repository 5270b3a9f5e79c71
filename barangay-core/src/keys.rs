//! Key naming conventions.
//!
//! These exact spellings are a compatibility surface: data written by the
//! previous system lives under these keys, so an in-place migration must
//! keep them byte for byte.

use crate::EntityType;

/// Counter minting resident IDs. Monotonic; deletes never decrement it.
pub const RESIDENTS_COUNT: &str = "residents:count";

/// Counter minting family head IDs.
pub const FAMILY_HEADS_COUNT: &str = "familyHeads:count";

/// Set of claimed human-facing document-request display IDs.
pub const DISPLAY_ID_SET: &str = "documentRequests:displayIds";

/// Storage key for one entity: `"{prefix}:{id}"`.
pub fn storage_key(entity_type: EntityType, id: &str) -> String {
    format!("{}:{}", entity_type.key_prefix(), id)
}

/// Scan prefix matching every entity of a type, trailing separator included.
pub fn scan_prefix(entity_type: EntityType) -> String {
    format!("{}:", entity_type.key_prefix())
}

/// Membership set for one family head.
pub fn family_members_key(family_head_id: &str) -> String {
    format!("familyMembers:{family_head_id}")
}

/// Extract the entity id from a storage key. Returns the whole key when no
/// separator is present (malformed keys surface as unknown ids, not panics).
pub fn id_from_key(key: &str) -> &str {
    match key.split_once(':') {
        Some((_, id)) => id,
        None => key,
    }
}
