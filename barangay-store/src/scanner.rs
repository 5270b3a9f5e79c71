//! Collection scanner.
//!
//! Enumerates every entity of a type by key prefix, decodes each, and skips
//! zero-field hashes. Backend key-iteration order is unspecified, so callers
//! needing a stable order sort after retrieval with the helpers below.

use crate::backend::KvBackend;
use crate::codec::{load_entity, KvEntity, ReadPolicy};
use barangay_core::{dates, keys, Announcement, BarangayResult, DocumentRequest, Event};
use std::cmp::Reverse;

/// Load every entity of a type, materialized eagerly.
///
/// Zero-field hashes (deleted or never-written records whose key still
/// matches the scan) are filtered out. Under [`ReadPolicy::Strict`] a
/// malformed record fails the whole listing; scan legacy data with
/// [`ReadPolicy::Heal`] when that is not acceptable.
pub async fn list_all<T: KvEntity>(
    backend: &dyn KvBackend,
    policy: ReadPolicy,
) -> BarangayResult<Vec<T>> {
    let scan_keys = backend.scan_keys(&T::scan_prefix()).await?;
    let mut entities = Vec::with_capacity(scan_keys.len());
    for key in scan_keys {
        let id = keys::id_from_key(&key);
        if let Some(entity) = load_entity::<T>(backend, id, policy).await? {
            entities.push(entity);
        }
    }
    Ok(entities)
}

/// Sort descending by a stored date field; unparseable dates order last.
fn sort_newest_first<T>(items: &mut [T], date_of: impl Fn(&T) -> &str) {
    items.sort_by_key(|item| Reverse(dates::parse_date(date_of(item))));
}

/// Sort ascending by a stored date field; unparseable dates order last.
fn sort_soonest_first<T>(items: &mut [T], date_of: impl Fn(&T) -> &str) {
    items.sort_by_key(|item| {
        let parsed = dates::parse_date(date_of(item));
        (parsed.is_none(), parsed)
    });
}

/// Announcement board order: newest posting first.
pub fn sort_announcements(items: &mut [Announcement]) {
    sort_newest_first(items, |a| &a.date);
}

/// Request-queue order: newest request first.
pub fn sort_document_requests(items: &mut [DocumentRequest]) {
    sort_newest_first(items, |r| &r.request_date);
}

/// Calendar order: soonest event first.
pub fn sort_events(items: &mut [Event]) {
    sort_soonest_first(items, |e| &e.event_date);
}
