//! ID generation.
//!
//! Sequential IDs come from the backend's atomic counter increment, never
//! from process-local state: multiple instances must share one sequence.

use crate::backend::KvBackend;
use barangay_core::{keys, BarangayError, BarangayResult, StorageError};
use chrono::{Datelike, Utc};
use rand::Rng;

/// Draws allowed when claiming a human-facing display ID before giving up.
const DISPLAY_ID_ATTEMPTS: u32 = 16;

/// Mint `"{prefix}-{year}{counter}"` with the counter zero-padded to at
/// least three digits. Fails without minting when the increment fails; an
/// entity is never persisted with a locally-invented ID.
pub async fn generate_id(
    backend: &dyn KvBackend,
    counter_key: &str,
    prefix: &str,
) -> BarangayResult<String> {
    let n = backend.counter_incr(counter_key).await?;
    let year = Utc::now().year();
    Ok(format!("{prefix}-{year}{n:03}"))
}

/// Mint a human-facing `"REQ-{year}{3-digit random}"` display identifier.
///
/// The draw space is only 1000 values per year, so each candidate is claimed
/// through the backend's set-add (atomic first-writer-wins) and collisions
/// retry with a fresh draw. Exhausting the attempts is a hard error rather
/// than a silently duplicated receipt number.
pub async fn generate_display_id(backend: &dyn KvBackend) -> BarangayResult<String> {
    let year = Utc::now().year();
    for _ in 0..DISPLAY_ID_ATTEMPTS {
        let draw: u32 = rand::rng().random_range(0..1000);
        let candidate = format!("REQ-{year}{draw:03}");
        if backend.set_add(keys::DISPLAY_ID_SET, &candidate).await? {
            return Ok(candidate);
        }
        tracing::debug!(%candidate, "display id already claimed, redrawing");
    }
    Err(BarangayError::Storage(StorageError::DisplayIdExhausted {
        attempts: DISPLAY_ID_ATTEMPTS,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use std::collections::BTreeSet;

    #[tokio::test]
    async fn test_ids_are_distinct_and_increasing() {
        let backend = MemoryBackend::new();
        let year = Utc::now().year();
        let mut seen = BTreeSet::new();
        let mut last_suffix = 0u64;

        for _ in 0..12 {
            let id = generate_id(&backend, keys::RESIDENTS_COUNT, "R")
                .await
                .unwrap();
            assert!(seen.insert(id.clone()), "duplicate id {id}");

            let suffix: u64 = id
                .strip_prefix(&format!("R-{year}"))
                .unwrap()
                .parse()
                .unwrap();
            assert!(suffix > last_suffix);
            last_suffix = suffix;
        }
    }

    #[tokio::test]
    async fn test_first_id_is_zero_padded() {
        let backend = MemoryBackend::new();
        let year = Utc::now().year();
        let id = generate_id(&backend, keys::FAMILY_HEADS_COUNT, "F")
            .await
            .unwrap();
        assert_eq!(id, format!("F-{year}001"));
    }

    #[tokio::test]
    async fn test_counter_widens_past_three_digits() {
        let backend = MemoryBackend::new();
        for _ in 0..999 {
            backend.counter_incr(keys::RESIDENTS_COUNT).await.unwrap();
        }
        let year = Utc::now().year();
        let id = generate_id(&backend, keys::RESIDENTS_COUNT, "R")
            .await
            .unwrap();
        assert_eq!(id, format!("R-{year}1000"));
    }

    #[tokio::test]
    async fn test_counters_are_independent_per_type() {
        let backend = MemoryBackend::new();
        let year = Utc::now().year();
        let r = generate_id(&backend, keys::RESIDENTS_COUNT, "R")
            .await
            .unwrap();
        let f = generate_id(&backend, keys::FAMILY_HEADS_COUNT, "F")
            .await
            .unwrap();
        assert_eq!(r, format!("R-{year}001"));
        assert_eq!(f, format!("F-{year}001"));
    }

    #[tokio::test]
    async fn test_display_ids_never_repeat() {
        let backend = MemoryBackend::new();
        let mut seen = BTreeSet::new();
        for _ in 0..50 {
            let id = generate_display_id(&backend).await.unwrap();
            assert!(id.starts_with("REQ-"));
            assert!(seen.insert(id));
        }
    }

    #[tokio::test]
    async fn test_display_id_exhaustion_is_an_error() {
        let backend = MemoryBackend::new();
        let year = Utc::now().year();
        // Claim the whole draw space up front.
        for n in 0..1000 {
            backend
                .set_add(keys::DISPLAY_ID_SET, &format!("REQ-{year}{n:03}"))
                .await
                .unwrap();
        }
        let err = generate_display_id(&backend).await.unwrap_err();
        assert!(matches!(
            err,
            BarangayError::Storage(StorageError::DisplayIdExhausted { .. })
        ));
    }
}
