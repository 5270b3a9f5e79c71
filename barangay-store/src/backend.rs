//! Key-value backend abstraction.
//!
//! The store treats the backend as a capability: string keys, per-key field
//! maps (hashes), unordered string sets, and atomic integer counters. The
//! atomic counter increment is the only primitive the surrounding code relies
//! on for cross-process coordination; everything else gets its isolation from
//! [`Batch`], which backends apply as one multi-key atomic operation.

use async_trait::async_trait;
use barangay_core::{BarangayResult, FieldMap};
use std::collections::BTreeSet;
use std::sync::Arc;

/// One mutation inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Write every field into the hash at `key`.
    HashSetMulti { key: String, fields: FieldMap },
    /// Remove the value at `key` entirely (hash, set, or counter).
    Delete { key: String },
    /// Add `member` to the set at `key`, creating the set if absent.
    SetAdd { key: String, member: String },
    /// Remove `member` from the set at `key`.
    SetRemove { key: String, member: String },
}

/// Multi-key atomic batch.
///
/// Used wherever two representations of the same fact must change together,
/// e.g. a resident's `familyHeadId` field and the parent's membership set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub ops: Vec<BatchOp>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn hash_set_multi(mut self, key: impl Into<String>, fields: FieldMap) -> Self {
        self.ops.push(BatchOp::HashSetMulti {
            key: key.into(),
            fields,
        });
        self
    }

    pub fn delete(mut self, key: impl Into<String>) -> Self {
        self.ops.push(BatchOp::Delete { key: key.into() });
        self
    }

    pub fn set_add(mut self, key: impl Into<String>, member: impl Into<String>) -> Self {
        self.ops.push(BatchOp::SetAdd {
            key: key.into(),
            member: member.into(),
        });
        self
    }

    pub fn set_remove(mut self, key: impl Into<String>, member: impl Into<String>) -> Self {
        self.ops.push(BatchOp::SetRemove {
            key: key.into(),
            member: member.into(),
        });
        self
    }
}

/// Key-value backend trait.
///
/// Implementations must be safe for concurrent use from many in-flight
/// request tasks. Point operations need no cross-key isolation; `apply`
/// must be atomic across every op in the batch.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Write every field into the hash at `key` in one atomic operation.
    async fn hash_set_multi(&self, key: &str, fields: &FieldMap) -> BarangayResult<()>;

    /// Read the whole hash at `key`. An absent key reads as an empty map.
    async fn hash_get_all(&self, key: &str) -> BarangayResult<FieldMap>;

    /// Remove the value at `key` entirely.
    async fn delete(&self, key: &str) -> BarangayResult<()>;

    /// Enumerate keys starting with `prefix`. Ordering is unspecified.
    async fn scan_keys(&self, prefix: &str) -> BarangayResult<Vec<String>>;

    /// Add `member` to the set at `key`. Returns true when newly added.
    async fn set_add(&self, key: &str, member: &str) -> BarangayResult<bool>;

    /// Remove `member` from the set at `key`. Returns true when it was present.
    async fn set_remove(&self, key: &str, member: &str) -> BarangayResult<bool>;

    /// All members of the set at `key`. An absent key reads as empty.
    async fn set_members(&self, key: &str) -> BarangayResult<BTreeSet<String>>;

    /// Atomically increment the counter at `key` and return the new value.
    /// Counters start at zero, so the first increment returns 1.
    async fn counter_incr(&self, key: &str) -> BarangayResult<i64>;

    /// Read the counter at `key` without incrementing. Absent reads as 0.
    async fn counter_get(&self, key: &str) -> BarangayResult<i64>;

    /// Apply every op in the batch as one atomic multi-key operation.
    async fn apply(&self, batch: Batch) -> BarangayResult<()>;

    /// Liveness check against the backend.
    async fn ping(&self) -> BarangayResult<()>;
}

// Shared handles delegate, so decorators can wrap an `Arc<dyn KvBackend>`.
#[async_trait]
impl<B: KvBackend + ?Sized> KvBackend for Arc<B> {
    async fn hash_set_multi(&self, key: &str, fields: &FieldMap) -> BarangayResult<()> {
        (**self).hash_set_multi(key, fields).await
    }

    async fn hash_get_all(&self, key: &str) -> BarangayResult<FieldMap> {
        (**self).hash_get_all(key).await
    }

    async fn delete(&self, key: &str) -> BarangayResult<()> {
        (**self).delete(key).await
    }

    async fn scan_keys(&self, prefix: &str) -> BarangayResult<Vec<String>> {
        (**self).scan_keys(prefix).await
    }

    async fn set_add(&self, key: &str, member: &str) -> BarangayResult<bool> {
        (**self).set_add(key, member).await
    }

    async fn set_remove(&self, key: &str, member: &str) -> BarangayResult<bool> {
        (**self).set_remove(key, member).await
    }

    async fn set_members(&self, key: &str) -> BarangayResult<BTreeSet<String>> {
        (**self).set_members(key).await
    }

    async fn counter_incr(&self, key: &str) -> BarangayResult<i64> {
        (**self).counter_incr(key).await
    }

    async fn counter_get(&self, key: &str) -> BarangayResult<i64> {
        (**self).counter_get(key).await
    }

    async fn apply(&self, batch: Batch) -> BarangayResult<()> {
        (**self).apply(batch).await
    }

    async fn ping(&self) -> BarangayResult<()> {
        (**self).ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barangay_core::fields::field_map;

    #[test]
    fn test_batch_builder_preserves_order() {
        let batch = Batch::new()
            .hash_set_multi("resident:R-2025001", field_map([("id", "R-2025001")]))
            .set_add("familyMembers:F-2025001", "R-2025001")
            .delete("resident:R-2025002");

        assert_eq!(batch.ops.len(), 3);
        assert!(matches!(batch.ops[0], BatchOp::HashSetMulti { .. }));
        assert!(matches!(batch.ops[1], BatchOp::SetAdd { .. }));
        assert!(matches!(batch.ops[2], BatchOp::Delete { .. }));
    }

    #[test]
    fn test_empty_batch() {
        assert!(Batch::new().is_empty());
    }
}
