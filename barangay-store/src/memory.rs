//! In-memory backend.
//!
//! Modeled on a hash/set/counter keyspace: one `RwLock` guards the whole
//! keyspace so a [`Batch`] applies under a single write lock, which is what
//! gives `apply` its multi-key atomicity here.

use crate::backend::{Batch, BatchOp, KvBackend};
use async_trait::async_trait;
use barangay_core::{BarangayError, BarangayResult, FieldMap, StorageError};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Keyspace {
    hashes: HashMap<String, FieldMap>,
    sets: HashMap<String, BTreeSet<String>>,
    counters: HashMap<String, i64>,
}

impl Keyspace {
    fn apply_op(&mut self, op: BatchOp) {
        match op {
            BatchOp::HashSetMulti { key, fields } => {
                self.hashes.entry(key).or_default().extend(fields);
            }
            BatchOp::Delete { key } => {
                self.hashes.remove(&key);
                self.sets.remove(&key);
                self.counters.remove(&key);
            }
            BatchOp::SetAdd { key, member } => {
                self.sets.entry(key).or_default().insert(member);
            }
            BatchOp::SetRemove { key, member } => {
                if let Some(set) = self.sets.get_mut(&key) {
                    set.remove(&member);
                }
            }
        }
    }
}

/// In-process key-value backend for tests and single-node deployments.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<RwLock<Keyspace>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every key. Test helper.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            *inner = Keyspace::default();
        }
    }

    fn read(&self) -> BarangayResult<RwLockReadGuard<'_, Keyspace>> {
        self.inner
            .read()
            .map_err(|_| BarangayError::Storage(StorageError::LockPoisoned))
    }

    fn write(&self) -> BarangayResult<RwLockWriteGuard<'_, Keyspace>> {
        self.inner
            .write()
            .map_err(|_| BarangayError::Storage(StorageError::LockPoisoned))
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    async fn hash_set_multi(&self, key: &str, fields: &FieldMap) -> BarangayResult<()> {
        let mut inner = self.write()?;
        inner
            .hashes
            .entry(key.to_string())
            .or_default()
            .extend(fields.clone());
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> BarangayResult<FieldMap> {
        let inner = self.read()?;
        Ok(inner.hashes.get(key).cloned().unwrap_or_default())
    }

    async fn delete(&self, key: &str) -> BarangayResult<()> {
        let mut inner = self.write()?;
        inner.hashes.remove(key);
        inner.sets.remove(key);
        inner.counters.remove(key);
        Ok(())
    }

    async fn scan_keys(&self, prefix: &str) -> BarangayResult<Vec<String>> {
        let inner = self.read()?;
        Ok(inner
            .hashes
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn set_add(&self, key: &str, member: &str) -> BarangayResult<bool> {
        let mut inner = self.write()?;
        Ok(inner
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    async fn set_remove(&self, key: &str, member: &str) -> BarangayResult<bool> {
        let mut inner = self.write()?;
        Ok(inner
            .sets
            .get_mut(key)
            .map(|set| set.remove(member))
            .unwrap_or(false))
    }

    async fn set_members(&self, key: &str) -> BarangayResult<BTreeSet<String>> {
        let inner = self.read()?;
        Ok(inner.sets.get(key).cloned().unwrap_or_default())
    }

    async fn counter_incr(&self, key: &str) -> BarangayResult<i64> {
        let mut inner = self.write()?;
        let counter = inner.counters.entry(key.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn counter_get(&self, key: &str) -> BarangayResult<i64> {
        let inner = self.read()?;
        Ok(inner.counters.get(key).copied().unwrap_or(0))
    }

    async fn apply(&self, batch: Batch) -> BarangayResult<()> {
        let mut inner = self.write()?;
        for op in batch.ops {
            inner.apply_op(op);
        }
        Ok(())
    }

    async fn ping(&self) -> BarangayResult<()> {
        self.read().map(|_| ())
    }
}
