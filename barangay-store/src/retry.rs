//! Bounded retry decorator for backend calls.
//!
//! Wraps another [`KvBackend`] and retries operations that fail with a
//! transient backend error. Repeated failure propagates the last error to
//! the caller; a failed write is never turned into a silent no-op.

use crate::backend::{Batch, KvBackend};
use async_trait::async_trait;
use barangay_core::{BarangayError, BarangayResult, FieldMap};
use std::collections::BTreeSet;
use std::future::Future;

fn is_transient(error: &BarangayError) -> bool {
    matches!(error, BarangayError::Storage(e) if e.is_transient())
}

/// Backend decorator retrying transient failures up to `max_attempts` times.
pub struct RetryingBackend<B> {
    inner: B,
    max_attempts: u32,
}

impl<B: KvBackend> RetryingBackend<B> {
    /// Wrap `inner`, attempting each operation at most `max_attempts` times.
    /// Zero is clamped to one attempt.
    pub fn new(inner: B, max_attempts: u32) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
        }
    }

    async fn run<T, F, Fut>(&self, mut op: F) -> BarangayResult<T>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = BarangayResult<T>> + Send,
    {
        let mut attempt = 1u32;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= self.max_attempts || !is_transient(&error) {
                        return Err(error);
                    }
                    tracing::warn!(attempt, %error, "backend call failed, retrying");
                    attempt += 1;
                }
            }
        }
    }
}

#[async_trait]
impl<B: KvBackend> KvBackend for RetryingBackend<B> {
    async fn hash_set_multi(&self, key: &str, fields: &FieldMap) -> BarangayResult<()> {
        self.run(|| self.inner.hash_set_multi(key, fields)).await
    }

    async fn hash_get_all(&self, key: &str) -> BarangayResult<FieldMap> {
        self.run(|| self.inner.hash_get_all(key)).await
    }

    async fn delete(&self, key: &str) -> BarangayResult<()> {
        self.run(|| self.inner.delete(key)).await
    }

    async fn scan_keys(&self, prefix: &str) -> BarangayResult<Vec<String>> {
        self.run(|| self.inner.scan_keys(prefix)).await
    }

    async fn set_add(&self, key: &str, member: &str) -> BarangayResult<bool> {
        self.run(|| self.inner.set_add(key, member)).await
    }

    async fn set_remove(&self, key: &str, member: &str) -> BarangayResult<bool> {
        self.run(|| self.inner.set_remove(key, member)).await
    }

    async fn set_members(&self, key: &str) -> BarangayResult<BTreeSet<String>> {
        self.run(|| self.inner.set_members(key)).await
    }

    // Single attempt: a retry after a lost response would re-increment and
    // burn a sequence value per retry without the caller knowing.
    async fn counter_incr(&self, key: &str) -> BarangayResult<i64> {
        self.inner.counter_incr(key).await
    }

    async fn counter_get(&self, key: &str) -> BarangayResult<i64> {
        self.run(|| self.inner.counter_get(key)).await
    }

    async fn apply(&self, batch: Batch) -> BarangayResult<()> {
        self.run(|| self.inner.apply(batch.clone())).await
    }

    async fn ping(&self) -> BarangayResult<()> {
        self.run(|| self.inner.ping()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barangay_core::StorageError;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Backend that fails the first `failures` calls to every operation.
    #[derive(Default)]
    struct FlakyBackend {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakyBackend {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }

        fn check(&self) -> BarangayResult<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(BarangayError::Storage(StorageError::Backend {
                    reason: "connection reset".to_string(),
                }))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl KvBackend for FlakyBackend {
        async fn hash_set_multi(&self, _key: &str, _fields: &FieldMap) -> BarangayResult<()> {
            self.check()
        }
        async fn hash_get_all(&self, _key: &str) -> BarangayResult<FieldMap> {
            self.check().map(|_| FieldMap::new())
        }
        async fn delete(&self, _key: &str) -> BarangayResult<()> {
            self.check()
        }
        async fn scan_keys(&self, _prefix: &str) -> BarangayResult<Vec<String>> {
            self.check().map(|_| Vec::new())
        }
        async fn set_add(&self, _key: &str, _member: &str) -> BarangayResult<bool> {
            self.check().map(|_| true)
        }
        async fn set_remove(&self, _key: &str, _member: &str) -> BarangayResult<bool> {
            self.check().map(|_| true)
        }
        async fn set_members(&self, _key: &str) -> BarangayResult<BTreeSet<String>> {
            self.check().map(|_| BTreeSet::new())
        }
        async fn counter_incr(&self, _key: &str) -> BarangayResult<i64> {
            self.check().map(|_| 1)
        }
        async fn counter_get(&self, _key: &str) -> BarangayResult<i64> {
            self.check().map(|_| 0)
        }
        async fn apply(&self, _batch: Batch) -> BarangayResult<()> {
            self.check()
        }
        async fn ping(&self) -> BarangayResult<()> {
            self.check()
        }
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let backend = RetryingBackend::new(FlakyBackend::new(2), 3);
        backend.ping().await.unwrap();
        assert_eq!(backend.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_propagate_error() {
        let backend = RetryingBackend::new(FlakyBackend::new(5), 3);
        let err = backend.ping().await.unwrap_err();
        assert!(matches!(
            err,
            BarangayError::Storage(StorageError::Backend { .. })
        ));
        assert_eq!(backend.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_counter_incr_is_single_attempt() {
        let backend = RetryingBackend::new(FlakyBackend::new(1), 3);
        assert!(backend.counter_incr("residents:count").await.is_err());
        assert_eq!(backend.inner.calls.load(Ordering::SeqCst), 1);
    }
}
