use super::ObjectStore;
use crate::errors::{AppError, AppResult};
use crate::models::StoredObjectMetadata;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// In-memory object store. Records every upload so callers can assert on
/// what was written.
pub struct MemoryStore {
    bucket_name: String,
    bucket_exists: bool,
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    objects: BTreeMap<String, Vec<u8>>,
    puts: Vec<String>,
    failing_stats: BTreeSet<String>,
}

impl MemoryStore {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            bucket_exists: true,
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// A store whose bucket reports as absent.
    pub fn without_bucket(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_exists: false,
            ..Self::new(bucket_name)
        }
    }

    /// Seeds an object without recording it as an upload.
    pub fn insert(&self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.lock().objects.insert(key.into(), bytes.into());
    }

    /// Makes every `stat` of `key` fail with a storage error.
    pub fn fail_stat(&self, key: impl Into<String>) {
        self.lock().failing_stats.insert(key.into());
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().objects.get(key).cloned()
    }

    /// Keys passed to `put_file`, in call order.
    pub fn puts(&self) -> Vec<String> {
        self.lock().puts.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panic while holding the lock leaves the maps consistent
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    async fn bucket_exists(&self) -> AppResult<bool> {
        Ok(self.bucket_exists)
    }

    async fn stat(&self, key: &str) -> AppResult<Option<StoredObjectMetadata>> {
        let state = self.lock();
        if state.failing_stats.contains(key) {
            return Err(AppError::StorageError(format!(
                "HTTP 403: HEAD {key} in bucket {}",
                self.bucket_name
            )));
        }
        Ok(state.objects.get(key).map(|bytes| StoredObjectMetadata {
            content_length: bytes.len() as u64,
        }))
    }

    async fn put_file(&self, key: &str, path: &Path) -> AppResult<u64> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {e}", path.display()))
        })?;
        let size = bytes.len() as u64;

        let mut state = self.lock();
        state.objects.insert(key.to_string(), bytes);
        state.puts.push(key.to_string());
        Ok(size)
    }
}
