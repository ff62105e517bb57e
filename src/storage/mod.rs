//! Destination side of the mirror: the object store.
//!
//! [`ObjectStore`] models only the bucket calls the mirror makes. [`S3Store`]
//! is the real backend; [`MemoryStore`] keeps objects in memory.

mod memory;
mod s3_store;

pub use memory::MemoryStore;
pub use s3_store::S3Store;

use crate::errors::AppResult;
use crate::models::StoredObjectMetadata;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket this store writes to.
    fn bucket_name(&self) -> &str;

    async fn bucket_exists(&self) -> AppResult<bool>;

    /// Looks up an object by key. A missing object is `Ok(None)`, not an error.
    async fn stat(&self, key: &str) -> AppResult<Option<StoredObjectMetadata>>;

    /// Uploads the file at `path` under `key`, replacing any existing object.
    /// Returns the number of bytes uploaded.
    async fn put_file(&self, key: &str, path: &Path) -> AppResult<u64>;
}
