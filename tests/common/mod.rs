//! Common test utilities for integration tests

use async_trait::async_trait;
use nvd_mirror::config::{MirrorConfig, StorageConfig};
use nvd_mirror::errors::{AppError, AppResult};
use nvd_mirror::origin::FeedOrigin;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use url::Url;

/// Builds a config that downloads into `output_dir`.
#[allow(dead_code)]
pub fn test_config(output_dir: &Path, start_year: i32, end_year: i32) -> MirrorConfig {
    MirrorConfig {
        bucket_name: "nvd-feeds".to_string(),
        start_year,
        end_year,
        output_dir: output_dir.to_path_buf(),
        storage: StorageConfig::default(),
        refetch_on_failed_probe: false,
    }
}

/// Gzip magic followed by a body unique to `seed`, so every feed differs.
#[allow(dead_code)]
pub fn feed_bytes(seed: &str) -> Vec<u8> {
    let mut bytes = vec![0x1f, 0x8b, 0x08, 0x00];
    bytes.extend_from_slice(seed.as_bytes());
    bytes.extend((0..=255u8).rev());
    bytes
}

/// Feed origin serving fixed bodies by URL, with injectable failures.
#[allow(dead_code)]
#[derive(Default)]
pub struct StaticOrigin {
    feeds: HashMap<String, Vec<u8>>,
    failing_probes: HashSet<String>,
    failing_downloads: HashSet<String>,
    probes: Mutex<Vec<String>>,
    downloads: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl StaticOrigin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.feeds.insert(url.to_string(), bytes);
        self
    }

    pub fn failing_probe(mut self, url: &str) -> Self {
        self.failing_probes.insert(url.to_string());
        self
    }

    /// The download writes a few bytes and then breaks off.
    pub fn failing_download(mut self, url: &str) -> Self {
        self.failing_downloads.insert(url.to_string());
        self
    }

    pub fn probes(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedOrigin for StaticOrigin {
    async fn probe(&self, url: &Url) -> AppResult<u64> {
        self.probes.lock().unwrap().push(url.to_string());
        if self.failing_probes.contains(url.as_str()) {
            return Err(AppError::NetworkError(format!("connection reset: {url}")));
        }
        self.feeds
            .get(url.as_str())
            .map(|bytes| bytes.len() as u64)
            .ok_or_else(|| AppError::NetworkError(format!("HTTP 404: {url}")))
    }

    async fn download(
        &self,
        url: &Url,
        writer: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> AppResult<u64> {
        self.downloads.lock().unwrap().push(url.to_string());
        let bytes = self
            .feeds
            .get(url.as_str())
            .ok_or_else(|| AppError::NetworkError(format!("HTTP 404: {url}")))?;

        if self.failing_downloads.contains(url.as_str()) {
            writer.write_all(&bytes[..bytes.len() / 2]).await?;
            return Err(AppError::NetworkError(format!(
                "Transfer from {url} interrupted"
            )));
        }

        writer.write_all(bytes).await?;
        Ok(bytes.len() as u64)
    }
}
