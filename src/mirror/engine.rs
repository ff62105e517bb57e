use super::decision::decide;
use super::part_file::PartFile;
use crate::config::MirrorConfig;
use crate::errors::AppResult;
use crate::models::{FeedSource, RemoteProbe, SyncDecision, SyncOutcome, SyncReport};
use crate::origin::FeedOrigin;
use crate::storage::ObjectStore;
use crate::utils::{format_duration, format_size};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Mirrors feeds from an origin into an object store, one at a time.
pub struct MirrorEngine<'a> {
    config: &'a MirrorConfig,
    origin: &'a dyn FeedOrigin,
    store: &'a dyn ObjectStore,
}

impl<'a> MirrorEngine<'a> {
    pub fn new(
        config: &'a MirrorConfig,
        origin: &'a dyn FeedOrigin,
        store: &'a dyn ObjectStore,
    ) -> Self {
        Self {
            config,
            origin,
            store,
        }
    }

    /// Syncs every source in order.
    ///
    /// A failed download only affects its own source. Store errors other than
    /// "not found" abort the pass.
    pub async fn run(&self, sources: &[FeedSource]) -> AppResult<Vec<SyncReport>> {
        let mut reports = Vec::with_capacity(sources.len());
        for source in sources {
            let outcome = self.sync(source).await?;
            reports.push(SyncReport {
                source: source.clone(),
                outcome,
            });
        }
        Ok(reports)
    }

    /// Brings the stored copy of one feed up to date.
    ///
    /// # Errors
    ///
    /// Returns an error only when the store fails, either on the metadata
    /// lookup (other than "not found") or on the upload. Probe and download
    /// failures are logged and reported through the outcome.
    pub async fn sync(&self, source: &FeedSource) -> AppResult<SyncOutcome> {
        let key = source.filename();
        let stored = self.store.stat(key).await?;

        // Only worth a HEAD request when there is a copy to compare against
        let probe = match stored {
            Some(_) => self.probe(source).await,
            None => {
                debug!(filename = key, "No stored copy");
                RemoteProbe::failed()
            }
        };

        if decide(stored.as_ref(), &probe, self.config.refetch_on_failed_probe)
            == SyncDecision::Skip
        {
            info!(filename = key, "Using cached version");
            return Ok(SyncOutcome::Skipped);
        }

        info!(url = %source.url(), "Downloading");
        let local_path = match self.fetch(source).await {
            Ok(path) => path,
            Err(e) => {
                warn!(filename = key, error = %e, "Download failed");
                return Ok(SyncOutcome::FetchFailed {
                    reason: e.to_string(),
                });
            }
        };

        let bytes = self.store.put_file(key, &local_path).await?;
        info!(
            filename = key,
            bytes = bytes,
            bucket = self.store.bucket_name(),
            "Stored"
        );
        Ok(SyncOutcome::Stored { bytes })
    }

    async fn probe(&self, source: &FeedSource) -> RemoteProbe {
        match self.origin.probe(source.url()).await {
            Ok(length) => RemoteProbe::known(length),
            Err(e) => {
                warn!(
                    url = %source.url(),
                    error = %e,
                    "Failed to determine content length"
                );
                RemoteProbe::failed()
            }
        }
    }

    async fn fetch(&self, source: &FeedSource) -> AppResult<PathBuf> {
        let started = Instant::now();
        let mut part = PartFile::create(&self.config.output_dir, source.filename()).await?;
        let written = self.origin.download(source.url(), part.writer()?).await?;
        let path = part.commit().await?;
        debug!(
            file_path = %path.display(),
            size = %format_size(written),
            elapsed = %format_duration(started.elapsed()),
            "Download complete"
        );
        Ok(path)
    }
}
