//! The sync engine and the startup checks around it.
//!
//! [`mirror_feeds`] is the whole program once configuration is resolved; the
//! per-feed logic lives in [`MirrorEngine::sync`].

mod decision;
mod engine;
mod part_file;

pub use decision::decide;
pub use engine::MirrorEngine;

use crate::config::MirrorConfig;
use crate::errors::{AppError, AppResult};
use crate::feeds::feed_sources;
use crate::models::SyncReport;
use crate::origin::FeedOrigin;
use crate::storage::ObjectStore;
use chrono::Local;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Runs one mirror pass over every feed in the configured year range.
///
/// The bucket is checked and the output directory created before any
/// transfer starts.
///
/// # Errors
///
/// Returns `ConfigError` if the bucket does not exist, `IoError` if the output
/// directory cannot be created, and any store error raised while syncing.
pub async fn mirror_feeds(
    config: &MirrorConfig,
    origin: &dyn FeedOrigin,
    store: &dyn ObjectStore,
) -> AppResult<Vec<SyncReport>> {
    ensure_bucket(store).await?;
    prepare_output_dir(&config.output_dir).await?;
    let sources = feed_sources(config.start_year, config.end_year)?;

    info!(
        started_at = %Local::now().to_rfc2822(),
        feeds = sources.len(),
        start_year = config.start_year,
        end_year = config.end_year,
        output_dir = %config.output_dir.display(),
        "Downloading files"
    );

    MirrorEngine::new(config, origin, store).run(&sources).await
}

/// Fails unless the destination bucket exists.
pub async fn ensure_bucket(store: &dyn ObjectStore) -> AppResult<()> {
    if store.bucket_exists().await? {
        Ok(())
    } else {
        Err(AppError::ConfigError(format!(
            "Bucket {} does not exist",
            store.bucket_name()
        )))
    }
}

/// Creates the output directory and its parents if missing.
pub async fn prepare_output_dir(dir: &Path) -> AppResult<()> {
    fs::create_dir_all(dir).await.map_err(|e| {
        AppError::IoError(format!(
            "Failed to create directory {}: {e}",
            dir.display()
        ))
    })
}
