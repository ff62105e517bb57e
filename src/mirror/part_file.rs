use crate::constants::PART_FILE_SUFFIX;
use crate::errors::{AppError, AppResult};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// A download in progress inside the output directory.
///
/// Bytes go to `<filename>.part`; [`PartFile::commit`] renames it onto
/// `<filename>`. Dropping an uncommitted `PartFile` closes the handle and
/// removes the partial file, so every early return cleans up.
pub(crate) struct PartFile {
    file: Option<File>,
    part_path: PathBuf,
    final_path: PathBuf,
    committed: bool,
}

impl PartFile {
    pub(crate) async fn create(dir: &Path, filename: &str) -> AppResult<Self> {
        let final_path = dir.join(filename);
        let part_path = dir.join(format!("{filename}{PART_FILE_SUFFIX}"));

        // Remove stale tmp file if present (best-effort)
        if fs::try_exists(&part_path).await.unwrap_or(false) {
            if let Err(e) = fs::remove_file(&part_path).await {
                warn!(
                    file_path = %part_path.display(),
                    error = %e,
                    "Failed to remove stale temp file"
                );
            }
        }

        let file = File::create(&part_path).await.map_err(|e| {
            AppError::IoError(format!(
                "Failed to create temp file {}: {e}",
                part_path.display()
            ))
        })?;

        Ok(Self {
            file: Some(file),
            part_path,
            final_path,
            committed: false,
        })
    }

    pub(crate) fn writer(&mut self) -> AppResult<&mut File> {
        self.file.as_mut().ok_or_else(|| {
            AppError::IoError(format!("{} is already closed", self.part_path.display()))
        })
    }

    /// Flushes, closes and renames the file onto its final name, replacing
    /// any previous download.
    pub(crate) async fn commit(mut self) -> AppResult<PathBuf> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_all().await.map_err(|e| {
                AppError::IoError(format!("Failed to sync {}: {e}", self.part_path.display()))
            })?;
        }

        fs::rename(&self.part_path, &self.final_path)
            .await
            .map_err(|e| {
                AppError::IoError(format!(
                    "Failed to rename temp file {} to {}: {e}",
                    self.part_path.display(),
                    self.final_path.display()
                ))
            })?;
        self.committed = true;
        Ok(self.final_path.clone())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        drop(self.file.take());
        if self.committed {
            return;
        }
        match std::fs::remove_file(&self.part_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                file_path = %self.part_path.display(),
                error = %e,
                "Failed to remove partial download"
            ),
        }
    }
}
