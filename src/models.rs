use crate::errors::{AppError, AppResult};
use std::fmt;
use url::Url;

/// A single remote feed file and the key it is mirrored under.
///
/// The filename is the last segment of the URL path and doubles as the local
/// file name and the object key in the destination bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    url: Url,
    filename: String,
}

impl FeedSource {
    /// Builds a source from an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns `UrlError` if the URL does not parse or its path has no final
    /// segment to use as a filename.
    pub fn from_url(input: &str) -> AppResult<Self> {
        let url = Url::parse(input)?;
        let filename = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| AppError::UrlError(format!("No filename in URL path: {input}")))?;

        Ok(Self { url, filename })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Result of a HEAD request against a feed. `None` when the request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteProbe {
    pub content_length: Option<u64>,
}

impl RemoteProbe {
    pub fn known(content_length: u64) -> Self {
        Self {
            content_length: Some(content_length),
        }
    }

    pub fn failed() -> Self {
        Self {
            content_length: None,
        }
    }

    /// Size used when comparing against the stored copy; a failed probe counts as 0.
    pub fn size_or_sentinel(&self) -> u64 {
        self.content_length.unwrap_or(0)
    }
}

/// Metadata of an object already held by the destination store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredObjectMetadata {
    pub content_length: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    Skip,
    FetchAndStore,
}

/// What happened to one feed during a mirror pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The stored copy matched the remote size; nothing was transferred.
    Skipped,
    /// The feed was downloaded and uploaded.
    Stored { bytes: u64 },
    /// The download failed; nothing was uploaded.
    FetchFailed { reason: String },
}

impl SyncOutcome {
    pub fn decision(&self) -> SyncDecision {
        match self {
            Self::Skipped => SyncDecision::Skip,
            Self::Stored { .. } | Self::FetchFailed { .. } => SyncDecision::FetchAndStore,
        }
    }
}

/// One line of a mirror pass: the feed and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub source: FeedSource,
    pub outcome: SyncOutcome,
}
