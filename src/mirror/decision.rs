use crate::models::{RemoteProbe, StoredObjectMetadata, SyncDecision};

/// Decides whether a feed has to be transferred.
///
/// A feed is skipped only when a stored copy exists and its size equals the
/// probed remote size. A failed probe compares as size 0 unless
/// `refetch_on_failed_probe` is set, in which case it always fetches.
pub fn decide(
    stored: Option<&StoredObjectMetadata>,
    probe: &RemoteProbe,
    refetch_on_failed_probe: bool,
) -> SyncDecision {
    let Some(stored) = stored else {
        return SyncDecision::FetchAndStore;
    };
    if refetch_on_failed_probe && probe.content_length.is_none() {
        return SyncDecision::FetchAndStore;
    }
    if stored.content_length == probe.size_or_sentinel() {
        SyncDecision::Skip
    } else {
        SyncDecision::FetchAndStore
    }
}
