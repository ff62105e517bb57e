//! Remote side of the mirror: the feed server.
//!
//! [`FeedOrigin`] is the seam the mirror talks to; [`HttpOrigin`] is the
//! `reqwest` implementation used by the binary.

mod http;

pub use http::HttpOrigin;

use crate::errors::AppResult;
use async_trait::async_trait;
use tokio::io::AsyncWrite;
use url::Url;

#[async_trait]
pub trait FeedOrigin: Send + Sync {
    /// Returns the current size of the remote resource without fetching its body.
    async fn probe(&self, url: &Url) -> AppResult<u64>;

    /// Streams the full body of the remote resource into `writer` and returns
    /// the number of bytes written. The body is copied verbatim.
    async fn download(
        &self,
        url: &Url,
        writer: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> AppResult<u64>;
}
