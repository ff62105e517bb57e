use super::FeedOrigin;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CONTENT_LENGTH;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;
use url::Url;

/// Feed origin backed by a `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpOrigin {
    client: reqwest::Client,
}

impl HttpOrigin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> AppResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Request to {url} failed: {e}")))?;

        // Check status before error_for_status so the code ends up in the message
        let status = response.status();
        response.error_for_status().map_err(|e| {
            AppError::NetworkError(format!("HTTP {}: {url}: {e}", status.as_u16()))
        })
    }
}

#[async_trait]
impl FeedOrigin for HttpOrigin {
    async fn probe(&self, url: &Url) -> AppResult<u64> {
        let response = self.send(self.client.head(url.clone()), url).await?;

        // Response::content_length reflects the (empty) HEAD body, so read the header
        let length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .ok_or_else(|| {
                AppError::NetworkError(format!("No usable Content-Length header from {url}"))
            })?;

        debug!(url = %url, content_length = length, "Probed remote size");
        Ok(length)
    }

    async fn download(
        &self,
        url: &Url,
        writer: &mut (dyn AsyncWrite + Unpin + Send),
    ) -> AppResult<u64> {
        let response = self.send(self.client.get(url.clone()), url).await?;

        let mut body = response.bytes_stream();
        let mut written: u64 = 0;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| {
                AppError::NetworkError(format!("Transfer from {url} interrupted: {e}"))
            })?;
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::IoError(format!("Failed to write body of {url}: {e}")))?;
            written += chunk.len() as u64;
        }
        writer
            .flush()
            .await
            .map_err(|e| AppError::IoError(format!("Failed to flush body of {url}: {e}")))?;

        Ok(written)
    }
}
