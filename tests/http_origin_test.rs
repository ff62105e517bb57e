//! Tests for the reqwest-backed origin against a local mock server

#[path = "common/mod.rs"]
mod common;

use common::*;
use nvd_mirror::errors::AppError;
use nvd_mirror::mirror::MirrorEngine;
use nvd_mirror::models::{FeedSource, SyncOutcome};
use nvd_mirror::origin::{FeedOrigin, HttpOrigin};
use nvd_mirror::storage::MemoryStore;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED_PATH: &str = "/feeds/json/cve/1.0/nvdcve-1.0-2020.json.gz";

async fn mount_feed(server: &MockServer, bytes: &[u8]) {
    Mock::given(method("HEAD"))
        .and(path(FEED_PATH))
        .respond_with(
            ResponseTemplate::new(200).insert_header("content-length", bytes.len().to_string()),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .mount(server)
        .await;
}

fn feed_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}{FEED_PATH}", server.uri())).unwrap()
}

#[tokio::test]
async fn test_probe_reads_content_length() {
    let server = MockServer::start().await;
    mount_feed(&server, &feed_bytes("probe")).await;

    let size = HttpOrigin::new().probe(&feed_url(&server)).await.unwrap();

    assert_eq!(size, feed_bytes("probe").len() as u64);
}

#[tokio::test]
async fn test_probe_fails_on_missing_feed() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = HttpOrigin::new().probe(&feed_url(&server)).await;

    assert!(matches!(result, Err(AppError::NetworkError(ref msg)) if msg.contains("HTTP 404")));
}

#[tokio::test]
async fn test_download_copies_body_verbatim() {
    let server = MockServer::start().await;
    let bytes = feed_bytes("download");
    mount_feed(&server, &bytes).await;

    let mut sink: Vec<u8> = Vec::new();
    let written = HttpOrigin::new()
        .download(&feed_url(&server), &mut sink)
        .await
        .unwrap();

    assert_eq!(written, bytes.len() as u64);
    assert_eq!(sink, bytes);
}

#[tokio::test]
async fn test_download_fails_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut sink: Vec<u8> = Vec::new();
    let result = HttpOrigin::new()
        .download(&feed_url(&server), &mut sink)
        .await;

    assert!(matches!(result, Err(AppError::NetworkError(ref msg)) if msg.contains("HTTP 503")));
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_configured_client_sends_the_requests() {
    let server = MockServer::start().await;
    let bytes = feed_bytes("custom client");
    Mock::given(method("GET"))
        .and(path(FEED_PATH))
        .and(header("user-agent", "nvd-mirror-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::builder()
        .user_agent("nvd-mirror-tests")
        .build()
        .unwrap();
    let mut sink: Vec<u8> = Vec::new();
    let written = HttpOrigin::with_client(client)
        .download(&feed_url(&server), &mut sink)
        .await
        .unwrap();

    assert_eq!(written, bytes.len() as u64);
    assert_eq!(sink, bytes);
}

#[tokio::test]
async fn test_sync_over_http_stores_then_skips() {
    let server = MockServer::start().await;
    let bytes = feed_bytes("end to end");
    mount_feed(&server, &bytes).await;

    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path(), 2020, 2020);
    let origin = HttpOrigin::new();
    let store = MemoryStore::new("nvd-feeds");
    let engine = MirrorEngine::new(&config, &origin, &store);
    let source = FeedSource::from_url(feed_url(&server).as_str()).unwrap();

    let first = engine.sync(&source).await.unwrap();
    let second = engine.sync(&source).await.unwrap();

    assert_eq!(
        first,
        SyncOutcome::Stored {
            bytes: bytes.len() as u64
        }
    );
    assert_eq!(second, SyncOutcome::Skipped);
    assert_eq!(store.object("nvdcve-1.0-2020.json.gz").unwrap(), bytes);
}

#[tokio::test]
async fn test_unreachable_origin_is_not_fatal() {
    // Bind and drop a listener to get a port nothing is serving on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let source =
        FeedSource::from_url(&format!("http://127.0.0.1:{port}/feeds/nvdcve-2021.xml.gz")).unwrap();

    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path(), 2021, 2021);
    let origin = HttpOrigin::new();
    let store = MemoryStore::new("nvd-feeds");
    store.insert("nvdcve-2021.xml.gz", b"previous".to_vec());

    let outcome = MirrorEngine::new(&config, &origin, &store)
        .sync(&source)
        .await
        .unwrap();

    assert!(matches!(outcome, SyncOutcome::FetchFailed { .. }));
    assert_eq!(store.object("nvdcve-2021.xml.gz").unwrap(), b"previous");
    assert!(store.puts().is_empty());
}
