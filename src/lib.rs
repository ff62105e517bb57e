//! nvd-mirror library
//!
//! This crate provides the core functionality for the `nvd-mirror` binary,
//! which keeps a bucket in step with the NVD CVE data feeds.
//!
//! ## Overview
//!
//! - [`feeds`] - Expands the fixed feed URL set for a year range
//! - [`mirror`] - Per-feed sync decision, download and upload
//! - [`origin`] - HTTP access to the feed server
//! - [`storage`] - Destination bucket access (S3 or in-memory)
//! - [`config`] - Configuration from flags, environment and TOML
//! - [`cli`] - Command-line entry point
//! - [`models`] - Feed sources, probes and sync outcomes
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use nvd_mirror::config::{ConfigOverrides, MirrorConfig};
//! use nvd_mirror::mirror::mirror_feeds;
//! use nvd_mirror::origin::HttpOrigin;
//! use nvd_mirror::storage::S3Store;
//! use nvd_mirror::errors::AppResult;
//!
//! # async fn example() -> AppResult<()> {
//! let overrides = ConfigOverrides {
//!     bucket_name: Some("nvd-feeds".into()),
//!     start_year: Some("2020".into()),
//!     ..Default::default()
//! };
//! let config = MirrorConfig::resolve(overrides, None, 2024)?;
//! let store = S3Store::new(&config.bucket_name, &config.storage)?;
//! let reports = mirror_feeds(&config, &HttpOrigin::new(), &store).await?;
//! println!("Synced {} feeds", reports.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod feeds;
pub mod mirror;
pub mod models;
pub mod origin;
pub mod storage;
pub mod utils;
