use crate::config::{ConfigOverrides, MirrorConfig, MirrorConfigFile};
use crate::constants::*;
use crate::errors::AppResult;
use crate::mirror::mirror_feeds;
use crate::origin::HttpOrigin;
use crate::storage::S3Store;
use chrono::{Datelike, Local};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Builds the command-line definition. Every setting also reads its
/// environment variable, so the tool runs unchanged from a container or cron
/// job with only the environment set.
pub fn command() -> Command<'static> {
    Command::new("nvd-mirror")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .after_help("Example:\n  BUCKET_NAME=nvd-feeds START_YEAR=2020 nvd-mirror")
        .arg(
            Arg::new("bucket")
                .short('b')
                .long("bucket")
                .env(ENV_BUCKET_NAME)
                .help("Destination bucket (must already exist)")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("start_year")
                .short('s')
                .long("start-year")
                .env(ENV_START_YEAR)
                .help("First year of yearly feeds to mirror [default: 2002]")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("end_year")
                .short('e')
                .long("end-year")
                .env(ENV_END_YEAR)
                .help("Last year of yearly feeds to mirror [default: current year]")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output-dir")
                .env(ENV_OUTPUT_DIR)
                .help("Directory feeds are downloaded into [default: system temp dir]")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("s3_endpoint")
                .long("s3-endpoint")
                .env(ENV_S3_ENDPOINT)
                .help("Endpoint of an S3-compatible service")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("s3_region")
                .long("s3-region")
                .env(ENV_S3_REGION)
                .help("Bucket region [default: us-east-1]")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("s3_path_style")
                .long("s3-path-style")
                .help("Use path-style bucket addressing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("refetch_on_failed_probe")
                .long("refetch-on-failed-probe")
                .help("Download a feed whenever its size cannot be determined")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a TOML config file")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
}

/// Collects flag and environment values from parsed arguments.
pub fn overrides_from_matches(matches: &ArgMatches) -> ConfigOverrides {
    let string = |id: &str| matches.get_one::<String>(id).cloned();
    ConfigOverrides {
        bucket_name: string("bucket"),
        start_year: string("start_year"),
        end_year: string("end_year"),
        output_dir: matches.get_one::<PathBuf>("output_dir").cloned(),
        s3_endpoint: string("s3_endpoint"),
        s3_region: string("s3_region"),
        s3_path_style: matches.get_flag("s3_path_style"),
        refetch_on_failed_probe: matches.get_flag("refetch_on_failed_probe"),
    }
}

/// Resolves the configuration from parsed arguments and the optional file.
pub fn resolve_config(matches: &ArgMatches) -> AppResult<MirrorConfig> {
    let file = matches
        .get_one::<PathBuf>("config")
        .map(|path| MirrorConfigFile::from_toml_file(path))
        .transpose()?;
    MirrorConfig::resolve(overrides_from_matches(matches), file, Local::now().year())
}

/// Parses the process arguments and runs one mirror pass.
///
/// # Errors
///
/// Returns an error if configuration is missing or invalid, the bucket does
/// not exist, or the bucket fails while the feeds are synced.
pub async fn cli() -> AppResult<()> {
    let matches = command().get_matches();
    let config = resolve_config(&matches)?;

    let store = S3Store::new(&config.bucket_name, &config.storage)?;
    let origin = HttpOrigin::new();
    info!(bucket = %config.bucket_name, "Using bucket");
    mirror_feeds(&config, &origin, &store).await?;
    Ok(())
}

/// Installs the stdout log subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();
}
