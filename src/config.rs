use crate::constants::{DEFAULT_S3_REGION, DEFAULT_START_YEAR, ENV_BUCKET_NAME};
use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Connection settings for the destination bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Custom endpoint for S3-compatible services; `None` targets AWS.
    pub endpoint: Option<String>,
    /// Region name, also sent to custom endpoints.
    pub region: String,
    /// Address the bucket as `<endpoint>/<bucket>` instead of `<bucket>.<endpoint>`.
    pub path_style: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: DEFAULT_S3_REGION.to_string(),
            path_style: false,
        }
    }
}

/// Resolved configuration with all values filled in (no Options).
///
/// Built once at startup and handed to the mirror by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Destination bucket; must already exist
    pub bucket_name: String,
    /// First year of yearly feeds to mirror
    pub start_year: i32,
    /// Last year of yearly feeds to mirror (inclusive)
    pub end_year: i32,
    /// Directory the feeds are downloaded into before upload
    pub output_dir: PathBuf,
    pub storage: StorageConfig,
    /// When set, a failed HEAD probe always triggers a download instead of
    /// being compared as size 0.
    pub refetch_on_failed_probe: bool,
}

/// Values taken from command-line flags or their environment variables.
///
/// Year values stay as raw strings so that malformed input is reported with
/// the same message regardless of where it came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bucket_name: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub s3_endpoint: Option<String>,
    pub s3_region: Option<String>,
    pub s3_path_style: bool,
    pub refetch_on_failed_probe: bool,
}

/// Configuration that can be loaded from a TOML file.
///
/// Every key is optional; flags and environment variables take precedence
/// over the file. Unknown keys are rejected to catch typos.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MirrorConfigFile {
    pub bucket_name: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub output_dir: Option<PathBuf>,
    pub refetch_on_failed_probe: Option<bool>,
    pub storage: StorageSection,
}

/// `[storage]` table of the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSection {
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub path_style: Option<bool>,
}

impl MirrorConfigFile {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read and `InvalidInput` if the
    /// TOML is malformed or contains unknown keys.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::IoError(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))
    }
}

impl MirrorConfig {
    /// Merges flags/environment, an optional config file and defaults.
    ///
    /// Empty strings count as unset. The end year defaults to `current_year`
    /// and the output directory to the platform temp directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when no bucket name is given and `InvalidInput`
    /// when a year is not a 4-digit number.
    pub fn resolve(
        overrides: ConfigOverrides,
        file: Option<MirrorConfigFile>,
        current_year: i32,
    ) -> AppResult<Self> {
        let file = file.unwrap_or_default();

        let bucket_name = non_empty(overrides.bucket_name)
            .or_else(|| non_empty(file.bucket_name))
            .ok_or_else(|| {
                AppError::ConfigError(format!(
                    "{ENV_BUCKET_NAME} must be defined as a flag, environment variable or config key"
                ))
            })?;

        let start_year = match non_empty(overrides.start_year) {
            Some(raw) => parse_year("start year", &raw)?,
            None => match file.start_year {
                Some(year) => validate_year("start year", year)?,
                None => DEFAULT_START_YEAR,
            },
        };
        let end_year = match non_empty(overrides.end_year) {
            Some(raw) => parse_year("end year", &raw)?,
            None => match file.end_year {
                Some(year) => validate_year("end year", year)?,
                None => current_year,
            },
        };

        let output_dir = overrides
            .output_dir
            .filter(|dir| !dir.as_os_str().is_empty())
            .or_else(|| file.output_dir.filter(|dir| !dir.as_os_str().is_empty()))
            .unwrap_or_else(std::env::temp_dir);

        let defaults = StorageConfig::default();
        let storage = StorageConfig {
            endpoint: non_empty(overrides.s3_endpoint)
                .or_else(|| non_empty(file.storage.endpoint)),
            region: non_empty(overrides.s3_region)
                .or_else(|| non_empty(file.storage.region))
                .unwrap_or(defaults.region),
            path_style: overrides.s3_path_style || file.storage.path_style.unwrap_or(false),
        };

        Ok(Self {
            bucket_name,
            start_year,
            end_year,
            output_dir,
            storage,
            refetch_on_failed_probe: overrides.refetch_on_failed_probe
                || file.refetch_on_failed_probe.unwrap_or(false),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses a year given as text. Only 4 ASCII digits in `1000..=9999` are
/// accepted, the same range a year from the config file must fall in.
pub fn parse_year(label: &str, raw: &str) -> AppResult<i32> {
    let raw = raw.trim();
    if raw.len() != 4 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidInput(format!(
            "The {label} must be a 4-digit year, got: {raw}"
        )));
    }
    validate_year(label, raw.parse::<i32>()?)
}

fn validate_year(label: &str, year: i32) -> AppResult<i32> {
    if (1000..=9999).contains(&year) {
        Ok(year)
    } else {
        Err(AppError::InvalidInput(format!(
            "The {label} must be a 4-digit year, got: {year}"
        )))
    }
}
