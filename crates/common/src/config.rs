//! Updater configuration types.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level updater configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// Input/output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Outbound HTTP behavior.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Record staleness policy.
    #[serde(default)]
    pub freshness: FreshnessConfig,

    /// Lookup matching policy.
    #[serde(default)]
    pub lookup: LookupConfig,
}

/// Where the beach registry lives and where the cache is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Base directory for both the registry input and the cache output.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Registry CSV file name, relative to `base_dir`.
    #[serde(default = "default_registry_file")]
    pub registry_file: String,

    /// Cache JSON file name, relative to `base_dir`.
    #[serde(default = "default_cache_file")]
    pub cache_file: String,
}

impl PathsConfig {
    pub fn registry_path(&self) -> PathBuf {
        self.base_dir.join(&self.registry_file)
    }

    pub fn cache_path(&self) -> PathBuf {
        self.base_dir.join(&self.cache_file)
    }

    pub fn set_base_dir(&mut self, dir: &Path) {
        self.base_dir = dir.to_path_buf();
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            registry_file: default_registry_file(),
            cache_file: default_cache_file(),
        }
    }
}

/// Rate limiting, retries, and fan-out for provider calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Process-wide ceiling on outbound calls per minute.
    #[serde(default = "default_calls_per_minute")]
    pub calls_per_minute: u32,

    /// Retries after the first attempt for transient failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds; doubles per attempt.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Concurrent fetch workers within one run.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// In-memory TTL for the sea-surface-temperature grid, in hours.
    #[serde(default = "default_sea_temp_ttl_hours")]
    pub sea_temp_ttl_hours: u64,

    /// Max distance (degrees) to the nearest SST grid point before the
    /// value is treated as unavailable.
    #[serde(default = "default_sea_temp_max_distance_deg")]
    pub sea_temp_max_distance_deg: f64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            calls_per_minute: default_calls_per_minute(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            timeout_secs: default_timeout_secs(),
            workers: default_workers(),
            sea_temp_ttl_hours: default_sea_temp_ttl_hours(),
            sea_temp_max_distance_deg: default_sea_temp_max_distance_deg(),
        }
    }
}

/// How old a cached record may be before it is re-fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshnessConfig {
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: u64,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            max_age_hours: default_max_age_hours(),
        }
    }
}

/// Fuzzy lookup matching policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Nearest-neighbor cutoff in kilometers.
    #[serde(default = "default_max_distance_km")]
    pub max_distance_km: f64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            max_distance_km: default_max_distance_km(),
        }
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_registry_file() -> String {
    "beaches.csv".into()
}

fn default_cache_file() -> String {
    "weather_cache.json".into()
}

fn default_calls_per_minute() -> u32 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    500
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_workers() -> usize {
    8
}

fn default_sea_temp_ttl_hours() -> u64 {
    4
}

fn default_sea_temp_max_distance_deg() -> f64 {
    2.0
}

fn default_max_age_hours() -> u64 {
    6
}

fn default_max_distance_km() -> f64 {
    1.5
}
