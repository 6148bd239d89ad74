//! Configuration loader — merges .env, config.toml, and environment
//! variable overrides.

use std::path::{Path, PathBuf};

use common::config::UpdaterConfig;
use common::Error;

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn parse_positive_f64(raw: &str, env_name: &str) -> Result<f64, Error> {
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::Config(format!("{env_name} must be a number > 0")))?;
    if parsed <= 0.0 {
        return Err(Error::Config(format!("{env_name} must be a number > 0")));
    }
    Ok(parsed)
}

fn validate_config(config: &UpdaterConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.paths.registry_file.trim().is_empty() {
        issues.push("paths.registry_file must not be empty".into());
    }
    if config.paths.cache_file.trim().is_empty() {
        issues.push("paths.cache_file must not be empty".into());
    }

    if config.fetch.calls_per_minute == 0 {
        issues.push("fetch.calls_per_minute must be > 0".into());
    }
    if config.fetch.max_retries > 10 {
        issues.push("fetch.max_retries must be <= 10".into());
    }
    if config.fetch.timeout_secs == 0 {
        issues.push("fetch.timeout_secs must be > 0".into());
    }
    if config.fetch.workers == 0 || config.fetch.workers > 32 {
        issues.push("fetch.workers must be between 1 and 32".into());
    }
    if config.fetch.sea_temp_ttl_hours == 0 {
        issues.push("fetch.sea_temp_ttl_hours must be > 0".into());
    }
    if config.fetch.sea_temp_max_distance_deg <= 0.0 {
        issues.push("fetch.sea_temp_max_distance_deg must be > 0".into());
    }

    if config.freshness.max_age_hours == 0 {
        issues.push("freshness.max_age_hours must be > 0".into());
    }

    if config.lookup.max_distance_km <= 0.0 {
        issues.push("lookup.max_distance_km must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load updater configuration from defaults, optional config.toml, and
/// environment variables (highest priority).
pub fn load_config() -> Result<UpdaterConfig, Error> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    let mut config = UpdaterConfig::default();

    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    if let Ok(dir) = std::env::var("BLUEFLAG_BASE_DIR") {
        if !dir.trim().is_empty() {
            config.paths.base_dir = PathBuf::from(dir.trim());
        }
    }
    if let Ok(name) = std::env::var("BLUEFLAG_REGISTRY_FILE") {
        if !name.trim().is_empty() {
            config.paths.registry_file = name.trim().to_string();
        }
    }
    if let Ok(name) = std::env::var("BLUEFLAG_CACHE_FILE") {
        if !name.trim().is_empty() {
            config.paths.cache_file = name.trim().to_string();
        }
    }
    if let Ok(raw) = std::env::var("BLUEFLAG_CALLS_PER_MINUTE") {
        config.fetch.calls_per_minute =
            parse_positive_u64(&raw, "BLUEFLAG_CALLS_PER_MINUTE")? as u32;
    }
    if let Ok(raw) = std::env::var("BLUEFLAG_WORKERS") {
        config.fetch.workers = parse_positive_u64(&raw, "BLUEFLAG_WORKERS")? as usize;
    }
    if let Ok(raw) = std::env::var("BLUEFLAG_FRESHNESS_HOURS") {
        config.freshness.max_age_hours = parse_positive_u64(&raw, "BLUEFLAG_FRESHNESS_HOURS")?;
    }
    if let Ok(raw) = std::env::var("BLUEFLAG_SEA_TEMP_TTL_HOURS") {
        config.fetch.sea_temp_ttl_hours =
            parse_positive_u64(&raw, "BLUEFLAG_SEA_TEMP_TTL_HOURS")?;
    }
    if let Ok(raw) = std::env::var("BLUEFLAG_MAX_DISTANCE_KM") {
        config.lookup.max_distance_km = parse_positive_f64(&raw, "BLUEFLAG_MAX_DISTANCE_KM")?;
    }

    validate_config(&config)?;

    Ok(config)
}
