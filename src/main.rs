//! Blue Flag beach weather updater.
//!
//! Single-binary Tokio application that:
//! 1. Loads the beach registry CSV
//! 2. Decides which cached records are stale
//! 3. Fetches weather, marine, and sea-temperature data
//! 4. Merges the results into the persisted weather cache
//!
//! Runs once (`--once`) for scheduled/CI invocations, or continuously
//! on an interval.

mod config;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use tokio::time::sleep;
use tracing::{error, info};

use common::config::UpdaterConfig;
use common::types::{BeachLocation, WeatherRecord};
use common::Error;
use meteo_client::{MeteoClient, SeaTempCache};
use updater::{BatchSlice, BatchUpdateEngine, CacheStore, FetchWeather, RunSummary};

/// Background weather updater for Greece's Blue Flag beaches.
#[derive(Parser)]
#[command(name = "blueflag-weather", about = "Blue Flag beach weather updater")]
struct Cli {
    /// Run a single update and exit.
    #[arg(long)]
    once: bool,

    /// Minutes between runs in continuous mode.
    #[arg(long, default_value_t = 30)]
    interval: u64,

    /// Number of unique locations to process this invocation.
    #[arg(long)]
    batch_size: Option<usize>,

    /// Zero-based index of the slice to process.
    #[arg(long, default_value_t = 0)]
    batch_index: usize,

    /// Base directory for the registry input and cache output.
    #[arg(long)]
    base_dir: Option<PathBuf>,
}

const ERROR_RETRY: Duration = Duration::from_secs(5 * 60);

/// Production fetcher: per-beach endpoint calls plus the shared,
/// TTL-cached sea-temperature grid.
struct LiveFetcher {
    client: MeteoClient,
    sea_temp: SeaTempCache,
}

#[async_trait]
impl FetchWeather for LiveFetcher {
    async fn fetch(&self, location: &BeachLocation) -> Result<WeatherRecord, Error> {
        let grid = self.sea_temp.get_or_fetch(self.client.http()).await;
        self.client.fetch_weather(location, grid.as_deref()).await
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "blueflag_weather=info,meteo_client=info,updater=info".into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let mut cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(dir) = &cli.base_dir {
        cfg.paths.set_base_dir(dir);
    }

    info!("Blue Flag weather updater starting");
    info!("registry: {}", cfg.paths.registry_path().display());
    info!("cache: {}", cfg.paths.cache_path().display());
    info!(
        "freshness={}h rate_limit={}/min workers={} retries={}",
        cfg.freshness.max_age_hours,
        cfg.fetch.calls_per_minute,
        cfg.fetch.workers,
        cfg.fetch.max_retries,
    );

    let fetcher = LiveFetcher {
        client: MeteoClient::new(&cfg.fetch),
        sea_temp: SeaTempCache::new(Duration::from_secs(cfg.fetch.sea_temp_ttl_hours * 3600)),
    };
    let store = CacheStore::new(cfg.paths.cache_path());
    let engine = BatchUpdateEngine::new(fetcher, store, &cfg);

    let batch = cli.batch_size.map(|size| BatchSlice {
        size,
        index: cli.batch_index,
    });
    if let Some(slice) = &batch {
        info!("batch mode: size={} index={}", slice.size, slice.index);
    }

    if cli.once {
        if let Err(e) = run_once(&engine, &cfg, batch).await {
            error!("run failed: {}", e);
            std::process::exit(1);
        }
        return;
    }

    info!("continuous mode: updating every {} minutes", cli.interval);
    loop {
        let wait = match run_once(&engine, &cfg, batch).await {
            Ok(_) => {
                info!("next update in {} minutes", cli.interval);
                Duration::from_secs(cli.interval * 60)
            }
            Err(e) => {
                error!("run failed: {}", e);
                info!("retrying in 5 minutes");
                ERROR_RETRY
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("weather updater stopped");
                break;
            }
            _ = sleep(wait) => {}
        }
    }
}

async fn run_once<F: FetchWeather>(
    engine: &BatchUpdateEngine<F>,
    cfg: &UpdaterConfig,
    batch: Option<BatchSlice>,
) -> Result<RunSummary, Error> {
    let locations = updater::load_registry(&cfg.paths.registry_path())?;
    engine.run(locations, batch).await
}
