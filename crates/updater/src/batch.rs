//! Batch update engine.
//!
//! One run: load the registry and the persisted cache, narrow to this
//! invocation's batch of unique locations, re-fetch whatever is stale
//! or missing, merge, persist. Runs are stateless between invocations;
//! an external scheduler (cron, CI) strings them together and the cache
//! accumulates coverage across batches.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use common::config::UpdaterConfig;
use common::geo::{make_key, CANONICAL_PRECISION};
use common::types::{BeachLocation, WeatherCache, WeatherRecord};
use common::Error;
use futures_util::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::registry::unique_locations;
use crate::store::{merge, CacheStore};

/// Seam between the engine and the provider clients, so runs are
/// testable without network access.
#[async_trait]
pub trait FetchWeather: Send + Sync {
    async fn fetch(&self, location: &BeachLocation) -> Result<WeatherRecord, Error>;
}

/// Which slice of the de-duplicated location list this run covers.
#[derive(Debug, Clone, Copy)]
pub struct BatchSlice {
    pub size: usize,
    pub index: usize,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Unique locations in this run's partition.
    pub considered: usize,
    /// Skipped because the cached record was still fresh.
    pub fresh: usize,
    /// Successfully fetched and merged.
    pub updated: usize,
    /// Fetch failures (logged, non-fatal).
    pub failed: usize,
    /// Total cache entries after the merge.
    pub cache_size: usize,
}

pub struct BatchUpdateEngine<F> {
    fetcher: F,
    store: CacheStore,
    freshness: Duration,
    workers: usize,
}

impl<F: FetchWeather> BatchUpdateEngine<F> {
    pub fn new(fetcher: F, store: CacheStore, cfg: &UpdaterConfig) -> Self {
        Self {
            fetcher,
            store,
            freshness: Duration::hours(cfg.freshness.max_age_hours as i64),
            workers: cfg.fetch.workers.max(1),
        }
    }

    /// Execute one run. Per-location failures are logged and skipped;
    /// only registry or storage failures abort.
    pub async fn run(
        &self,
        locations: Vec<BeachLocation>,
        batch: Option<BatchSlice>,
    ) -> Result<RunSummary, Error> {
        let cache = self.store.load();

        let unique = unique_locations(locations);
        let partition = apply_slice(unique, batch);
        let considered = partition.len();

        let now = Utc::now();
        let stale: Vec<BeachLocation> = partition
            .into_iter()
            .filter(|loc| self.needs_update(&cache, loc))
            .collect();
        let fresh = considered - stale.len();
        let total_stale = stale.len();

        info!(
            "run start: {} locations in partition, {} fresh, {} to fetch",
            considered, fresh, total_stale
        );

        let mut updates = WeatherCache::new();
        let mut failed = 0usize;

        if total_stale > 0 {
            let fetcher = &self.fetcher;
            let mut results = stream::iter(stale.into_iter().map(|loc| async move {
                let result = fetcher.fetch(&loc).await;
                (loc, result)
            }))
            .buffer_unordered(self.workers);

            let mut completed = 0usize;
            while let Some((loc, result)) = results.next().await {
                match result {
                    Ok(record) => {
                        updates.insert(
                            make_key(loc.latitude, loc.longitude, CANONICAL_PRECISION),
                            record,
                        );
                        completed += 1;
                        if completed % 10 == 0 {
                            info!("progress: {}/{} locations updated", completed, total_stale);
                        }
                    }
                    Err(e) => {
                        warn!("weather update failed for {}: {}", loc.name, e);
                        failed += 1;
                    }
                }
            }
        }

        let updated = updates.len();
        let merged = merge(cache, updates);
        // Persist even a no-op run so downstream tooling sees a fresh file.
        self.store.save(&merged)?;

        let summary = RunSummary {
            considered,
            fresh,
            updated,
            failed,
            cache_size: merged.len(),
        };
        info!(
            "run complete: considered={} fresh={} updated={} failed={} cache_size={}",
            summary.considered, summary.fresh, summary.updated, summary.failed, summary.cache_size
        );
        Ok(summary)
    }

    fn needs_update(&self, cache: &WeatherCache, location: &BeachLocation) -> bool {
        let key = make_key(location.latitude, location.longitude, CANONICAL_PRECISION);
        match cache.get(&key) {
            None => true,
            Some(record) => record.is_stale(Utc::now(), self.freshness),
        }
    }
}

fn apply_slice(unique: Vec<BeachLocation>, batch: Option<BatchSlice>) -> Vec<BeachLocation> {
    let Some(slice) = batch else {
        return unique;
    };
    if slice.size == 0 {
        return Vec::new();
    }
    let start = slice.index.saturating_mul(slice.size).min(unique.len());
    let end = start.saturating_add(slice.size).min(unique.len());
    unique[start..end].to_vec()
}
