//! Bulk sea-surface-temperature grid from NOAA CoastWatch ERDDAP.
//!
//! One request covers the whole Greek bounding box, so the grid is
//! fetched once per run and shared by every per-beach fetch. The cache
//! is an owned component with its own TTL rather than process-global
//! state, so staleness behavior is testable.

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::http::RetryingHttp;

const SST_BASE_URL: &str = "https://coastwatch.pfeg.noaa.gov/erddap/griddap/jplMURSST41.json";
// Latest analysed SST over lat 34–42, lon 19–29.
const SST_QUERY: &str = "analysed_sst[(last)][(34):1:(42)][(19):1:(29)]";

pub fn sst_url() -> String {
    format!("{SST_BASE_URL}?{SST_QUERY}")
}

#[derive(Debug, Clone, Copy)]
struct GridPoint {
    lat: f64,
    lon: f64,
    temp: f64,
}

/// Valid SST samples for the region, answering nearest-point queries.
#[derive(Debug)]
pub struct SeaTempGrid {
    points: Vec<GridPoint>,
}

impl SeaTempGrid {
    /// Parse an ERDDAP table response. Rows are `[time, lat, lon, sst]`;
    /// null or out-of-range temperatures are dropped.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, Error> {
        let rows = value["table"]["rows"]
            .as_array()
            .ok_or_else(|| Error::Http("ERDDAP response has no table.rows".into()))?;

        let mut points = Vec::with_capacity(rows.len());
        for row in rows {
            let (Some(lat), Some(lon)) = (row[1].as_f64(), row[2].as_f64()) else {
                continue;
            };
            let Some(sst) = row[3].as_f64() else {
                continue;
            };
            if sst <= -10.0 || sst >= 50.0 {
                continue;
            }
            points.push(GridPoint {
                lat,
                lon,
                temp: (sst * 10.0).round() / 10.0,
            });
        }

        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Temperature at the nearest grid point, or `None` when the
    /// nearest point is farther than `max_distance_deg` (planar degree
    /// distance, matching the grid's own spacing).
    pub fn nearest(&self, lat: f64, lon: f64, max_distance_deg: f64) -> Option<f64> {
        let mut best: Option<(f64, f64)> = None;
        for point in &self.points {
            let d = ((point.lat - lat).powi(2) + (point.lon - lon).powi(2)).sqrt();
            if best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, point.temp));
            }
        }
        best.and_then(|(d, temp)| (d < max_distance_deg).then_some(temp))
    }
}

struct CachedGrid {
    grid: Arc<SeaTempGrid>,
    fetched_at: Instant,
}

/// TTL cache around the one-per-run grid fetch. A fetch failure keeps
/// serving the previous grid (stale data beats none); only a first-ever
/// failure yields `None`.
pub struct SeaTempCache {
    ttl: Duration,
    slot: Mutex<Option<CachedGrid>>,
}

impl SeaTempCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub async fn get_or_fetch(&self, http: &RetryingHttp) -> Option<Arc<SeaTempGrid>> {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return Some(cached.grid.clone());
            }
        }

        match fetch_grid(http).await {
            Ok(grid) => {
                info!("sea temperature grid refreshed: {} valid points", grid.len());
                let grid = Arc::new(grid);
                *slot = Some(CachedGrid {
                    grid: grid.clone(),
                    fetched_at: Instant::now(),
                });
                Some(grid)
            }
            Err(e) => {
                warn!("sea temperature grid fetch failed: {}", e);
                slot.as_ref().map(|cached| cached.grid.clone())
            }
        }
    }
}

async fn fetch_grid(http: &RetryingHttp) -> Result<SeaTempGrid, Error> {
    let value = http.get_json(&sst_url()).await?;
    SeaTempGrid::from_json(&value)
}
