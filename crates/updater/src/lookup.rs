//! Fuzzy coordinate lookup over the weather cache.
//!
//! Producers and consumers have historically disagreed on key
//! precision and formatting, so a bare key lookup is not enough. The
//! matcher tries, in order: the exact native-format key, the
//! multi-precision candidate ladder, and finally a nearest-neighbor
//! scan bounded by a distance cutoff.

use common::geo::{candidate_keys, distance_km};
use common::types::{WeatherCache, WeatherRecord};

/// Resolve the best-matching cache entry for a query coordinate, or
/// `None` when nothing lies within `max_distance_km`. Read-only.
pub fn find(
    lat: f64,
    lon: f64,
    cache: &WeatherCache,
    max_distance_km: f64,
) -> Option<&WeatherRecord> {
    if cache.is_empty() {
        return None;
    }

    // 1. Exact key at native float formatting.
    let exact = format!("{}_{}", lat, lon);
    if let Some(record) = cache.get(&exact) {
        return Some(record);
    }

    // 2. Rounded keys, highest precision first, both formats.
    for key in candidate_keys(lat, lon) {
        if let Some(record) = cache.get(&key) {
            return Some(record);
        }
    }

    // 3. Nearest stored coordinate within the cutoff. Strict `<` keeps
    // the first-encountered entry on an exact distance tie, which is
    // deterministic for a BTreeMap snapshot.
    let mut best: Option<(f64, &WeatherRecord)> = None;
    for record in cache.values() {
        let d = distance_km(lat, lon, record.latitude, record.longitude);
        if best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, record));
        }
    }

    best.and_then(|(d, record)| (d <= max_distance_km).then_some(record))
}
