//! Coordinate cache-key codec and distance helpers.
//!
//! Cache keys are `"{lat}_{lon}"` with both coordinates rounded to a
//! fixed number of decimal digits. Writes always use
//! [`CANONICAL_PRECISION`]; the multi-precision ladder in
//! [`candidate_keys`] exists only so readers stay compatible with
//! historical cache files whose producers disagreed on precision and
//! formatting.

/// The single write-side precision.
pub const CANONICAL_PRECISION: u32 = 6;

/// Descending precision ladder tried by the lookup fallback.
pub const LOOKUP_PRECISIONS: [u32; 5] = [7, 6, 5, 4, 3];

const EARTH_RADIUS_KM: f64 = 6371.0;

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    // Normalize -0.0 so it cannot produce a key distinct from 0.0's.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Shortest decimal representation of a rounded coordinate. Integral
/// values keep a trailing `.0` to match the historical producer's
/// formatting.
fn format_coord(value: f64) -> String {
    let mut s = format!("{}", value);
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

/// Canonical key for a coordinate pair at the given precision.
pub fn make_key(lat: f64, lon: f64, precision: u32) -> String {
    format!(
        "{}_{}",
        format_coord(round_to(lat, precision)),
        format_coord(round_to(lon, precision))
    )
}

/// Fixed-decimal variant (`37.500000_23.000000`), read-side only.
pub fn fixed_key(lat: f64, lon: f64, precision: u32) -> String {
    let p = precision as usize;
    format!(
        "{:.p$}_{:.p$}",
        round_to(lat, precision),
        round_to(lon, precision),
        p = p
    )
}

/// Ordered candidate keys for lookup fallback: each precision of
/// [`LOOKUP_PRECISIONS`] in both the shortest and fixed-decimal forms,
/// deduplicated while preserving order.
pub fn candidate_keys(lat: f64, lon: f64) -> Vec<String> {
    let mut keys: Vec<String> = Vec::with_capacity(LOOKUP_PRECISIONS.len() * 2);
    for precision in LOOKUP_PRECISIONS {
        for key in [make_key(lat, lon, precision), fixed_key(lat, lon, precision)] {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    keys
}

/// Equirectangular approximation of the distance between two points, in
/// kilometers. Accurate to well under a percent over the Greek extent.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let mean_lat = ((lat1 + lat2) / 2.0).to_radians();
    let x = (lon2 - lon1).to_radians() * mean_lat.cos();
    let y = (lat2 - lat1).to_radians();
    (x * x + y * y).sqrt() * EARTH_RADIUS_KM
}
