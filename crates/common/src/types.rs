//! Domain types shared across the updater.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A beach location from the registry CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct BeachLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

// ── Measurement ───────────────────────────────────────────────────────

/// A single observed value that may be missing upstream.
///
/// Serializes as a JSON number or the string `"unavailable"`, so every
/// field of a [`WeatherRecord`] is always present in the cache file and
/// consumers never need key-existence checks. Deserialization accepts
/// any string or null as `Unavailable` — historical cache files used
/// `"N/A"`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Measurement {
    Value(f64),
    #[default]
    Unavailable,
}

const UNAVAILABLE: &str = "unavailable";

impl Measurement {
    /// Wrap an optional provider value, rounding to 1 decimal place.
    pub fn rounded(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Measurement::Value((v * 10.0).round() / 10.0),
            _ => Measurement::Unavailable,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Measurement::Value(v) => Some(*v),
            Measurement::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Measurement::Value(_))
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::Value(v) => write!(f, "{}", v),
            Measurement::Unavailable => f.write_str(UNAVAILABLE),
        }
    }
}

impl Serialize for Measurement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Measurement::Value(v) => serializer.serialize_f64(*v),
            Measurement::Unavailable => serializer.serialize_str(UNAVAILABLE),
        }
    }
}

struct MeasurementVisitor;

impl<'de> Visitor<'de> for MeasurementVisitor {
    type Value = Measurement;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or an unavailable sentinel")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Measurement, E> {
        Ok(Measurement::Value(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Measurement, E> {
        Ok(Measurement::Value(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Measurement, E> {
        Ok(Measurement::Value(v as f64))
    }

    fn visit_str<E: de::Error>(self, _v: &str) -> Result<Measurement, E> {
        Ok(Measurement::Unavailable)
    }

    fn visit_none<E: de::Error>(self) -> Result<Measurement, E> {
        Ok(Measurement::Unavailable)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Measurement, E> {
        Ok(Measurement::Unavailable)
    }
}

impl<'de> Deserialize<'de> for Measurement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MeasurementVisitor)
    }
}

// ── WeatherRecord ─────────────────────────────────────────────────────

/// The per-beach record persisted in the weather cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub beach_name: String,
    /// Precise source coordinate, not the rounded cache key.
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub air_temp: Measurement,
    #[serde(default)]
    pub wind_speed: Measurement,
    #[serde(default)]
    pub wind_direction: Measurement,
    #[serde(default)]
    pub wave_height: Measurement,
    #[serde(default)]
    pub wave_direction: Measurement,
    #[serde(default)]
    pub wave_period: Measurement,
    #[serde(default)]
    pub sea_temp: Measurement,
    /// ISO-8601 timestamp. Kept as a string so a malformed value marks
    /// the record stale instead of failing deserialization of the whole
    /// cache.
    #[serde(default)]
    pub last_updated: String,
}

impl WeatherRecord {
    /// A record with every measurement unavailable, stamped now.
    pub fn unavailable(location: &BeachLocation) -> Self {
        Self {
            beach_name: location.name.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            air_temp: Measurement::Unavailable,
            wind_speed: Measurement::Unavailable,
            wind_direction: Measurement::Unavailable,
            wave_height: Measurement::Unavailable,
            wave_direction: Measurement::Unavailable,
            wave_period: Measurement::Unavailable,
            sea_temp: Measurement::Unavailable,
            last_updated: now_iso(),
        }
    }

    /// Parse `last_updated`, tolerating both RFC 3339 and the naive
    /// ISO-8601 form older producers wrote.
    pub fn parsed_last_updated(&self) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.last_updated) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.last_updated, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// Stale when older than `max_age` or when the timestamp cannot be
    /// parsed at all.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match self.parsed_last_updated() {
            Some(updated) => now - updated > max_age,
            None => true,
        }
    }
}

/// Current timestamp in the cache's ISO-8601 format.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The persisted cache: canonical key → record.
///
/// A BTreeMap keeps serialization and nearest-neighbor tie-breaking
/// deterministic for a fixed snapshot.
pub type WeatherCache = BTreeMap<String, WeatherRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> BeachLocation {
        BeachLocation {
            name: "Voidokilia".into(),
            latitude: 36.961,
            longitude: 21.658,
        }
    }

    #[test]
    fn test_measurement_serializes_value_or_sentinel() {
        assert_eq!(
            serde_json::to_string(&Measurement::Value(24.5)).unwrap(),
            "24.5"
        );
        assert_eq!(
            serde_json::to_string(&Measurement::Unavailable).unwrap(),
            "\"unavailable\""
        );
    }

    #[test]
    fn test_measurement_deserializes_numbers_and_strings() {
        let v: Measurement = serde_json::from_str("24.5").unwrap();
        assert_eq!(v, Measurement::Value(24.5));

        let v: Measurement = serde_json::from_str("18").unwrap();
        assert_eq!(v, Measurement::Value(18.0));

        let v: Measurement = serde_json::from_str("\"unavailable\"").unwrap();
        assert_eq!(v, Measurement::Unavailable);

        // Legacy producers wrote "N/A".
        let v: Measurement = serde_json::from_str("\"N/A\"").unwrap();
        assert_eq!(v, Measurement::Unavailable);

        let v: Measurement = serde_json::from_str("null").unwrap();
        assert_eq!(v, Measurement::Unavailable);
    }

    #[test]
    fn test_measurement_rounds_to_one_decimal() {
        assert_eq!(Measurement::rounded(Some(24.55)), Measurement::Value(24.6));
        assert_eq!(Measurement::rounded(Some(f64::NAN)), Measurement::Unavailable);
        assert_eq!(Measurement::rounded(None), Measurement::Unavailable);
    }

    #[test]
    fn test_record_round_trips_with_all_fields_present() {
        let mut record = WeatherRecord::unavailable(&location());
        record.air_temp = Measurement::Value(27.3);
        record.sea_temp = Measurement::Value(23.1);

        let json = serde_json::to_string(&record).unwrap();
        for field in [
            "air_temp",
            "wind_speed",
            "wind_direction",
            "wave_height",
            "wave_direction",
            "wave_period",
            "sea_temp",
            "last_updated",
        ] {
            assert!(json.contains(field), "missing field {field}");
        }

        let back: WeatherRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_parses_rfc3339_and_naive_timestamps() {
        let mut record = WeatherRecord::unavailable(&location());

        record.last_updated = "2026-08-06T10:00:00Z".into();
        assert!(record.parsed_last_updated().is_some());

        // Python datetime.isoformat() output has no offset.
        record.last_updated = "2026-08-06T10:00:00.123456".into();
        assert!(record.parsed_last_updated().is_some());

        record.last_updated = "yesterday-ish".into();
        assert!(record.parsed_last_updated().is_none());
    }

    #[test]
    fn test_unparseable_timestamp_is_stale() {
        let now = Utc::now();
        let mut record = WeatherRecord::unavailable(&location());

        record.last_updated = "not a timestamp".into();
        assert!(record.is_stale(now, Duration::hours(6)));

        record.last_updated = (now - Duration::hours(1))
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        assert!(!record.is_stale(now, Duration::hours(6)));

        record.last_updated = (now - Duration::hours(7))
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        assert!(record.is_stale(now, Duration::hours(6)));
    }
}
