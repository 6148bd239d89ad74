//! Open-Meteo atmospheric forecast endpoint.

use common::types::{Measurement, WeatherRecord};
use serde::Deserialize;

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Current-conditions request for a coordinate. Addressed by the exact
/// latitude/longitude, never the rounded cache key.
pub fn forecast_url(lat: f64, lon: f64) -> String {
    format!(
        "{FORECAST_URL}?latitude={lat}&longitude={lon}\
         &current=temperature_2m,wind_speed_10m,wind_direction_10m\
         &timezone=auto&forecast_days=1"
    )
}

/// Response from the `/v1/forecast` endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub current: CurrentWeather,
}

#[derive(Debug, Default, Deserialize)]
pub struct CurrentWeather {
    #[serde(default)]
    pub temperature_2m: Option<f64>,
    #[serde(default)]
    pub wind_speed_10m: Option<f64>,
    #[serde(default)]
    pub wind_direction_10m: Option<f64>,
}

/// Copy the atmospheric fields into a record, rounding to 1 decimal.
pub fn apply(record: &mut WeatherRecord, resp: &ForecastResponse) {
    record.air_temp = Measurement::rounded(resp.current.temperature_2m);
    record.wind_speed = Measurement::rounded(resp.current.wind_speed_10m);
    record.wind_direction = Measurement::rounded(resp.current.wind_direction_10m);
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::BeachLocation;

    fn sample_response() -> &'static str {
        r#"{
            "latitude": 37.98,
            "longitude": 23.72,
            "current": {
                "time": "2026-08-06T10:00",
                "temperature_2m": 31.27,
                "wind_speed_10m": 14.04,
                "wind_direction_10m": 312.6
            }
        }"#
    }

    #[test]
    fn test_deserialize_and_apply() {
        let resp: ForecastResponse = serde_json::from_str(sample_response()).unwrap();
        let mut record = WeatherRecord::unavailable(&BeachLocation {
            name: "Test".into(),
            latitude: 37.98,
            longitude: 23.72,
        });

        apply(&mut record, &resp);

        assert_eq!(record.air_temp, Measurement::Value(31.3));
        assert_eq!(record.wind_speed, Measurement::Value(14.0));
        assert_eq!(record.wind_direction, Measurement::Value(312.6));
    }

    #[test]
    fn test_null_fields_become_unavailable() {
        let resp: ForecastResponse = serde_json::from_str(
            r#"{"current": {"temperature_2m": null, "wind_speed_10m": 5.0}}"#,
        )
        .unwrap();
        let mut record = WeatherRecord::unavailable(&BeachLocation {
            name: "Test".into(),
            latitude: 37.0,
            longitude: 23.0,
        });

        apply(&mut record, &resp);

        assert_eq!(record.air_temp, Measurement::Unavailable);
        assert_eq!(record.wind_speed, Measurement::Value(5.0));
        assert_eq!(record.wind_direction, Measurement::Unavailable);
    }

    #[test]
    fn test_url_uses_exact_coordinates() {
        let url = forecast_url(37.1234567, 23.7654321);
        assert!(url.contains("latitude=37.1234567"));
        assert!(url.contains("longitude=23.7654321"));
    }
}
