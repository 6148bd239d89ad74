//! Open-Meteo marine forecast endpoint.

use common::types::{Measurement, WeatherRecord};
use serde::Deserialize;

const MARINE_URL: &str = "https://marine-api.open-meteo.com/v1/marine";

pub fn marine_url(lat: f64, lon: f64) -> String {
    format!(
        "{MARINE_URL}?latitude={lat}&longitude={lon}\
         &current=wave_height,wave_direction,wave_period,sea_surface_temperature\
         &timezone=auto"
    )
}

/// Response from the `/v1/marine` endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct MarineResponse {
    #[serde(default)]
    pub current: CurrentMarine,
}

#[derive(Debug, Default, Deserialize)]
pub struct CurrentMarine {
    #[serde(default)]
    pub wave_height: Option<f64>,
    #[serde(default)]
    pub wave_direction: Option<f64>,
    #[serde(default)]
    pub wave_period: Option<f64>,
    #[serde(default)]
    pub sea_surface_temperature: Option<f64>,
}

/// Copy the wave fields into a record, rounding to 1 decimal.
/// Sea temperature is set only when the endpoint carries it; the SST
/// grid fallback fills the gap later.
pub fn apply(record: &mut WeatherRecord, resp: &MarineResponse) {
    record.wave_height = Measurement::rounded(resp.current.wave_height);
    record.wave_direction = Measurement::rounded(resp.current.wave_direction);
    record.wave_period = Measurement::rounded(resp.current.wave_period);
    if resp.current.sea_surface_temperature.is_some() {
        record.sea_temp = Measurement::rounded(resp.current.sea_surface_temperature);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::BeachLocation;

    fn location() -> BeachLocation {
        BeachLocation {
            name: "Test".into(),
            latitude: 37.0,
            longitude: 23.0,
        }
    }

    #[test]
    fn test_deserialize_and_apply() {
        let resp: MarineResponse = serde_json::from_str(
            r#"{
                "current": {
                    "time": "2026-08-06T10:00",
                    "wave_height": 0.48,
                    "wave_direction": 187.0,
                    "wave_period": 4.35,
                    "sea_surface_temperature": 26.84
                }
            }"#,
        )
        .unwrap();
        let mut record = WeatherRecord::unavailable(&location());

        apply(&mut record, &resp);

        assert_eq!(record.wave_height, Measurement::Value(0.5));
        assert_eq!(record.wave_direction, Measurement::Value(187.0));
        assert_eq!(record.wave_period, Measurement::Value(4.4));
        assert_eq!(record.sea_temp, Measurement::Value(26.8));
    }

    #[test]
    fn test_missing_sea_temp_left_untouched() {
        let resp: MarineResponse =
            serde_json::from_str(r#"{"current": {"wave_height": 1.2}}"#).unwrap();
        let mut record = WeatherRecord::unavailable(&location());
        record.sea_temp = Measurement::Value(25.0);

        apply(&mut record, &resp);

        // A grid-sourced value must not be clobbered by an absent one.
        assert_eq!(record.sea_temp, Measurement::Value(25.0));
        assert_eq!(record.wave_height, Measurement::Value(1.2));
        assert_eq!(record.wave_period, Measurement::Unavailable);
    }
}
