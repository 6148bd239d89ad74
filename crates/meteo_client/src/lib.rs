//! Weather and marine data clients.
//!
//! Fetches current conditions from the Open-Meteo forecast and marine
//! endpoints and enriches sea temperature from the NOAA ERDDAP SST
//! grid, normalizing everything into the shared `WeatherRecord`.

pub mod forecast;
pub mod http;
pub mod marine;
pub mod rate_limit;
pub mod sea_temp;

use common::config::FetchConfig;
use common::types::{BeachLocation, Measurement, WeatherRecord};
use common::Error;
use tracing::{debug, warn};

pub use http::RetryingHttp;
pub use rate_limit::RateLimiter;
pub use sea_temp::{SeaTempCache, SeaTempGrid};

/// Client for the per-beach weather and marine endpoints.
#[derive(Debug, Clone)]
pub struct MeteoClient {
    http: RetryingHttp,
    sea_temp_max_distance_deg: f64,
}

impl MeteoClient {
    pub fn new(cfg: &FetchConfig) -> Self {
        Self {
            http: RetryingHttp::new(cfg),
            sea_temp_max_distance_deg: cfg.sea_temp_max_distance_deg,
        }
    }

    /// The shared rate-limited HTTP path, also used for the grid fetch.
    pub fn http(&self) -> &RetryingHttp {
        &self.http
    }

    /// Fetch current conditions for one beach.
    ///
    /// The atmospheric and marine endpoints are independent: if one of
    /// them fails after retries its fields stay unavailable and the
    /// other's data is still returned. Only both failing is an error.
    pub async fn fetch_weather(
        &self,
        location: &BeachLocation,
        grid: Option<&SeaTempGrid>,
    ) -> Result<WeatherRecord, Error> {
        let forecast_result = self
            .http
            .get_json(&forecast::forecast_url(location.latitude, location.longitude))
            .await
            .and_then(|v| Ok(serde_json::from_value::<forecast::ForecastResponse>(v)?));

        let marine_result = self
            .http
            .get_json(&marine::marine_url(location.latitude, location.longitude))
            .await
            .and_then(|v| Ok(serde_json::from_value::<marine::MarineResponse>(v)?));

        let record = build_record(
            location,
            forecast_result,
            marine_result,
            grid,
            self.sea_temp_max_distance_deg,
        )?;

        debug!("weather fetched for {}", location.name);
        Ok(record)
    }
}

/// Assemble a record from the two endpoint results plus the optional
/// SST grid. Pure so the degradation rules are testable offline.
fn build_record(
    location: &BeachLocation,
    forecast_result: Result<forecast::ForecastResponse, Error>,
    marine_result: Result<marine::MarineResponse, Error>,
    grid: Option<&SeaTempGrid>,
    sea_temp_max_distance_deg: f64,
) -> Result<WeatherRecord, Error> {
    let mut record = WeatherRecord::unavailable(location);
    let mut failures: Vec<String> = Vec::new();

    match forecast_result {
        Ok(resp) => forecast::apply(&mut record, &resp),
        Err(e) => {
            warn!("atmospheric fetch failed for {}: {}", location.name, e);
            failures.push(format!("atmospheric: {e}"));
        }
    }

    match marine_result {
        Ok(resp) => marine::apply(&mut record, &resp),
        Err(e) => {
            warn!("marine fetch failed for {}: {}", location.name, e);
            failures.push(format!("marine: {e}"));
        }
    }

    if failures.len() == 2 {
        return Err(Error::Fetch {
            beach: location.name.clone(),
            cause: failures.join("; "),
        });
    }

    if !record.sea_temp.is_available() {
        if let Some(grid) = grid {
            record.sea_temp = Measurement::rounded(grid.nearest(
                location.latitude,
                location.longitude,
                sea_temp_max_distance_deg,
            ));
        }
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> BeachLocation {
        BeachLocation {
            name: "Falassarna".into(),
            latitude: 35.495,
            longitude: 23.58,
        }
    }

    fn forecast_ok() -> forecast::ForecastResponse {
        serde_json::from_str(
            r#"{"current": {"temperature_2m": 30.0, "wind_speed_10m": 12.0, "wind_direction_10m": 200.0}}"#,
        )
        .unwrap()
    }

    fn marine_ok() -> marine::MarineResponse {
        serde_json::from_str(
            r#"{"current": {"wave_height": 0.8, "wave_direction": 190.0, "wave_period": 5.0}}"#,
        )
        .unwrap()
    }

    fn grid() -> SeaTempGrid {
        SeaTempGrid::from_json(&serde_json::json!({
            "table": {"rows": [["t", 35.5, 23.5, 25.93]]}
        }))
        .unwrap()
    }

    #[test]
    fn test_both_endpoints_populate_record() {
        let record = build_record(
            &location(),
            Ok(forecast_ok()),
            Ok(marine_ok()),
            Some(&grid()),
            2.0,
        )
        .unwrap();

        assert_eq!(record.air_temp, Measurement::Value(30.0));
        assert_eq!(record.wave_height, Measurement::Value(0.8));
        // Marine response had no SST, so the grid fills it in.
        assert_eq!(record.sea_temp, Measurement::Value(25.9));
    }

    #[test]
    fn test_atmospheric_down_degrades_to_unavailable() {
        let record = build_record(
            &location(),
            Err(Error::Http("timeout".into())),
            Ok(marine_ok()),
            None,
            2.0,
        )
        .unwrap();

        assert_eq!(record.air_temp, Measurement::Unavailable);
        assert_eq!(record.wind_speed, Measurement::Unavailable);
        assert_eq!(record.wind_direction, Measurement::Unavailable);
        assert_eq!(record.wave_height, Measurement::Value(0.8));
        assert_eq!(record.wave_period, Measurement::Value(5.0));
    }

    #[test]
    fn test_both_endpoints_down_is_an_error() {
        let result = build_record(
            &location(),
            Err(Error::Http("timeout".into())),
            Err(Error::Http("refused".into())),
            Some(&grid()),
            2.0,
        );

        match result {
            Err(Error::Fetch { beach, .. }) => assert_eq!(beach, "Falassarna"),
            other => panic!("expected Fetch error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_grid_too_far_leaves_sea_temp_unavailable() {
        let far_grid = SeaTempGrid::from_json(&serde_json::json!({
            "table": {"rows": [["t", 41.9, 28.9, 22.0]]}
        }))
        .unwrap();

        let record = build_record(
            &location(),
            Ok(forecast_ok()),
            Ok(marine_ok()),
            Some(&far_grid),
            2.0,
        )
        .unwrap();

        assert_eq!(record.sea_temp, Measurement::Unavailable);
    }

    #[test]
    fn test_marine_sea_temp_wins_over_grid() {
        let marine: marine::MarineResponse = serde_json::from_str(
            r#"{"current": {"wave_height": 0.8, "sea_surface_temperature": 27.46}}"#,
        )
        .unwrap();

        let record = build_record(&location(), Ok(forecast_ok()), Ok(marine), Some(&grid()), 2.0)
            .unwrap();

        assert_eq!(record.sea_temp, Measurement::Value(27.5));
    }
}
