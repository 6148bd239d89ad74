//! Beach registry CSV loader.
//!
//! The registry carries `Name`, `Latitude`, `Longitude` plus
//! descriptive columns this engine ignores. Rows with missing or
//! non-numeric coordinates are skipped and logged; a missing or
//! unreadable file is fatal.

use std::collections::HashSet;
use std::path::Path;

use common::geo::{make_key, CANONICAL_PRECISION};
use common::types::BeachLocation;
use common::Error;
use tracing::{info, warn};

const REQUIRED_COLUMNS: [&str; 3] = ["name", "latitude", "longitude"];

/// Load all beach locations with usable coordinates.
pub fn load_registry(path: &Path) -> Result<Vec<BeachLocation>, Error> {
    if !path.exists() {
        return Err(Error::Registry(format!(
            "beach registry not found at {}",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::Registry(format!("failed to open {}: {}", path.display(), e)))?;

    let headers = reader
        .headers()
        .map_err(|e| Error::Registry(format!("failed to read headers: {}", e)))?
        .clone();

    let mut indices = [0usize; 3];
    for (slot, wanted) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                Error::Registry(format!("registry is missing a '{wanted}' column"))
            })?;
    }
    let [name_idx, lat_idx, lon_idx] = indices;

    let mut locations = Vec::new();
    let mut skipped = 0usize;

    for (row_number, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("skipping unreadable registry row {}: {}", row_number + 2, e);
                skipped += 1;
                continue;
            }
        };

        let name = record.get(name_idx).unwrap_or("").trim();
        let lat = record.get(lat_idx).unwrap_or("").trim().parse::<f64>();
        let lon = record.get(lon_idx).unwrap_or("").trim().parse::<f64>();

        match (lat, lon) {
            (Ok(latitude), Ok(longitude)) if !name.is_empty() => {
                locations.push(BeachLocation {
                    name: name.to_string(),
                    latitude,
                    longitude,
                });
            }
            _ => {
                warn!(
                    "skipping registry row {} ({}): missing or non-numeric coordinates",
                    row_number + 2,
                    if name.is_empty() { "<unnamed>" } else { name }
                );
                skipped += 1;
            }
        }
    }

    info!(
        "loaded {} beaches from {} ({} rows skipped)",
        locations.len(),
        path.display(),
        skipped
    );

    Ok(locations)
}

/// Deduplicate locations sharing a coordinate at the canonical key
/// precision, keeping the first occurrence. One fetch serves every
/// beach at that point.
pub fn unique_locations(locations: Vec<BeachLocation>) -> Vec<BeachLocation> {
    let mut seen: HashSet<String> = HashSet::with_capacity(locations.len());
    locations
        .into_iter()
        .filter(|loc| seen.insert(make_key(loc.latitude, loc.longitude, CANONICAL_PRECISION)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loads_rows_and_ignores_extra_columns() {
        let file = write_csv(
            "Name,Region,Latitude,Longitude,Notes\n\
             Voidokilia,Messinia,36.961,21.658,dune beach\n\
             Elafonisi,Chania,35.271,23.539,lagoon\n",
        );

        let locations = load_registry(file.path()).unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].name, "Voidokilia");
        assert!((locations[1].latitude - 35.271).abs() < 1e-9);
    }

    #[test]
    fn test_skips_bad_rows_without_failing() {
        let file = write_csv(
            "Name,Latitude,Longitude\n\
             Good,36.961,21.658\n\
             NoCoords,,\n\
             BadNumber,thirty-six,21.0\n\
             ,36.0,21.0\n\
             AlsoGood,35.271,23.539\n",
        );

        let locations = load_registry(file.path()).unwrap();
        let names: Vec<&str> = locations.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Good", "AlsoGood"]);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let file = write_csv("Name,Lat,Lon\nX,36.0,21.0\n");
        let err = load_registry(file.path()).unwrap_err();
        assert!(matches!(err, Error::Registry(_)));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_registry(Path::new("/nonexistent/beaches.csv")).unwrap_err();
        assert!(matches!(err, Error::Registry(_)));
    }

    #[test]
    fn test_unique_locations_dedupes_shared_coordinates() {
        let locations = vec![
            BeachLocation {
                name: "North End".into(),
                latitude: 36.961,
                longitude: 21.658,
            },
            BeachLocation {
                name: "South End".into(),
                latitude: 36.961,
                longitude: 21.658,
            },
            BeachLocation {
                name: "Elsewhere".into(),
                latitude: 35.271,
                longitude: 23.539,
            },
        ];

        let unique = unique_locations(locations);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].name, "North End");
    }
}
