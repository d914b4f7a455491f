//! Input records and derived coverage statistics.
//!
//! Ingestion (CSV/GeoJSON parsing, file loading) happens outside this
//! crate; records arrive as JSON objects that must already carry latitude
//! and longitude fields. Everything else on a record is opaque and carried
//! through unchanged.

use crate::error::{FiregridError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys accepted for latitude on incoming records.
const LAT_KEYS: &[&str] = &["lat", "latitude", "y"];
/// Keys accepted for longitude on incoming records.
const LON_KEYS: &[&str] = &["lon", "lng", "longitude", "x"];

/// One property address with its opaque source fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressRecord {
    pub lat: f64,
    pub lon: f64,
    /// Source fields other than the coordinates, carried through verbatim.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl AddressRecord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            fields: Map::new(),
        }
    }

    /// Parse a raw JSON record, requiring parseable coordinates.
    ///
    /// A record without them cannot be repaired downstream, so the whole
    /// dataset is rejected at this boundary rather than building a partial
    /// table.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| FiregridError::InvalidInput("Record is not a JSON object".into()))?;

        let lat = coordinate_field(object, LAT_KEYS)
            .ok_or_else(|| FiregridError::InvalidInput("Record is missing a latitude field".into()))?;
        let lon = coordinate_field(object, LON_KEYS)
            .ok_or_else(|| FiregridError::InvalidInput("Record is missing a longitude field".into()))?;

        let fields = object
            .iter()
            .filter(|(key, _)| {
                !LAT_KEYS.contains(&key.as_str()) && !LON_KEYS.contains(&key.as_str())
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self { lat, lon, fields })
    }
}

/// One fire station with its opaque payload (name, apparatus, source row).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRecord {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub payload: Value,
}

impl StationRecord {
    pub fn new(lat: f64, lon: f64, payload: Value) -> Self {
        Self { lat, lon, payload }
    }
}

fn coordinate_field(object: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    for key in keys {
        match object.get(*key) {
            Some(Value::Number(n)) => return n.as_f64(),
            Some(Value::String(s)) => {
                if let Ok(parsed) = s.trim().parse::<f64>() {
                    return Some(parsed);
                }
            }
            _ => {}
        }
    }
    None
}

/// Per-address proximity record, derived once per address dataset.
///
/// Distances are in feet; `f64::INFINITY` is the "no coverage" sentinel
/// when the corresponding index held no reachable point. The source
/// address is copied in, never referenced back.
#[derive(Debug, Clone, Serialize)]
pub struct AddressDistance {
    pub address: AddressRecord,
    pub nearest_hydrant_ft: f64,
    pub nearest_station_ft: f64,
    /// Index into the engine's station list, when a station was found.
    pub nearest_station: Option<usize>,
    pub within_500ft: bool,
    pub within_1000ft: bool,
    pub underserved: bool,
    pub within_station_mile: bool,
}

/// Dataset-wide coverage summary produced by the precompute pass.
///
/// Percentages are reported to one decimal place; an empty dataset reports
/// zeros throughout. Mean distances are taken over finite distances only
/// and fall back to the `+inf` sentinel when none exist.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoverageSummary {
    pub total_addresses: usize,
    pub within_500ft: usize,
    pub within_1000ft: usize,
    pub underserved: usize,
    pub within_station_mile: usize,
    pub pct_within_500ft: f64,
    pub pct_within_1000ft: f64,
    pub pct_underserved: f64,
    pub pct_within_station_mile: f64,
    pub mean_hydrant_distance_ft: f64,
    pub mean_station_distance_ft: f64,
}

/// Density-based zone classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneClass {
    Rural,
    Suburban,
    Urban,
    /// Fallback when the zone polygon has zero estimated area.
    Unknown,
}

/// Aggregate statistics for one zone polygon.
///
/// Recomputed fully on every analysis request; never merged incrementally.
/// All percentage and average fields are defined (zero) when the zone
/// contains no addresses.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneStats {
    pub hydrant_count: usize,
    pub station_count: usize,
    pub address_count: usize,
    pub pct_within_500ft: f64,
    pub pct_within_1000ft: f64,
    pub avg_hydrant_distance_ft: f64,
    pub min_hydrant_distance_ft: f64,
    pub max_hydrant_distance_ft: f64,
    pub avg_station_distance_ft: f64,
    pub area_sq_miles: f64,
    /// Addresses per square mile.
    pub address_density: f64,
    /// Hydrants per square mile.
    pub hydrant_density: f64,
    pub classification: ZoneClass,
    /// Water-supply advisory attached to rural zones.
    pub advisory: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_address_from_json() {
        let record = AddressRecord::from_json(&json!({
            "lat": 38.58,
            "lon": -121.49,
            "street": "1000 I St",
            "zip": "95814"
        }))
        .unwrap();

        assert_eq!(record.lat, 38.58);
        assert_eq!(record.lon, -121.49);
        assert_eq!(record.fields.get("street"), Some(&json!("1000 I St")));
        assert!(!record.fields.contains_key("lat"));
    }

    #[test]
    fn test_address_from_json_alternate_keys() {
        let record = AddressRecord::from_json(&json!({
            "latitude": "38.58",
            "longitude": "-121.49"
        }))
        .unwrap();
        assert_eq!(record.lat, 38.58);
        assert_eq!(record.lon, -121.49);
    }

    #[test]
    fn test_address_from_json_missing_coordinates() {
        assert!(AddressRecord::from_json(&json!({"lat": 38.58})).is_err());
        assert!(AddressRecord::from_json(&json!({"street": "1000 I St"})).is_err());
        assert!(AddressRecord::from_json(&json!("not an object")).is_err());
    }

    #[test]
    fn test_address_from_json_unparseable_string() {
        assert!(AddressRecord::from_json(&json!({
            "lat": "n/a",
            "lon": -121.49
        }))
        .is_err());
    }

    #[test]
    fn test_coverage_summary_default_is_zeroed() {
        let summary = CoverageSummary::default();
        assert_eq!(summary.total_addresses, 0);
        assert_eq!(summary.pct_within_500ft, 0.0);
        assert_eq!(summary.mean_hydrant_distance_ft, 0.0);
    }
}
