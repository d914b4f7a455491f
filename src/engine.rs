//! The coverage engine: session state and request handlers.
//!
//! An [`Engine`] owns both grid indexes, the station list, and the
//! precomputed address distance table for one caller session. Datasets are
//! rebuilt wholesale when re-supplied; precomputed results are invalidated
//! whenever an input dataset changes. There are no process-wide singletons:
//! construct one engine per session and drive it directly, or through the
//! [`worker`](crate::worker) message surface.

use crate::config::EngineConfig;
use crate::coverage;
use crate::error::{FiregridError, Result};
use crate::geometry::ZonePolygon;
use crate::grid::GridIndex;
use crate::records::{AddressDistance, AddressRecord, CoverageSummary, StationRecord, ZoneStats};
use crate::zone;
use geo::Point;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

/// Acknowledgement for an index (re)build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildAck {
    pub count: usize,
    pub elapsed_ms: f64,
}

/// Acknowledgement for the precompute pass, with the dataset-wide summary.
#[derive(Debug, Clone, Serialize)]
pub struct PrecomputeAck {
    pub count: usize,
    pub elapsed_ms: f64,
    pub summary: CoverageSummary,
}

/// Result of one zone analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneReport {
    pub stats: ZoneStats,
    pub elapsed_ms: f64,
}

/// Session-scoped coverage engine.
///
/// # Example
///
/// ```rust
/// use firegrid::{Engine, EngineConfig};
/// use serde_json::json;
///
/// let mut engine = Engine::new(EngineConfig::default());
/// engine.build_hydrant_index(&[json!({"lat": 38.58, "lon": -121.49})])?;
/// let ack = engine.precompute_addresses(
///     &[json!({"lat": 38.581, "lon": -121.491, "street": "1000 I St"})],
///     |_, _| {},
/// )?;
/// assert_eq!(ack.summary.pct_within_500ft, 100.0);
/// # Ok::<(), firegrid::FiregridError>(())
/// ```
pub struct Engine {
    config: EngineConfig,
    hydrant_index: GridIndex<()>,
    /// Kept alongside the index for linear containment scans.
    hydrants: Vec<Point>,
    station_index: GridIndex<usize>,
    stations: Vec<StationRecord>,
    table: Vec<AddressDistance>,
    summary: Option<CoverageSummary>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let hydrant_index = GridIndex::new(config.hydrant_cell_size_deg);
        let station_index = GridIndex::new(config.station_cell_size_deg);
        Self {
            config,
            hydrant_index,
            hydrants: Vec::new(),
            station_index,
            stations: Vec::new(),
            table: Vec::new(),
            summary: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rebuild the hydrant index from raw records.
    ///
    /// Records must carry parseable latitude/longitude; a record without
    /// them fails the whole build and the previous index is kept intact
    /// (no partial index is ever exposed). Non-finite coordinates are
    /// skipped with a warning. Invalidates the precomputed table.
    pub fn build_hydrant_index(&mut self, records: &[Value]) -> Result<BuildAck> {
        let start = Instant::now();

        let mut parsed = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let address = AddressRecord::from_json(record).map_err(|e| {
                FiregridError::InvalidInput(format!("Hydrant record at index {}: {}", idx, e))
            })?;
            parsed.push((address.lat, address.lon));
        }

        self.hydrant_index.clear();
        self.hydrants.clear();
        for (lat, lon) in parsed {
            if !lat.is_finite() || !lon.is_finite() {
                log::warn!("Skipping hydrant with non-finite coordinates ({lat}, {lon})");
                continue;
            }
            self.hydrant_index.insert(lat, lon, ());
            self.hydrants.push(Point::new(lon, lat));
        }
        self.invalidate_table();

        let ack = BuildAck {
            count: self.hydrant_index.len(),
            elapsed_ms: start.elapsed().as_secs_f64() * 1_000.0,
        };
        log::info!(
            "Hydrant index rebuilt: {} points in {:.1} ms",
            ack.count,
            ack.elapsed_ms
        );
        Ok(ack)
    }

    /// Rebuild the station index from typed records.
    ///
    /// Stations with non-finite coordinates are skipped with a warning.
    /// Invalidates the precomputed table.
    pub fn set_stations(&mut self, records: Vec<StationRecord>) -> BuildAck {
        let start = Instant::now();

        self.station_index.clear();
        self.stations.clear();
        for station in records {
            if !station.lat.is_finite() || !station.lon.is_finite() {
                log::warn!(
                    "Skipping station with non-finite coordinates ({}, {})",
                    station.lat,
                    station.lon
                );
                continue;
            }
            let index = self.stations.len();
            self.station_index
                .insert(station.lat, station.lon, index);
            self.stations.push(station);
        }
        self.invalidate_table();

        let ack = BuildAck {
            count: self.stations.len(),
            elapsed_ms: start.elapsed().as_secs_f64() * 1_000.0,
        };
        log::info!("Station index rebuilt: {} points", ack.count);
        ack
    }

    /// Run the address distance precompute pass.
    ///
    /// Proceeds with whatever indexes exist: an empty hydrant index marks
    /// every address underserved, an empty station index yields infinite
    /// station distances. `on_progress` fires at chunk boundaries
    /// (`config.precompute_chunk_size`).
    pub fn precompute_addresses<F>(
        &mut self,
        records: &[Value],
        on_progress: F,
    ) -> Result<PrecomputeAck>
    where
        F: FnMut(usize, usize),
    {
        let start = Instant::now();

        let mut addresses = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let address = AddressRecord::from_json(record).map_err(|e| {
                FiregridError::InvalidInput(format!("Address record at index {}: {}", idx, e))
            })?;
            addresses.push(address);
        }

        if self.hydrant_index.is_empty() {
            log::warn!("Precomputing address distances with an empty hydrant index");
        }

        let (table, summary) = coverage::precompute(
            &addresses,
            &self.hydrant_index,
            &self.station_index,
            self.config.precompute_chunk_size,
            on_progress,
        );

        self.table = table;
        self.summary = Some(summary.clone());

        let ack = PrecomputeAck {
            count: self.table.len(),
            elapsed_ms: start.elapsed().as_secs_f64() * 1_000.0,
            summary,
        };
        log::info!(
            "Precomputed distances for {} addresses in {:.1} ms",
            ack.count,
            ack.elapsed_ms
        );
        Ok(ack)
    }

    /// Analyze one zone polygon against the current session state.
    ///
    /// Meaningful address-derived fields require a prior precompute pass;
    /// without one the zone simply reports zero addresses.
    pub fn analyze_zone(&self, zone: &ZonePolygon) -> ZoneReport {
        let start = Instant::now();
        let stats = zone::analyze(zone, &self.hydrants, &self.stations, &self.table);
        ZoneReport {
            stats,
            elapsed_ms: start.elapsed().as_secs_f64() * 1_000.0,
        }
    }

    /// The precomputed distance table, in address input order.
    pub fn address_distances(&self) -> &[AddressDistance] {
        &self.table
    }

    /// The summary from the last precompute pass, if one has run.
    pub fn summary(&self) -> Option<&CoverageSummary> {
        self.summary.as_ref()
    }

    pub fn hydrant_count(&self) -> usize {
        self.hydrant_index.len()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Look up a station by the `nearest_station` back-reference on an
    /// [`AddressDistance`] record.
    pub fn station(&self, index: usize) -> Option<&StationRecord> {
        self.stations.get(index)
    }

    fn invalidate_table(&mut self) {
        if !self.table.is_empty() {
            log::debug!("Invalidating precomputed distance table after dataset change");
        }
        self.table.clear();
        self.summary = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine_with_data() -> Engine {
        let mut engine = Engine::new(EngineConfig::default());
        engine
            .build_hydrant_index(&[json!({"lat": 38.58, "lon": -121.49})])
            .unwrap();
        engine.set_stations(vec![StationRecord::new(
            38.60,
            -121.50,
            json!({"name": "Station 1"}),
        )]);
        engine
            .precompute_addresses(&[json!({"lat": 38.581, "lon": -121.491})], |_, _| {})
            .unwrap();
        engine
    }

    #[test]
    fn test_build_rejects_bad_records_without_partial_state() {
        let mut engine = engine_with_data();
        assert_eq!(engine.hydrant_count(), 1);

        let err = engine.build_hydrant_index(&[
            json!({"lat": 38.58, "lon": -121.49}),
            json!({"name": "no coordinates"}),
        ]);
        assert!(err.is_err());
        // Previous index survives a rejected rebuild.
        assert_eq!(engine.hydrant_count(), 1);
    }

    #[test]
    fn test_rebuild_invalidates_table() {
        let mut engine = engine_with_data();
        assert_eq!(engine.address_distances().len(), 1);
        assert!(engine.summary().is_some());

        engine
            .build_hydrant_index(&[json!({"lat": 38.59, "lon": -121.48})])
            .unwrap();
        assert!(engine.address_distances().is_empty());
        assert!(engine.summary().is_none());
    }

    #[test]
    fn test_set_stations_skips_non_finite() {
        let mut engine = Engine::new(EngineConfig::default());
        let ack = engine.set_stations(vec![
            StationRecord::new(38.60, -121.50, Value::Null),
            StationRecord::new(f64::NAN, -121.50, Value::Null),
        ]);
        assert_eq!(ack.count, 1);
        assert_eq!(engine.station_count(), 1);
    }

    #[test]
    fn test_precompute_before_indexes_is_not_an_error() {
        let mut engine = Engine::new(EngineConfig::default());
        let ack = engine
            .precompute_addresses(&[json!({"lat": 38.58, "lon": -121.49})], |_, _| {})
            .unwrap();
        assert_eq!(ack.count, 1);
        assert_eq!(ack.summary.pct_underserved, 100.0);
        assert_eq!(ack.summary.pct_within_station_mile, 0.0);
    }

    #[test]
    fn test_station_back_reference() {
        let engine = engine_with_data();
        let record = &engine.address_distances()[0];
        let station = engine.station(record.nearest_station.unwrap()).unwrap();
        assert_eq!(station.payload["name"], "Station 1");
    }
}
