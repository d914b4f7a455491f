//! Per-zone coverage aggregation.
//!
//! One call analyzes one zone polygon against the hydrant list, station
//! list, and the precomputed address distance table. Containment is a
//! linear scan per dataset; per-address distances are reused from the
//! precomputed table, never recomputed here.

use crate::coverage::percentage;
use crate::geometry::ZonePolygon;
use crate::records::{AddressDistance, StationRecord, ZoneClass, ZoneStats};
use geo::Point;

/// Address density (per square mile) below which a zone is rural.
pub const RURAL_DENSITY: f64 = 100.0;
/// Address density (per square mile) below which a zone is suburban.
pub const SUBURBAN_DENSITY: f64 = 1_000.0;

const RURAL_ADVISORY: &str = "Rural zone: hydrant coverage is sparse; fire suppression may \
depend on tanker shuttles or drafting from static water sources.";

/// Compute aggregate coverage statistics for one zone polygon.
///
/// All percentage and average fields degrade to 0 when the zone contains
/// no addresses; a zero-area polygon classifies as
/// [`ZoneClass::Unknown`] with zero densities.
pub fn analyze(
    zone: &ZonePolygon,
    hydrants: &[Point],
    stations: &[StationRecord],
    table: &[AddressDistance],
) -> ZoneStats {
    let hydrant_count = hydrants
        .iter()
        .filter(|p| zone.contains(p.y(), p.x()))
        .count();
    let station_count = stations
        .iter()
        .filter(|s| zone.contains(s.lat, s.lon))
        .count();

    let mut address_count = 0usize;
    let mut within_500 = 0usize;
    let mut within_1000 = 0usize;
    let mut hydrant_sum = 0.0;
    let mut hydrant_finite = 0usize;
    let mut min_hydrant = f64::INFINITY;
    let mut max_hydrant: f64 = 0.0;
    let mut station_sum = 0.0;
    let mut station_finite = 0usize;

    for record in table {
        if !zone.contains(record.address.lat, record.address.lon) {
            continue;
        }
        address_count += 1;
        if record.within_500ft {
            within_500 += 1;
        }
        if record.within_1000ft {
            within_1000 += 1;
        }
        if record.nearest_hydrant_ft.is_finite() {
            hydrant_sum += record.nearest_hydrant_ft;
            hydrant_finite += 1;
            min_hydrant = min_hydrant.min(record.nearest_hydrant_ft);
            max_hydrant = max_hydrant.max(record.nearest_hydrant_ft);
        }
        if record.nearest_station_ft.is_finite() {
            station_sum += record.nearest_station_ft;
            station_finite += 1;
        }
    }

    let area_sq_miles = zone.area_sq_miles();

    let (address_density, hydrant_density) = if area_sq_miles > 0.0 {
        (
            address_count as f64 / area_sq_miles,
            hydrant_count as f64 / area_sq_miles,
        )
    } else {
        (0.0, 0.0)
    };

    let (classification, advisory) = classify(area_sq_miles, address_density);

    ZoneStats {
        hydrant_count,
        station_count,
        address_count,
        pct_within_500ft: percentage(within_500, address_count),
        pct_within_1000ft: percentage(within_1000, address_count),
        avg_hydrant_distance_ft: average(hydrant_sum, hydrant_finite),
        min_hydrant_distance_ft: if hydrant_finite > 0 { min_hydrant } else { 0.0 },
        max_hydrant_distance_ft: max_hydrant,
        avg_station_distance_ft: average(station_sum, station_finite),
        area_sq_miles,
        address_density,
        hydrant_density,
        classification,
        advisory,
    }
}

fn classify(area_sq_miles: f64, address_density: f64) -> (ZoneClass, Option<String>) {
    if area_sq_miles <= 0.0 {
        return (ZoneClass::Unknown, None);
    }
    if address_density < RURAL_DENSITY {
        (ZoneClass::Rural, Some(RURAL_ADVISORY.to_string()))
    } else if address_density < SUBURBAN_DENSITY {
        (ZoneClass::Suburban, None)
    } else {
        (ZoneClass::Urban, None)
    }
}

fn average(sum: f64, count: usize) -> f64 {
    if count > 0 { sum / count as f64 } else { 0.0 }
}
