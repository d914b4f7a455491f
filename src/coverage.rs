//! Address distance precomputation.
//!
//! A single pass over the address dataset resolves nearest-hydrant and
//! nearest-station distances through the grid indexes and tags each
//! address with its coverage flags. The pass runs in input order and is
//! chunked so a worker can flush progress notifications between chunks.

use crate::grid::GridIndex;
use crate::records::{AddressDistance, AddressRecord, CoverageSummary};
use crate::spatial::FEET_PER_MILE;

/// Addresses within this hydrant distance have optimal coverage.
pub const HYDRANT_OPTIMAL_FT: f64 = 500.0;
/// Addresses within this hydrant distance have marginal coverage; beyond
/// it they are underserved.
pub const HYDRANT_MARGINAL_FT: f64 = 1_000.0;
/// Station coverage boundary, one statute mile.
pub const STATION_MILE_FT: f64 = FEET_PER_MILE;

/// Resolve distances and coverage flags for every address, in input order.
///
/// The hydrant index is expected to be built; an empty hydrant index makes
/// every address underserved with an infinite distance. Stations are
/// optional: with none set, station distances are the `+inf` sentinel and
/// station-mile flags are false.
///
/// `on_progress` is invoked with `(processed, total)` after every
/// `chunk_size` addresses and once at completion. Thresholds are inclusive
/// (a hydrant at exactly 500.0 ft counts as within 500 ft).
pub fn precompute<F>(
    addresses: &[AddressRecord],
    hydrants: &GridIndex<()>,
    stations: &GridIndex<usize>,
    chunk_size: usize,
    mut on_progress: F,
) -> (Vec<AddressDistance>, CoverageSummary)
where
    F: FnMut(usize, usize),
{
    let total = addresses.len();
    let mut table = Vec::with_capacity(total);

    let mut within_500 = 0usize;
    let mut within_1000 = 0usize;
    let mut underserved = 0usize;
    let mut within_station_mile = 0usize;
    let mut hydrant_sum = 0.0;
    let mut hydrant_finite = 0usize;
    let mut station_sum = 0.0;
    let mut station_finite = 0usize;

    for (i, address) in addresses.iter().enumerate() {
        let hydrant_ft = hydrants
            .find_nearest(address.lat, address.lon)
            .map(|n| n.distance_ft)
            .unwrap_or(f64::INFINITY);

        let (station_ft, nearest_station) = match stations.find_nearest(address.lat, address.lon) {
            Some(n) => (n.distance_ft, Some(n.point.payload)),
            None => (f64::INFINITY, None),
        };

        let record = derive_record(address.clone(), hydrant_ft, station_ft, nearest_station);

        if record.within_500ft {
            within_500 += 1;
        }
        if record.within_1000ft {
            within_1000 += 1;
        }
        if record.underserved {
            underserved += 1;
        }
        if record.within_station_mile {
            within_station_mile += 1;
        }
        if hydrant_ft.is_finite() {
            hydrant_sum += hydrant_ft;
            hydrant_finite += 1;
        }
        if station_ft.is_finite() {
            station_sum += station_ft;
            station_finite += 1;
        }

        table.push(record);

        let processed = i + 1;
        if chunk_size > 0 && processed % chunk_size == 0 && processed < total {
            on_progress(processed, total);
        }
    }

    if total > 0 {
        on_progress(total, total);
    }

    let summary = CoverageSummary {
        total_addresses: total,
        within_500ft: within_500,
        within_1000ft: within_1000,
        underserved,
        within_station_mile,
        pct_within_500ft: percentage(within_500, total),
        pct_within_1000ft: percentage(within_1000, total),
        pct_underserved: percentage(underserved, total),
        pct_within_station_mile: percentage(within_station_mile, total),
        mean_hydrant_distance_ft: mean(hydrant_sum, hydrant_finite, total),
        mean_station_distance_ft: mean(station_sum, station_finite, total),
    };

    (table, summary)
}

/// Tag an address with its coverage flags from resolved distances.
///
/// Coverage thresholds are inclusive: exactly 500.0 ft is within 500 ft,
/// exactly one mile is within the station mile. Underserved is the strict
/// complement of the 1000 ft flag.
pub fn derive_record(
    address: AddressRecord,
    hydrant_ft: f64,
    station_ft: f64,
    nearest_station: Option<usize>,
) -> AddressDistance {
    AddressDistance {
        address,
        nearest_hydrant_ft: hydrant_ft,
        nearest_station_ft: station_ft,
        nearest_station,
        within_500ft: hydrant_ft <= HYDRANT_OPTIMAL_FT,
        within_1000ft: hydrant_ft <= HYDRANT_MARGINAL_FT,
        underserved: hydrant_ft > HYDRANT_MARGINAL_FT,
        within_station_mile: station_ft <= STATION_MILE_FT,
    }
}

/// Percentage of `count` over `total` to one decimal place; 0 when empty.
pub(crate) fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 1000.0 / total as f64).round() / 10.0
}

/// Mean over finite samples; `+inf` sentinel when the dataset is non-empty
/// but every distance was unresolved, 0 when the dataset is empty.
fn mean(sum: f64, finite: usize, total: usize) -> f64 {
    if finite > 0 {
        sum / finite as f64
    } else if total > 0 {
        f64::INFINITY
    } else {
        0.0
    }
}
