//! Fixed-cell spatial grid index powering nearest-point queries.
//!
//! Points are bucketed into fixed-size lat/lon cells keyed by
//! `(floor(lon / cell_size), floor(lat / cell_size))`. Nearest-point
//! queries expand a ring of cells around the query cell and run the exact
//! haversine distance only on the candidates collected from the first
//! non-empty ring, bounding query cost regardless of dataset size.

use crate::spatial::distance_feet;
use geo::Point;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

/// Hard cap on ring expansion during nearest-point search.
pub const MAX_SEARCH_RINGS: i64 = 20;

/// A point stored in a [`GridIndex`] with its opaque payload.
///
/// The payload is caller data carried through lookups unchanged; the index
/// never interprets it.
#[derive(Debug, Clone)]
pub struct GridPoint<T> {
    pub point: Point,
    pub payload: T,
}

impl<T> GridPoint<T> {
    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }
}

/// Result of a nearest-point query.
#[derive(Debug)]
pub struct Nearest<'a, T> {
    /// The closest indexed point among the collected candidates.
    pub point: &'a GridPoint<T>,
    /// Position of the point in insertion order.
    pub index: usize,
    /// Exact great-circle distance to the query coordinate, in feet.
    pub distance_ft: f64,
}

/// A grid-bucketed point index with a fixed cell size.
///
/// The cell size is set at construction and never changes; re-supplying a
/// dataset means [`clear`](GridIndex::clear) followed by reinsertion. Each
/// inserted point lives in exactly one bucket, computed deterministically
/// from its coordinates and the cell size.
#[derive(Debug)]
pub struct GridIndex<T> {
    cell_size: f64,
    /// Cell key -> positions into `points`, in insertion order.
    buckets: FxHashMap<(i64, i64), Vec<usize>>,
    /// All inserted points, in insertion order.
    points: Vec<GridPoint<T>>,
}

impl<T> GridIndex<T> {
    /// Create an empty index with the given cell size in degrees.
    ///
    /// Smaller cells suit denser datasets: a query touches fewer points per
    /// ring but may need more rings to find one.
    pub fn new(cell_size: f64) -> Self {
        debug_assert!(cell_size.is_finite() && cell_size > 0.0);
        Self {
            cell_size,
            buckets: FxHashMap::default(),
            points: Vec::new(),
        }
    }

    /// The fixed cell size in degrees.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drop all buckets and points. Safe to call on an empty index.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.points.clear();
    }

    /// Insert a point with its payload. O(1) amortized.
    pub fn insert(&mut self, lat: f64, lon: f64, payload: T) {
        let key = self.cell_key(lat, lon);
        let index = self.points.len();
        self.points.push(GridPoint {
            point: Point::new(lon, lat),
            payload,
        });
        self.buckets.entry(key).or_default().push(index);
    }

    /// Iterate all indexed points in insertion order.
    pub fn points(&self) -> impl Iterator<Item = &GridPoint<T>> + '_ {
        self.points.iter()
    }

    /// Get a point by insertion-order index.
    pub fn get(&self, index: usize) -> Option<&GridPoint<T>> {
        self.points.get(index)
    }

    /// Find the closest indexed point to the query coordinate.
    ///
    /// Searches the `(2r+1)^2` block of cells centered on the query cell,
    /// growing `r` from 1 up to [`MAX_SEARCH_RINGS`]. The first radius that
    /// yields any candidate ends the expansion; the exact haversine distance
    /// is then computed for every collected candidate and the minimum is
    /// returned. A point in a farther ring can in rare cases be slightly
    /// closer than the returned one; that trade is accepted for bounded
    /// query cost.
    ///
    /// Returns `None` when the index is empty or no point lies within the
    /// ring cap. Callers treat that as an infinite distance ("no coverage"),
    /// not an error.
    pub fn find_nearest(&self, lat: f64, lon: f64) -> Option<Nearest<'_, T>> {
        if self.points.is_empty() {
            return None;
        }

        let (cx, cy) = self.cell_key(lat, lon);
        let query = Point::new(lon, lat);

        for radius in 1..=MAX_SEARCH_RINGS {
            let mut best: Option<(usize, f64)> = None;

            for x in (cx - radius)..=(cx + radius) {
                for y in (cy - radius)..=(cy + radius) {
                    let Some(bucket) = self.buckets.get(&(x, y)) else {
                        continue;
                    };
                    for &index in bucket {
                        let d = distance_feet(&query, &self.points[index].point);
                        let closer = match best {
                            Some((_, best_d)) => {
                                d.partial_cmp(&best_d) == Some(Ordering::Less)
                            }
                            None => true,
                        };
                        if closer {
                            best = Some((index, d));
                        }
                    }
                }
            }

            if let Some((index, distance_ft)) = best {
                return Some(Nearest {
                    point: &self.points[index],
                    index,
                    distance_ft,
                });
            }
        }

        None
    }

    fn cell_key(&self, lat: f64, lon: f64) -> (i64, i64) {
        (
            (lon / self.cell_size).floor() as i64,
            (lat / self.cell_size).floor() as i64,
        )
    }
}
