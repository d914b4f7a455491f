//! Distance estimation over geographic coordinates.
//!
//! All distances in this crate are great-circle distances in feet, computed
//! with the haversine formula on a spherical Earth. The sphere radius is
//! fixed in feet so that coverage thresholds (500 ft, 1000 ft, one mile)
//! compare directly against query results.

use geo::Point;

/// Spherical Earth radius in feet.
pub const EARTH_RADIUS_FEET: f64 = 20_902_231.0;

/// Feet per statute mile.
pub const FEET_PER_MILE: f64 = 5_280.0;

/// Great-circle distance between two points in feet.
///
/// Symmetric in its arguments and exactly zero for coordinate-identical
/// inputs. Points follow the `geo` convention: `x` is longitude, `y` is
/// latitude.
///
/// # Examples
///
/// ```rust
/// use firegrid::spatial::distance_feet;
/// use geo::Point;
///
/// let hydrant = Point::new(-121.49, 38.58);
/// let address = Point::new(-121.491, 38.581);
///
/// let d = distance_feet(&hydrant, &address);
/// assert!(d > 0.0 && d < 500.0);
/// assert_eq!(distance_feet(&hydrant, &address), distance_feet(&address, &hydrant));
/// ```
pub fn distance_feet(a: &Point, b: &Point) -> f64 {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let dlat = (b.y() - a.y()).to_radians();
    let dlon = (b.x() - a.x()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_FEET * c
}

/// Great-circle distance between bare `(lat, lon)` pairs in feet.
pub fn distance_feet_coords(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    distance_feet(&Point::new(lon1, lat1), &Point::new(lon2, lat2))
}
