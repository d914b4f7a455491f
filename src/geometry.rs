//! Zone polygon geometry: containment and area estimation.
//!
//! Zones are administrative boundaries (ZIP codes and the like) expressed
//! as one or more outer rings. Holes are not modeled; a point inside any
//! ring counts as inside the zone, and multi-part areas are summed without
//! hole subtraction. Both are documented approximations, acceptable at
//! county scale.

use crate::error::{FiregridError, Result};
use geo::Coord;
use geojson::{Geometry, Value};
use smallvec::SmallVec;

/// Miles per degree of latitude (and of longitude at the equator).
const MILES_PER_DEGREE: f64 = 69.0;

/// A zone boundary made of one or more outer rings.
///
/// Ring vertices are `(lon, lat)` coordinates in `geo` convention
/// (`x` = lon, `y` = lat). Rings may arrive closed (last vertex repeating
/// the first) or unclosed; both are handled transparently because edge
/// iteration wraps via `j = i - 1`.
#[derive(Debug, Clone, Default)]
pub struct ZonePolygon {
    rings: SmallVec<[Vec<Coord>; 1]>,
}

impl ZonePolygon {
    /// Build a single-ring polygon from `(lon, lat)` vertices.
    pub fn single(ring: Vec<Coord>) -> Self {
        Self {
            rings: SmallVec::from_buf([ring]),
        }
    }

    /// Build a multi-part polygon from several outer rings.
    pub fn multi(rings: Vec<Vec<Coord>>) -> Self {
        Self {
            rings: SmallVec::from_vec(rings),
        }
    }

    /// The constituent outer rings.
    pub fn rings(&self) -> &[Vec<Coord>] {
        &self.rings
    }

    /// Whether the query point lies inside any constituent ring.
    ///
    /// Standard even-odd ray casting: a horizontal ray at the query
    /// latitude toggles an inside flag at each edge crossing, with the
    /// half-open convention `(yi > lat) != (yj > lat)` so shared vertices
    /// are not double-counted. Rings with fewer than 3 vertices are
    /// degenerate and contribute nothing.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.rings.iter().any(|ring| ring_contains(ring, lat, lon))
    }

    /// Estimated polygon area in square miles.
    ///
    /// Shoelace formula per ring on coordinates scaled to miles with a
    /// local equirectangular approximation: latitude degrees at a constant
    /// 69 mi/degree, longitude degrees at `69 * cos(mean ring latitude)`.
    /// Multi-part areas are summed; holes are not subtracted. Accuracy
    /// degrades for zones spanning large latitude ranges or crossing the
    /// antimeridian.
    pub fn area_sq_miles(&self) -> f64 {
        self.rings.iter().map(|ring| ring_area_sq_miles(ring)).sum()
    }

    /// Convert a GeoJSON geometry into a zone polygon.
    ///
    /// `Polygon` keeps its outer ring; `MultiPolygon` keeps each part's
    /// outer ring. Interior (hole) rings are dropped. Any other geometry
    /// kind is rejected.
    pub fn from_geojson(geometry: &Geometry) -> Result<Self> {
        match &geometry.value {
            Value::Polygon(rings) => {
                let outer = rings.first().map(|ring| positions_to_coords(ring));
                Ok(Self {
                    rings: outer.into_iter().collect(),
                })
            }
            Value::MultiPolygon(polygons) => {
                let rings = polygons
                    .iter()
                    .filter_map(|rings| rings.first())
                    .map(|ring| positions_to_coords(ring))
                    .collect();
                Ok(Self { rings })
            }
            other => Err(FiregridError::InvalidInput(format!(
                "Unsupported zone geometry kind: {}",
                geometry_kind(other)
            ))),
        }
    }

    /// Parse a GeoJSON geometry string into a zone polygon.
    pub fn from_geojson_str(geojson: &str) -> Result<Self> {
        let geometry: Geometry = serde_json::from_str(geojson)
            .map_err(|e| FiregridError::InvalidInput(format!("Failed to parse GeoJSON: {}", e)))?;
        Self::from_geojson(&geometry)
    }
}

fn geometry_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn positions_to_coords(ring: &[Vec<f64>]) -> Vec<Coord> {
    ring.iter()
        .filter(|pos| pos.len() >= 2)
        .map(|pos| Coord { x: pos[0], y: pos[1] })
        .collect()
}

fn ring_contains(ring: &[Coord], lat: f64, lon: f64) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].x, ring[i].y);
        let (xj, yj) = (ring[j].x, ring[j].y);

        if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn ring_area_sq_miles(ring: &[Coord]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let mean_lat = ring.iter().map(|c| c.y).sum::<f64>() / ring.len() as f64;
    let lon_scale = MILES_PER_DEGREE * mean_lat.to_radians().cos();

    let mut doubled = 0.0;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let xi = ring[i].x * lon_scale;
        let yi = ring[i].y * MILES_PER_DEGREE;
        let xj = ring[j].x * lon_scale;
        let yj = ring[j].y * MILES_PER_DEGREE;

        doubled += xj * yi - xi * yj;
        j = i;
    }

    (doubled / 2.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Coord> {
        vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
            Coord { x: 0.0, y: 1.0 },
        ]
    }

    #[test]
    fn test_unit_square_containment() {
        let zone = ZonePolygon::single(unit_square());
        assert!(zone.contains(0.5, 0.5));
        assert!(!zone.contains(2.0, 2.0));
        assert!(!zone.contains(-0.5, 0.5));
    }

    #[test]
    fn test_closed_ring_matches_unclosed() {
        let mut closed = unit_square();
        closed.push(Coord { x: 0.0, y: 0.0 });

        let open_zone = ZonePolygon::single(unit_square());
        let closed_zone = ZonePolygon::single(closed);

        for (lat, lon) in [(0.5, 0.5), (2.0, 2.0), (0.01, 0.99), (1.5, 0.5)] {
            assert_eq!(
                open_zone.contains(lat, lon),
                closed_zone.contains(lat, lon),
                "({lat}, {lon})"
            );
        }
    }

    #[test]
    fn test_multi_part_containment() {
        let far_square = vec![
            Coord { x: 10.0, y: 10.0 },
            Coord { x: 11.0, y: 10.0 },
            Coord { x: 11.0, y: 11.0 },
            Coord { x: 10.0, y: 11.0 },
        ];
        let zone = ZonePolygon::multi(vec![unit_square(), far_square]);

        assert!(zone.contains(0.5, 0.5));
        assert!(zone.contains(10.5, 10.5));
        assert!(!zone.contains(5.0, 5.0));
    }

    #[test]
    fn test_degenerate_ring() {
        let zone = ZonePolygon::single(vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
        ]);
        assert!(!zone.contains(0.5, 0.5));
        assert_eq!(zone.area_sq_miles(), 0.0);

        let empty = ZonePolygon::default();
        assert!(!empty.contains(0.5, 0.5));
        assert_eq!(empty.area_sq_miles(), 0.0);
    }

    #[test]
    fn test_equator_square_area() {
        // A 1x1 degree square at the equator is close to 69 x 69 sq mi.
        let zone = ZonePolygon::single(unit_square());
        let expected = 69.0 * 69.0;
        let area = zone.area_sq_miles();
        assert!(
            (area - expected).abs() / expected < 0.05,
            "area {area} vs {expected}"
        );
    }

    #[test]
    fn test_area_scales_down_monotonically() {
        let mut previous = f64::INFINITY;
        for scale in [1.0, 0.5, 0.25, 0.1] {
            let ring = unit_square()
                .into_iter()
                .map(|c| Coord { x: c.x * scale, y: c.y * scale })
                .collect();
            let area = ZonePolygon::single(ring).area_sq_miles();
            assert!(area < previous, "area {area} at scale {scale}");
            previous = area;
        }
    }

    #[test]
    fn test_multi_part_area_sums() {
        let shifted = unit_square()
            .into_iter()
            .map(|c| Coord { x: c.x + 5.0, y: c.y })
            .collect();
        let single = ZonePolygon::single(unit_square()).area_sq_miles();
        let multi = ZonePolygon::multi(vec![unit_square(), shifted]).area_sq_miles();
        assert!((multi - 2.0 * single).abs() < 1.0);
    }

    #[test]
    fn test_from_geojson_polygon() {
        let zone = ZonePolygon::from_geojson_str(
            r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#,
        )
        .unwrap();
        assert_eq!(zone.rings().len(), 1);
        assert!(zone.contains(0.5, 0.5));
    }

    #[test]
    fn test_from_geojson_multi_polygon_keeps_outer_rings() {
        let zone = ZonePolygon::from_geojson_str(
            r#"{"type":"MultiPolygon","coordinates":[
                [[[0,0],[1,0],[1,1],[0,1],[0,0]]],
                [[[10,10],[11,10],[11,11],[10,11],[10,10]]]
            ]}"#,
        )
        .unwrap();
        assert_eq!(zone.rings().len(), 2);
        assert!(zone.contains(10.5, 10.5));
    }

    #[test]
    fn test_from_geojson_rejects_other_kinds() {
        let err = ZonePolygon::from_geojson_str(r#"{"type":"Point","coordinates":[0,0]}"#);
        assert!(err.is_err());
    }
}
