//! Grid-indexed fire-protection coverage analysis.
//!
//! ```rust
//! use firegrid::{Engine, EngineConfig, StationRecord, ZonePolygon};
//! use serde_json::json;
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! engine.build_hydrant_index(&[json!({"lat": 38.58, "lon": -121.49})])?;
//! engine.set_stations(vec![StationRecord::new(38.60, -121.50, json!("Station 1"))]);
//! engine.precompute_addresses(&[json!({"lat": 38.581, "lon": -121.491})], |_, _| {})?;
//!
//! let zone = ZonePolygon::from_geojson_str(
//!     r#"{"type":"Polygon","coordinates":[[[-121.55,38.53],[-121.45,38.53],[-121.45,38.63],[-121.55,38.63],[-121.55,38.53]]]}"#,
//! )?;
//! let report = engine.analyze_zone(&zone);
//! assert_eq!(report.stats.address_count, 1);
//! # Ok::<(), firegrid::FiregridError>(())
//! ```

pub mod config;
pub mod coverage;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod records;
pub mod spatial;
pub mod worker;
pub mod zone;

pub use config::EngineConfig;
pub use engine::{BuildAck, Engine, PrecomputeAck, ZoneReport};
pub use error::{FiregridError, Result};

pub use geo::{Coord, Point};

pub use geometry::ZonePolygon;
pub use grid::{GridIndex, GridPoint, MAX_SEARCH_RINGS, Nearest};
pub use records::{
    AddressDistance, AddressRecord, CoverageSummary, StationRecord, ZoneClass, ZoneStats,
};
pub use spatial::{EARTH_RADIUS_FEET, FEET_PER_MILE, distance_feet};
pub use worker::{Event, EventKind, RequestId, WorkerHandle, spawn};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Engine, EngineConfig, FiregridError, Result};

    pub use geo::{Coord, Point};

    pub use crate::spatial::{FEET_PER_MILE, distance_feet};

    pub use crate::{AddressRecord, StationRecord, ZonePolygon};

    pub use crate::worker::{Event, EventKind, WorkerHandle, spawn};
}
