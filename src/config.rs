//! Engine configuration.
//!
//! The configuration is serializable so it can be loaded from JSON (or TOML
//! with the `toml` feature) while keeping complexity minimal.
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Configuration for a coverage [`Engine`](crate::Engine).
///
/// Cell sizes are in degrees and fixed for the lifetime of an index;
/// rebuilding an index (re-supplying a dataset) is the only way a point set
/// gets re-bucketed. The defaults tune the hydrant grid fine (hydrants are
/// dense) and the station grid coarse (stations are sparse).
///
/// # Example
///
/// ```rust
/// use firegrid::EngineConfig;
///
/// let config = EngineConfig::default();
///
/// let json = r#"{
///     "hydrant_cell_size_deg": 0.01,
///     "precompute_chunk_size": 10000
/// }"#;
/// let config = EngineConfig::from_json(json).unwrap();
/// assert_eq!(config.hydrant_cell_size_deg, 0.01);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cell size in degrees for the hydrant index (fine grid).
    #[serde(default = "EngineConfig::default_hydrant_cell_size")]
    pub hydrant_cell_size_deg: f64,

    /// Cell size in degrees for the station index (coarse grid).
    #[serde(default = "EngineConfig::default_station_cell_size")]
    pub station_cell_size_deg: f64,

    /// Number of addresses processed between progress notifications during
    /// the precompute pass.
    #[serde(default = "EngineConfig::default_precompute_chunk_size")]
    pub precompute_chunk_size: usize,
}

impl EngineConfig {
    const fn default_hydrant_cell_size() -> f64 {
        0.005
    }

    const fn default_station_cell_size() -> f64 {
        0.05
    }

    const fn default_precompute_chunk_size() -> usize {
        5_000
    }

    pub fn with_hydrant_cell_size(mut self, degrees: f64) -> Self {
        assert!(
            degrees.is_finite() && degrees > 0.0,
            "Cell size must be a positive finite number of degrees"
        );
        self.hydrant_cell_size_deg = degrees;
        self
    }

    pub fn with_station_cell_size(mut self, degrees: f64) -> Self {
        assert!(
            degrees.is_finite() && degrees > 0.0,
            "Cell size must be a positive finite number of degrees"
        );
        self.station_cell_size_deg = degrees;
        self
    }

    pub fn with_precompute_chunk_size(mut self, chunk: usize) -> Self {
        assert!(chunk > 0, "Chunk size must be greater than zero");
        self.precompute_chunk_size = chunk;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !self.hydrant_cell_size_deg.is_finite() || self.hydrant_cell_size_deg <= 0.0 {
            return Err("Hydrant cell size must be a positive finite number".to_string());
        }
        if !self.station_cell_size_deg.is_finite() || self.station_cell_size_deg <= 0.0 {
            return Err("Station cell size must be a positive finite number".to_string());
        }
        if self.precompute_chunk_size == 0 {
            return Err("Precompute chunk size must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Load configuration from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: EngineConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires `toml` feature).
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: EngineConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires `toml` feature).
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hydrant_cell_size_deg: Self::default_hydrant_cell_size(),
            station_cell_size_deg: Self::default_station_cell_size(),
            precompute_chunk_size: Self::default_precompute_chunk_size(),
        }
    }
}
