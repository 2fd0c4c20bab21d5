use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::coverage::DEFAULT_COVERAGE_RADIUS_KM;
use crate::geometry::PointStrategy;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub coverage: CoverageConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct InputConfig {
    pub areas_csv: Option<PathBuf>,
    pub facilities_csv: Option<PathBuf>,
    pub boundaries: Option<PathBuf>,
}

/// Header names in the source tables
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ColumnConfig {
    pub area_name: String,
    pub area_region: String,
    pub area_population: String,
    pub facility_name: String,
    pub facility_latitude: String,
    pub facility_longitude: String,
    pub facility_address: String,
    pub facility_area: String,
    /// Property holding the boundary name in the GeoJSON features
    pub boundary_name: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            area_name: "Bairro".to_string(),
            area_region: "RA".to_string(),
            area_population: "Populacao".to_string(),
            facility_name: "Name".to_string(),
            facility_latitude: "Latitude".to_string(),
            facility_longitude: "Longitude".to_string(),
            facility_address: "Address".to_string(),
            facility_area: "Bairro".to_string(),
            boundary_name: "nome".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CoverageConfig {
    pub radius_km: f64,
    /// Defaults to half of the largest population when unset
    pub population_floor: Option<u64>,
    pub point_strategy: PointStrategy,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_COVERAGE_RADIUS_KM,
            population_floor: None,
            point_strategy: PointStrategy::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
