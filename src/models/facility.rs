//! Point facilities and the coordinate type shared across the engine.

use serde::{Deserialize, Serialize};

/// Geographic point (lat/lon, degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(p: geo::Point<f64>) -> Self {
        Self {
            lat: p.y(),
            lon: p.x(),
        }
    }
}

impl From<geo::Coord<f64>> for GeoPoint {
    fn from(c: geo::Coord<f64>) -> Self {
        Self { lat: c.y, lon: c.x }
    }
}

/// Facility row as delivered by ingestion.
///
/// Rows without a name or coordinate never get this far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub area_label: String,
}

/// A named point facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub name: String,
    pub location: GeoPoint,
    pub address: String,
    /// Area the source dataset files this facility under (free text)
    pub area_label: String,
}

impl From<FacilityRecord> for Facility {
    fn from(record: FacilityRecord) -> Self {
        Self {
            name: record.name,
            location: GeoPoint::new(record.latitude, record.longitude),
            address: record.address,
            area_label: record.area_label,
        }
    }
}
