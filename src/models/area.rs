//! Areas (neighbourhoods / subdivisions) and their population figures.

use serde::{Deserialize, Serialize};

use super::GeoPoint;
use crate::normalize::normalize_key;

/// Population figure of an area. Source tables use blanks and `nan` for missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum Population {
    Known(u64),
    Unknown,
}

impl Population {
    pub fn known(&self) -> Option<u64> {
        match self {
            Population::Known(p) => Some(*p),
            Population::Unknown => None,
        }
    }

    /// Inclusive floor check. An unknown figure only passes the vacuous floor of 0.
    pub fn meets(&self, floor: u64) -> bool {
        match self {
            Population::Known(p) => *p >= floor,
            Population::Unknown => floor == 0,
        }
    }
}

impl From<Option<u64>> for Population {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Population::Unknown, Population::Known)
    }
}

impl From<Population> for Option<u64> {
    fn from(value: Population) -> Self {
        value.known()
    }
}

/// Tabular area row as delivered by ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRecord {
    pub name: String,
    #[serde(default)]
    pub region_code: String,
    pub population: Population,
}

impl AreaRecord {
    pub fn new(name: impl Into<String>, region_code: impl Into<String>, population: Population) -> Self {
        Self {
            name: name.into(),
            region_code: region_code.into(),
            population,
        }
    }
}

/// An area joined with its boundary.
///
/// `location` is the representative point of the matched boundary; it is absent when no
/// boundary matched or the boundary geometry was unusable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Area {
    pub name: String,
    pub region_code: String,
    pub population: Population,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip)]
    name_key: String,
    #[serde(skip)]
    region_key: String,
}

impl Area {
    pub fn new(record: AreaRecord, location: Option<GeoPoint>) -> Self {
        let name_key = normalize_key(&record.name);
        let region_key = normalize_key(&record.region_code);
        Self {
            name: record.name,
            region_code: record.region_code,
            population: record.population,
            location,
            name_key,
            region_key,
        }
    }

    /// Canonical key of the area name
    pub fn name_key(&self) -> &str {
        &self.name_key
    }

    /// Canonical key of the region code
    pub fn region_key(&self) -> &str {
        &self.region_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_floor_is_inclusive() {
        assert!(Population::Known(50_000).meets(50_000));
        assert!(!Population::Known(49_999).meets(50_000));
    }

    #[test]
    fn test_unknown_population_only_meets_zero_floor() {
        assert!(Population::Unknown.meets(0));
        assert!(!Population::Unknown.meets(1));
    }

    #[test]
    fn test_population_serializes_as_nullable_number() {
        let json = serde_json::to_string(&vec![Population::Known(12), Population::Unknown]).unwrap();
        assert_eq!(json, "[12,null]");
    }

    #[test]
    fn test_area_memoizes_keys() {
        let area = Area::new(
            AreaRecord::new("São Cristóvão", "Centro  Histórico", Population::Unknown),
            None,
        );
        assert_eq!(area.name_key(), "sao cristovao");
        assert_eq!(area.region_key(), "centro historico");
    }
}
