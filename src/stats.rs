//! Summary counts over one classification generation.

use serde::Serialize;

use crate::coverage::ClassifiedAreas;
use crate::models::Area;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageStats {
    pub total_areas: usize,
    pub total_facilities: usize,
    pub areas_without_facility: usize,
    pub areas_outside_radius: usize,
    pub areas_above_population_threshold: usize,
    /// Radius the counts were computed against
    pub coverage_radius_km: f64,
    /// Floor used for `areas_above_population_threshold` (inclusive)
    pub population_floor: u64,
}

/// Count everything from a single classified snapshot
pub fn summarize(classified: &ClassifiedAreas, population_floor: u64) -> CoverageStats {
    let mut stats = CoverageStats {
        total_areas: classified.len(),
        total_facilities: classified.total_facilities,
        areas_without_facility: 0,
        areas_outside_radius: 0,
        areas_above_population_threshold: 0,
        coverage_radius_km: classified.thresholds.coverage_radius_km(),
        population_floor,
    };

    for area in classified.iter() {
        if !area.has_facility {
            stats.areas_without_facility += 1;
        }
        if !area.within_radius {
            stats.areas_outside_radius += 1;
        }
        if area.area.population.meets(population_floor) {
            stats.areas_above_population_threshold += 1;
        }
    }

    stats
}

/// Smallest and largest known population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PopulationRange {
    pub min: u64,
    pub max: u64,
}

pub fn population_range(areas: &[Area]) -> Option<PopulationRange> {
    let mut known = areas.iter().filter_map(|a| a.population.known());
    let first = known.next()?;
    Some(known.fold(PopulationRange { min: first, max: first }, |range, p| {
        PopulationRange {
            min: range.min.min(p),
            max: range.max.max(p),
        }
    }))
}

/// Half of the largest known population, rounded up so that `population >= floor`
/// matches exactly the areas at or above the half-way mark. 0 when nothing is known.
pub fn default_population_floor(areas: &[Area]) -> u64 {
    population_range(areas).map_or(0, |range| range.max.div_ceil(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{classify, Thresholds};
    use crate::models::{AreaRecord, Facility, GeoPoint, Population};

    fn area(name: &str, population: Population, lat: Option<f64>) -> Area {
        Area::new(
            AreaRecord::new(name, "", population),
            lat.map(|lat| GeoPoint::new(lat, 0.0)),
        )
    }

    fn facilities() -> Vec<Facility> {
        vec![Facility {
            name: "F".to_string(),
            location: GeoPoint::new(0.0, 0.0),
            address: String::new(),
            area_label: String::new(),
        }]
    }

    fn sample() -> Vec<Area> {
        vec![
            // ~0.1 km: served and inside
            area("a", Population::Known(80_000), Some(0.001)),
            // ~5.6 km: inside a 10 km radius only
            area("b", Population::Known(20_000), Some(0.05)),
            // ~22 km: outside
            area("c", Population::Known(50_000), Some(0.2)),
            // unresolved
            area("d", Population::Unknown, None),
        ]
    }

    #[test]
    fn test_counts() {
        let classified = classify(&sample(), &facilities(), &Thresholds::default());
        let stats = summarize(&classified, 50_000);

        assert_eq!(stats.total_areas, 4);
        assert_eq!(stats.total_facilities, 1);
        assert_eq!(stats.areas_without_facility, 3);
        assert_eq!(stats.areas_outside_radius, 2);
        assert_eq!(stats.areas_above_population_threshold, 2);
        assert_eq!(stats.coverage_radius_km, 10.0);
        assert_eq!(stats.population_floor, 50_000);
    }

    #[test]
    fn test_counts_follow_snapshot_thresholds() {
        let areas = sample();
        let narrow = classify(&areas, &facilities(), &Thresholds::new(1.0));
        let wide = classify(&areas, &facilities(), &Thresholds::new(20.0));

        assert_eq!(summarize(&narrow, 0).areas_outside_radius, 3);
        assert_eq!(summarize(&wide, 0).areas_outside_radius, 2);
        assert_eq!(summarize(&wide, 0).coverage_radius_km, 20.0);
    }

    #[test]
    fn test_zero_floor_counts_everything() {
        let classified = classify(&sample(), &facilities(), &Thresholds::default());
        assert_eq!(summarize(&classified, 0).areas_above_population_threshold, 4);
    }

    #[test]
    fn test_summarize_is_repeatable() {
        let classified = classify(&sample(), &facilities(), &Thresholds::default());
        assert_eq!(summarize(&classified, 10), summarize(&classified, 10));
    }

    #[test]
    fn test_population_range_and_default_floor() {
        let areas = sample();
        assert_eq!(
            population_range(&areas),
            Some(PopulationRange {
                min: 20_000,
                max: 80_000
            })
        );
        assert_eq!(default_population_floor(&areas), 40_000);

        let odd = vec![area("x", Population::Known(75_001), None)];
        assert_eq!(default_population_floor(&odd), 37_501);

        let unknown = vec![area("y", Population::Unknown, None)];
        assert_eq!(population_range(&unknown), None);
        assert_eq!(default_population_floor(&unknown), 0);
    }
}
