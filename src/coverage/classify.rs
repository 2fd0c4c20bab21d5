//! Nearest-facility resolution and coverage flags for a whole area set.

use serde::Serialize;

use super::Thresholds;
use crate::models::{Area, Facility};
use crate::proximity::resolve_nearest;

/// An area enriched with its nearest facility and coverage flags
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedArea {
    #[serde(flatten)]
    pub area: Area,
    /// Position of the nearest facility in the facility list
    #[serde(skip)]
    pub nearest_facility: Option<usize>,
    pub nearest_facility_name: Option<String>,
    pub distance_km: Option<f64>,
    pub has_facility: bool,
    pub within_radius: bool,
}

/// One complete classification generation.
///
/// Always built whole by [`classify`]; it carries the thresholds and facility count it
/// was computed from so nothing downstream can mix generations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedAreas {
    pub thresholds: Thresholds,
    pub total_facilities: usize,
    pub areas: Vec<ClassifiedArea>,
}

impl ClassifiedAreas {
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&ClassifiedArea> {
        self.areas.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassifiedArea> {
        self.areas.iter()
    }
}

/// Classify every area against the facility set.
///
/// Areas without a representative point, or an empty facility set, resolve with no
/// distance and both flags false. Output order matches `areas`.
pub fn classify(areas: &[Area], facilities: &[Facility], thresholds: &Thresholds) -> ClassifiedAreas {
    let areas = areas
        .iter()
        .map(|area| {
            let nearest = area
                .location
                .and_then(|point| resolve_nearest(point, facilities));

            match nearest {
                Some(nearest) => ClassifiedArea {
                    area: area.clone(),
                    nearest_facility: Some(nearest.index),
                    nearest_facility_name: Some(facilities[nearest.index].name.clone()),
                    distance_km: Some(nearest.distance_km),
                    has_facility: nearest.distance_km < thresholds.served_km(),
                    within_radius: nearest.distance_km <= thresholds.coverage_radius_km(),
                },
                None => ClassifiedArea {
                    area: area.clone(),
                    nearest_facility: None,
                    nearest_facility_name: None,
                    distance_km: None,
                    has_facility: false,
                    within_radius: false,
                },
            }
        })
        .collect();

    ClassifiedAreas {
        thresholds: *thresholds,
        total_facilities: facilities.len(),
        areas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AreaRecord, GeoPoint, Population};
    use crate::proximity::haversine_km;

    const KM_PER_DEGREE: f64 = 6371.0 * std::f64::consts::PI / 180.0;

    fn area(name: &str, location: Option<GeoPoint>) -> Area {
        Area::new(AreaRecord::new(name, "", Population::Known(100)), location)
    }

    fn facility(name: &str, lat: f64, lon: f64) -> Facility {
        Facility {
            name: name.to_string(),
            location: GeoPoint::new(lat, lon),
            address: String::new(),
            area_label: String::new(),
        }
    }

    /// Facility due north of the origin at `km` kilometers
    fn facility_at_km(name: &str, km: f64) -> Facility {
        facility(name, km / KM_PER_DEGREE, 0.0)
    }

    #[test]
    fn test_two_facilities_scenario() {
        let areas = vec![area("A", Some(GeoPoint::new(0.0, 0.0)))];
        let facilities = vec![facility_at_km("F2", 8.0), facility_at_km("F1", 2.0)];
        let thresholds = Thresholds::new(5.0).with_served_km(1.0);

        let classified = classify(&areas, &facilities, &thresholds);
        let a = &classified.areas[0];

        assert_eq!(a.nearest_facility, Some(1));
        assert_eq!(a.nearest_facility_name.as_deref(), Some("F1"));
        assert!((a.distance_km.unwrap() - 2.0).abs() < 1e-9);
        assert!(a.within_radius);
        assert!(!a.has_facility);
    }

    #[test]
    fn test_boundaries_of_flags() {
        let origin = GeoPoint::new(0.0, 0.0);
        let f = facility_at_km("F", 3.0);
        let exact = haversine_km(origin, f.location);

        // radius equal to the distance is inside (<=)
        let thresholds = Thresholds::new(exact).with_served_km(exact);
        let classified = classify(&[area("A", Some(origin))], &[f], &thresholds);
        assert!(classified.areas[0].within_radius);
        // served threshold equal to the distance is not served (<)
        assert!(!classified.areas[0].has_facility);
    }

    #[test]
    fn test_close_facility_is_served() {
        let areas = vec![area("A", Some(GeoPoint::new(0.0, 0.0)))];
        let facilities = vec![facility_at_km("F", 0.4)];
        let classified = classify(&areas, &facilities, &Thresholds::default());
        assert!(classified.areas[0].has_facility);
        assert!(classified.areas[0].within_radius);
    }

    #[test]
    fn test_empty_facility_set() {
        let areas = vec![area("A", Some(GeoPoint::new(0.0, 0.0))), area("B", None)];
        let classified = classify(&areas, &[], &Thresholds::default());

        assert_eq!(classified.total_facilities, 0);
        for a in classified.iter() {
            assert_eq!(a.distance_km, None);
            assert_eq!(a.nearest_facility_name, None);
            assert!(!a.has_facility);
            assert!(!a.within_radius);
        }
    }

    #[test]
    fn test_unlocated_area_is_unresolved() {
        let classified = classify(
            &[area("Nowhere", None)],
            &[facility_at_km("F", 0.1)],
            &Thresholds::default(),
        );
        assert_eq!(classified.areas[0].nearest_facility, None);
        assert!(!classified.areas[0].within_radius);
    }

    #[test]
    fn test_idempotent() {
        let areas: Vec<Area> = (0..20)
            .map(|i| area(&format!("A{}", i), Some(GeoPoint::new(i as f64 * 0.01, 0.0))))
            .collect();
        let facilities = vec![facility_at_km("F1", 3.0), facility_at_km("F2", 12.0)];
        let thresholds = Thresholds::new(6.0);

        let first = classify(&areas, &facilities, &thresholds);
        let second = classify(&areas, &facilities, &thresholds);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_radius_monotonicity() {
        let areas: Vec<Area> = (0..50)
            .map(|i| area(&format!("A{}", i), Some(GeoPoint::new(i as f64 * 0.05, 0.0))))
            .collect();
        let facilities = vec![facility("F", 0.0, 0.0)];

        let mut previous = 0;
        for radius in 1..=20 {
            let classified = classify(&areas, &facilities, &Thresholds::new(radius as f64));
            let inside = classified.iter().filter(|a| a.within_radius).count();
            assert!(inside >= previous);
            previous = inside;
        }
    }

    #[test]
    fn test_serialized_view_fields() {
        let classified = classify(
            &[area("A", Some(GeoPoint::new(0.0, 0.0)))],
            &[facility_at_km("F", 2.0)],
            &Thresholds::default(),
        );
        let json = serde_json::to_value(&classified.areas[0]).unwrap();
        assert_eq!(json["name"], "A");
        assert_eq!(json["nearest_facility_name"], "F");
        assert_eq!(json["has_facility"], false);
        assert_eq!(json["within_radius"], true);
        assert!(json.get("nearest_facility").is_none());
    }
}
