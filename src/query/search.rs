//! Area and facility search: HTTP parameters, response shapes and the point-to-point
//! distance measurement.

use serde::{Deserialize, Serialize};

use covermap::coverage::{ClassifiedArea, CoverageSnapshot};
use covermap::filter::{sorted_for_display, AreaQuery, DisplayOrder};
use covermap::normalize::normalize_key;
use covermap::proximity::haversine_km;
use covermap::{Facility, GeoPoint};

/// Query string of `/v1/areas`
#[derive(Debug, Default, Deserialize)]
pub struct SearchQueryParams {
    /// Matched against area name or region code
    pub text: Option<String>,
    #[serde(default)]
    pub only_without_facility: bool,
    #[serde(default)]
    pub only_outside_radius: bool,
    /// Population floor (defaults to the session floor)
    pub min_population: Option<u64>,
    #[serde(default)]
    pub sort: DisplayOrder,
    /// Number of results
    pub size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub generation: u64,
    pub coverage_radius_km: f64,
    pub total: usize,
    pub features: Vec<ClassifiedArea>,
}

impl SearchQueryParams {
    pub fn to_query(&self, default_floor: u64) -> AreaQuery {
        AreaQuery {
            text: self.text.clone().unwrap_or_default(),
            only_without_facility: self.only_without_facility,
            only_outside_radius: self.only_outside_radius,
            population_floor: self.min_population.unwrap_or(default_floor),
        }
    }
}

/// Run a search against one snapshot
pub fn execute_search(
    snapshot: &CoverageSnapshot,
    params: &SearchQueryParams,
    default_floor: u64,
) -> SearchResponse {
    let filtered = params.to_query(default_floor).apply(&snapshot.classified);
    let total = filtered.len();

    let features = sorted_for_display(&filtered, params.sort)
        .into_iter()
        .take(params.size.unwrap_or(usize::MAX))
        .cloned()
        .collect();

    SearchResponse {
        generation: snapshot.generation,
        coverage_radius_km: snapshot.classified.thresholds.coverage_radius_km(),
        total,
        features,
    }
}

/// Query string of `/v1/facilities`
#[derive(Debug, Default, Deserialize)]
pub struct FacilityQueryParams {
    /// Matched against facility name or area label
    pub text: Option<String>,
    pub size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct FacilityResponse {
    pub total: usize,
    pub features: Vec<Facility>,
}

/// Facilities in input order, optionally narrowed by text
pub fn list_facilities(facilities: &[Facility], params: &FacilityQueryParams) -> FacilityResponse {
    let text_key = normalize_key(params.text.as_deref().unwrap_or(""));
    let matching: Vec<&Facility> = facilities
        .iter()
        .filter(|f| {
            text_key.is_empty()
                || normalize_key(&f.name).contains(&text_key)
                || normalize_key(&f.area_label).contains(&text_key)
        })
        .collect();

    FacilityResponse {
        total: matching.len(),
        features: matching
            .into_iter()
            .take(params.size.unwrap_or(usize::MAX))
            .cloned()
            .collect(),
    }
}

/// Query string of `/v1/distance`
#[derive(Debug, Deserialize)]
pub struct DistanceParams {
    pub from_lat: f64,
    pub from_lon: f64,
    pub to_lat: f64,
    pub to_lon: f64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct DistanceResponse {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub distance_km: f64,
}

fn valid(point: GeoPoint) -> bool {
    point.lat.is_finite()
        && point.lon.is_finite()
        && (-90.0..=90.0).contains(&point.lat)
        && (-180.0..=180.0).contains(&point.lon)
}

/// Great-circle distance between two user-picked points
pub fn measure(params: &DistanceParams) -> Result<DistanceResponse, String> {
    let from = GeoPoint::new(params.from_lat, params.from_lon);
    let to = GeoPoint::new(params.to_lat, params.to_lon);
    if !valid(from) || !valid(to) {
        return Err(format!(
            "Invalid coordinates ({}, {}) -> ({}, {})",
            params.from_lat, params.from_lon, params.to_lat, params.to_lon
        ));
    }

    Ok(DistanceResponse {
        from,
        to,
        distance_km: haversine_km(from, to),
    })
}
