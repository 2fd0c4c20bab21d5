//! Nearest-facility resolution by great-circle distance.

use crate::models::{Facility, GeoPoint};

/// Mean Earth radius used for all distances (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Two candidates closer than this are treated as equidistant
pub const DISTANCE_TOLERANCE_KM: f64 = 1e-9;

/// Haversine great-circle distance in kilometers
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// The closest facility to a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// Position in the supplied facility list
    pub index: usize,
    pub distance_km: f64,
}

/// Linear scan for the nearest facility.
///
/// A later facility only takes over when it is closer by more than
/// [`DISTANCE_TOLERANCE_KM`], so ties go to the earlier one. Returns `None` for an
/// empty list.
pub fn resolve_nearest(point: GeoPoint, facilities: &[Facility]) -> Option<Nearest> {
    let mut best: Option<Nearest> = None;

    for (index, facility) in facilities.iter().enumerate() {
        let distance_km = haversine_km(point, facility.location);
        match best {
            Some(current) if distance_km >= current.distance_km - DISTANCE_TOLERANCE_KM => {}
            _ => best = Some(Nearest { index, distance_km }),
        }
    }

    best
}
