//! Coverage thresholds.

use serde::Serialize;

/// Distance below which an area counts as already hosting a facility (km)
pub const SERVED_THRESHOLD_KM: f64 = 1.0;

pub const DEFAULT_COVERAGE_RADIUS_KM: f64 = 10.0;
pub const MIN_COVERAGE_RADIUS_KM: f64 = 1.0;
pub const MAX_COVERAGE_RADIUS_KM: f64 = 20.0;

/// The pair of distance thresholds one classification generation is computed against
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    coverage_radius_km: f64,
    served_km: f64,
}

impl Thresholds {
    /// Radius is clamped to the supported range; a non-finite radius falls back to the default.
    pub fn new(coverage_radius_km: f64) -> Self {
        Self {
            coverage_radius_km: clamp_radius(coverage_radius_km),
            served_km: SERVED_THRESHOLD_KM,
        }
    }

    /// Override the served threshold
    pub fn with_served_km(mut self, served_km: f64) -> Self {
        if served_km.is_finite() && served_km >= 0.0 {
            self.served_km = served_km;
        }
        self
    }

    pub fn coverage_radius_km(&self) -> f64 {
        self.coverage_radius_km
    }

    pub fn served_km(&self) -> f64 {
        self.served_km
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(DEFAULT_COVERAGE_RADIUS_KM)
    }
}

fn clamp_radius(km: f64) -> f64 {
    if km.is_finite() {
        km.clamp(MIN_COVERAGE_RADIUS_KM, MAX_COVERAGE_RADIUS_KM)
    } else {
        DEFAULT_COVERAGE_RADIUS_KM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let t = Thresholds::default();
        assert_eq!(t.coverage_radius_km(), 10.0);
        assert_eq!(t.served_km(), SERVED_THRESHOLD_KM);
    }

    #[test]
    fn test_radius_is_clamped() {
        assert_eq!(Thresholds::new(0.2).coverage_radius_km(), 1.0);
        assert_eq!(Thresholds::new(35.0).coverage_radius_km(), 20.0);
        assert_eq!(Thresholds::new(7.5).coverage_radius_km(), 7.5);
        assert_eq!(Thresholds::new(f64::NAN).coverage_radius_km(), 10.0);
    }

    #[test]
    fn test_serialized_radius_is_clamped() {
        let json = serde_json::to_value(Thresholds::new(50.0)).unwrap();
        assert_eq!(json["coverage_radius_km"], 20.0);
        assert_eq!(json["served_km"], 1.0);
    }

    #[test]
    fn test_served_override_rejects_nonsense() {
        assert_eq!(Thresholds::default().with_served_km(0.5).served_km(), 0.5);
        assert_eq!(Thresholds::default().with_served_km(-1.0).served_km(), 1.0);
    }
}
