//! Coverage classification.
//!
//! [`classify`] is a pure function of (areas, facilities, thresholds);
//! [`CoverageSession`] is the state layer that re-runs it whenever an input changes.

mod classify;
mod session;
mod thresholds;

pub use classify::{classify, ClassifiedArea, ClassifiedAreas};
pub use session::{CoverageSession, CoverageSnapshot};
pub use thresholds::{
    Thresholds, DEFAULT_COVERAGE_RADIUS_KM, MAX_COVERAGE_RADIUS_KM, MIN_COVERAGE_RADIUS_KM,
    SERVED_THRESHOLD_KM,
};
