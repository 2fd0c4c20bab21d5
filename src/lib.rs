//! Covermap - facility coverage analysis for city areas
//!
//! This library provides the coverage engine shared by the report and query binaries:
//! name reconciliation between boundary and tabular datasets, representative points,
//! nearest-facility resolution, coverage classification, statistics and filtering.

pub mod config;
pub mod coverage;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod proximity;
pub mod stats;

pub use coverage::{classify, ClassifiedArea, ClassifiedAreas, CoverageSession, Thresholds};
pub use dataset::Dataset;
pub use error::DataIssue;
pub use models::{Area, AreaRecord, Facility, FacilityRecord, GeoPoint, Population};
