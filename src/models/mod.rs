//! Core data models for the coverage engine.

pub mod area;
pub mod facility;

pub use area::{Area, AreaRecord, Population};
pub use facility::{Facility, FacilityRecord, GeoPoint};
