//! Boundary geometry handling.
//!
//! Turns GeoJSON boundary features into `geo` multipolygons and picks one
//! representative point per boundary for proximity work.

mod boundary;
mod point;

pub use boundary::{boundary_geometry, first_position, BoundaryFeature, GeometryError};
pub use point::{extract_points, BoundaryPoint, PointStrategy};
