//! Representative points for boundaries.

use geo::{Centroid, MultiPolygon};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::BoundaryFeature;
use crate::error::DataIssue;
use crate::models::GeoPoint;

/// How a boundary is reduced to a single coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PointStrategy {
    /// First vertex of the first ring of the first polygon
    #[default]
    FirstVertex,
    /// Area-weighted centroid of the whole multipolygon
    Centroid,
}

impl PointStrategy {
    pub fn locate(&self, geometry: &MultiPolygon<f64>) -> Option<GeoPoint> {
        match self {
            PointStrategy::FirstVertex => geometry
                .0
                .first()?
                .exterior()
                .0
                .first()
                .map(|c| GeoPoint::from(*c)),
            PointStrategy::Centroid => geometry.centroid().map(GeoPoint::from),
        }
    }
}

/// A named boundary reduced to its representative point
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPoint {
    pub name: String,
    /// None when the geometry was malformed
    pub location: Option<GeoPoint>,
}

/// Reduce every named boundary feature to a [`BoundaryPoint`].
///
/// Unnamed features are dropped. Malformed geometry keeps the name (so the boundary still
/// joins) and is reported. With [`PointStrategy::FirstVertex`] a usable first vertex is
/// kept even when later members or holes are broken; [`PointStrategy::Centroid`] needs
/// the whole geometry.
pub fn extract_points(
    features: &[BoundaryFeature],
    strategy: PointStrategy,
) -> (Vec<BoundaryPoint>, Vec<DataIssue>) {
    let mut points = Vec::with_capacity(features.len());
    let mut issues = Vec::new();

    for (position, feature) in features.iter().enumerate() {
        let Some(name) = feature.name.clone() else {
            debug!("Skipping unnamed boundary feature #{}", position);
            issues.push(DataIssue::UnnamedBoundary { position });
            continue;
        };

        let location = match strategy {
            PointStrategy::FirstVertex => match feature.first_vertex() {
                Ok(vertex) => {
                    if let Err(e) = feature.geometry() {
                        debug!("Boundary {} keeps its first vertex despite: {}", name, e);
                        issues.push(DataIssue::malformed(&name, e.to_string()));
                    }
                    Some(GeoPoint::from(vertex))
                }
                Err(e) => {
                    debug!("No first vertex for boundary {}: {}", name, e);
                    issues.push(DataIssue::malformed(&name, e.to_string()));
                    None
                }
            },
            PointStrategy::Centroid => match feature.geometry() {
                Ok(geometry) => {
                    let located = strategy.locate(&geometry);
                    if located.is_none() {
                        issues.push(DataIssue::malformed(&name, "no representative point"));
                    }
                    located
                }
                Err(e) => {
                    debug!("Could not read geometry for boundary {}: {}", name, e);
                    issues.push(DataIssue::malformed(&name, e.to_string()));
                    None
                }
            },
        };

        points.push(BoundaryPoint { name, location });
    }

    (points, issues)
}
