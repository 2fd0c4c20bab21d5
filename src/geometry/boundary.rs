//! GeoJSON boundary features.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;
use thiserror::Error;

/// Why a boundary geometry could not be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("feature has no geometry")]
    MissingGeometry,
    #[error("geometry has no coordinates")]
    MissingCoordinates,
    #[error("unsupported geometry type {0:?}")]
    UnsupportedType(String),
    #[error("polygon has no rings")]
    NoRings,
    #[error("first ring has no vertices")]
    EmptyRing,
    #[error("ring is not a list of [lon, lat] positions")]
    BadPosition,
}

/// A raw boundary feature as handed over by ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub name: Option<String>,
    pub geometry: Option<Value>,
}

impl BoundaryFeature {
    /// Read a GeoJSON `Feature`.
    ///
    /// The name is looked up under `properties.<name_property>` first and
    /// `attributes.<name_property>` second (Esri-style exports).
    pub fn from_geojson(feature: &Value, name_property: &str) -> Self {
        let name = ["properties", "attributes"]
            .iter()
            .filter_map(|section| feature.get(section)?.get(name_property))
            .find_map(|value| match value {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });

        let geometry = feature.get("geometry").filter(|g| !g.is_null()).cloned();

        Self { name, geometry }
    }

    pub fn geometry(&self) -> Result<MultiPolygon<f64>, GeometryError> {
        boundary_geometry(self.raw_geometry()?)
    }

    /// First vertex of the first ring of the first member, without converting the rest
    pub fn first_vertex(&self) -> Result<Coord<f64>, GeometryError> {
        first_position(self.raw_geometry()?)
    }

    fn raw_geometry(&self) -> Result<&Value, GeometryError> {
        self.geometry.as_ref().ok_or(GeometryError::MissingGeometry)
    }
}

fn coordinates(geometry: &Value) -> Result<&Value, GeometryError> {
    geometry
        .get("coordinates")
        .filter(|c| !c.is_null())
        .ok_or(GeometryError::MissingCoordinates)
}

fn geometry_type(geometry: &Value) -> &str {
    geometry.get("type").and_then(Value::as_str).unwrap_or("")
}

/// Convert a GeoJSON Polygon or MultiPolygon geometry object.
///
/// A Polygon becomes a one-member MultiPolygon. Ring order is preserved, so the first
/// vertex of the first ring stays the first coordinate of the first exterior.
pub fn boundary_geometry(geometry: &Value) -> Result<MultiPolygon<f64>, GeometryError> {
    let coordinates = coordinates(geometry)?;

    match geometry_type(geometry) {
        "Polygon" => Ok(MultiPolygon::new(vec![parse_polygon(coordinates)?])),
        "MultiPolygon" => {
            let members = coordinates.as_array().ok_or(GeometryError::BadPosition)?;
            if members.is_empty() {
                return Err(GeometryError::NoRings);
            }
            let polygons = members
                .iter()
                .map(parse_polygon)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(MultiPolygon::new(polygons))
        }
        other => Err(GeometryError::UnsupportedType(other.to_string())),
    }
}

/// Read `coordinates[0][0]` of a Polygon or `coordinates[0][0][0]` of a MultiPolygon.
///
/// Later members, holes and later positions are never looked at.
pub fn first_position(geometry: &Value) -> Result<Coord<f64>, GeometryError> {
    let coordinates = coordinates(geometry)?;

    let rings = match geometry_type(geometry) {
        "Polygon" => coordinates,
        "MultiPolygon" => coordinates
            .as_array()
            .ok_or(GeometryError::BadPosition)?
            .first()
            .ok_or(GeometryError::NoRings)?,
        other => return Err(GeometryError::UnsupportedType(other.to_string())),
    };

    let exterior = rings
        .as_array()
        .ok_or(GeometryError::BadPosition)?
        .first()
        .ok_or(GeometryError::NoRings)?;
    let position = exterior
        .as_array()
        .ok_or(GeometryError::BadPosition)?
        .first()
        .ok_or(GeometryError::EmptyRing)?;

    parse_position(position)
}

fn parse_polygon(rings: &Value) -> Result<Polygon<f64>, GeometryError> {
    let rings = rings.as_array().ok_or(GeometryError::BadPosition)?;

    let mut rings = rings.iter().map(parse_ring);
    let exterior = rings.next().ok_or(GeometryError::NoRings)??;
    if exterior.0.is_empty() {
        return Err(GeometryError::EmptyRing);
    }
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

fn parse_ring(ring: &Value) -> Result<LineString<f64>, GeometryError> {
    let positions = ring.as_array().ok_or(GeometryError::BadPosition)?;

    let coords = positions
        .iter()
        .map(parse_position)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LineString::new(coords))
}

fn parse_position(position: &Value) -> Result<Coord<f64>, GeometryError> {
    let parts = position.as_array().ok_or(GeometryError::BadPosition)?;
    match (
        parts.first().and_then(Value::as_f64),
        parts.get(1).and_then(Value::as_f64),
    ) {
        (Some(x), Some(y)) => Ok(Coord { x, y }),
        _ => Err(GeometryError::BadPosition),
    }
}
