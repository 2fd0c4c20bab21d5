//! Dataset assembly: joins tabular area records with boundary features.

use tracing::{debug, info, warn};

use crate::error::DataIssue;
use crate::geometry::{extract_points, BoundaryFeature, PointStrategy};
use crate::models::{Area, AreaRecord, Facility, FacilityRecord};
use crate::normalize::NameIndex;

/// One immutable input snapshot: areas with representative points, facilities, and the
/// data-quality issues found while joining them.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    areas: Vec<Area>,
    facilities: Vec<Facility>,
    boundary_names: Vec<String>,
    boundary_index: NameIndex,
    /// Area that claimed each boundary during assembly, parallel to `boundary_names`
    boundary_area: Vec<Option<usize>>,
    issues: Vec<DataIssue>,
}

impl Dataset {
    /// Join area records with boundary features and attach representative points.
    ///
    /// Area order follows `area_records`; facility order follows `facility_records`.
    pub fn assemble(
        area_records: Vec<AreaRecord>,
        facility_records: Vec<FacilityRecord>,
        features: &[BoundaryFeature],
        strategy: PointStrategy,
    ) -> Self {
        let (points, mut issues) = extract_points(features, strategy);
        let boundary_index = NameIndex::build(points.iter().map(|p| p.name.as_str()));
        let mut boundary_area: Vec<Option<usize>> = vec![None; points.len()];

        let mut areas = Vec::with_capacity(area_records.len());
        for record in area_records {
            let location = match boundary_index.resolve(&record.name) {
                Some(m) => {
                    if !m.exact {
                        debug!(
                            "Area {} joined boundary {} by substring",
                            record.name, points[m.position].name
                        );
                    }
                    boundary_area[m.position].get_or_insert(areas.len());
                    points[m.position].location
                }
                None => {
                    debug!("No boundary for area {}", record.name);
                    issues.push(DataIssue::MissingBoundary {
                        name: record.name.clone(),
                    });
                    None
                }
            };
            areas.push(Area::new(record, location));
        }

        for (point, _) in points.iter().zip(&boundary_area).filter(|(_, a)| a.is_none()) {
            debug!("Boundary {} has no matching area record", point.name);
            issues.push(DataIssue::UnmatchedBoundary {
                name: point.name.clone(),
            });
        }

        let facilities: Vec<Facility> = facility_records.into_iter().map(Facility::from).collect();
        if facilities.is_empty() {
            warn!("No facilities loaded; all areas will resolve without a distance");
            issues.push(DataIssue::EmptyFacilitySet);
        }

        info!(
            "Assembled {} areas ({} located), {} facilities, {} boundaries, {} data issues",
            areas.len(),
            areas.iter().filter(|a| a.location.is_some()).count(),
            facilities.len(),
            points.len(),
            issues.len()
        );

        Self {
            areas,
            facilities,
            boundary_names: points.into_iter().map(|p| p.name).collect(),
            boundary_index,
            boundary_area,
            issues,
        }
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn issues(&self) -> &[DataIssue] {
        &self.issues
    }

    /// Names of every named boundary feature, in file order
    pub fn boundary_names(&self) -> &[String] {
        &self.boundary_names
    }

    /// Position of the area a boundary label styles: the area that claimed this boundary
    /// during assembly. `None` (including every unmatched boundary) means the boundary
    /// renders with neutral classification.
    pub fn area_for_boundary(&self, boundary_name: &str) -> Option<usize> {
        let m = self.boundary_index.resolve(boundary_name)?;
        self.boundary_area.get(m.position).copied().flatten()
    }
}
