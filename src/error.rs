//! Data-quality conditions reported during dataset assembly.
//!
//! None of these abort a computation; they are collected on the
//! [`Dataset`](crate::dataset::Dataset) so a caller can surface them.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIssue {
    /// Boundary feature with no corresponding area record; rendered neutral
    #[error("boundary '{name}' has no matching area record")]
    UnmatchedBoundary { name: String },

    /// Boundary feature without a readable name property
    #[error("boundary feature #{position} has no name")]
    UnnamedBoundary { position: usize },

    /// Missing coordinates or unexpected ring shape
    #[error("boundary '{name}' has malformed geometry: {reason}")]
    MalformedGeometry { name: String, reason: String },

    /// Area record with no boundary to take a representative point from
    #[error("area '{name}' has no matching boundary")]
    MissingBoundary { name: String },

    /// No facilities loaded; every area resolves without a distance
    #[error("no facilities loaded")]
    EmptyFacilitySet,
}

impl DataIssue {
    pub fn malformed(name: &str, reason: impl Into<String>) -> Self {
        DataIssue::MalformedGeometry {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_messages() {
        let issue = DataIssue::malformed("Centro", "no rings");
        assert_eq!(
            issue.to_string(),
            "boundary 'Centro' has malformed geometry: no rings"
        );
        assert_eq!(DataIssue::EmptyFacilitySet.to_string(), "no facilities loaded");
    }

    #[test]
    fn test_issue_serializes_with_kind_tag() {
        let json = serde_json::to_value(DataIssue::UnmatchedBoundary {
            name: "Ilha".to_string(),
        })
        .unwrap();
        assert_eq!(json["kind"], "unmatched_boundary");
        assert_eq!(json["name"], "Ilha");
    }
}
