//! Display subsets of a classified area set.

use serde::Deserialize;

use crate::coverage::{ClassifiedArea, ClassifiedAreas};
use crate::normalize::normalize_key;

/// Active search text, coverage toggles and population floor
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AreaQuery {
    /// Matched against area name or region code, case and accent insensitive
    pub text: String,
    pub only_without_facility: bool,
    pub only_outside_radius: bool,
    /// Inclusive
    pub population_floor: u64,
}

impl AreaQuery {
    pub fn matches(&self, area: &ClassifiedArea) -> bool {
        self.matches_key(&normalize_key(&self.text), area)
    }

    fn matches_key(&self, text_key: &str, area: &ClassifiedArea) -> bool {
        if self.only_without_facility && area.has_facility {
            return false;
        }
        if self.only_outside_radius && area.within_radius {
            return false;
        }

        let text_matches = text_key.is_empty()
            || area.area.name_key().contains(text_key)
            || area.area.region_key().contains(text_key);

        text_matches && area.area.population.meets(self.population_floor)
    }

    /// Matching areas in canonical order
    pub fn apply<'a>(&self, classified: &'a ClassifiedAreas) -> Vec<&'a ClassifiedArea> {
        let text_key = normalize_key(&self.text);
        classified
            .iter()
            .filter(|area| self.matches_key(&text_key, area))
            .collect()
    }
}

/// Display-time ordering of an already filtered subset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DisplayOrder {
    #[default]
    Canonical,
    /// Largest population first, unknown populations last
    PopulationDesc,
}

/// Ordered copy for display. The input slice is left untouched.
pub fn sorted_for_display<'a>(
    areas: &[&'a ClassifiedArea],
    order: DisplayOrder,
) -> Vec<&'a ClassifiedArea> {
    let mut sorted = areas.to_vec();
    if order == DisplayOrder::PopulationDesc {
        // stable: ties keep canonical order
        sorted.sort_by(|a, b| b.area.population.known().cmp(&a.area.population.known()));
    }
    sorted
}

/// Areas outside the coverage radius, most populous first
pub fn underserved_report(classified: &ClassifiedAreas) -> Vec<&ClassifiedArea> {
    let outside: Vec<&ClassifiedArea> = classified.iter().filter(|a| !a.within_radius).collect();
    sorted_for_display(&outside, DisplayOrder::PopulationDesc)
}
