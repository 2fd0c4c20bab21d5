//! Caller-side state holding the latest complete coverage snapshot.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::{classify, ClassifiedArea, ClassifiedAreas, Thresholds};
use crate::dataset::Dataset;
use crate::stats::{default_population_floor, summarize, CoverageStats};

/// Classification plus the statistics derived from it, computed together
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSnapshot {
    /// Increments on every recomputation
    pub generation: u64,
    pub classified: ClassifiedAreas,
    pub stats: CoverageStats,
}

/// Inputs plus the derived snapshot.
///
/// Every change of inputs rebuilds the whole snapshot before swapping it in, so readers
/// holding an `Arc<CoverageSnapshot>` never see a half-updated view.
pub struct CoverageSession {
    dataset: Arc<Dataset>,
    thresholds: Thresholds,
    population_floor: u64,
    snapshot: Arc<CoverageSnapshot>,
}

impl CoverageSession {
    /// Start a session with the given thresholds. The population floor defaults to half
    /// the largest observed population.
    pub fn new(dataset: Arc<Dataset>, thresholds: Thresholds) -> Self {
        let population_floor = default_population_floor(dataset.areas());
        Self::with_population_floor(dataset, thresholds, population_floor)
    }

    pub fn with_population_floor(
        dataset: Arc<Dataset>,
        thresholds: Thresholds,
        population_floor: u64,
    ) -> Self {
        let snapshot = Arc::new(compute(&dataset, &thresholds, population_floor, 0));
        Self {
            dataset,
            thresholds,
            population_floor,
            snapshot,
        }
    }

    pub fn snapshot(&self) -> Arc<CoverageSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn population_floor(&self) -> u64 {
        self.population_floor
    }

    /// Radius is clamped like [`Thresholds::new`]; the served threshold is kept
    pub fn set_coverage_radius(&mut self, km: f64) {
        self.update(Some(km), None);
    }

    pub fn set_population_floor(&mut self, floor: u64) {
        self.update(None, Some(floor));
    }

    /// Apply several parameter edits with a single recomputation
    pub fn update(&mut self, coverage_radius_km: Option<f64>, population_floor: Option<u64>) {
        if let Some(km) = coverage_radius_km {
            self.thresholds = Thresholds::new(km).with_served_km(self.thresholds.served_km());
        }
        if let Some(floor) = population_floor {
            self.population_floor = floor;
        }
        self.recompute();
    }

    /// Swap in a freshly loaded dataset; the population floor resets to its default
    pub fn replace_dataset(&mut self, dataset: Arc<Dataset>) {
        self.population_floor = default_population_floor(dataset.areas());
        self.dataset = dataset;
        self.recompute();
    }

    /// Classified area styling a boundary, or `None` for neutral rendering
    pub fn area_for_boundary(&self, boundary_name: &str) -> Option<(Arc<CoverageSnapshot>, usize)> {
        let position = self.dataset.area_for_boundary(boundary_name)?;
        let snapshot = self.snapshot();
        snapshot.classified.get(position)?;
        Some((snapshot, position))
    }

    fn recompute(&mut self) {
        let generation = self.snapshot.generation + 1;
        let next = compute(&self.dataset, &self.thresholds, self.population_floor, generation);
        self.snapshot = Arc::new(next);
    }
}

impl CoverageSnapshot {
    pub fn area(&self, position: usize) -> Option<&ClassifiedArea> {
        self.classified.get(position)
    }
}

fn compute(
    dataset: &Dataset,
    thresholds: &Thresholds,
    population_floor: u64,
    generation: u64,
) -> CoverageSnapshot {
    let classified = classify(dataset.areas(), dataset.facilities(), thresholds);
    let stats = summarize(&classified, population_floor);

    debug!(
        "Coverage generation {}: radius {} km, floor {}, {} outside radius",
        generation,
        thresholds.coverage_radius_km(),
        population_floor,
        stats.areas_outside_radius
    );

    CoverageSnapshot {
        generation,
        classified,
        stats,
    }
}
