//! Batch coverage report.
//!
//! Loads areas, facilities and boundaries, classifies coverage and prints the
//! statistics together with the filtered area list.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use covermap::config::Config;
use covermap::coverage::{ClassifiedArea, CoverageSession, Thresholds};
use covermap::filter::{sorted_for_display, underserved_report, AreaQuery, DisplayOrder};
use covermap::geometry::PointStrategy;
use covermap::loader::load_dataset;
use covermap::stats::CoverageStats;
use covermap::DataIssue;

#[derive(Parser, Debug)]
#[command(name = "report")]
#[command(about = "Facility coverage report for city areas")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Area table (overrides config)
    #[arg(long)]
    areas: Option<PathBuf>,

    /// Facility table (overrides config)
    #[arg(long)]
    facilities: Option<PathBuf>,

    /// Boundary GeoJSON (overrides config)
    #[arg(long)]
    boundaries: Option<PathBuf>,

    /// Coverage radius in km, clamped to 1..=20
    #[arg(short, long)]
    radius: Option<f64>,

    /// Population floor (defaults to half the largest population)
    #[arg(long)]
    population_floor: Option<u64>,

    /// Representative point strategy
    #[arg(long, value_enum)]
    point_strategy: Option<PointStrategy>,

    /// Search text matched against area name or region
    #[arg(short, long, default_value = "")]
    query: String,

    /// Only areas without a facility
    #[arg(long)]
    only_without_facility: bool,

    /// Only areas outside the coverage radius
    #[arg(long)]
    only_outside_radius: bool,

    /// Display order of the area list
    #[arg(long, value_enum, default_value = "canonical")]
    sort: DisplayOrder,

    /// Also print areas outside the radius, most populous first
    #[arg(long)]
    underserved: bool,

    /// Also print data-quality issues
    #[arg(long)]
    issues: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    stats: &'a CoverageStats,
    areas: Vec<&'a ClassifiedArea>,
    #[serde(skip_serializing_if = "Option::is_none")]
    underserved: Option<Vec<&'a ClassifiedArea>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<&'a [DataIssue]>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    apply_overrides(&mut config, &args);

    info!("Covermap Report");

    let dataset = Arc::new(load_dataset(&config)?);
    let thresholds = Thresholds::new(config.coverage.radius_km);
    let session = match config.coverage.population_floor {
        Some(floor) => CoverageSession::with_population_floor(dataset, thresholds, floor),
        None => CoverageSession::new(dataset, thresholds),
    };

    let snapshot = session.snapshot();
    let query = AreaQuery {
        text: args.query.clone(),
        only_without_facility: args.only_without_facility,
        only_outside_radius: args.only_outside_radius,
        population_floor: session.population_floor(),
    };
    let filtered = query.apply(&snapshot.classified);
    let areas = sorted_for_display(&filtered, args.sort);
    let underserved = args
        .underserved
        .then(|| underserved_report(&snapshot.classified));
    let issues = args.issues.then(|| session.dataset().issues());

    if args.json {
        let report = JsonReport {
            stats: &snapshot.stats,
            areas,
            underserved,
            issues,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_stats(&snapshot.stats);

    println!();
    println!("Areas ({}):", areas.len());
    for area in &areas {
        print_area(area);
    }

    if let Some(underserved) = underserved {
        println!();
        println!("Outside {} km ({}):", snapshot.stats.coverage_radius_km, underserved.len());
        for area in &underserved {
            print_area(area);
        }
    }

    if let Some(issues) = issues {
        println!();
        println!("Data issues ({}):", issues.len());
        for issue in issues {
            println!("  - {}", issue);
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(path) = &args.areas {
        config.input.areas_csv = Some(path.clone());
    }
    if let Some(path) = &args.facilities {
        config.input.facilities_csv = Some(path.clone());
    }
    if let Some(path) = &args.boundaries {
        config.input.boundaries = Some(path.clone());
    }
    if let Some(radius) = args.radius {
        config.coverage.radius_km = radius;
    }
    if let Some(floor) = args.population_floor {
        config.coverage.population_floor = Some(floor);
    }
    if let Some(strategy) = args.point_strategy {
        config.coverage.point_strategy = strategy;
    }
}

fn print_stats(stats: &CoverageStats) {
    println!("Total areas:              {}", stats.total_areas);
    println!("Total facilities:         {}", stats.total_facilities);
    println!("Without facility:         {}", stats.areas_without_facility);
    println!(
        "Outside {:>4} km radius:   {}",
        stats.coverage_radius_km, stats.areas_outside_radius
    );
    println!(
        "Population >= {:<10} {}",
        stats.population_floor, stats.areas_above_population_threshold
    );
}

fn print_area(area: &ClassifiedArea) {
    let population = area
        .area
        .population
        .known()
        .map_or_else(|| "n/a".to_string(), |p| p.to_string());
    let distance = area
        .distance_km
        .map_or_else(|| "n/a".to_string(), |d| format!("{:.2} km", d));

    println!(
        "  {:<32} {:<16} pop {:>9}  nearest {} ({}){}{}",
        area.area.name,
        area.area.region_code,
        population,
        area.nearest_facility_name.as_deref().unwrap_or("n/a"),
        distance,
        if area.has_facility { " [served]" } else { "" },
        if area.within_radius { "" } else { " [outside]" },
    );
}
