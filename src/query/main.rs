//! Query server for coverage results.
//!
//! Loads the datasets once, keeps a [`CoverageSession`] in memory and serves
//! statistics, filtered area lists, facilities, distance measurements and boundary
//! lookups over HTTP. Threshold edits arrive through `POST /v1/settings` and swap in a
//! freshly computed snapshot.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use covermap::config::Config;
use covermap::coverage::{ClassifiedArea, CoverageSession, Thresholds};
use covermap::filter::underserved_report;
use covermap::loader::load_dataset;
use covermap::stats::CoverageStats;
use covermap::DataIssue;

mod search;
use search::{
    execute_search, list_facilities, measure, DistanceParams, DistanceResponse,
    FacilityQueryParams, FacilityResponse, SearchQueryParams, SearchResponse,
};

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Facility coverage query server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Application state shared across handlers
struct AppState {
    session: RwLock<CoverageSession>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Covermap Query Server");

    let config = Config::load_from_file(&args.config)?;
    let dataset = Arc::new(load_dataset(&config)?);

    let thresholds = Thresholds::new(config.coverage.radius_km);
    let session = match config.coverage.population_floor {
        Some(floor) => CoverageSession::with_population_floor(dataset, thresholds, floor),
        None => CoverageSession::new(dataset, thresholds),
    };
    info!(
        "Coverage ready: radius {} km, population floor {}",
        session.thresholds().coverage_radius_km(),
        session.population_floor()
    );

    let state = Arc::new(AppState {
        session: RwLock::new(session),
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/stats", get(stats_handler))
        .route("/v1/areas", get(areas_handler))
        .route("/v1/underserved", get(underserved_handler))
        .route("/v1/boundaries/{name}", get(boundary_handler))
        .route("/v1/issues", get(issues_handler))
        .route("/v1/facilities", get(facilities_handler))
        .route("/v1/distance", get(distance_handler))
        .route("/v1/settings", post(settings_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listen = args.listen.unwrap_or(config.server.listen);
    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    generation: u64,
    areas: usize,
    facilities: usize,
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let session = state.session.read().await;
    let snapshot = session.snapshot();

    Json(HealthResponse {
        status: if snapshot.stats.total_facilities > 0 { "ok" } else { "degraded" },
        generation: snapshot.generation,
        areas: snapshot.stats.total_areas,
        facilities: snapshot.stats.total_facilities,
    })
}

/// Aggregate statistics of the current snapshot
async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<CoverageStats> {
    let snapshot = state.session.read().await.snapshot();
    Json(snapshot.stats.clone())
}

/// Filtered area list
async fn areas_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQueryParams>,
) -> Json<SearchResponse> {
    let (snapshot, floor) = {
        let session = state.session.read().await;
        (session.snapshot(), session.population_floor())
    };

    Json(execute_search(&snapshot, &params, floor))
}

#[derive(Serialize)]
struct UnderservedResponse {
    generation: u64,
    coverage_radius_km: f64,
    features: Vec<ClassifiedArea>,
}

/// Areas outside the radius, most populous first
async fn underserved_handler(State(state): State<Arc<AppState>>) -> Json<UnderservedResponse> {
    let snapshot = state.session.read().await.snapshot();

    Json(UnderservedResponse {
        generation: snapshot.generation,
        coverage_radius_km: snapshot.stats.coverage_radius_km,
        features: underserved_report(&snapshot.classified)
            .into_iter()
            .cloned()
            .collect(),
    })
}

#[derive(Serialize)]
struct BoundaryResponse {
    boundary: String,
    /// Null when the boundary has no area record (neutral styling)
    area: Option<ClassifiedArea>,
}

/// Classification styling a boundary feature
async fn boundary_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Json<BoundaryResponse> {
    let session = state.session.read().await;
    let area = session
        .area_for_boundary(&name)
        .and_then(|(snapshot, position)| snapshot.area(position).cloned());

    Json(BoundaryResponse {
        boundary: name,
        area,
    })
}

/// Data-quality issues found while assembling the dataset
async fn issues_handler(State(state): State<Arc<AppState>>) -> Json<Vec<DataIssue>> {
    let session = state.session.read().await;
    Json(session.dataset().issues().to_vec())
}

/// Facility list with names and addresses
async fn facilities_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FacilityQueryParams>,
) -> Json<FacilityResponse> {
    let session = state.session.read().await;
    Json(list_facilities(session.dataset().facilities(), &params))
}

/// Distance between two arbitrary points
async fn distance_handler(
    Query(params): Query<DistanceParams>,
) -> Result<Json<DistanceResponse>, (StatusCode, String)> {
    measure(&params)
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, e))
}

#[derive(Deserialize)]
struct SettingsRequest {
    coverage_radius_km: Option<f64>,
    population_floor: Option<u64>,
}

/// Update thresholds and return the statistics of the new snapshot
async fn settings_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SettingsRequest>,
) -> Json<CoverageStats> {
    let mut session = state.session.write().await;
    session.update(request.coverage_radius_km, request.population_floor);

    let snapshot = session.snapshot();
    info!(
        "Settings applied: generation {}, radius {} km, floor {}",
        snapshot.generation, snapshot.stats.coverage_radius_km, snapshot.stats.population_floor
    );

    Json(snapshot.stats.clone())
}
