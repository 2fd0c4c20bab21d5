//! File ingestion: area and facility CSV tables, boundary GeoJSON.
//!
//! Produces the plain records [`Dataset::assemble`](crate::dataset::Dataset::assemble)
//! consumes. Any file may be gzip-compressed (`.gz` extension).

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::config::{ColumnConfig, Config};
use crate::dataset::Dataset;
use crate::geometry::BoundaryFeature;
use crate::models::{AreaRecord, FacilityRecord, Population};

fn open(path: &Path) -> Result<Box<dyn Read>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(reader)))
}

fn column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .with_context(|| format!("Column '{}' not found", name))
}

fn optional_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

fn field<'a>(record: &'a StringRecord, idx: Option<usize>) -> &'a str {
    idx.and_then(|i| record.get(i)).unwrap_or("").trim()
}

/// Population cell. Blank, `nan` and unparsable cells are unknown; decimals truncate.
pub fn parse_population(raw: &str) -> Population {
    let raw = raw.trim();
    if let Ok(p) = raw.parse::<u64>() {
        return Population::Known(p);
    }
    match raw.parse::<f64>() {
        Ok(p) if p.is_finite() && p >= 0.0 => Population::Known(p.trunc() as u64),
        _ => Population::Unknown,
    }
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Load area rows. Rows with an empty name are skipped; the region column is optional.
pub fn load_areas(path: &Path, columns: &ColumnConfig) -> Result<Vec<AreaRecord>> {
    info!("Loading areas from {}", path.display());

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(open(path)?);
    let headers = csv_reader.headers()?.clone();

    let name_idx = column(&headers, &columns.area_name)?;
    let population_idx = column(&headers, &columns.area_population)?;
    let region_idx = optional_column(&headers, &columns.area_region);

    let mut areas = Vec::new();
    for result in csv_reader.records() {
        let record = result.with_context(|| format!("Bad row in {}", path.display()))?;
        let name = field(&record, Some(name_idx));
        if name.is_empty() {
            continue;
        }
        areas.push(AreaRecord::new(
            name,
            field(&record, region_idx),
            parse_population(field(&record, Some(population_idx))),
        ));
    }

    info!("Loaded {} areas", areas.len());
    Ok(areas)
}

/// Load facility rows, discarding rows without a name or a usable coordinate.
pub fn load_facilities(path: &Path, columns: &ColumnConfig) -> Result<Vec<FacilityRecord>> {
    info!("Loading facilities from {}", path.display());

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(open(path)?);
    let headers = csv_reader.headers()?.clone();

    let name_idx = column(&headers, &columns.facility_name)?;
    let lat_idx = column(&headers, &columns.facility_latitude)?;
    let lon_idx = column(&headers, &columns.facility_longitude)?;
    let address_idx = optional_column(&headers, &columns.facility_address);
    let area_idx = optional_column(&headers, &columns.facility_area);

    let mut facilities = Vec::new();
    let mut discarded = 0usize;
    for result in csv_reader.records() {
        let record = result.with_context(|| format!("Bad row in {}", path.display()))?;
        let name = field(&record, Some(name_idx));
        let coords = (
            parse_coordinate(field(&record, Some(lat_idx))),
            parse_coordinate(field(&record, Some(lon_idx))),
        );

        match (name.is_empty(), coords) {
            (false, (Some(latitude), Some(longitude))) => facilities.push(FacilityRecord {
                name: name.to_string(),
                latitude,
                longitude,
                address: field(&record, address_idx).to_string(),
                area_label: field(&record, area_idx).to_string(),
            }),
            _ => {
                debug!("Discarding facility row {:?}", record.position().map(|p| p.line()));
                discarded += 1;
            }
        }
    }

    info!(
        "Loaded {} facilities ({} incomplete rows discarded)",
        facilities.len(),
        discarded
    );
    Ok(facilities)
}

/// Load a GeoJSON FeatureCollection of area boundaries
pub fn load_boundaries(path: &Path, name_property: &str) -> Result<Vec<BoundaryFeature>> {
    info!("Loading boundaries from {}", path.display());

    let collection: serde_json::Value = serde_json::from_reader(open(path)?)
        .with_context(|| format!("Failed to parse GeoJSON: {}", path.display()))?;

    let Some(features) = collection.get("features").and_then(|f| f.as_array()) else {
        bail!("{} is not a GeoJSON FeatureCollection", path.display());
    };

    let boundaries: Vec<BoundaryFeature> = features
        .iter()
        .map(|feature| BoundaryFeature::from_geojson(feature, name_property))
        .collect();

    info!("Loaded {} boundary features", boundaries.len());
    Ok(boundaries)
}

/// Load all three inputs named in the config and assemble them
pub fn load_dataset(config: &Config) -> Result<Dataset> {
    let input = &config.input;
    let areas_path = input.areas_csv.as_deref().context("No areas CSV configured")?;
    let facilities_path = input
        .facilities_csv
        .as_deref()
        .context("No facilities CSV configured")?;
    let boundaries_path = input
        .boundaries
        .as_deref()
        .context("No boundaries GeoJSON configured")?;

    let areas = load_areas(areas_path, &config.columns)?;
    let facilities = load_facilities(facilities_path, &config.columns)?;
    let boundaries = load_boundaries(boundaries_path, &config.columns.boundary_name)?;

    Ok(Dataset::assemble(
        areas,
        facilities,
        &boundaries,
        config.coverage.point_strategy,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_population() {
        assert_eq!(parse_population("12345"), Population::Known(12345));
        assert_eq!(parse_population(" 12345.0 "), Population::Known(12345));
        assert_eq!(parse_population("nan"), Population::Unknown);
        assert_eq!(parse_population(""), Population::Unknown);
        assert_eq!(parse_population("-3"), Population::Unknown);
        assert_eq!(parse_population("n/a"), Population::Unknown);
    }

    #[test]
    fn test_load_areas() {
        let file = write_temp(
            ".csv",
            "Bairro,RA,Populacao\nCopacabana,Zona Sul,161178\n,X,10\nJoá,Barra,nan\n",
        );
        let areas = load_areas(file.path(), &ColumnConfig::default()).unwrap();

        assert_eq!(areas.len(), 2);
        assert_eq!(
            areas[0],
            AreaRecord::new("Copacabana", "Zona Sul", Population::Known(161178))
        );
        assert_eq!(areas[1].population, Population::Unknown);
    }

    #[test]
    fn test_load_areas_missing_column() {
        let file = write_temp(".csv", "Nome,Populacao\nCentro,10\n");
        let err = load_areas(file.path(), &ColumnConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Column 'Bairro' not found"));
    }

    #[test]
    fn test_load_facilities_discards_incomplete_rows() {
        let file = write_temp(
            ".csv",
            "Name,Latitude,Longitude,Address,Bairro\n\
             Unidade 1,-22.90,-43.17,Rua A,Centro\n\
             ,-22.91,-43.18,Rua B,Centro\n\
             Unidade 3,,-43.19,Rua C,Lapa\n\
             Unidade 4,-22.93,abc,Rua D,Lapa\n\
             Unidade 5,-22.95,-43.20,,\n",
        );
        let facilities = load_facilities(file.path(), &ColumnConfig::default()).unwrap();

        assert_eq!(facilities.len(), 2);
        assert_eq!(facilities[0].name, "Unidade 1");
        assert_eq!(facilities[0].area_label, "Centro");
        assert_eq!(facilities[1].name, "Unidade 5");
        assert_eq!(facilities[1].address, "");
    }

    #[test]
    fn test_gzipped_csv() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(b"Bairro,Populacao\nLeblon,46044\n")
            .unwrap();
        let bytes = encoder.finish().unwrap();

        let mut file = tempfile::Builder::new().suffix(".csv.gz").tempfile().unwrap();
        file.write_all(&bytes).unwrap();

        let areas = load_areas(file.path(), &ColumnConfig::default()).unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].region_code, "");
    }

    #[test]
    fn test_load_boundaries() {
        let file = write_temp(
            ".geojson",
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"nome":"Urca"},
                 "geometry":{"type":"Polygon","coordinates":[[[-43.16,-22.95],[-43.15,-22.95],[-43.15,-22.94]]]}},
                {"type":"Feature","attributes":{"nome":"Leme"},"geometry":null}
            ]}"#,
        );
        let boundaries = load_boundaries(file.path(), "nome").unwrap();

        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries[0].name.as_deref(), Some("Urca"));
        assert!(boundaries[0].geometry().is_ok());
        assert_eq!(boundaries[1].name.as_deref(), Some("Leme"));
        assert!(boundaries[1].geometry.is_none());
    }

    #[test]
    fn test_load_dataset_end_to_end() {
        let areas = write_temp(".csv", "Bairro,RA,Populacao\nUrca,Zona Sul,7000\nLapa,Centro,nan\n");
        let facilities = write_temp(
            ".csv",
            "Name,Latitude,Longitude,Address,Bairro\nUnidade Urca,-22.951,-43.162,Rua X,Urca\n",
        );
        let boundaries = write_temp(
            ".geojson",
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"nome":"URCA"},
                 "geometry":{"type":"Polygon","coordinates":[[[-43.16,-22.95],[-43.15,-22.95],[-43.15,-22.94]]]}}
            ]}"#,
        );

        let mut config = Config::default();
        config.input.areas_csv = Some(areas.path().to_path_buf());
        config.input.facilities_csv = Some(facilities.path().to_path_buf());
        config.input.boundaries = Some(boundaries.path().to_path_buf());

        let dataset = load_dataset(&config).unwrap();
        assert_eq!(dataset.areas().len(), 2);
        assert_eq!(dataset.facilities().len(), 1);
        assert!(dataset.areas()[0].location.is_some());
        assert!(dataset.areas()[1].location.is_none());
        assert_eq!(dataset.issues().len(), 1);
    }

    #[test]
    fn test_load_dataset_requires_inputs() {
        let err = load_dataset(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("No areas CSV configured"));
    }

    #[test]
    fn test_load_boundaries_rejects_non_collection() {
        let file = write_temp(".geojson", r#"{"type":"Feature"}"#);
        assert!(load_boundaries(file.path(), "nome").is_err());
    }
}
