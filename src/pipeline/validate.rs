//! Validation run: spreadsheet rows → recovered coordinates → species
//! validation → status-colored map

use crate::config::{ColumnConfig, Config};
use crate::error::{Result, SpeciesMapError};
use crate::render::{escape_html, mean_center, LegendEntry, MapDocument, MapRenderer};
use crate::spreadsheet::SheetTable;
use crate::validator::{MemoizedValidator, SpeciesValidator};
use indicatif::{ProgressBar, ProgressStyle};
use species_map_common::{
    parse_cell_with, CoordinateRejection, DigitLayout, MapPoint, ObservationRecord,
    ParsedCoordinate, SpeciesValidationResult, StatusClassification,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Spreadsheet row with a recovered coordinate and a species name
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub row: usize,
    pub species: String,
    pub coordinate: ParsedCoordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    Coordinate(CoordinateRejection),
    MissingSpecies,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::Coordinate(rejection) => write!(f, "{}", rejection),
            DropReason::MissingSpecies => write!(f, "species name is missing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRow {
    pub row: usize,
    pub reason: DropReason,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractedRows {
    pub rows: Vec<ParsedRow>,
    pub dropped: Vec<DroppedRow>,
}

/// Outcome of a validation run
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub records: Vec<ObservationRecord>,
    pub results: Vec<SpeciesValidationResult>,
    pub dropped: Vec<DroppedRow>,
    pub marker_count: usize,
    pub cancelled: bool,
}

/// Recover coordinates and species names from every row.
///
/// Rows that fail are recorded in `dropped` and logged; a missing column or
/// zero usable rows ends the run.
pub fn extract_observations(
    table: &SheetTable,
    columns: &ColumnConfig,
    layout: DigitLayout,
) -> Result<ExtractedRows> {
    let coord_col = table.column(&columns.coordinates)?;
    let species_col = table.column(&columns.species)?;

    let mut extracted = ExtractedRows::default();

    for row in &table.rows {
        let coordinate = match parse_cell_with(row.cell(coord_col), layout) {
            Ok(coordinate) => coordinate,
            Err(rejection) => {
                warn!(row = row.number, reason = %rejection, "dropping row");
                extracted.dropped.push(DroppedRow {
                    row: row.number,
                    reason: DropReason::Coordinate(rejection),
                });
                continue;
            }
        };

        let species = row.cell(species_col).display();
        if species.is_empty() {
            warn!(row = row.number, "dropping row without species name");
            extracted.dropped.push(DroppedRow {
                row: row.number,
                reason: DropReason::MissingSpecies,
            });
            continue;
        }

        extracted.rows.push(ParsedRow {
            row: row.number,
            species,
            coordinate,
        });
    }

    if extracted.rows.is_empty() {
        return Err(SpeciesMapError::EmptyResult(format!(
            "none of {} rows has a recoverable '{}' value and a '{}' name",
            table.len(),
            columns.coordinates,
            columns.species
        )));
    }

    Ok(extracted)
}

/// Distinct species names in first-seen order
pub fn unique_species(rows: &[ParsedRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| seen.insert(row.species.as_str()))
        .map(|row| row.species.clone())
        .collect()
}

/// Attach validation results to rows. Rows whose species has no result
/// (validation cancelled before reaching it) are left out.
pub fn merge_observations(
    rows: &[ParsedRow],
    results: &[SpeciesValidationResult],
) -> Vec<ObservationRecord> {
    let by_name: HashMap<&str, &SpeciesValidationResult> =
        results.iter().map(|r| (r.species.as_str(), r)).collect();

    rows.iter()
        .filter_map(|row| {
            by_name.get(row.species.as_str()).map(|result| ObservationRecord {
                row: row.row,
                species: row.species.clone(),
                coordinate: row.coordinate,
                validation: (*result).clone(),
            })
        })
        .collect()
}

fn observation_popup(record: &ObservationRecord, region: Option<&str>) -> String {
    let color = record.validation.color();
    format!(
        "<b>Species:</b> {}<br><b>GBIF status ({}):</b> <span style=\"color:{};\">{}</span><br>Lat: {:.6}, Lon: {:.6}",
        escape_html(&record.species),
        escape_html(region.unwrap_or("ALL")),
        color,
        escape_html(&record.validation.label(region)),
        record.coordinate.latitude,
        record.coordinate.longitude
    )
}

/// Map of merged observations, one marker per record, colored by status
pub fn build_validation_map(records: &[ObservationRecord], config: &Config) -> MapDocument {
    let region = config.region();

    let points: Vec<MapPoint> = records
        .iter()
        .map(|record| MapPoint {
            latitude: record.coordinate.latitude,
            longitude: record.coordinate.longitude,
            popup_html: observation_popup(record, region),
            tooltip: Some(record.species.clone()),
            color: record.validation.color(),
        })
        .collect();

    let present: HashSet<StatusClassification> =
        records.iter().map(|r| r.validation.status).collect();
    let legend = StatusClassification::ALL
        .iter()
        .filter(|status| present.contains(*status))
        .map(|status| LegendEntry {
            label: status.label(region, None),
            color: status.color(),
        })
        .collect();

    let center = if config.map.center_on_data {
        mean_center(&points).unwrap_or(config.map.center)
    } else {
        config.map.center
    };

    MapDocument::new("Species validation", center, config.map.zoom, config.map.tiles)
        .with_points(points, config.map.cluster_threshold)
        .with_legend(legend)
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:30.green} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

/// Full validation pipeline. The map is written to `output` unless the run
/// was cancelled before any species was validated.
pub async fn run_validation<V, R>(
    table: &SheetTable,
    config: &Config,
    validator: V,
    renderer: &R,
    output: &Path,
    cancel: &CancellationToken,
) -> Result<ValidationReport>
where
    V: SpeciesValidator,
    R: MapRenderer,
{
    println!("[1/4] Recovering coordinates...");
    let extracted = extract_observations(table, &config.columns, config.layout)?;
    println!(
        "✔ {} rows usable, {} dropped\n",
        extracted.rows.len(),
        extracted.dropped.len()
    );

    let names = unique_species(&extracted.rows);
    println!(
        "[2/4] Validating {} species against GBIF (region: {})...",
        names.len(),
        config.region().unwrap_or("ALL")
    );

    let pb = progress_bar(names.len());
    let mut memo = MemoizedValidator::new(validator);
    let run = memo
        .validate_all(&names, cancel, |result| {
            pb.set_message(result.species.clone());
            pb.inc(1);
            info!(
                species = %result.species,
                status = %result.status,
                occurrences = result.occurrence_count,
                "validated"
            );
        })
        .await;
    pb.finish_and_clear();

    if run.cancelled {
        println!(
            "⚠ Validation cancelled after {} of {} species\n",
            run.results.len(),
            names.len()
        );
    } else {
        println!("✔ {} species validated\n", run.results.len());
    }

    println!("[3/4] Merging results...");
    let records = merge_observations(&extracted.rows, &run.results);
    if records.is_empty() {
        return Err(SpeciesMapError::EmptyResult(
            "validation was cancelled before any species completed".into(),
        ));
    }
    println!("✔ {} observations\n", records.len());

    println!("[4/4] Rendering map...");
    let document = build_validation_map(&records, config);
    let rendered = renderer.render(&document)?;
    rendered.save(output)?;
    println!("✔ Map saved: {}", output.display());

    Ok(ValidationReport {
        marker_count: rendered.marker_count,
        records,
        results: run.results,
        dropped: extracted.dropped,
        cancelled: run.cancelled,
    })
}
