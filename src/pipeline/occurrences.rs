//! Occurrence map: every GBIF occurrence of the spreadsheet's species

use crate::config::{Config, GbifConfig};
use crate::error::{Result, SpeciesMapError};
use crate::gbif::{fetch_occurrences, OccurrenceQuery, SpeciesLookup};
use crate::geometry::wkt_center;
use crate::render::{escape_html, MapDocument, MapRenderer, TileProvider};
use crate::spreadsheet::SheetTable;
use species_map_common::{MapPoint, MarkerColor, OccurrencePoint};
use std::collections::HashSet;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct OccurrenceReport {
    /// Species with at least one mapped occurrence, in input order
    pub mapped: Vec<(String, usize)>,
    /// Species skipped: not accepted, lookup failed, or no occurrences
    pub skipped: Vec<String>,
    pub marker_count: usize,
    pub cancelled: bool,
}

impl OccurrenceReport {
    /// Closing console line; marks interrupted runs as partial
    pub fn summary(&self, region: &str) -> String {
        let counts = format!(
            "{} occurrences of {} species (region: {})",
            self.marker_count,
            self.mapped.len(),
            region
        );
        if self.cancelled {
            format!("⚠ Partial results: {}", counts)
        } else {
            format!("✅ {}", counts)
        }
    }
}

/// Distinct non-empty names of a column, first-seen order
pub fn species_names(table: &SheetTable, column: &str) -> Result<Vec<String>> {
    let col = table.column(column)?;
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for row in &table.rows {
        let name = row.cell(col).display();
        if !name.is_empty() && seen.insert(name.clone()) {
            names.push(name);
        }
    }
    Ok(names)
}

/// Initial view: the geometry filter's bounding box, Brazil, or the world
pub fn occurrence_view(gbif: &GbifConfig) -> ([f64; 2], u8) {
    if let Some(center) = gbif.geometry_wkt.as_deref().and_then(wkt_center) {
        return (center, 12);
    }
    match gbif.region.as_deref() {
        Some("BR") => ([-15.0, -48.0], 4),
        _ => ([0.0, 0.0], 2),
    }
}

/// Search filters shared by every species
fn base_query(gbif: &GbifConfig) -> OccurrenceQuery {
    OccurrenceQuery {
        country: gbif.region.clone(),
        geometry: gbif.geometry_wkt.clone(),
        has_coordinate: Some(true),
        has_geospatial_issue: Some(false),
        ..Default::default()
    }
}

pub fn build_occurrence_map(points: &[OccurrencePoint], config: &Config) -> MapDocument {
    let (center, zoom) = occurrence_view(&config.gbif);
    let markers = points
        .iter()
        .map(|p| MapPoint {
            latitude: p.latitude,
            longitude: p.longitude,
            popup_html: format!("<b>GBIF</b><br>Species: {}", escape_html(&p.species)),
            tooltip: Some(p.species.clone()),
            color: MarkerColor::Blue,
        })
        .collect();

    MapDocument::new("GBIF occurrences", center, zoom, TileProvider::CartoDbPositron)
        .with_points(markers, config.map.cluster_threshold)
}

/// Occurrences of one species; `None` when the name is not accepted
async fn species_occurrences<L: SpeciesLookup>(
    lookup: &L,
    name: &str,
    query: &OccurrenceQuery,
    cap: u32,
) -> Option<Vec<OccurrencePoint>> {
    let taxon_key = match lookup.match_name(name).await {
        Ok(matched) => matched.accepted_key(),
        Err(e) => {
            warn!(species = %name, error = %e, "name lookup failed");
            None
        }
    };
    let Some(taxon_key) = taxon_key else {
        info!(species = %name, "name not accepted, skipping");
        return None;
    };

    let species_query = OccurrenceQuery {
        taxon_key,
        ..query.clone()
    };
    Some(fetch_occurrences(lookup, name, &species_query, cap).await)
}

pub async fn run_occurrences<L, R>(
    table: &SheetTable,
    config: &Config,
    lookup: &L,
    renderer: &R,
    output: &Path,
    cancel: &CancellationToken,
) -> Result<OccurrenceReport>
where
    L: SpeciesLookup,
    R: MapRenderer,
{
    let names = species_names(table, &config.columns.species)?;
    println!("[1/2] Fetching occurrences for {} species...", names.len());

    let query = base_query(&config.gbif);
    let mut points = Vec::new();
    let mut mapped = Vec::new();
    let mut skipped = Vec::new();
    let mut cancelled = false;

    for name in &names {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            found = species_occurrences(lookup, name, &query, config.gbif.occurrence_limit) => Some(found),
        };
        let Some(found) = outcome else {
            cancelled = true;
            break;
        };
        let Some(found) = found else {
            skipped.push(name.clone());
            continue;
        };

        println!("  → {}: {} occurrences", name, found.len());
        if found.is_empty() {
            skipped.push(name.clone());
        } else {
            mapped.push((name.clone(), found.len()));
            points.extend(found);
        }
    }

    if points.is_empty() {
        return Err(SpeciesMapError::EmptyResult(format!(
            "no GBIF occurrences found for {} species (region: {})",
            names.len(),
            config.region().unwrap_or("ALL")
        )));
    }

    println!("\n[2/2] Rendering {} occurrences...", points.len());
    let rendered = renderer.render(&build_occurrence_map(&points, config))?;
    rendered.save(output)?;
    println!("✔ Map saved: {}", output.display());

    Ok(OccurrenceReport {
        mapped,
        skipped,
        marker_count: rendered.marker_count,
        cancelled,
    })
}
