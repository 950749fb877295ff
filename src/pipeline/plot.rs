//! Plain map of rows that already carry numeric latitude/longitude columns

use crate::config::Config;
use crate::error::{Result, SpeciesMapError};
use crate::render::{escape_html, mean_center, MapDocument, MapRenderer};
use crate::spreadsheet::SheetTable;
use species_map_common::{MapPoint, MarkerColor};
use std::path::Path;
use tracing::debug;

/// Points from the latitude/longitude columns; rows without two finite
/// numbers are skipped.
pub fn plot_points(table: &SheetTable, config: &Config) -> Result<Vec<MapPoint>> {
    let lat_col = table.column(&config.columns.latitude)?;
    let lon_col = table.column(&config.columns.longitude)?;
    let species_col = table.column(&config.columns.species)?;

    let mut points = Vec::new();
    for row in &table.rows {
        let (Some(latitude), Some(longitude)) =
            (row.cell(lat_col).as_number(), row.cell(lon_col).as_number())
        else {
            debug!(row = row.number, "skipping row without numeric coordinates");
            continue;
        };
        let species = row.cell(species_col).display();

        points.push(MapPoint {
            latitude,
            longitude,
            popup_html: format!(
                "<b>Species:</b> {}<br>Lat: {:.4}, Lon: {:.4}",
                escape_html(&species),
                latitude,
                longitude
            ),
            tooltip: (!species.is_empty()).then_some(species),
            color: MarkerColor::Blue,
        });
    }
    Ok(points)
}

/// Render the plain map, centered on the mean position. Returns the marker
/// count.
pub fn run_plot<R: MapRenderer>(
    table: &SheetTable,
    config: &Config,
    renderer: &R,
    output: &Path,
) -> Result<usize> {
    let points = plot_points(table, config)?;
    let Some(center) = mean_center(&points) else {
        return Err(SpeciesMapError::EmptyResult(format!(
            "no row has numeric '{}' and '{}' values",
            config.columns.latitude, config.columns.longitude
        )));
    };

    println!("Plotting {} occurrences...", points.len());
    let document = MapDocument::new("Species occurrences", center, config.map.zoom, config.map.tiles)
        .with_points(points, usize::MAX);
    let rendered = renderer.render(&document)?;
    rendered.save(output)?;
    println!("✔ Map saved: {}", output.display());

    Ok(rendered.marker_count)
}
