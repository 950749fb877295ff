//! Console summary table

use crate::types::SpeciesValidationResult;

const HEADERS: [&str; 4] = ["SPECIES", "STATUS", "TAXON KEY", "OCCURRENCES"];

/// Row cells of the summary table: species, status label, taxon key, count
pub fn status_table_rows(
    results: &[SpeciesValidationResult],
    region: Option<&str>,
) -> Vec<[String; 4]> {
    results
        .iter()
        .map(|r| {
            [
                r.species.clone(),
                r.label(region),
                r.taxon_key
                    .map(|k| k.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                r.occurrence_count.to_string(),
            ]
        })
        .collect()
}

/// Fixed-width table of species → status → taxon key → occurrences.
///
/// Text columns are left-aligned, numeric columns right-aligned.
pub fn format_status_table(results: &[SpeciesValidationResult], region: Option<&str>) -> String {
    let rows = status_table_rows(results, region);

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: [&str; 4]| {
        format!(
            "{:<w0$}  {:<w1$}  {:>w2$}  {:>w3$}",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        )
        .trim_end()
        .to_string()
    };

    let mut lines = vec![format_line(HEADERS)];
    for row in &rows {
        lines.push(format_line([&row[0], &row[1], &row[2], &row[3]]));
    }
    lines.join("\n")
}
