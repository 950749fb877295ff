//! Map rendering
//!
//! A `MapDocument` is everything a renderer needs: view, tiles, markers and
//! legend. Renderers turn it into a standalone HTML file.

mod leaflet;

pub use leaflet::LeafletRenderer;

use crate::error::{Result, SpeciesMapError};
use serde::{Deserialize, Serialize};
use species_map_common::{MapPoint, MarkerColor};
use std::path::Path;

/// Base layer tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TileProvider {
    OpenStreetMap,
    CartoDbPositron,
}

impl TileProvider {
    pub fn url_template(&self) -> &'static str {
        match self {
            TileProvider::OpenStreetMap => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            TileProvider::CartoDbPositron => {
                "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png"
            }
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            TileProvider::OpenStreetMap => {
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
            }
            TileProvider::CartoDbPositron => {
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: MarkerColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    pub title: String,
    /// [latitude, longitude]
    pub center: [f64; 2],
    pub zoom: u8,
    pub tiles: TileProvider,
    pub points: Vec<MapPoint>,
    pub legend: Vec<LegendEntry>,
    pub cluster: bool,
}

impl MapDocument {
    pub fn new(title: impl Into<String>, center: [f64; 2], zoom: u8, tiles: TileProvider) -> Self {
        Self {
            title: title.into(),
            center,
            zoom,
            tiles,
            points: Vec::new(),
            legend: Vec::new(),
            cluster: false,
        }
    }

    /// Set the markers; clustering is enabled from `cluster_threshold` points
    pub fn with_points(mut self, points: Vec<MapPoint>, cluster_threshold: usize) -> Self {
        self.cluster = cluster_threshold > 0 && points.len() >= cluster_threshold;
        self.points = points;
        self
    }

    pub fn with_legend(mut self, legend: Vec<LegendEntry>) -> Self {
        self.legend = legend;
        self
    }
}

/// Mean position of a set of points; `None` when empty
pub fn mean_center(points: &[MapPoint]) -> Option<[f64; 2]> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat, lon) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lon), p| (lat + p.latitude, lon + p.longitude));
    Some([lat / n, lon / n])
}

/// Rendered HTML document
#[derive(Debug, Clone)]
pub struct RenderedMap {
    pub html: String,
    pub marker_count: usize,
}

impl RenderedMap {
    /// Write the document, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| SpeciesMapError::io(parent, e))?;
            }
        }
        std::fs::write(path, &self.html).map_err(|e| SpeciesMapError::io(path, e))?;
        Ok(())
    }
}

pub trait MapRenderer {
    fn render(&self, document: &MapDocument) -> Result<RenderedMap>;
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(latitude: f64, longitude: f64) -> MapPoint {
        MapPoint {
            latitude,
            longitude,
            popup_html: String::new(),
            tooltip: None,
            color: MarkerColor::Blue,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>Inga</b> & \"edulis\" 'x'"),
            "&lt;b&gt;Inga&lt;/b&gt; &amp; &quot;edulis&quot; &#39;x&#39;"
        );
        assert_eq!(escape_html("Euterpe oleracea"), "Euterpe oleracea");
    }

    #[test]
    fn test_mean_center() {
        assert_eq!(mean_center(&[]), None);
        let center = mean_center(&[point(-1.0, -48.0), point(-3.0, -50.0)]).unwrap();
        assert_eq!(center, [-2.0, -49.0]);
    }

    #[test]
    fn test_cluster_threshold() {
        let doc = MapDocument::new("t", [0.0, 0.0], 2, TileProvider::OpenStreetMap);
        assert!(!doc.clone().with_points(vec![point(0.0, 0.0)], 2).cluster);
        assert!(
            doc.clone()
                .with_points(vec![point(0.0, 0.0), point(1.0, 1.0)], 2)
                .cluster
        );
        assert!(!doc.with_points(vec![point(0.0, 0.0); 5], 0).cluster);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("map.html");

        RenderedMap { html: "first".into(), marker_count: 0 }.save(&path).unwrap();
        RenderedMap { html: "second".into(), marker_count: 0 }.save(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_save_error_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("map.html");

        let err = RenderedMap { html: String::new(), marker_count: 0 }
            .save(&path)
            .unwrap_err();

        assert!(matches!(err, SpeciesMapError::Io { .. }));
        assert!(err.to_string().contains("blocker"), "{err}");
    }

    #[test]
    fn test_tile_provider_serde() {
        let json = serde_json::to_string(&TileProvider::CartoDbPositron).unwrap();
        assert_eq!(json, "\"carto-db-positron\"");
        let tiles: TileProvider = serde_json::from_str("\"open-street-map\"").unwrap();
        assert_eq!(tiles, TileProvider::OpenStreetMap);
    }
}
