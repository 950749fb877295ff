//! Leaflet HTML renderer
//!
//! Produces one self-contained page. Leaflet and the cluster plugin load from
//! unpkg; markers and settings are embedded as JSON and drawn by a short
//! inline script.

use super::{escape_html, MapDocument, MapRenderer, RenderedMap};
use crate::error::{Result, SpeciesMapError};
use serde_json::json;

const LEAFLET_VERSION: &str = "1.9.4";
const MARKERCLUSTER_VERSION: &str = "1.5.3";

#[derive(Debug, Clone, Copy, Default)]
pub struct LeafletRenderer;

impl LeafletRenderer {
    pub fn new() -> Self {
        Self
    }
}

/// JSON safe to embed inside a `<script>` element
fn script_json(value: &serde_json::Value) -> Result<String> {
    let text = serde_json::to_string(value)
        .map_err(|e| SpeciesMapError::Render(format!("failed to encode map data: {}", e)))?;
    Ok(text.replace("</", "<\\/"))
}

impl MapRenderer for LeafletRenderer {
    fn render(&self, document: &MapDocument) -> Result<RenderedMap> {
        let config = json!({
            "center": document.center,
            "zoom": document.zoom,
            "tiles": {
                "url": document.tiles.url_template(),
                "attribution": document.tiles.attribution(),
            },
            "cluster": document.cluster,
            "legend": document
                .legend
                .iter()
                .map(|entry| json!({ "label": entry.label, "color": entry.color }))
                .collect::<Vec<_>>(),
        });
        let markers = serde_json::to_value(&document.points)?;

        let mut html = String::with_capacity(4096 + document.points.len() * 256);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str(&format!(
            "<!-- generated by {} {} at {} -->\n",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        );
        html.push_str(&format!("<title>{}</title>\n", escape_html(&document.title)));
        html.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@{v}/dist/leaflet.css\">\n\
             <script src=\"https://unpkg.com/leaflet@{v}/dist/leaflet.js\"></script>\n",
            v = LEAFLET_VERSION
        ));
        if document.cluster {
            html.push_str(&format!(
                "<link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet.markercluster@{v}/dist/MarkerCluster.css\">\n\
                 <link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet.markercluster@{v}/dist/MarkerCluster.Default.css\">\n\
                 <script src=\"https://unpkg.com/leaflet.markercluster@{v}/dist/leaflet.markercluster.js\"></script>\n",
                v = MARKERCLUSTER_VERSION
            ));
        }
        html.push_str(
            "<style>\n\
             html, body, #map { height: 100%; margin: 0; }\n\
             .legend { background: #fff; padding: 6px 10px; border-radius: 4px; font: 13px sans-serif; line-height: 20px; }\n\
             .legend .swatch { display: inline-block; width: 12px; height: 12px; border-radius: 50%; margin-right: 6px; vertical-align: middle; }\n\
             </style>\n",
        );
        html.push_str("</head>\n<body>\n<div id=\"map\"></div>\n<script>\n");

        html.push_str(&format!("const config = {};\n", script_json(&config)?));
        html.push_str(&format!("const markers = {};\n", script_json(&markers)?));
        html.push_str(
            r#"const map = L.map('map').setView(config.center, config.zoom);
L.tileLayer(config.tiles.url, { attribution: config.tiles.attribution, maxZoom: 19 }).addTo(map);
const layer = config.cluster ? L.markerClusterGroup() : L.layerGroup();
for (const m of markers) {
  const marker = L.circleMarker([m.latitude, m.longitude], {
    radius: 7, color: m.color, fillColor: m.color, fillOpacity: 0.8, weight: 1
  });
  marker.bindPopup(m.popupHtml);
  if (m.tooltip) {
    const tip = document.createElement('span');
    tip.textContent = m.tooltip;
    marker.bindTooltip(tip);
  }
  layer.addLayer(marker);
}
layer.addTo(map);
if (config.legend.length > 0) {
  const legend = L.control({ position: 'bottomright' });
  legend.onAdd = function () {
    const div = L.DomUtil.create('div', 'legend');
    for (const entry of config.legend) {
      const row = document.createElement('div');
      const swatch = document.createElement('span');
      swatch.className = 'swatch';
      swatch.style.background = entry.color;
      row.appendChild(swatch);
      row.appendChild(document.createTextNode(entry.label));
      div.appendChild(row);
    }
    return div;
  };
  legend.addTo(map);
}
"#,
        );
        html.push_str("</script>\n</body>\n</html>\n");

        Ok(RenderedMap {
            html,
            marker_count: document.points.len(),
        })
    }
}
