use crate::error::{Result, SpeciesMapError};
use crate::render::TileProvider;
use serde::{Deserialize, Serialize};
use species_map_common::DigitLayout;
use std::path::{Path, PathBuf};

/// Run configuration. Loaded once, overridden by CLI flags, then passed
/// by reference into every stage.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub columns: ColumnConfig,
    /// Worksheet name; first sheet when unset
    pub sheet: Option<String>,
    pub layout: DigitLayout,
    pub gbif: GbifConfig,
    pub map: MapConfig,
}

/// Spreadsheet column names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub coordinates: String,
    pub species: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            coordinates: "COORDENADAS".into(),
            species: "NOME".into(),
            latitude: "Latitude".into(),
            longitude: "Longitude".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GbifConfig {
    pub base_url: String,
    /// ISO country code filter; no filter when unset
    pub region: Option<String>,
    /// Cap on occurrence records fetched per species
    pub occurrence_limit: u32,
    pub timeout_seconds: u64,
    /// Minimum interval between consecutive requests
    pub request_delay_ms: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    /// WKT polygon filter for occurrence searches
    pub geometry_wkt: Option<String>,
}

impl Default for GbifConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.gbif.org/v1".into(),
            region: Some("BR".into()),
            occurrence_limit: 500,
            timeout_seconds: 30,
            request_delay_ms: 500,
            max_retries: 3,
            backoff_base_ms: 1000,
            geometry_wkt: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// [latitude, longitude]
    pub center: [f64; 2],
    pub zoom: u8,
    pub tiles: TileProvider,
    /// Center on the mean of the plotted points instead of `center`
    pub center_on_data: bool,
    /// Markers are clustered from this many points on
    pub cluster_threshold: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [-15.0, -48.0],
            zoom: 4,
            tiles: TileProvider::OpenStreetMap,
            center_on_data: false,
            cluster_threshold: 2,
        }
    }
}

impl Config {
    /// Defaults when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| SpeciesMapError::io(path, e))?;
            let config: Config = serde_json::from_str(&content).map_err(|e| {
                SpeciesMapError::Config(format!("{}: {}", path.display(), e))
            })?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SpeciesMapError::io(parent, e))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| SpeciesMapError::io(path, e))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SpeciesMapError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("species-map").join("config.json"))
    }

    pub fn region(&self) -> Option<&str> {
        self.gbif.region.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.columns.coordinates, "COORDENADAS");
        assert_eq!(config.columns.species, "NOME");
        assert_eq!(config.region(), Some("BR"));
        assert_eq!(config.gbif.occurrence_limit, 500);
        assert_eq!(config.layout, DigitLayout::default());
        assert_eq!(config.map.center, [-15.0, -48.0]);
        assert_eq!(config.map.zoom, 4);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "columns": { "species": "ESPECIE" }, "gbif": { "region": null } }"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.columns.species, "ESPECIE");
        assert_eq!(config.columns.coordinates, "COORDENADAS");
        assert_eq!(config.region(), None);
        assert_eq!(config.gbif.timeout_seconds, 30);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.map.cluster_threshold, 2);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, SpeciesMapError::Config(_)));
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn test_unreadable_path_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::create_dir(&path).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, SpeciesMapError::Io { .. }));
        assert!(err.to_string().contains("config.json"), "{err}");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.gbif.region = Some("PE".into());
        config.layout.longitude_digits = 2;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.region(), Some("PE"));
        assert_eq!(loaded.layout.longitude_digits, 2);
    }
}
