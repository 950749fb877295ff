//! Record types shared by the pipeline stages
//!
//! - SpeciesValidationResult: one per distinct species name
//! - ObservationRecord: one per accepted spreadsheet row
//! - MapPoint: renderer input
//! - OccurrencePoint: a remote occurrence with coordinates

use crate::coord::ParsedCoordinate;
use crate::status::{MarkerColor, StatusClassification};
use serde::{Deserialize, Serialize};

/// Validation outcome for a species name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesValidationResult {
    pub species: String,
    pub status: StatusClassification,
    #[serde(default)]
    pub taxon_key: Option<u64>,
    #[serde(default)]
    pub occurrence_count: u64,
    /// Raw failure message for `LookupError`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SpeciesValidationResult {
    pub fn not_found(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            status: StatusClassification::NotFound,
            taxon_key: None,
            occurrence_count: 0,
            error_message: None,
        }
    }

    pub fn lookup_error(species: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            status: StatusClassification::LookupError,
            taxon_key: None,
            occurrence_count: 0,
            error_message: Some(message.into()),
        }
    }

    pub fn accepted(species: impl Into<String>, taxon_key: u64, occurrence_count: u64) -> Self {
        Self {
            species: species.into(),
            status: StatusClassification::from_occurrences(occurrence_count),
            taxon_key: Some(taxon_key),
            occurrence_count,
            error_message: None,
        }
    }

    pub fn label(&self, region: Option<&str>) -> String {
        self.status.label(region, self.error_message.as_deref())
    }

    pub fn color(&self) -> MarkerColor {
        self.status.color()
    }
}

/// Accepted spreadsheet row merged with its species validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRecord {
    /// 1-based spreadsheet row number
    pub row: usize,
    pub species: String,
    pub coordinate: ParsedCoordinate,
    pub validation: SpeciesValidationResult,
}

/// One marker on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Popup content (HTML, already escaped)
    pub popup_html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    pub color: MarkerColor,
}

/// Occurrence record returned by the remote database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrencePoint {
    pub species: String,
    pub latitude: f64,
    pub longitude: f64,
}
