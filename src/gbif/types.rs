use serde::Deserialize;
use species_map_common::OccurrencePoint;

/// `/species/match` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NameMatch {
    pub usage_key: Option<u64>,
    pub scientific_name: Option<String>,
    pub rank: Option<String>,
    /// ACCEPTED / SYNONYM / DOUBTFUL ...
    pub status: Option<String>,
    /// EXACT / FUZZY / HIGHERRANK / NONE
    pub match_type: Option<String>,
    pub confidence: Option<u32>,
}

impl NameMatch {
    /// Taxon key of an exact match on an accepted name
    pub fn accepted_key(&self) -> Option<u64> {
        let accepted = self.status.as_deref() == Some("ACCEPTED");
        let exact = matches!(self.match_type.as_deref(), None | Some("EXACT"));
        if accepted && exact {
            self.usage_key
        } else {
            None
        }
    }
}

/// `/occurrence/search` filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OccurrenceQuery {
    pub taxon_key: u64,
    /// ISO 3166 country code
    pub country: Option<String>,
    /// WKT polygon
    pub geometry: Option<String>,
    pub has_coordinate: Option<bool>,
    pub has_geospatial_issue: Option<bool>,
    pub limit: u32,
    pub offset: u32,
}

impl OccurrenceQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("taxonKey", self.taxon_key.to_string()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(country) = &self.country {
            params.push(("country", country.clone()));
        }
        if let Some(geometry) = &self.geometry {
            params.push(("geometry", geometry.clone()));
        }
        if let Some(flag) = self.has_coordinate {
            params.push(("hasCoordinate", flag.to_string()));
        }
        if let Some(flag) = self.has_geospatial_issue {
            params.push(("hasGeospatialIssue", flag.to_string()));
        }
        params
    }
}

/// `/occurrence/search` response page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OccurrencePage {
    pub count: u64,
    pub end_of_records: bool,
    pub results: Vec<OccurrenceRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OccurrenceRecord {
    pub key: Option<u64>,
    pub scientific_name: Option<String>,
    pub decimal_latitude: Option<f64>,
    pub decimal_longitude: Option<f64>,
    pub country_code: Option<String>,
}

impl OccurrenceRecord {
    /// Point labelled with the locally supplied species name; `None` without
    /// both coordinates.
    pub fn to_point(&self, species: &str) -> Option<OccurrencePoint> {
        let latitude = self.decimal_latitude.filter(|v| v.is_finite())?;
        let longitude = self.decimal_longitude.filter(|v| v.is_finite())?;
        Some(OccurrencePoint {
            species: species.to_string(),
            latitude,
            longitude,
        })
    }
}
