//! Species status classification and marker colors

use serde::{Deserialize, Serialize};

/// Outcome of validating one species name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusClassification {
    /// Accepted taxon with occurrences in the region
    ValidPresent,
    /// Accepted taxon, no occurrences in the region
    ValidAbsent,
    /// Name not resolved to an accepted taxon
    NotFound,
    /// The lookup itself failed
    LookupError,
}

/// Marker color (CSS color name)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Green,
    Orange,
    Red,
    Gray,
    Blue,
}

impl MarkerColor {
    pub fn css_name(&self) -> &'static str {
        match self {
            MarkerColor::Green => "green",
            MarkerColor::Orange => "orange",
            MarkerColor::Red => "red",
            MarkerColor::Gray => "gray",
            MarkerColor::Blue => "blue",
        }
    }
}

impl std::fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.css_name())
    }
}

impl StatusClassification {
    pub const ALL: [StatusClassification; 4] = [
        StatusClassification::ValidPresent,
        StatusClassification::ValidAbsent,
        StatusClassification::NotFound,
        StatusClassification::LookupError,
    ];

    /// Classification of an accepted taxon by its regional occurrence count
    pub fn from_occurrences(count: u64) -> Self {
        if count > 0 {
            StatusClassification::ValidPresent
        } else {
            StatusClassification::ValidAbsent
        }
    }

    pub fn color(self) -> MarkerColor {
        match self {
            StatusClassification::ValidPresent => MarkerColor::Green,
            StatusClassification::ValidAbsent => MarkerColor::Orange,
            StatusClassification::NotFound => MarkerColor::Red,
            StatusClassification::LookupError => MarkerColor::Gray,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            StatusClassification::ValidPresent => "VALID_PRESENT",
            StatusClassification::ValidAbsent => "VALID_ABSENT",
            StatusClassification::NotFound => "NOT_FOUND",
            StatusClassification::LookupError => "LOOKUP_ERROR",
        }
    }

    /// Display text, e.g. `VALIDATED (BR > 0)` or `API ERROR: timeout`.
    ///
    /// `region` of `None` reads as `ALL`. `error` is only used for
    /// [`StatusClassification::LookupError`].
    pub fn label(self, region: Option<&str>, error: Option<&str>) -> String {
        let scope = region.unwrap_or("ALL");
        match self {
            StatusClassification::ValidPresent => format!("VALIDATED ({} > 0)", scope),
            StatusClassification::ValidAbsent => format!("VALIDATED ({} 0)", scope),
            StatusClassification::NotFound => "NOT FOUND".to_string(),
            StatusClassification::LookupError => match error {
                Some(message) => format!("API ERROR: {}", message),
                None => "API ERROR".to_string(),
            },
        }
    }
}

impl std::fmt::Display for StatusClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
