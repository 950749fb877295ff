//! Coordinate string recovery
//!
//! Some spreadsheet exports store a latitude/longitude pair as a single
//! string with the decimal points stripped, e.g. `-1503333-48446667`.
//! The sign hyphens are the only delimiters. Decoding is positional:
//!
//! - the string is split at the first `-` after the leading sign
//! - latitude keeps `latitude_digits` integer digits (default 2)
//! - longitude keeps `longitude_digits` integer digits (default 3)
//!
//! A decimal point is inserted after those digits and the result is parsed.
//! Latitudes or longitudes with a different integer digit count are decoded
//! wrongly; the layout is a property of the export, not of the coordinates.
//! Either both components decode or the whole string is rejected.

use crate::cell::CellValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decoded latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Integer digit counts assumed by the export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigitLayout {
    pub latitude_digits: usize,
    pub longitude_digits: usize,
}

impl Default for DigitLayout {
    fn default() -> Self {
        Self {
            latitude_digits: 2,
            longitude_digits: 3,
        }
    }
}

/// Coordinate component, for rejection messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Latitude,
    Longitude,
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Component::Latitude => write!(f, "latitude"),
            Component::Longitude => write!(f, "longitude"),
        }
    }
}

/// Why a coordinate cell was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateRejection {
    #[error("coordinate is missing")]
    Missing,

    #[error("coordinate is not text (found {kind})")]
    NotText { kind: &'static str },

    #[error("expected at least two '-' signs, found {found}")]
    TooFewHyphens { found: usize },

    #[error("latitude part '{raw}' needs a leading '-' and more than {min_len} characters")]
    Latitude { raw: String, min_len: usize },

    #[error("longitude part '{raw}' needs a leading '-' and more than {min_len} characters")]
    Longitude { raw: String, min_len: usize },

    #[error("{component} '{text}' is not a finite number")]
    InvalidNumber { component: Component, text: String },
}

/// Replace comma decimal separators with periods.
///
/// Runs before [`parse_coordinate`]; the parser itself never sees commas
/// from a well-behaved pipeline.
pub fn normalize_decimal_separator(raw: &str) -> String {
    raw.replace(',', ".")
}

/// Decode a cell with the default layout.
///
/// Missing and non-text cells are rejected; text is normalized with
/// [`normalize_decimal_separator`] first.
pub fn parse_cell(cell: &CellValue) -> Result<ParsedCoordinate, CoordinateRejection> {
    parse_cell_with(cell, DigitLayout::default())
}

/// Decode a cell with an explicit layout
pub fn parse_cell_with(
    cell: &CellValue,
    layout: DigitLayout,
) -> Result<ParsedCoordinate, CoordinateRejection> {
    if cell.is_missing() {
        return Err(CoordinateRejection::Missing);
    }
    let text = cell
        .as_text()
        .ok_or(CoordinateRejection::NotText { kind: cell.kind() })?;

    parse_coordinate_with(&normalize_decimal_separator(text), layout)
}

/// Decode a fused coordinate string with the default layout.
///
/// # Examples
/// ```
/// use species_map_common::parse_coordinate;
///
/// let coord = parse_coordinate("-1503333-484466").unwrap();
/// assert_eq!(coord.latitude, -15.03333);
/// assert_eq!(coord.longitude, -484.466);
/// ```
pub fn parse_coordinate(raw: &str) -> Result<ParsedCoordinate, CoordinateRejection> {
    parse_coordinate_with(raw, DigitLayout::default())
}

/// Decode a fused coordinate string with an explicit layout
pub fn parse_coordinate_with(
    raw: &str,
    layout: DigitLayout,
) -> Result<ParsedCoordinate, CoordinateRejection> {
    let (lat_text, lon_text) = split_coordinate_with(raw, layout)?;

    let latitude = parse_decimal(&lat_text, Component::Latitude)?;
    let longitude = parse_decimal(&lon_text, Component::Longitude)?;

    Ok(ParsedCoordinate {
        latitude,
        longitude,
    })
}

/// Split and re-point a fused string with the default layout, without
/// parsing the numbers.
///
/// Returns the decimal texts, e.g. `("-15.03333", "-484.46667")`.
pub fn split_coordinate(raw: &str) -> Result<(String, String), CoordinateRejection> {
    split_coordinate_with(raw, DigitLayout::default())
}

/// Split and re-point a fused string with an explicit layout
pub fn split_coordinate_with(
    raw: &str,
    layout: DigitLayout,
) -> Result<(String, String), CoordinateRejection> {
    let found = raw.matches('-').count();
    if found < 2 {
        return Err(CoordinateRejection::TooFewHyphens { found });
    }

    // First hyphen after the latitude sign position
    let split_index = raw
        .char_indices()
        .skip(1)
        .find(|&(_, c)| c == '-')
        .map(|(i, _)| i)
        .ok_or(CoordinateRejection::TooFewHyphens { found })?;

    let (lat_raw, lon_raw) = raw.split_at(split_index);

    let lat_text = insert_point(lat_raw, layout.latitude_digits).ok_or_else(|| {
        CoordinateRejection::Latitude {
            raw: lat_raw.to_string(),
            min_len: layout.latitude_digits,
        }
    })?;

    let lon_text = insert_point(lon_raw, layout.longitude_digits).ok_or_else(|| {
        CoordinateRejection::Longitude {
            raw: lon_raw.to_string(),
            min_len: layout.longitude_digits,
        }
    })?;

    Ok((lat_text, lon_text))
}

/// `-DD…` → `-DD.…` with the point after the sign and `digits` characters.
/// `None` unless the part is signed and longer than `digits` characters.
fn insert_point(part: &str, digits: usize) -> Option<String> {
    if !part.starts_with('-') || part.chars().count() <= digits {
        return None;
    }
    let byte_index = part
        .char_indices()
        .nth(digits + 1)
        .map(|(i, _)| i)
        .unwrap_or(part.len());
    let (head, tail) = part.split_at(byte_index);
    Some(format!("{}.{}", head, tail))
}

fn parse_decimal(text: &str, component: Component) -> Result<f64, CoordinateRejection> {
    let invalid = || CoordinateRejection::InvalidNumber {
        component,
        text: text.to_string(),
    };
    let value: f64 = text.trim_end().parse().map_err(|_| invalid())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // =============================================
    // parse_coordinate
    // =============================================

    #[test]
    fn test_parse_fixed_offsets() {
        let coord = parse_coordinate("-1503333-48446667").unwrap();
        assert_eq!(coord.latitude, -15.03333);
        assert_eq!(coord.longitude, -484.46667);
    }

    #[test]
    fn test_parse_two_digit_longitude_layout() {
        let layout = DigitLayout {
            latitude_digits: 2,
            longitude_digits: 2,
        };
        let coord = parse_coordinate_with("-1503333-48446667", layout).unwrap();
        assert_eq!(coord.latitude, -15.03333);
        assert_eq!(coord.longitude, -48.446667);
    }

    #[test]
    fn test_parse_minimum_lengths() {
        // latitude "-0150" (len 5 > 2), longitude "-048" (len 4 > 3)
        let coord = parse_coordinate("-0150-048").unwrap();
        assert_eq!(coord.latitude, -1.5);
        assert_eq!(coord.longitude, -48.0);

        let coord = parse_coordinate("-15-048").unwrap();
        assert_eq!(coord.latitude, -15.0);
        assert_eq!(coord.longitude, -48.0);
    }

    #[test]
    fn test_parse_rejects_short_latitude() {
        let err = parse_coordinate("-1-0484").unwrap_err();
        assert!(matches!(err, CoordinateRejection::Latitude { .. }));
    }

    #[test]
    fn test_parse_rejects_short_longitude() {
        // "-04" is 3 characters; 4 are needed
        let err = parse_coordinate("-1503333-04").unwrap_err();
        assert!(matches!(err, CoordinateRejection::Longitude { .. }));

        let coord = parse_coordinate("-1503333-048").unwrap();
        assert_eq!(coord.longitude, -48.0);
    }

    #[test]
    fn test_parse_rejects_not_a_coordinate() {
        let err = parse_coordinate("not-a-coordinate").unwrap_err();
        assert!(matches!(err, CoordinateRejection::Latitude { .. }));
    }

    #[test]
    fn test_parse_rejects_single_hyphen() {
        assert_eq!(
            parse_coordinate("-1503333").unwrap_err(),
            CoordinateRejection::TooFewHyphens { found: 1 }
        );
        assert_eq!(
            parse_coordinate("").unwrap_err(),
            CoordinateRejection::TooFewHyphens { found: 0 }
        );
    }

    #[test]
    fn test_parse_rejects_unsigned_latitude() {
        let err = parse_coordinate("1503333-48446667-").unwrap_err();
        assert!(matches!(err, CoordinateRejection::Latitude { .. }));
    }

    #[test]
    fn test_parse_rejects_leading_double_hyphen() {
        let err = parse_coordinate("--1503333-48446667").unwrap_err();
        assert!(matches!(err, CoordinateRejection::Latitude { .. }));
    }

    #[test]
    fn test_parse_extra_hyphens_fail_numeric_parse() {
        let err = parse_coordinate("-1503333-48446667-12").unwrap_err();
        assert!(matches!(
            err,
            CoordinateRejection::InvalidNumber {
                component: Component::Longitude,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_extra_hyphen_inside_exponent() {
        // Only the first two hyphens are structural
        let coord = parse_coordinate("-1503333-0481e-0").unwrap();
        assert_eq!(coord.latitude, -15.03333);
        assert!((coord.longitude - (-48.1)).abs() < 1e-9);
    }

    #[test]
    fn test_parse_rejects_non_digits() {
        let err = parse_coordinate("-15ab333-48446667").unwrap_err();
        assert_eq!(
            err,
            CoordinateRejection::InvalidNumber {
                component: Component::Latitude,
                text: "-15.ab333".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        // "-15.e999" overflows to -inf
        let err = parse_coordinate("-15e999-48446667").unwrap_err();
        assert!(matches!(
            err,
            CoordinateRejection::InvalidNumber {
                component: Component::Latitude,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_tolerates_trailing_whitespace() {
        let coord = parse_coordinate("-1503333-48446667  ").unwrap();
        assert_eq!(coord.longitude, -484.46667);
    }

    #[test]
    fn test_parse_no_rounding() {
        let coord = parse_coordinate("-1234567891-1234567891").unwrap();
        assert_eq!(coord.latitude, -12.34567891);
        assert_eq!(coord.longitude, -123.4567891);
    }

    #[test]
    fn test_parse_non_ascii_does_not_panic() {
        assert!(parse_coordinate("-é5-ü48446").is_err());
        assert!(parse_coordinate("é-15-484").is_err());
    }

    // =============================================
    // parse_cell
    // =============================================

    #[test]
    fn test_parse_cell_missing() {
        assert_eq!(parse_cell(&CellValue::Empty), Err(CoordinateRejection::Missing));
        assert_eq!(
            parse_cell(&CellValue::Text("  ".into())),
            Err(CoordinateRejection::Missing)
        );
    }

    #[test]
    fn test_parse_cell_non_text() {
        assert_eq!(
            parse_cell(&CellValue::Int(42)),
            Err(CoordinateRejection::NotText { kind: "integer" })
        );
        assert!(matches!(
            parse_cell(&CellValue::Float(-15.5)),
            Err(CoordinateRejection::NotText { .. })
        ));
    }

    #[test]
    fn test_parse_cell_normalizes_commas() {
        // A comma inside the digits becomes a second decimal point
        let err = parse_cell(&CellValue::Text("-15,03333-48446667".into())).unwrap_err();
        assert_eq!(
            err,
            CoordinateRejection::InvalidNumber {
                component: Component::Latitude,
                text: "-15..03333".to_string(),
            }
        );

        let coord = parse_cell(&CellValue::Text("-1503333-48446667".into())).unwrap();
        assert_eq!(coord.latitude, -15.03333);
    }

    #[test]
    fn test_normalize_decimal_separator() {
        assert_eq!(normalize_decimal_separator("-15,5-48,1"), "-15.5-48.1");
        assert_eq!(normalize_decimal_separator("-1503333"), "-1503333");
    }

    #[test]
    fn test_split_coordinate_texts() {
        let (lat, lon) = split_coordinate("-1503333-48446667").unwrap();
        assert_eq!(lat, "-15.03333");
        assert_eq!(lon, "-484.46667");
    }

    #[test]
    fn test_rejection_message_names_part() {
        let err = parse_coordinate("-1-0484").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("latitude"));
        assert!(message.contains("-1"));
    }

    proptest! {
        /// Removing the inserted points reproduces the original digits.
        #[test]
        fn prop_digits_round_trip(lat in "[0-9]{2,9}", lon in "[0-9]{3,9}") {
            let raw = format!("-{}-{}", lat, lon);
            let (lat_text, lon_text) = split_coordinate(&raw).unwrap();

            prop_assert_eq!(lat_text.find('.'), Some(3));
            prop_assert_eq!(lon_text.find('.'), Some(4));
            prop_assert_eq!(format!("{}{}", lat_text, lon_text).replace('.', ""), raw.clone());

            let coord = parse_coordinate(&raw).unwrap();
            prop_assert!(coord.latitude.is_finite() && coord.latitude <= 0.0);
            prop_assert!(coord.longitude.is_finite() && coord.longitude <= 0.0);
        }

        /// Any decoded value lies within the magnitude the layout allows.
        #[test]
        fn prop_magnitude_bounded(lat in "[0-9]{2,9}", lon in "[0-9]{3,9}") {
            let coord = parse_coordinate(&format!("-{}-{}", lat, lon)).unwrap();
            prop_assert!(coord.latitude > -100.0);
            prop_assert!(coord.longitude > -1000.0);
        }
    }
}
