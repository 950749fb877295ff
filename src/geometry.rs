//! WKT helpers for the occurrence geometry filter

use regex::Regex;

/// Center of the bounding box of all `lon lat` pairs in a WKT string,
/// as `[latitude, longitude]`. `None` when no pair is found.
pub fn wkt_center(wkt: &str) -> Option<[f64; 2]> {
    lazy_static::lazy_static! {
        // "lon lat" coordinate pair
        static ref PAIR_RE: Regex =
            Regex::new(r"(-?\d+(?:\.\d+)?)\s+(-?\d+(?:\.\d+)?)").unwrap();
    }

    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for cap in PAIR_RE.captures_iter(wkt) {
        let (Ok(lon), Ok(lat)) = (cap[1].parse::<f64>(), cap[2].parse::<f64>()) else {
            continue;
        };
        bounds = Some(match bounds {
            None => (lat, lat, lon, lon),
            Some((lat_min, lat_max, lon_min, lon_max)) => (
                lat_min.min(lat),
                lat_max.max(lat),
                lon_min.min(lon),
                lon_max.max(lon),
            ),
        });
    }

    bounds.map(|(lat_min, lat_max, lon_min, lon_max)| {
        [(lat_min + lat_max) / 2.0, (lon_min + lon_max) / 2.0]
    })
}
