// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Candidate marker before coordinate coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPoint {
    pub lat: String,
    pub lon: String,
    pub popup_html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub lat: f64,
    pub lon: f64,
    pub popup_html: String,
}

/// Per-row outcome of coordinate coercion. A skip carries its reason and the
/// input index; it is absorbed by the layer fold, never propagated.
#[derive(Debug, Clone, PartialEq)]
pub enum PointExtract {
    Point(MapPoint),
    Skip { index: usize, reason: String },
}

#[must_use]
pub fn extract_point(index: usize, raw: &RawPoint) -> PointExtract {
    let lat = match parse_coordinate(&raw.lat, "lat") {
        Ok(v) => v,
        Err(reason) => return PointExtract::Skip { index, reason },
    };
    let lon = match parse_coordinate(&raw.lon, "lon") {
        Ok(v) => v,
        Err(reason) => return PointExtract::Skip { index, reason },
    };
    PointExtract::Point(MapPoint {
        lat,
        lon,
        popup_html: raw.popup_html.clone(),
    })
}

fn parse_coordinate(raw: &str, field: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is empty"));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| format!("{field} is not numeric: {trimmed}"))?;
    if !value.is_finite() {
        return Err(format!("{field} is not finite: {trimmed}"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(lat: &str, lon: &str) -> RawPoint {
        RawPoint {
            lat: lat.to_string(),
            lon: lon.to_string(),
            popup_html: "<b>x</b>".to_string(),
        }
    }

    #[test]
    fn coercible_coordinates_become_points() {
        match extract_point(0, &raw(" -0.22 ", "-78.51")) {
            PointExtract::Point(p) => {
                assert!((p.lat + 0.22).abs() < 1e-9);
                assert!((p.lon + 78.51).abs() < 1e-9);
            }
            PointExtract::Skip { reason, .. } => panic!("unexpected skip: {reason}"),
        }
    }

    #[test]
    fn non_numeric_empty_and_non_finite_inputs_skip_with_reason() {
        for (lat, lon, needle) in [
            ("abc", "-78.5", "lat is not numeric"),
            ("-0.2", "", "lon is empty"),
            ("NaN", "-78.5", "lat is not finite"),
            ("inf", "-78.5", "lat is not finite"),
        ] {
            match extract_point(7, &raw(lat, lon)) {
                PointExtract::Skip { index, reason } => {
                    assert_eq!(index, 7);
                    assert!(reason.contains(needle), "got: {reason}");
                }
                PointExtract::Point(_) => panic!("expected skip for ({lat}, {lon})"),
            }
        }
    }
}
