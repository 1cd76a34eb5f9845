use serde::{Deserialize, Serialize};

/// One intentional-homicide record. `death_type` is already coerced to its
/// normalized string form at the ingestion boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomicideRecord {
    pub province: String,
    pub death_type: String,
    pub weapon: String,
    pub sex: String,
}

/// One tourist attraction. Coordinates stay as the raw source text; numeric
/// coercion happens per point when a map layer is built, so a bad coordinate
/// never invalidates the row for non-map uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourismSite {
    pub name: String,
    pub category: String,
    pub site_type: String,
    pub lat: String,
    pub lon: String,
}

/// One dangerous-event report. `event_type` is free text from the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardEvent {
    pub event_type: String,
    pub province: String,
    pub canton: String,
    pub description: String,
    pub lat: String,
    pub lon: String,
}

/// The three loaded tables. Built once at startup and never mutated after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tables {
    pub homicides: Vec<HomicideRecord>,
    pub tourism: Vec<TourismSite>,
    pub hazards: Vec<HazardEvent>,
}

/// Rows that carry raw coordinate text.
pub trait Geocoded {
    fn lat(&self) -> &str;
    fn lon(&self) -> &str;
}

impl Geocoded for TourismSite {
    fn lat(&self) -> &str {
        &self.lat
    }
    fn lon(&self) -> &str {
        &self.lon
    }
}

impl Geocoded for HazardEvent {
    fn lat(&self) -> &str {
        &self.lat
    }
    fn lon(&self) -> &str {
        &self.lon
    }
}

/// Admits only rows whose coordinate fields are both present. The source
/// table is untouched; this narrows a map-eligible view over it.
pub fn drop_invalid<T: Geocoded>(rows: &[T]) -> Vec<&T> {
    rows.iter()
        .filter(|r| !r.lat().trim().is_empty() && !r.lon().trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(name: &str, lat: &str, lon: &str) -> TourismSite {
        TourismSite {
            name: name.to_string(),
            category: "CULTURAL".to_string(),
            site_type: "MUSEO".to_string(),
            lat: lat.to_string(),
            lon: lon.to_string(),
        }
    }

    #[test]
    fn drop_invalid_excludes_rows_missing_either_coordinate() {
        let rows = vec![
            site("a", "-0.22", "-78.51"),
            site("b", "", "-78.51"),
            site("c", "-0.22", "  "),
            site("d", "not-a-number", "-78.51"),
        ];
        let kept = drop_invalid(&rows);
        // Presence only; coercion failures are handled per point downstream.
        let names: Vec<&str> = kept.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "d"]);
    }
}
