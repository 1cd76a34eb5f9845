use crate::record::Tables;
use std::collections::BTreeSet;

/// Distinct-value sets for the three filter axes, lexicographically sorted.
/// Filter choices are populated from these at startup and every filter value
/// is validated against them afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDomains {
    pub provinces: Vec<String>,
    pub death_types: Vec<String>,
    pub event_types: Vec<String>,
}

impl FilterDomains {
    #[must_use]
    pub fn from_tables(tables: &Tables) -> Self {
        Self {
            provinces: distinct_values(tables.homicides.iter().map(|r| r.province.as_str())),
            death_types: distinct_values(tables.homicides.iter().map(|r| r.death_type.as_str())),
            event_types: distinct_values(tables.hazards.iter().map(|r| r.event_type.as_str())),
        }
    }

    #[must_use]
    pub fn contains_province(&self, value: &str) -> bool {
        sorted_contains(&self.provinces, value)
    }

    #[must_use]
    pub fn contains_death_type(&self, value: &str) -> bool {
        sorted_contains(&self.death_types, value)
    }

    #[must_use]
    pub fn contains_event_type(&self, value: &str) -> bool {
        sorted_contains(&self.event_types, value)
    }
}

fn sorted_contains(values: &[String], candidate: &str) -> bool {
    values
        .binary_search_by(|v| v.as_str().cmp(candidate))
        .is_ok()
}

/// Lexicographically sorted distinct values; empty cells are not part of any
/// filter domain.
#[must_use]
pub fn distinct_values<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let set: BTreeSet<&str> = values.filter(|v| !v.trim().is_empty()).collect();
    set.into_iter().map(str::to_string).collect()
}
