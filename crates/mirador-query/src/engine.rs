use mirador_model::{FilterState, Tables};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponSexCount {
    pub weapon: String,
    pub sex: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceCantonCount {
    pub province: String,
    pub canton: String,
    pub count: u64,
}

/// Grouped-bar chart input: one independent count per (weapon, sex) pair,
/// in deterministic key order. Empty when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomicideChart {
    pub title: String,
    pub groups: Vec<WeaponSexCount>,
}

impl HomicideChart {
    /// Sum of group counts; equals the number of matching rows.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.groups.iter().map(|g| g.count).sum()
    }
}

/// Stacked chart input: one count per (province, canton) pair for one event
/// type, in deterministic key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventChart {
    pub title: String,
    pub groups: Vec<ProvinceCantonCount>,
}

impl EventChart {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.groups.iter().map(|g| g.count).sum()
    }
}

/// Pure function of the immutable tables and the current filter state.
/// Equal inputs always produce equal output.
#[must_use]
pub fn homicides_by_weapon_and_sex(tables: &Tables, state: &FilterState) -> HomicideChart {
    let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();
    for row in &tables.homicides {
        if row.province == state.province().as_str()
            && row.death_type == state.death_type().as_str()
        {
            *counts
                .entry((row.weapon.clone(), row.sex.clone()))
                .or_insert(0) += 1;
        }
    }
    HomicideChart {
        title: format!(
            "Homicidios por arma en {} ({})",
            state.province(),
            state.death_type()
        ),
        groups: counts
            .into_iter()
            .map(|((weapon, sex), count)| WeaponSexCount { weapon, sex, count })
            .collect(),
    }
}

/// Exact, case-sensitive match on the raw event-type string; values absent
/// from the table yield an empty grouping, never an error.
#[must_use]
pub fn events_by_province_and_canton(tables: &Tables, event_type: &str) -> EventChart {
    let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();
    for row in &tables.hazards {
        if row.event_type == event_type {
            *counts
                .entry((row.province.clone(), row.canton.clone()))
                .or_insert(0) += 1;
        }
    }
    EventChart {
        title: format!("Eventos registrados: {event_type}"),
        groups: counts
            .into_iter()
            .map(|((province, canton), count)| ProvinceCantonCount {
                province,
                canton,
                count,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirador_model::{FilterDomains, HazardEvent, HomicideRecord};

    fn homicide(province: &str, death_type: &str, weapon: &str, sex: &str) -> HomicideRecord {
        HomicideRecord {
            province: province.to_string(),
            death_type: death_type.to_string(),
            weapon: weapon.to_string(),
            sex: sex.to_string(),
        }
    }

    fn hazard(event_type: &str, province: &str, canton: &str) -> HazardEvent {
        HazardEvent {
            event_type: event_type.to_string(),
            province: province.to_string(),
            canton: canton.to_string(),
            description: String::new(),
            lat: String::new(),
            lon: String::new(),
        }
    }

    fn two_row_tables() -> Tables {
        Tables {
            homicides: vec![
                homicide("PICHINCHA", "ASESINATO", "ARMA DE FUEGO", "HOMBRE"),
                homicide("GUAYAS", "ASESINATO", "ARMA BLANCA", "MUJER"),
            ],
            tourism: Vec::new(),
            hazards: Vec::new(),
        }
    }

    #[test]
    fn filters_on_both_axes_and_counts_each_pair_independently() {
        let tables = two_row_tables();
        let domains = FilterDomains::from_tables(&tables);
        let state = FilterState::new("PICHINCHA", "ASESINATO", &domains).expect("state");

        let chart = homicides_by_weapon_and_sex(&tables, &state);
        assert_eq!(
            chart.groups,
            vec![WeaponSexCount {
                weapon: "ARMA DE FUEGO".to_string(),
                sex: "HOMBRE".to_string(),
                count: 1,
            }]
        );
        assert_eq!(chart.total(), 1);
        assert_eq!(chart.title, "Homicidios por arma en PICHINCHA (ASESINATO)");
    }

    #[test]
    fn group_totals_equal_matching_row_count() {
        let mut tables = two_row_tables();
        tables
            .homicides
            .push(homicide("PICHINCHA", "ASESINATO", "ARMA DE FUEGO", "HOMBRE"));
        tables
            .homicides
            .push(homicide("PICHINCHA", "ASESINATO", "ARMA BLANCA", "HOMBRE"));
        let domains = FilterDomains::from_tables(&tables);
        let state = FilterState::new("PICHINCHA", "ASESINATO", &domains).expect("state");

        let chart = homicides_by_weapon_and_sex(&tables, &state);
        let matching = tables
            .homicides
            .iter()
            .filter(|r| r.province == "PICHINCHA" && r.death_type == "ASESINATO")
            .count() as u64;
        assert_eq!(chart.total(), matching);
        assert_eq!(chart.groups.len(), 2);
    }

    #[test]
    fn empty_result_is_a_valid_chart_not_an_error() {
        let tables = two_row_tables();
        let domains = FilterDomains::from_tables(&tables);
        // Valid combination with zero matching rows.
        let state = FilterState::new("GUAYAS", "ASESINATO", &domains).expect("state");
        let chart = homicides_by_weapon_and_sex(
            &tables,
            &state.set_province("PICHINCHA", &domains).expect("set"),
        );
        assert_eq!(chart.total(), 1);

        let none = homicides_by_weapon_and_sex(
            &Tables {
                homicides: vec![homicide("GUAYAS", "SICARIATO", "ARMA BLANCA", "MUJER")],
                tourism: Vec::new(),
                hazards: Vec::new(),
            },
            &state,
        );
        assert!(none.groups.is_empty());
        assert_eq!(none.total(), 0);
    }

    #[test]
    fn repeated_calls_with_equal_state_are_referentially_consistent() {
        let tables = two_row_tables();
        let domains = FilterDomains::from_tables(&tables);
        let state = FilterState::new("PICHINCHA", "ASESINATO", &domains).expect("state");
        let again = state.clone();
        assert_eq!(state, again);
        assert_eq!(
            homicides_by_weapon_and_sex(&tables, &state),
            homicides_by_weapon_and_sex(&tables, &again)
        );
    }

    #[test]
    fn unknown_event_type_yields_empty_grouping() {
        let tables = Tables {
            homicides: Vec::new(),
            tourism: Vec::new(),
            hazards: vec![hazard("INTOXICACIÓN", "NAPO", "TENA")],
        };
        let chart = events_by_province_and_canton(&tables, "ERUPCIÓN");
        assert!(chart.groups.is_empty());
        assert_eq!(chart.total(), 0);
    }

    #[test]
    fn event_type_match_is_exact_and_case_sensitive() {
        let tables = Tables {
            homicides: Vec::new(),
            tourism: Vec::new(),
            hazards: vec![
                hazard("INTOXICACIÓN", "NAPO", "TENA"),
                hazard("INTOXICACIÓN", "NAPO", "TENA"),
                hazard("intoxicación", "NAPO", "TENA"),
                hazard("INTOXICACIÓN", "GUAYAS", "GUAYAQUIL"),
            ],
        };
        let chart = events_by_province_and_canton(&tables, "INTOXICACIÓN");
        assert_eq!(
            chart.groups,
            vec![
                ProvinceCantonCount {
                    province: "GUAYAS".to_string(),
                    canton: "GUAYAQUIL".to_string(),
                    count: 1,
                },
                ProvinceCantonCount {
                    province: "NAPO".to_string(),
                    canton: "TENA".to_string(),
                    count: 2,
                },
            ]
        );
    }
}
