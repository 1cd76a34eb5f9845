// SPDX-License-Identifier: Apache-2.0

use crate::delimited::DelimitedTable;
use crate::logging::{IngestLog, IngestStage};
use crate::IngestError;
use mirador_model::{HazardEvent, HomicideRecord, TourismSite};

pub mod homicide_columns {
    pub const PROVINCE: &str = "Provincia";
    pub const DEATH_TYPE: &str = "Tipo Muert.";
    pub const WEAPON: &str = "Arma";
    pub const SEX: &str = "Sexo";
}

pub mod tourism_columns {
    pub const NAME: &str = "nombre";
    pub const CATEGORY: &str = "categoria";
    pub const SITE_TYPE: &str = "tipo";
    pub const LAT: &str = "lat";
    pub const LON: &str = "lon";
}

pub mod hazard_columns {
    pub const EVENT_TYPE: &str = "EVENTO";
    pub const PROVINCE: &str = "PROVINCIA";
    pub const CANTON: &str = "CANTON";
    pub const DESCRIPTION: &str = "DESCRIPCION";
    pub const LAT: &str = "lat";
    pub const LON: &str = "lon";
}

/// Death-type cells round-tripped through a numeric column render as
/// "123.0"; fold that back to the plain digit string so filter domains and
/// rows agree on one form.
#[must_use]
pub fn normalize_death_type(raw: &str) -> String {
    let s = raw.trim();
    if let Some(stripped) = s.strip_suffix(".0") {
        if !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit()) {
            return stripped.to_string();
        }
    }
    s.to_string()
}

pub(crate) fn map_homicides(
    table: &DelimitedTable,
    log: &mut IngestLog,
) -> Result<Vec<HomicideRecord>, IngestError> {
    let idx = table.require_columns(&[
        homicide_columns::PROVINCE,
        homicide_columns::DEATH_TYPE,
        homicide_columns::WEAPON,
        homicide_columns::SEX,
    ])?;

    let mut kept = Vec::new();
    let mut dropped = 0usize;
    for row in &table.rows {
        let province = table.cell(row, idx[0]).trim();
        let death_type = normalize_death_type(table.cell(row, idx[1]));
        let weapon = table.cell(row, idx[2]).trim();
        let sex = table.cell(row, idx[3]).trim();
        if province.is_empty() || death_type.is_empty() || weapon.is_empty() || sex.is_empty() {
            dropped += 1;
            continue;
        }
        kept.push(HomicideRecord {
            province: province.to_string(),
            death_type,
            weapon: weapon.to_string(),
            sex: sex.to_string(),
        });
    }
    log.emit_counts(IngestStage::Map, "homicides_mapped", kept.len(), dropped);
    Ok(kept)
}

pub(crate) fn map_tourism(
    table: &DelimitedTable,
    log: &mut IngestLog,
) -> Result<Vec<TourismSite>, IngestError> {
    let idx = table.require_columns(&[
        tourism_columns::NAME,
        tourism_columns::CATEGORY,
        tourism_columns::SITE_TYPE,
        tourism_columns::LAT,
        tourism_columns::LON,
    ])?;

    let mut kept = Vec::new();
    let mut dropped = 0usize;
    for row in &table.rows {
        let name = table.cell(row, idx[0]).trim();
        if name.is_empty() {
            dropped += 1;
            continue;
        }
        kept.push(TourismSite {
            name: name.to_string(),
            category: table.cell(row, idx[1]).trim().to_string(),
            site_type: table.cell(row, idx[2]).trim().to_string(),
            lat: table.cell(row, idx[3]).trim().to_string(),
            lon: table.cell(row, idx[4]).trim().to_string(),
        });
    }
    log.emit_counts(IngestStage::Map, "tourism_mapped", kept.len(), dropped);
    Ok(kept)
}

pub(crate) fn map_hazards(
    table: &DelimitedTable,
    log: &mut IngestLog,
) -> Result<Vec<HazardEvent>, IngestError> {
    let idx = table.require_columns(&[
        hazard_columns::EVENT_TYPE,
        hazard_columns::PROVINCE,
        hazard_columns::CANTON,
        hazard_columns::DESCRIPTION,
        hazard_columns::LAT,
        hazard_columns::LON,
    ])?;

    let mut kept = Vec::new();
    let mut dropped = 0usize;
    for row in &table.rows {
        let event_type = table.cell(row, idx[0]).trim();
        if event_type.is_empty() {
            dropped += 1;
            continue;
        }
        kept.push(HazardEvent {
            event_type: event_type.to_string(),
            province: table.cell(row, idx[1]).trim().to_string(),
            canton: table.cell(row, idx[2]).trim().to_string(),
            description: table.cell(row, idx[3]).trim().to_string(),
            lat: table.cell(row, idx[4]).trim().to_string(),
            lon: table.cell(row, idx[5]).trim().to_string(),
        });
    }
    log.emit_counts(IngestStage::Map, "hazards_mapped", kept.len(), dropped);
    Ok(kept)
}
