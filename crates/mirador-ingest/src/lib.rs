// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod decode;
mod delimited;
mod logging;
mod rows;

use mirador_model::Tables;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const CRATE_NAME: &str = "mirador-ingest";

pub use decode::SourceEncoding;
pub use delimited::{parse_delimited, read_delimited, DelimitedTable};
pub use logging::{IngestEvent, IngestLog, IngestStage};
pub use rows::{hazard_columns, homicide_columns, normalize_death_type, tourism_columns};

#[derive(Debug)]
pub struct IngestError(pub String);

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IngestError {}

/// One delimited source: where it lives and how to read it. The declared
/// separator and encoding come with the source, not from sniffing.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub path: PathBuf,
    pub delimiter: char,
    pub encoding: SourceEncoding,
}

#[derive(Debug, Clone)]
pub struct SourceSet {
    pub homicides: SourceSpec,
    pub tourism: SourceSpec,
    pub hazards: SourceSpec,
}

impl SourceSet {
    /// The formats the published sources actually use: semicolon-delimited
    /// Latin-1 for homicides and hazards, comma-delimited Latin-1 for the
    /// tourism catalogue.
    #[must_use]
    pub fn with_default_formats(homicides: PathBuf, tourism: PathBuf, hazards: PathBuf) -> Self {
        Self {
            homicides: SourceSpec {
                path: homicides,
                delimiter: ';',
                encoding: SourceEncoding::Latin1,
            },
            tourism: SourceSpec {
                path: tourism,
                delimiter: ',',
                encoding: SourceEncoding::Latin1,
            },
            hazards: SourceSpec {
                path: hazards,
                delimiter: ';',
                encoding: SourceEncoding::Latin1,
            },
        }
    }
}

/// Loads and normalizes the three tables. Unreadable sources and missing
/// required columns fail the whole load; rows that do not conform to the
/// column contract are dropped and counted in the returned log.
pub fn load_tables(sources: &SourceSet) -> Result<(Tables, IngestLog), IngestError> {
    let mut log = IngestLog::default();

    let homicides_table = read_delimited(&sources.homicides)
        .map_err(|e| IngestError(format!("homicides source: {e}")))?;
    log.emit_counts(
        IngestStage::Read,
        "homicides_read",
        homicides_table.rows.len(),
        0,
    );
    let homicides = rows::map_homicides(&homicides_table, &mut log)
        .map_err(|e| IngestError(format!("homicides source: {e}")))?;

    let tourism_table = read_delimited(&sources.tourism)
        .map_err(|e| IngestError(format!("tourism source: {e}")))?;
    log.emit_counts(IngestStage::Read, "tourism_read", tourism_table.rows.len(), 0);
    let tourism = rows::map_tourism(&tourism_table, &mut log)
        .map_err(|e| IngestError(format!("tourism source: {e}")))?;

    let hazards_table = read_delimited(&sources.hazards)
        .map_err(|e| IngestError(format!("hazards source: {e}")))?;
    log.emit_counts(IngestStage::Read, "hazards_read", hazards_table.rows.len(), 0);
    let hazards = rows::map_hazards(&hazards_table, &mut log)
        .map_err(|e| IngestError(format!("hazards source: {e}")))?;

    let tables = Tables {
        homicides,
        tourism,
        hazards,
    };
    log.emit_counts(
        IngestStage::Finalize,
        "tables_loaded",
        tables.homicides.len() + tables.tourism.len() + tables.hazards.len(),
        0,
    );
    Ok((tables, log))
}
