// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStage {
    Read,
    Map,
    Finalize,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngestEvent {
    pub stage: IngestStage,
    pub name: String,
    pub fields: BTreeMap<String, String>,
}

/// Structured record of an ingest run, serializable without a subscriber.
#[derive(Debug, Default, Clone)]
pub struct IngestLog {
    events: Vec<IngestEvent>,
}

impl IngestLog {
    pub fn emit(
        &mut self,
        stage: IngestStage,
        name: impl Into<String>,
        fields: BTreeMap<String, String>,
    ) {
        self.events.push(IngestEvent {
            stage,
            name: name.into(),
            fields,
        });
    }

    pub fn emit_counts(
        &mut self,
        stage: IngestStage,
        name: impl Into<String>,
        kept: usize,
        dropped: usize,
    ) {
        let mut fields = BTreeMap::new();
        fields.insert("kept".to_string(), kept.to_string());
        fields.insert("dropped".to_string(), dropped.to_string());
        self.emit(stage, name, fields);
    }

    #[must_use]
    pub fn events(&self) -> &[IngestEvent] {
        &self.events
    }

    /// Total dropped-row count across all map stages.
    #[must_use]
    pub fn dropped_rows(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.stage == IngestStage::Map)
            .filter_map(|e| e.fields.get("dropped"))
            .filter_map(|v| v.parse::<usize>().ok())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_rows_sums_map_stage_events_only() {
        let mut log = IngestLog::default();
        log.emit_counts(IngestStage::Read, "homicides_read", 10, 0);
        log.emit_counts(IngestStage::Map, "homicides_mapped", 8, 2);
        log.emit_counts(IngestStage::Map, "tourism_mapped", 5, 1);
        assert_eq!(log.dropped_rows(), 3);
        assert_eq!(log.events().len(), 3);
    }
}
