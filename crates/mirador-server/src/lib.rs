#![forbid(unsafe_code)]

use mirador_chat::{AssistantPort, ConversationGate};
use mirador_map::{hazard_layer, tourism_layer, MapDocument};
use mirador_model::{
    drop_invalid, EventType, FilterDomains, FilterState, Tables, DEFAULT_EVENT_TYPE,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

mod config;
mod http;

pub const CRATE_NAME: &str = "mirador-server";

pub use config::ApiConfig;
pub use http::build_router;

#[derive(Debug)]
pub struct StartupError(pub String);

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StartupError {}

impl From<mirador_ingest::IngestError> for StartupError {
    fn from(value: mirador_ingest::IngestError) -> Self {
        Self(value.0)
    }
}

/// A map artifact frozen at startup: serialized body plus its etag.
#[derive(Debug, Clone)]
pub struct MapArtifact {
    pub body: String,
    pub etag: String,
}

impl MapArtifact {
    fn from_document(document: &MapDocument) -> Result<Self, StartupError> {
        let bytes = document
            .canonical_json()
            .map_err(|e| StartupError(format!("map artifact encode failed: {e}")))?;
        let etag = mirador_core::canonical::stable_hash_hex(&bytes);
        Ok(Self {
            body: String::from_utf8_lossy(&bytes).into_owned(),
            etag,
        })
    }
}

/// The one mutable piece of the dashboard: current selections for the
/// homicide axis and the hazard-chart axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFilters {
    pub homicide: FilterState,
    pub event_type: EventType,
}

/// Application context built once at startup and shared by every handler.
/// Tables and map artifacts are immutable; session filters and the gate sit
/// behind mutexes so events are handled one at a time.
pub struct AppState {
    pub config: ApiConfig,
    pub tables: Tables,
    pub domains: FilterDomains,
    pub tourism_map: MapArtifact,
    pub hazards_map: MapArtifact,
    pub session: Mutex<SessionFilters>,
    pub gate: Mutex<ConversationGate>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("tables", &self.tables)
            .field("domains", &self.domains)
            .field("tourism_map", &self.tourism_map)
            .field("hazards_map", &self.hazards_map)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Assembles the full context or fails loudly. Nothing is served when the
/// default filter values are absent from their observed domains.
pub fn build_app_state(
    tables: Tables,
    assistant: Arc<dyn AssistantPort>,
    config: ApiConfig,
) -> Result<AppState, StartupError> {
    let domains = FilterDomains::from_tables(&tables);

    let homicide = FilterState::startup_default(&domains)
        .map_err(|e| StartupError(format!("default homicide filter: {e}")))?;
    let event_type = EventType::parse(DEFAULT_EVENT_TYPE, &domains)
        .map_err(|e| StartupError(format!("default event filter: {e}")))?;

    // Maps are built once from the full dataset; dropdown changes never
    // rebuild them.
    let tourism = tourism_layer(drop_invalid(&tables.tourism));
    if tourism.skipped_points > 0 {
        warn!(
            skipped = tourism.skipped_points,
            "tourism markers skipped during map build"
        );
    }
    let hazards = hazard_layer(drop_invalid(&tables.hazards));
    if hazards.skipped_points > 0 {
        warn!(
            skipped = hazards.skipped_points,
            "hazard markers skipped during map build"
        );
    }
    let tourism_map = MapArtifact::from_document(&MapDocument::new(
        "Atractivos Turísticos en Ecuador",
        vec![tourism],
    ))?;
    let hazards_map = MapArtifact::from_document(&MapDocument::new(
        "Eventos Peligrosos en Ecuador",
        vec![hazards],
    ))?;

    info!(
        homicides = tables.homicides.len(),
        tourism = tables.tourism.len(),
        hazards = tables.hazards.len(),
        "application context ready"
    );

    Ok(AppState {
        config,
        tables,
        domains,
        tourism_map,
        hazards_map,
        session: Mutex::new(SessionFilters {
            homicide,
            event_type,
        }),
        gate: Mutex::new(ConversationGate::new(assistant)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirador_chat::FakeAssistant;
    use mirador_model::{HazardEvent, HomicideRecord};

    fn tables_with(province: &str) -> Tables {
        Tables {
            homicides: vec![HomicideRecord {
                province: province.to_string(),
                death_type: "ASESINATO".to_string(),
                weapon: "ARMA DE FUEGO".to_string(),
                sex: "HOMBRE".to_string(),
            }],
            tourism: Vec::new(),
            hazards: vec![HazardEvent {
                event_type: "INTOXICACIÓN".to_string(),
                province: "NAPO".to_string(),
                canton: "TENA".to_string(),
                description: String::new(),
                lat: "-0.99".to_string(),
                lon: "-77.81".to_string(),
            }],
        }
    }

    #[test]
    fn startup_fails_when_a_default_value_is_outside_its_domain() {
        // Loaded data only knows ATLANTIS, so the default province is
        // missing and nothing may be served.
        let err = build_app_state(
            tables_with("ATLANTIS"),
            Arc::new(FakeAssistant::default()),
            ApiConfig::default(),
        )
        .unwrap_err();
        assert!(err.0.contains("default homicide filter"), "got: {}", err.0);
    }

    #[test]
    fn startup_succeeds_with_defaults_present_and_freezes_map_artifacts() {
        let state = build_app_state(
            tables_with("PICHINCHA"),
            Arc::new(FakeAssistant::default()),
            ApiConfig::default(),
        )
        .expect("app state");
        assert_eq!(state.tourism_map.etag.len(), 64);
        assert_eq!(state.hazards_map.etag.len(), 64);
        assert!(state.hazards_map.body.contains("INTOXICACIÓN"));
    }
}
