use crate::domain::FilterDomains;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const DEFAULT_PROVINCE: &str = "PICHINCHA";
pub const DEFAULT_DEATH_TYPE: &str = "ASESINATO";
pub const DEFAULT_EVENT_TYPE: &str = "INTOXICACIÓN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

/// A province name, valid only if observed in the loaded homicide table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Province(String);

impl Province {
    pub fn parse(input: &str, domains: &FilterDomains) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ValidationError("province must not be empty".to_string()));
        }
        if !domains.contains_province(s) {
            return Err(ValidationError(format!(
                "province not present in loaded data: {s}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Province {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A death-type value, valid only if observed in the loaded homicide table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DeathType(String);

impl DeathType {
    pub fn parse(input: &str, domains: &FilterDomains) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ValidationError("death type must not be empty".to_string()));
        }
        if !domains.contains_death_type(s) {
            return Err(ValidationError(format!(
                "death type not present in loaded data: {s}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DeathType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event-type value, valid only if observed in the loaded hazard table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EventType(String);

impl EventType {
    pub fn parse(input: &str, domains: &FilterDomains) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ValidationError("event type must not be empty".to_string()));
        }
        if !domains.contains_event_type(s) {
            return Err(ValidationError(format!(
                "event type not present in loaded data: {s}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The homicide-axis selection. Set operations validate the candidate value
/// and return the new state; the caller keeps the prior state on failure.
/// Equality over both fields decides whether downstream recomputation is
/// needed: equal states produce identical query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    province: Province,
    death_type: DeathType,
}

impl FilterState {
    pub fn new(
        province: &str,
        death_type: &str,
        domains: &FilterDomains,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            province: Province::parse(province, domains)?,
            death_type: DeathType::parse(death_type, domains)?,
        })
    }

    /// The startup state. Fails when a default value is absent from its
    /// observed domain, which callers must treat as fatal.
    pub fn startup_default(domains: &FilterDomains) -> Result<Self, ValidationError> {
        Self::new(DEFAULT_PROVINCE, DEFAULT_DEATH_TYPE, domains)
    }

    pub fn set_province(
        &self,
        value: &str,
        domains: &FilterDomains,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            province: Province::parse(value, domains)?,
            death_type: self.death_type.clone(),
        })
    }

    pub fn set_death_type(
        &self,
        value: &str,
        domains: &FilterDomains,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            province: self.province.clone(),
            death_type: DeathType::parse(value, domains)?,
        })
    }

    #[must_use]
    pub fn province(&self) -> &Province {
        &self.province
    }

    #[must_use]
    pub fn death_type(&self) -> &DeathType {
        &self.death_type
    }
}
