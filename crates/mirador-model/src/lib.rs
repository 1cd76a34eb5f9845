#![forbid(unsafe_code)]

mod domain;
mod filter;
mod record;

pub const CRATE_NAME: &str = "mirador-model";

pub use domain::{distinct_values, FilterDomains};
pub use filter::{
    DeathType, EventType, FilterState, Province, ValidationError, DEFAULT_DEATH_TYPE,
    DEFAULT_EVENT_TYPE, DEFAULT_PROVINCE,
};
pub use record::{drop_invalid, Geocoded, HazardEvent, HomicideRecord, Tables, TourismSite};
