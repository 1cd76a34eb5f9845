#![forbid(unsafe_code)]

mod engine;
mod error;

pub const CRATE_NAME: &str = "mirador-query";

pub use engine::{
    events_by_province_and_canton, homicides_by_weapon_and_sex, EventChart, HomicideChart,
    ProvinceCantonCount, WeaponSexCount,
};
pub use error::{QueryError, QueryErrorCode};
