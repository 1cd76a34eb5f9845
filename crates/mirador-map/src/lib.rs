// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod build;
mod document;
mod layer;
mod point;

pub const CRATE_NAME: &str = "mirador-map";

/// Ecuador's centroid; every map document opens here.
pub const MAP_CENTER: [f64; 2] = [-1.8312, -78.1834];
pub const MAP_ZOOM: u32 = 6;

pub use build::{
    hazard_layer, hazard_layer_allows, hazard_popup, tourism_layer, tourism_popup,
    HAZARD_LAYER_EVENT_TYPES,
};
pub use document::MapDocument;
pub use layer::{build_clustered_layer, ClusterLayer, MarkerStyle};
pub use point::{extract_point, MapPoint, PointExtract, RawPoint};
