// SPDX-License-Identifier: Apache-2.0

use crate::layer::ClusterLayer;
use crate::{MAP_CENTER, MAP_ZOOM};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mirador_core::canonical;
use serde::{Deserialize, Serialize};

/// A self-contained renderable map artifact: fixed center and zoom plus the
/// cluster layers. No external asset is needed to render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    pub title: String,
    pub center: [f64; 2],
    pub zoom: u32,
    pub layers: Vec<ClusterLayer>,
}

impl MapDocument {
    #[must_use]
    pub fn new(title: impl Into<String>, layers: Vec<ClusterLayer>) -> Self {
        Self {
            title: title.into(),
            center: MAP_CENTER,
            zoom: MAP_ZOOM,
            layers,
        }
    }

    /// Key-sorted JSON bytes; stable across runs for the same content.
    pub fn canonical_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        canonical::stable_json_bytes(self)
    }

    pub fn etag(&self) -> Result<String, serde_json::Error> {
        canonical::stable_json_hash_hex(self)
    }

    /// Embeddable form for iframe-style hosts.
    pub fn to_data_uri(&self) -> Result<String, serde_json::Error> {
        let bytes = self.canonical_json()?;
        Ok(format!(
            "data:application/json;base64,{}",
            STANDARD.encode(bytes)
        ))
    }
}
