// SPDX-License-Identifier: Apache-2.0

use crate::point::{extract_point, MapPoint, PointExtract, RawPoint};
use serde::{Deserialize, Serialize};

/// Visual identity of one cluster layer; each dataset gets its own so both
/// can share a base map and stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub cluster_name: String,
    pub icon_color: String,
}

impl MarkerStyle {
    #[must_use]
    pub fn tourism() -> Self {
        Self {
            cluster_name: "Atractivos Turísticos".to_string(),
            icon_color: "green".to_string(),
        }
    }

    #[must_use]
    pub fn hazard() -> Self {
        Self {
            cluster_name: "Eventos Peligrosos".to_string(),
            icon_color: "red".to_string(),
        }
    }
}

/// One named cluster of markers. `skipped_points` records how many input
/// rows failed coordinate coercion and were left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterLayer {
    pub name: String,
    pub icon_color: String,
    pub markers: Vec<MapPoint>,
    pub skipped_points: u64,
}

/// Folds raw points into a layer, keeping exactly the coercible subsequence
/// in input order. A bad row never aborts the build.
#[must_use]
pub fn build_clustered_layer(points: &[RawPoint], style: MarkerStyle) -> ClusterLayer {
    let mut markers = Vec::new();
    let mut skipped_points = 0u64;
    for (index, raw) in points.iter().enumerate() {
        match extract_point(index, raw) {
            PointExtract::Point(point) => markers.push(point),
            PointExtract::Skip { .. } => skipped_points += 1,
        }
    }
    ClusterLayer {
        name: style.cluster_name,
        icon_color: style.icon_color,
        markers,
        skipped_points,
    }
}
