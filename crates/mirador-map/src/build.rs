// SPDX-License-Identifier: Apache-2.0

use crate::layer::{build_clustered_layer, ClusterLayer, MarkerStyle};
use crate::point::RawPoint;
use mirador_model::{HazardEvent, TourismSite};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// The hazard map always shows this curated subset, independent of whatever
/// event type the chart dropdown currently selects.
pub const HAZARD_LAYER_EVENT_TYPES: &[&str] = &["INTOXICACIÓN", "AGLOMERACIÓN MASIVA"];

#[must_use]
pub fn tourism_popup(site: &TourismSite) -> String {
    format!(
        "<b>{}</b><br>{}<br>{}",
        site.name, site.category, site.site_type
    )
}

#[must_use]
pub fn hazard_popup(event: &HazardEvent) -> String {
    if event.description.is_empty() {
        format!(
            "<b>{}</b><br>{} - {}",
            event.event_type, event.province, event.canton
        )
    } else {
        format!(
            "<b>{}</b><br>{} - {}<br>{}",
            event.event_type, event.province, event.canton, event.description
        )
    }
}

/// Accent- and case-insensitive membership test against the curated subset.
/// This fold applies only here; the chart filter compares event types
/// exactly.
#[must_use]
pub fn hazard_layer_allows(event_type: &str) -> bool {
    let folded = fold_event_type(event_type);
    HAZARD_LAYER_EVENT_TYPES
        .iter()
        .any(|allowed| fold_event_type(allowed) == folded)
}

fn fold_event_type(value: &str) -> String {
    value
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_uppercase()
}

#[must_use]
pub fn tourism_layer<'a>(sites: impl IntoIterator<Item = &'a TourismSite>) -> ClusterLayer {
    let points: Vec<RawPoint> = sites
        .into_iter()
        .map(|site| RawPoint {
            lat: site.lat.clone(),
            lon: site.lon.clone(),
            popup_html: tourism_popup(site),
        })
        .collect();
    build_clustered_layer(&points, MarkerStyle::tourism())
}

#[must_use]
pub fn hazard_layer<'a>(events: impl IntoIterator<Item = &'a HazardEvent>) -> ClusterLayer {
    let points: Vec<RawPoint> = events
        .into_iter()
        .filter(|event| hazard_layer_allows(&event.event_type))
        .map(|event| RawPoint {
            lat: event.lat.clone(),
            lon: event.lon.clone(),
            popup_html: hazard_popup(event),
        })
        .collect();
    build_clustered_layer(&points, MarkerStyle::hazard())
}
