/// Map-ready point features.
///
/// Turns displayable sites into GeoJSON point features with the
/// presentation metadata the map layer binds to: marker color, marker
/// label, and popup content. The output is fully deterministic - feature
/// order follows input order and per-pollutant lines follow declaration
/// order, so identical input produces byte-identical output.

use crate::aggregate::{DisplayPolicy, is_displayable, site_overall_aqi};
use crate::breakpoints::sub_index;
use crate::model::{Pollutant, Site, SiteData};
use crate::render::{aqi_color, aqi_label, format_timestamp};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Feature types
// ---------------------------------------------------------------------------

/// One render-ready map point. Terminal artifact of the pipeline; one per
/// visible site.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFeature {
    /// `[longitude, latitude]`, GeoJSON axis order.
    pub coordinates: [f64; 2],
    pub color: &'static str,
    pub label: String,
    pub popup_content: String,
}

/// GeoJSON `FeatureCollection` of point features, serializable for any
/// GeoJSON-consuming map source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<PointFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointFeature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: PointGeometry,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: [f64; 2],
}

/// Property names match what the map layer's style expressions reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureProperties {
    #[serde(rename = "popupContent")]
    pub popup_content: String,
    #[serde(rename = "overallAQI")]
    pub overall_aqi: String,
    #[serde(rename = "overallColor")]
    pub overall_color: String,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Builds one map feature per displayable site, preserving input order.
pub fn build_features(sites: &[Site], policy: &DisplayPolicy) -> Vec<MapFeature> {
    sites
        .iter()
        .filter(|site| is_displayable(site, policy))
        .map(|site| {
            let overall = site_overall_aqi(site);
            MapFeature {
                coordinates: [site.longitude, site.latitude],
                color: aqi_color(overall as f64),
                label: aqi_label(overall),
                popup_content: popup_content(site, overall),
            }
        })
        .collect()
}

/// Wraps map features into a serializable GeoJSON `FeatureCollection`.
pub fn feature_collection(features: &[MapFeature]) -> FeatureCollection {
    FeatureCollection {
        kind: "FeatureCollection",
        features: features
            .iter()
            .map(|f| PointFeature {
                kind: "Feature",
                geometry: PointGeometry { kind: "Point", coordinates: f.coordinates },
                properties: FeatureProperties {
                    popup_content: f.popup_content.clone(),
                    overall_aqi: f.label.clone(),
                    overall_color: f.color.to_string(),
                },
            })
            .collect(),
    }
}

/// Composes the popup text for one site: name, optional city, overall AQI,
/// one line per pollutant in declaration order, and the last-updated
/// timestamp when available. Plain text, one line per item - markup is the
/// display layer's concern.
fn popup_content(site: &Site, overall: i32) -> String {
    let mut lines = Vec::new();
    lines.push(site.name.clone());
    if let Some(city) = &site.city {
        lines.push(format!("City: {}", city));
    }
    lines.push(format!("Overall AQI: {}", aqi_label(overall)));

    if let SiteData::Raw { readings } = &site.data {
        for pollutant in Pollutant::ALL {
            let Some(reading) = readings.iter().find(|r| r.parameter == pollutant) else {
                continue;
            };
            let sub = sub_index(reading.parameter, reading.concentration);
            // Display at the breakpoint table's precision, the same one the
            // normalizer truncated to.
            lines.push(format!(
                "{}: {:.prec$} (AQI {})",
                pollutant.label(),
                reading.concentration,
                aqi_label(sub),
                prec = pollutant.precision()
            ));
        }
    }

    if let Some(updated) = &site.last_updated {
        lines.push(format!("Last Update: {}", format_timestamp(updated)));
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Map-bounds filtering
// ---------------------------------------------------------------------------

/// Retains only sites inside the `[sw, ne]` lon/lat bounding box -
/// the core-side counterpart of a map pan/zoom refresh. Both corners are
/// `[longitude, latitude]`. Debouncing repeated calls is the caller's job.
pub fn within_bounds(sites: &[Site], sw: [f64; 2], ne: [f64; 2]) -> Vec<Site> {
    sites
        .iter()
        .filter(|site| {
            site.longitude >= sw[0]
                && site.longitude <= ne[0]
                && site.latitude >= sw[1]
                && site.latitude <= ne[1]
        })
        .cloned()
        .collect()
}
