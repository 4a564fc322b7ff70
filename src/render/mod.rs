/// Presentation-ready output builders.
///
/// Everything here is a pure function over aggregated sites: the AQI color
/// scale shared by map markers, list rows, and chart markers, plus the two
/// output shapes the dashboard consumes.
///
/// Submodules:
/// - `features` - GeoJSON point features for the map layer.
/// - `charts` - scatter/bar series for the plotting layer.

pub mod charts;
pub mod features;

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Color scale
// ---------------------------------------------------------------------------

/// Neutral gray for unknown/unavailable values.
pub const COLOR_UNKNOWN: &str = "#bfbfbf";

/// Maps an AQI value to its display color.
///
/// The six-tier palette is the visual contract users rely on; the exact
/// hex codes are reproduced verbatim. Total over the full real-number
/// domain: negative values and NaN render neutral gray, values far above
/// 500 stay hazardous maroon.
pub fn aqi_color(aqi: f64) -> &'static str {
    if !(aqi >= 0.0) {
        return COLOR_UNKNOWN;
    }
    if aqi <= 50.0 {
        "#009966" // Good
    } else if aqi <= 100.0 {
        "#ffde33" // Moderate
    } else if aqi <= 150.0 {
        "#ff9933" // Unhealthy for Sensitive Groups
    } else if aqi <= 200.0 {
        "#cc0033" // Unhealthy
    } else if aqi <= 300.0 {
        "#660099" // Very Unhealthy
    } else {
        "#7e0023" // Hazardous
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Overall-AQI label for markers and list rows: "?" when unavailable.
pub fn aqi_label(aqi: i32) -> String {
    if aqi < 0 { "?".to_string() } else { aqi.to_string() }
}

/// Human-readable timestamp for popups and list rows.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%d %b %Y, %H:%M UTC").to_string()
}
