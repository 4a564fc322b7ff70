/// Unit normalization for raw pollutant readings.
///
/// Upstream payloads are noisy: negative sentinels, zero placeholders, and
/// absurdly large garbage values all occur in practice. The normalizer
/// rejects those outright, applies the pollutant-specific unit conversion,
/// and truncates to the precision its breakpoint table is defined in.
///
/// Truncation happens here, before interpolation - it decides which
/// breakpoint band a borderline value falls into, so applying it after
/// interpolation would change results.

use crate::model::{NormalizedReading, Pollutant, Site, SiteData, SiteMeasurements};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Raw-value ceiling above which a reading is treated as corrupt.
///
/// Empirical from observed source data quality, so configurable.
pub const DEFAULT_MAX_RAW_VALUE: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub max_raw_value: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        NormalizerConfig { max_raw_value: DEFAULT_MAX_RAW_VALUE }
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Converts one raw reading into the unit its breakpoint table expects.
///
/// Returns `None` for any rejected reading: non-finite, non-positive, or
/// above the ceiling. No exceptions - absence is the signal, and the
/// aggregator reads it as "this pollutant unavailable for this site".
pub fn normalize(
    parameter: Pollutant,
    raw_value: f64,
    config: &NormalizerConfig,
) -> Option<NormalizedReading> {
    if !raw_value.is_finite() || raw_value <= 0.0 || raw_value > config.max_raw_value {
        return None;
    }
    // Unit conversions are source-specific quirks: ozone and CO arrive on a
    // scale that maps onto the ppm tables only after division.
    let converted = match parameter {
        Pollutant::O3 => raw_value / 2000.0,
        Pollutant::Co => raw_value / 1145.0,
        _ => raw_value,
    };
    let concentration = truncate_to(converted, parameter.precision());
    Some(NormalizedReading { parameter, concentration })
}

/// Truncates toward zero at `decimals` places. Inputs are positive here,
/// so floor and trunc coincide.
fn truncate_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).floor() / factor
}

// ---------------------------------------------------------------------------
// Per-site lifting
// ---------------------------------------------------------------------------

/// Normalizes every measurement of one site, dropping rejects, and keeps
/// one reading per pollutant (the first accepted one, matching payload
/// order). The site's `last_updated` is the first accepted measurement's
/// timestamp, as the dashboard displayed it.
///
/// A dropped reading never affects sibling pollutants at the same site.
pub fn normalize_site(site: &SiteMeasurements, config: &NormalizerConfig) -> Site {
    let mut readings: Vec<NormalizedReading> = Vec::new();
    let mut last_updated = None;

    for m in &site.measurements {
        if readings.iter().any(|r| r.parameter == m.parameter) {
            continue;
        }
        let Some(reading) = normalize(m.parameter, m.value, config) else {
            continue;
        };
        if last_updated.is_none() {
            last_updated = m.observed_at;
        }
        readings.push(reading);
    }

    Site {
        id: site.id.clone(),
        name: site.name.clone(),
        city: site.city.clone(),
        latitude: site.latitude,
        longitude: site.longitude,
        data: SiteData::Raw { readings },
        last_updated,
    }
}
