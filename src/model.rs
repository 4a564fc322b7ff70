/// Core data types for the air quality measurement pipeline.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond trivial accessors, no I/O, and no external
/// dependencies beyond serde/chrono derives - only types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AQI sentinels
// ---------------------------------------------------------------------------

/// Sentinel sub-index / overall AQI meaning "no value available".
///
/// Error conditions in the pipeline are modeled as data, never exceptions:
/// a rejected reading, an un-interpolatable concentration, and a site with
/// no usable pollutants all resolve to this value.
pub const AQI_UNAVAILABLE: i32 = -1;

/// Top of the EPA AQI scale. Concentrations above the highest tabulated
/// breakpoint clamp here rather than reporting unavailable.
pub const AQI_MAX: i32 = 500;

// ---------------------------------------------------------------------------
// Pollutants
// ---------------------------------------------------------------------------

/// The six AQI-relevant pollutant codes. Readings for any other parameter
/// are discarded at ingestion, not merely ignored downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    O3,
    Pm25,
    Pm10,
    So2,
    No2,
    Co,
}

impl Pollutant {
    /// Declaration order. Cohort averages and chart series are emitted in
    /// this order - consumers rely on it for consistent axis ordering.
    pub const ALL: [Pollutant; 6] = [
        Pollutant::O3,
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::So2,
        Pollutant::No2,
        Pollutant::Co,
    ];

    /// Lowercase wire code as it appears in OpenAQ payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Pollutant::O3 => "o3",
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::So2 => "so2",
            Pollutant::No2 => "no2",
            Pollutant::Co => "co",
        }
    }

    /// Human-readable label for popups and chart legends. Plain semantic
    /// names, no markup - subscript rendering belongs to the display layer.
    pub fn label(&self) -> &'static str {
        match self {
            Pollutant::O3 => "O3",
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::So2 => "SO2",
            Pollutant::No2 => "NO2",
            Pollutant::Co => "CO",
        }
    }

    /// Decimal precision of this pollutant's breakpoint table. Readings
    /// are truncated to this many places before interpolation, and popups
    /// and hover texts display them at the same precision.
    pub fn precision(&self) -> usize {
        match self {
            Pollutant::O3 => 3,
            Pollutant::Pm25 | Pollutant::Co => 1,
            Pollutant::Pm10 | Pollutant::So2 | Pollutant::No2 => 0,
        }
    }

    /// Parses a wire parameter code, case-insensitively.
    /// Returns `None` for anything outside the closed six-code set.
    pub fn parse(code: &str) -> Option<Pollutant> {
        match code.to_ascii_lowercase().as_str() {
            "o3" => Some(Pollutant::O3),
            "pm25" => Some(Pollutant::Pm25),
            "pm10" => Some(Pollutant::Pm10),
            "so2" => Some(Pollutant::So2),
            "no2" => Some(Pollutant::No2),
            "co" => Some(Pollutant::Co),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// One pollutant reading at a site as delivered by the upstream API,
/// before unit normalization. The value has not been validated yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMeasurement {
    pub parameter: Pollutant,
    pub value: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

/// A reading converted and truncated into the unit its breakpoint table
/// expects. Produced one-to-one from `RawMeasurement` by the normalizer;
/// never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedReading {
    pub parameter: Pollutant,
    pub concentration: f64,
}

/// All raw measurements reported by one observation location, grouped as
/// the OpenAQ payload delivers them. Input to `normalize::normalize_site`.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteMeasurements {
    pub id: String,
    pub name: String,
    pub city: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub measurements: Vec<RawMeasurement>,
}

// ---------------------------------------------------------------------------
// Sites
// ---------------------------------------------------------------------------

/// The two input modes the pipeline accepts, as an explicit tagged variant
/// rather than optional-field presence checks.
///
/// OpenAQ delivers raw per-pollutant measurements; WAQI delivers a
/// station-level AQI that was already computed upstream, so the
/// interpolation and aggregation stages are bypassed for it.
#[derive(Debug, Clone, PartialEq)]
pub enum SiteData {
    Raw { readings: Vec<NormalizedReading> },
    Precomputed { aqi: i32 },
}

/// One physical observation location with normalized data attached.
///
/// The overall AQI is derived on demand (`aggregate::site_overall_aqi`),
/// never stored redundantly. Sites are immutable snapshots recomputed from
/// the latest payload; none outlives a single fetch-render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub city: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub data: SiteData,
    pub last_updated: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Cohort aggregation
// ---------------------------------------------------------------------------

/// Identifies one entry in a cohort-average result: a single pollutant's
/// averaged sub-index, or the cross-pollutant overall average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CohortKey {
    Pollutant(Pollutant),
    Overall,
}

impl CohortKey {
    pub fn label(&self) -> &'static str {
        match self {
            CohortKey::Pollutant(p) => p.label(),
            CohortKey::Overall => "Overall",
        }
    }
}

/// One averaged value across all sites in a selected scope (e.g. a country).
/// Recomputed on every site-set change; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortAverage {
    pub key: CohortKey,
    /// Mean sub-index (or mean overall AQI for `CohortKey::Overall`).
    pub average: f64,
    /// Number of sites that contributed a valid value.
    pub sample_count: usize,
    /// True when no site contributed; render neutral/gray, not colored.
    pub low_confidence: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pollutant_codes_round_trip() {
        for p in Pollutant::ALL {
            assert_eq!(Pollutant::parse(p.code()), Some(p));
        }
    }

    #[test]
    fn test_pollutant_parse_is_case_insensitive() {
        assert_eq!(Pollutant::parse("PM25"), Some(Pollutant::Pm25));
        assert_eq!(Pollutant::parse("O3"), Some(Pollutant::O3));
        assert_eq!(Pollutant::parse("Co"), Some(Pollutant::Co));
    }

    #[test]
    fn test_pollutant_parse_rejects_non_aqi_parameters() {
        // OpenAQ also reports black carbon, ultrafine particle counts, etc.
        // None of these are AQI-relevant.
        assert_eq!(Pollutant::parse("bc"), None);
        assert_eq!(Pollutant::parse("um025"), None);
        assert_eq!(Pollutant::parse(""), None);
    }

    #[test]
    fn test_serde_codes_match_wire_names() {
        let json = serde_json::to_string(&Pollutant::Pm25).unwrap();
        assert_eq!(json, "\"pm25\"");
        let back: Pollutant = serde_json::from_str("\"so2\"").unwrap();
        assert_eq!(back, Pollutant::So2);
    }

    #[test]
    fn test_precision_matches_table_units() {
        assert_eq!(Pollutant::O3.precision(), 3);
        assert_eq!(Pollutant::Pm25.precision(), 1);
        assert_eq!(Pollutant::Co.precision(), 1);
        assert_eq!(Pollutant::Pm10.precision(), 0);
        assert_eq!(Pollutant::So2.precision(), 0);
        assert_eq!(Pollutant::No2.precision(), 0);
    }

    #[test]
    fn test_declaration_order_is_stable() {
        let codes: Vec<_> = Pollutant::ALL.iter().map(|p| p.code()).collect();
        assert_eq!(codes, vec!["o3", "pm25", "pm10", "so2", "no2", "co"]);
    }
}
