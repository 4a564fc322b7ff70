/// Per-site overall AQI, the display-filtering predicate, and cohort
/// averages.
///
/// The overall AQI follows the standard convention: the worst pollutant
/// governs. Sub-indices come from `breakpoints::sub_index`; unavailable
/// ones are discarded before taking the maximum.

use crate::breakpoints::sub_index;
use crate::model::{
    AQI_UNAVAILABLE, CohortAverage, CohortKey, NormalizedReading, Pollutant, Site, SiteData,
};
use serde::Deserialize;
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Overall AQI
// ---------------------------------------------------------------------------

/// Computes a site-level AQI from normalized readings: the maximum of the
/// available sub-indices, or `AQI_UNAVAILABLE` when none is available.
pub fn overall_aqi(readings: &[NormalizedReading]) -> i32 {
    readings
        .iter()
        .map(|r| sub_index(r.parameter, r.concentration))
        .filter(|&idx| idx >= 0)
        .max()
        .unwrap_or(AQI_UNAVAILABLE)
}

/// Overall AQI for a site in either input mode. Pre-computed (WAQI) sites
/// carry their AQI through unchanged; the interpolation stage is bypassed.
pub fn site_overall_aqi(site: &Site) -> i32 {
    match &site.data {
        SiteData::Raw { readings } => overall_aqi(readings),
        SiteData::Precomputed { aqi } => *aqi,
    }
}

// ---------------------------------------------------------------------------
// Display filtering
// ---------------------------------------------------------------------------

/// Presentation policy deciding which sites reach rendered output.
///
/// An explicit value rather than hardcoded rules, so callers can relax
/// or opt out of either check.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayPolicy {
    /// Minimum number of distinct pollutants a raw-mode site must report.
    /// Does not apply to pre-computed sites, which carry no reading set.
    pub min_pollutants: usize,
    /// Exclude sites whose overall AQI is zero or negative.
    pub require_positive_aqi: bool,
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        DisplayPolicy { min_pollutants: 2, require_positive_aqi: true }
    }
}

/// Returns `true` if the site should appear in rendered output.
///
/// Exclusion is silent: absence from the output list is the signal,
/// no per-site error is surfaced.
pub fn is_displayable(site: &Site, policy: &DisplayPolicy) -> bool {
    if policy.require_positive_aqi && site_overall_aqi(site) <= 0 {
        return false;
    }
    match &site.data {
        SiteData::Raw { readings } => {
            let distinct: HashSet<Pollutant> =
                readings.iter().map(|r| r.parameter).collect();
            distinct.len() >= policy.min_pollutants
        }
        SiteData::Precomputed { .. } => true,
    }
}

// ---------------------------------------------------------------------------
// Cohort averages
// ---------------------------------------------------------------------------

/// Averages sub-indices (not raw concentrations) across a site cohort.
///
/// One entry per pollutant in declaration order, then one "overall" entry
/// last - the average of each site's overall AQI over sites where it is
/// non-negative. Pollutants with zero contributing sites report average 0
/// and are flagged low-confidence.
///
/// Callers filter the cohort (by country, by display policy, by map
/// bounds) before calling; this function averages whatever it is given.
pub fn cohort_averages(sites: &[Site]) -> Vec<CohortAverage> {
    let mut out = Vec::with_capacity(Pollutant::ALL.len() + 1);

    for pollutant in Pollutant::ALL {
        let mut sum = 0.0;
        let mut count = 0usize;
        for site in sites {
            let SiteData::Raw { readings } = &site.data else {
                continue;
            };
            let Some(reading) = readings.iter().find(|r| r.parameter == pollutant) else {
                continue;
            };
            let idx = sub_index(reading.parameter, reading.concentration);
            if idx >= 0 {
                sum += idx as f64;
                count += 1;
            }
        }
        out.push(CohortAverage {
            key: CohortKey::Pollutant(pollutant),
            average: if count > 0 { sum / count as f64 } else { 0.0 },
            sample_count: count,
            low_confidence: count == 0,
        });
    }

    let mut sum = 0.0;
    let mut count = 0usize;
    for site in sites {
        let aqi = site_overall_aqi(site);
        if aqi >= 0 {
            sum += aqi as f64;
            count += 1;
        }
    }
    out.push(CohortAverage {
        key: CohortKey::Overall,
        average: if count > 0 { sum / count as f64 } else { 0.0 },
        sample_count: count,
        low_confidence: count == 0,
    });

    out
}
