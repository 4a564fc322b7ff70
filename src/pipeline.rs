/// End-to-end pipeline assembly.
///
/// One call takes ingested site data and produces everything the display
/// layer consumes: normalized sites, map features, chart series, and the
/// cohort summary. Two entry points, one per input mode; both are pure
/// given their inputs and a configuration.

use crate::aggregate::{cohort_averages, is_displayable};
use crate::config::PipelineConfig;
use crate::logging::{self, DataSource};
use crate::model::{CohortAverage, Site, SiteMeasurements};
use crate::normalize::normalize_site;
use crate::render::charts::{
    ChartSeries, build_scatter_series, cohort_bar_series, station_aqi_series,
};
use crate::render::features::{MapFeature, build_features};

// ---------------------------------------------------------------------------
// Output bundle
// ---------------------------------------------------------------------------

/// Everything one pipeline pass produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// All sites after normalization, including ones the display policy
    /// filters out of the rendered outputs.
    pub sites: Vec<Site>,
    /// Map markers for displayable sites.
    pub features: Vec<MapFeature>,
    /// Per-pollutant concentration scatter series (raw mode only; empty
    /// for pre-computed input).
    pub scatter: Vec<ChartSeries>,
    /// One overall-AQI point per displayable station.
    pub station_aqi: ChartSeries,
    /// Per-pollutant and overall cohort averages.
    pub averages: Vec<CohortAverage>,
    /// The averages rendered as summary bars.
    pub cohort_bars: ChartSeries,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Runs the full pipeline on raw measurement sets: normalize, interpolate,
/// aggregate, render.
pub fn process_raw_sites(
    raw_sites: Vec<SiteMeasurements>,
    config: &PipelineConfig,
) -> PipelineOutput {
    let received = raw_sites.len();
    let sites: Vec<Site> = raw_sites
        .iter()
        .map(|s| normalize_site(s, &config.normalizer))
        .collect();

    let output = assemble(sites, config);
    logging::info(
        DataSource::System,
        None,
        &format!(
            "processed {} raw sites, {} displayable",
            received,
            output.features.len()
        ),
    );
    output
}

/// Runs the display stages on sites whose AQI was computed upstream.
/// Normalization and interpolation do not apply in this mode.
pub fn process_precomputed_sites(sites: Vec<Site>, config: &PipelineConfig) -> PipelineOutput {
    let received = sites.len();
    let output = assemble(sites, config);
    logging::info(
        DataSource::System,
        None,
        &format!(
            "processed {} pre-computed sites, {} displayable",
            received,
            output.features.len()
        ),
    );
    output
}

fn assemble(sites: Vec<Site>, config: &PipelineConfig) -> PipelineOutput {
    let features = build_features(&sites, &config.display);
    let scatter = build_scatter_series(&sites, &config.display, &config.guidelines);
    let station_aqi = station_aqi_series(&sites, &config.display);

    let visible: Vec<Site> = sites
        .iter()
        .filter(|s| is_displayable(s, &config.display))
        .cloned()
        .collect();
    let averages = cohort_averages(&visible);
    let cohort_bars = cohort_bar_series(&averages);

    PipelineOutput {
        sites,
        features,
        scatter,
        station_aqi,
        averages,
        cohort_bars,
    }
}
