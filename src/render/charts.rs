/// Chart-ready series for the plotting layer.
///
/// Three builders, all pure:
/// - `build_scatter_series` - per-pollutant concentration scatter, with
///   WHO-guideline partitioning.
/// - `station_aqi_series` - one overall-AQI point per station, the series
///   both input modes share.
/// - `cohort_bar_series` - the "average AQI" summary bars.
///
/// The WHO guideline split is a second, independent threshold system from
/// the AQI breakpoints: a binary within/exceeds health classification on
/// the raw concentration, not on the sub-index.

use crate::aggregate::{DisplayPolicy, is_displayable, site_overall_aqi};
use crate::breakpoints::sub_index;
use crate::model::{CohortAverage, Pollutant, Site, SiteData};
use crate::render::{COLOR_UNKNOWN, aqi_color, aqi_label};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// WHO guidelines
// ---------------------------------------------------------------------------

/// WHO annual guideline thresholds, ug/m3. Only the particulate pollutants
/// have one; "within" means at or below the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WhoGuidelines {
    pub pm25: f64,
    pub pm10: f64,
}

impl Default for WhoGuidelines {
    fn default() -> Self {
        WhoGuidelines { pm25: 15.0, pm10: 45.0 }
    }
}

impl WhoGuidelines {
    pub fn threshold(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => Some(self.pm25),
            Pollutant::Pm10 => Some(self.pm10),
            _ => None,
        }
    }
}

/// Tag distinguishing guideline partitions for visual treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuidelineStatus {
    Within,
    Exceeds,
    /// Pollutant has no WHO guideline threshold; series is unpartitioned.
    NoGuideline,
}

// ---------------------------------------------------------------------------
// Series type
// ---------------------------------------------------------------------------

/// One plottable trace: parallel x/y/color/hover arrays as a generic
/// plotting library consumes them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub marker_colors: Vec<String>,
    pub hover_texts: Vec<String>,
    pub guideline: GuidelineStatus,
}

impl ChartSeries {
    fn empty(name: String, guideline: GuidelineStatus) -> Self {
        ChartSeries {
            name,
            x: Vec::new(),
            y: Vec::new(),
            marker_colors: Vec::new(),
            hover_texts: Vec::new(),
            guideline,
        }
    }

    fn push(&mut self, x: String, y: f64, color: String, hover: String) {
        self.x.push(x);
        self.y.push(y);
        self.marker_colors.push(color);
        self.hover_texts.push(hover);
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Per-pollutant concentration scatter over displayable sites.
///
/// Pollutants with a WHO guideline produce up to two series (within /
/// exceeds); the rest produce one. Empty series are dropped. Output order
/// is pollutant declaration order, within before exceeds.
pub fn build_scatter_series(
    sites: &[Site],
    policy: &DisplayPolicy,
    guidelines: &WhoGuidelines,
) -> Vec<ChartSeries> {
    let visible: Vec<&Site> =
        sites.iter().filter(|s| is_displayable(s, policy)).collect();

    let mut out = Vec::new();
    for pollutant in Pollutant::ALL {
        let mut series = match guidelines.threshold(pollutant) {
            Some(_) => vec![
                ChartSeries::empty(
                    format!("{} (within guideline)", pollutant.label()),
                    GuidelineStatus::Within,
                ),
                ChartSeries::empty(
                    format!("{} (exceeds guideline)", pollutant.label()),
                    GuidelineStatus::Exceeds,
                ),
            ],
            None => vec![ChartSeries::empty(
                pollutant.label().to_string(),
                GuidelineStatus::NoGuideline,
            )],
        };

        for site in &visible {
            let SiteData::Raw { readings } = &site.data else {
                continue;
            };
            let Some(reading) = readings.iter().find(|r| r.parameter == pollutant)
            else {
                continue;
            };
            let sub = sub_index(reading.parameter, reading.concentration);
            let hover = format!(
                "{}\n{}: {:.prec$} (AQI {})",
                site.name,
                pollutant.label(),
                reading.concentration,
                aqi_label(sub),
                prec = pollutant.precision()
            );
            let color = aqi_color(sub as f64).to_string();

            let slot = match guidelines.threshold(pollutant) {
                Some(threshold) if reading.concentration > threshold => 1,
                _ => 0,
            };
            series[slot].push(site.name.clone(), reading.concentration, color, hover);
        }

        out.extend(series.into_iter().filter(|s| !s.is_empty()));
    }
    out
}

/// One overall-AQI point per displayable station: x = station names,
/// y = AQI, marker colors from the palette. This is the series the
/// pre-computed (WAQI) input mode renders, and it works identically for
/// raw-mode sites.
pub fn station_aqi_series(sites: &[Site], policy: &DisplayPolicy) -> ChartSeries {
    let mut series =
        ChartSeries::empty("Stations AQI".to_string(), GuidelineStatus::NoGuideline);
    for site in sites.iter().filter(|s| is_displayable(s, policy)) {
        let aqi = site_overall_aqi(site);
        series.push(
            site.name.clone(),
            aqi as f64,
            aqi_color(aqi as f64).to_string(),
            format!("{}\nAQI: {}", site.name, aqi_label(aqi)),
        );
    }
    series
}

/// Summary bars for the cohort-average widget: one bar per entry, in the
/// order `cohort_averages` produced them. Low-confidence entries render
/// neutral gray instead of a palette color.
pub fn cohort_bar_series(averages: &[CohortAverage]) -> ChartSeries {
    let mut series =
        ChartSeries::empty("Average AQI".to_string(), GuidelineStatus::NoGuideline);
    for avg in averages {
        let color = if avg.low_confidence {
            COLOR_UNKNOWN.to_string()
        } else {
            aqi_color(avg.average).to_string()
        };
        series.push(
            avg.key.label().to_string(),
            avg.average,
            color,
            format!(
                "{}: {:.1} ({} sites)",
                avg.key.label(),
                avg.average,
                avg.sample_count
            ),
        );
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::cohort_averages;
    use crate::model::NormalizedReading;

    fn raw_site(name: &str, readings: Vec<(Pollutant, f64)>) -> Site {
        Site {
            id: name.to_string(),
            name: name.to_string(),
            city: None,
            latitude: 0.0,
            longitude: 0.0,
            data: SiteData::Raw {
                readings: readings
                    .into_iter()
                    .map(|(parameter, concentration)| NormalizedReading {
                        parameter,
                        concentration,
                    })
                    .collect(),
            },
            last_updated: None,
        }
    }

    #[test]
    fn test_guideline_partition_for_pm25() {
        let sites = vec![
            raw_site("clean", vec![(Pollutant::Pm25, 10.0), (Pollutant::Pm10, 20.0)]),
            raw_site("dirty", vec![(Pollutant::Pm25, 25.0), (Pollutant::Pm10, 60.0)]),
        ];
        let series = build_scatter_series(
            &sites,
            &DisplayPolicy::default(),
            &WhoGuidelines::default(),
        );

        let within = series
            .iter()
            .find(|s| s.name == "PM2.5 (within guideline)")
            .expect("within series");
        assert_eq!(within.guideline, GuidelineStatus::Within);
        assert_eq!(within.x, vec!["clean"]);

        let exceeds = series
            .iter()
            .find(|s| s.name == "PM2.5 (exceeds guideline)")
            .expect("exceeds series");
        assert_eq!(exceeds.guideline, GuidelineStatus::Exceeds);
        assert_eq!(exceeds.x, vec!["dirty"]);
        assert!((exceeds.y[0] - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_guideline_boundary_is_within() {
        // Exactly at the threshold counts as within, not exceeds.
        let sites = vec![raw_site(
            "edge",
            vec![(Pollutant::Pm25, 15.0), (Pollutant::Pm10, 45.0)],
        )];
        let series = build_scatter_series(
            &sites,
            &DisplayPolicy::default(),
            &WhoGuidelines::default(),
        );
        assert!(series.iter().any(|s| s.name == "PM2.5 (within guideline)"));
        assert!(!series.iter().any(|s| s.name == "PM2.5 (exceeds guideline)"));
        assert!(series.iter().any(|s| s.name == "PM10 (within guideline)"));
    }

    #[test]
    fn test_hover_values_use_table_precision() {
        let sites = vec![raw_site(
            "gases",
            vec![(Pollutant::O3, 0.065), (Pollutant::So2, 40.0)],
        )];
        let series = build_scatter_series(
            &sites,
            &DisplayPolicy::default(),
            &WhoGuidelines::default(),
        );
        let o3 = series.iter().find(|s| s.name == "O3").expect("O3 series");
        // 0.065 ppm: 51 + (100-51)/(0.070-0.055) * 0.010 = 83.67 -> 84
        assert_eq!(o3.hover_texts[0], "gases\nO3: 0.065 (AQI 84)");
        let so2 = series.iter().find(|s| s.name == "SO2").expect("SO2 series");
        assert_eq!(so2.hover_texts[0], "gases\nSO2: 40 (AQI 56)");
    }

    #[test]
    fn test_pollutants_without_guideline_are_single_series() {
        let sites = vec![raw_site(
            "gases",
            vec![(Pollutant::So2, 40.0), (Pollutant::No2, 60.0)],
        )];
        let series = build_scatter_series(
            &sites,
            &DisplayPolicy::default(),
            &WhoGuidelines::default(),
        );
        let names: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["SO2", "NO2"]);
        assert!(series.iter().all(|s| s.guideline == GuidelineStatus::NoGuideline));
    }

    #[test]
    fn test_scatter_excludes_undisplayable_sites() {
        let sites = vec![raw_site("lonely", vec![(Pollutant::Pm25, 25.0)])];
        let series = build_scatter_series(
            &sites,
            &DisplayPolicy::default(),
            &WhoGuidelines::default(),
        );
        assert!(series.is_empty());
    }

    #[test]
    fn test_station_aqi_series_colors_and_hover() {
        let sites = vec![Site {
            id: "tower".to_string(),
            name: "Tower".to_string(),
            city: None,
            latitude: 0.0,
            longitude: 0.0,
            data: SiteData::Precomputed { aqi: 155 },
            last_updated: None,
        }];
        let series = station_aqi_series(&sites, &DisplayPolicy::default());
        assert_eq!(series.len(), 1);
        assert_eq!(series.x, vec!["Tower"]);
        assert!((series.y[0] - 155.0).abs() < 1e-9);
        assert_eq!(series.marker_colors[0], "#cc0033");
        assert_eq!(series.hover_texts[0], "Tower\nAQI: 155");
    }

    #[test]
    fn test_cohort_bar_series_marks_low_confidence_gray() {
        let sites = vec![raw_site(
            "a",
            vec![(Pollutant::Pm25, 25.0), (Pollutant::Pm10, 60.0)],
        )];
        let bars = cohort_bar_series(&cohort_averages(&sites));
        assert_eq!(bars.len(), 7);
        assert_eq!(bars.x.last().map(String::as_str), Some("Overall"));
        // O3 has no contributors -> gray; pm25 average 78 -> moderate.
        assert_eq!(bars.marker_colors[0], COLOR_UNKNOWN);
        assert_eq!(bars.marker_colors[1], "#ffde33");
    }
}
