/// EPA breakpoint tables and the concentration → sub-index interpolator.
///
/// Tables are the EPA-standard values; numeric boundaries are reproduced
/// verbatim because borderline readings land in different index bands if
/// any boundary shifts. They may be confirmed against the calculator at
/// https://www.airnow.gov/aqi/aqi-calculator-concentration/
///
/// Units per table: O3 and CO in ppm, SO2 and NO2 in ppb, PM2.5 and PM10
/// in ug/m3 - i.e. the unit `normalize` converts each reading into.

use crate::model::{AQI_MAX, AQI_UNAVAILABLE, Pollutant};

/// One row of a breakpoint table: a concentration range mapped linearly to
/// an AQI sub-range. Rows are ascending and non-overlapping, so any
/// in-range concentration matches exactly one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub conc_low: f64,
    pub conc_high: f64,
    pub index_low: i32,
    pub index_high: i32,
}

const fn bp(conc_low: f64, conc_high: f64, index_low: i32, index_high: i32) -> Breakpoint {
    Breakpoint { conc_low, conc_high, index_low, index_high }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Ozone, ppm. The 8-hour table tops out at index 300 (0.200 ppm); the
/// 301–500 bands come from the EPA 1-hour table, leaving an untabulated
/// gap between 0.200 and 0.405 ppm that reports unavailable.
static O3_TABLE: &[Breakpoint] = &[
    bp(0.000, 0.054, 0, 50),
    bp(0.055, 0.070, 51, 100),
    bp(0.071, 0.085, 101, 150),
    bp(0.086, 0.105, 151, 200),
    bp(0.106, 0.200, 201, 300),
    bp(0.405, 0.504, 301, 400),
    bp(0.505, 0.604, 401, 500),
];

/// PM2.5, ug/m3, truncated to 1 decimal.
static PM25_TABLE: &[Breakpoint] = &[
    bp(0.0, 12.0, 0, 50),
    bp(12.1, 35.4, 51, 100),
    bp(35.5, 55.4, 101, 150),
    bp(55.5, 150.4, 151, 200),
    bp(150.5, 250.4, 201, 300),
    bp(250.5, 350.4, 301, 400),
    bp(350.5, 500.4, 401, 500),
];

/// PM10, ug/m3, truncated to integer.
static PM10_TABLE: &[Breakpoint] = &[
    bp(0.0, 54.0, 0, 50),
    bp(55.0, 154.0, 51, 100),
    bp(155.0, 254.0, 101, 150),
    bp(255.0, 354.0, 151, 200),
    bp(355.0, 424.0, 201, 300),
    bp(425.0, 504.0, 301, 400),
    bp(505.0, 604.0, 401, 500),
];

/// SO2, ppb, truncated to integer.
static SO2_TABLE: &[Breakpoint] = &[
    bp(0.0, 35.0, 0, 50),
    bp(36.0, 75.0, 51, 100),
    bp(76.0, 185.0, 101, 150),
    bp(186.0, 304.0, 151, 200),
    bp(305.0, 604.0, 201, 300),
    bp(605.0, 804.0, 301, 400),
    bp(805.0, 1004.0, 401, 500),
];

/// NO2, ppb, truncated to integer.
static NO2_TABLE: &[Breakpoint] = &[
    bp(0.0, 53.0, 0, 50),
    bp(54.0, 100.0, 51, 100),
    bp(101.0, 360.0, 101, 150),
    bp(361.0, 649.0, 151, 200),
    bp(650.0, 1249.0, 201, 300),
    bp(1250.0, 1649.0, 301, 400),
    bp(1650.0, 2049.0, 401, 500),
];

/// CO, ppm, truncated to 1 decimal.
static CO_TABLE: &[Breakpoint] = &[
    bp(0.0, 4.4, 0, 50),
    bp(4.5, 9.4, 51, 100),
    bp(9.5, 12.4, 101, 150),
    bp(12.5, 15.4, 151, 200),
    bp(15.5, 30.4, 201, 300),
    bp(30.5, 40.4, 301, 400),
    bp(40.5, 50.4, 401, 500),
];

/// Returns the breakpoint table for a pollutant.
pub fn table(parameter: Pollutant) -> &'static [Breakpoint] {
    match parameter {
        Pollutant::O3 => O3_TABLE,
        Pollutant::Pm25 => PM25_TABLE,
        Pollutant::Pm10 => PM10_TABLE,
        Pollutant::So2 => SO2_TABLE,
        Pollutant::No2 => NO2_TABLE,
        Pollutant::Co => CO_TABLE,
    }
}

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// Maps a normalized concentration to its AQI sub-index.
///
/// Linear interpolation inside the matching breakpoint row, rounded to the
/// nearest integer (half away from zero):
///
///   index = round((Ihi - Ilo) / (Chi - Clo) * (C - Clo) + Ilo)
///
/// Returns `AQI_UNAVAILABLE` when the concentration falls below the lowest
/// bound or in an untabulated gap, and clamps to `AQI_MAX` above the top
/// row's high end - overflow is an explicit clamp, not missing data.
pub fn sub_index(parameter: Pollutant, concentration: f64) -> i32 {
    let rows = table(parameter);
    let Some(last) = rows.last() else {
        return AQI_UNAVAILABLE;
    };
    if !concentration.is_finite() {
        return AQI_UNAVAILABLE;
    }
    if concentration > last.conc_high {
        return AQI_MAX;
    }
    for row in rows {
        if concentration >= row.conc_low && concentration <= row.conc_high {
            let slope =
                (row.index_high - row.index_low) as f64 / (row.conc_high - row.conc_low);
            let index = slope * (concentration - row.conc_low) + row.index_low as f64;
            return index.round() as i32;
        }
    }
    AQI_UNAVAILABLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_ascending_and_non_overlapping() {
        // A violated ordering would let one concentration match two rows
        // and make sub_index depend on scan order.
        for p in Pollutant::ALL {
            let rows = table(p);
            assert!(!rows.is_empty(), "{:?} table must not be empty", p);
            for row in rows {
                assert!(row.conc_low <= row.conc_high, "{:?}: bad row {:?}", p, row);
                assert!(row.index_low <= row.index_high, "{:?}: bad row {:?}", p, row);
            }
            for pair in rows.windows(2) {
                assert!(
                    pair[0].conc_high < pair[1].conc_low,
                    "{:?}: rows overlap or are out of order: {:?}",
                    p,
                    pair
                );
                assert!(pair[0].index_high < pair[1].index_low, "{:?}", p);
            }
        }
    }

    #[test]
    fn test_pm25_breakpoint_edges() {
        // Boundary continuity at the first EPA edge: 12.0 closes the
        // 0-50 band, 12.1 opens the 51-100 band.
        assert_eq!(sub_index(Pollutant::Pm25, 0.0), 0);
        assert_eq!(sub_index(Pollutant::Pm25, 12.0), 50);
        assert_eq!(sub_index(Pollutant::Pm25, 12.1), 51);
        assert_eq!(sub_index(Pollutant::Pm25, 35.4), 100);
        assert_eq!(sub_index(Pollutant::Pm25, 35.5), 101);
        assert_eq!(sub_index(Pollutant::Pm25, 500.4), 500);
    }

    #[test]
    fn test_pm25_interpolates_within_band() {
        // 25.0 sits in the 12.1-35.4 band:
        // (100-51)/(35.4-12.1) * (25.0-12.1) + 51 = 78.13 -> 78
        assert_eq!(sub_index(Pollutant::Pm25, 25.0), 78);
    }

    #[test]
    fn test_pm10_values() {
        assert_eq!(sub_index(Pollutant::Pm10, 54.0), 50);
        assert_eq!(sub_index(Pollutant::Pm10, 55.0), 51);
        // (100-51)/(154-55) * (60-55) + 51 = 53.47 -> 53
        assert_eq!(sub_index(Pollutant::Pm10, 60.0), 53);
        assert_eq!(sub_index(Pollutant::Pm10, 154.0), 100);
        assert_eq!(sub_index(Pollutant::Pm10, 604.0), 500);
    }

    #[test]
    fn test_gas_tables_band_edges() {
        assert_eq!(sub_index(Pollutant::O3, 0.054), 50);
        assert_eq!(sub_index(Pollutant::O3, 0.055), 51);
        assert_eq!(sub_index(Pollutant::O3, 0.070), 100);

        assert_eq!(sub_index(Pollutant::Co, 4.4), 50);
        assert_eq!(sub_index(Pollutant::Co, 4.5), 51);

        assert_eq!(sub_index(Pollutant::So2, 35.0), 50);
        assert_eq!(sub_index(Pollutant::So2, 36.0), 51);

        assert_eq!(sub_index(Pollutant::No2, 53.0), 50);
        assert_eq!(sub_index(Pollutant::No2, 54.0), 51);
        assert_eq!(sub_index(Pollutant::No2, 100.0), 100);
    }

    #[test]
    fn test_overflow_clamps_to_500_for_every_pollutant() {
        // Above the top row's high end the result is a clamp, never the
        // unavailable sentinel.
        assert_eq!(sub_index(Pollutant::O3, 0.7), 500);
        assert_eq!(sub_index(Pollutant::Pm25, 501.0), 500);
        assert_eq!(sub_index(Pollutant::Pm10, 700.0), 500);
        assert_eq!(sub_index(Pollutant::So2, 1200.0), 500);
        assert_eq!(sub_index(Pollutant::No2, 2100.0), 500);
        assert_eq!(sub_index(Pollutant::Co, 55.0), 500);
    }

    #[test]
    fn test_below_lowest_bound_is_unavailable() {
        for p in Pollutant::ALL {
            assert_eq!(sub_index(p, -0.1), AQI_UNAVAILABLE, "{:?}", p);
        }
        assert_eq!(sub_index(Pollutant::Pm25, f64::NAN), AQI_UNAVAILABLE);
    }

    #[test]
    fn test_ozone_gap_between_8h_and_1h_rows_is_unavailable() {
        // 0.200 < c < 0.405 ppm falls between the 8-hour table's top and
        // the 1-hour-derived rows.
        assert_eq!(sub_index(Pollutant::O3, 0.3), AQI_UNAVAILABLE);
        assert_eq!(sub_index(Pollutant::O3, 0.200), 300);
        assert_eq!(sub_index(Pollutant::O3, 0.405), 301);
    }

    #[test]
    fn test_sub_index_is_monotonic_within_tabulated_ranges() {
        for p in Pollutant::ALL {
            let mut prev = 0;
            let top = table(p).last().unwrap().conc_high;
            let mut c = 0.0;
            while c <= top * 1.1 {
                let idx = sub_index(p, c);
                if idx >= 0 {
                    assert!(
                        idx >= prev,
                        "{:?}: sub_index decreased at c={} ({} < {})",
                        p,
                        c,
                        idx,
                        prev
                    );
                    prev = idx;
                }
                c += top / 1000.0;
            }
        }
    }
}
