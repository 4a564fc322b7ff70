/// WAQI map-bounds data client.
///
/// WAQI delivers station AQI values already computed upstream, so parsing
/// produces `SiteData::Precomputed` sites directly - the normalization,
/// interpolation, and aggregation stages are bypassed for this mode and
/// only feature building applies.
///
/// API documentation: https://aqicn.org/json-api/doc/

use crate::ingest::IngestError;
use crate::logging::{self, DataSource};
use crate::model::{Site, SiteData};
use chrono::{DateTime, Utc};
use serde::Deserialize;

// ============================================================================
// WAQI API Response Structures
// ============================================================================

/// Top-level `/map/bounds` response. `status` is "ok" on success and an
/// error word otherwise (e.g. "error" with a token problem).
#[derive(Debug, Deserialize)]
pub struct WaqiMapResponse {
    pub status: String,
    #[serde(default)]
    pub data: Vec<WaqiStation>,
}

/// One station inside the requested bounding box. `aqi` arrives as a
/// string and may be "-" for stations that are currently not reporting.
#[derive(Debug, Deserialize)]
pub struct WaqiStation {
    pub lat: f64,
    pub lon: f64,
    pub aqi: String,
    #[serde(default)]
    pub station: Option<WaqiStationInfo>,
}

#[derive(Debug, Deserialize)]
pub struct WaqiStationInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses a `/map/bounds` response body into pre-computed-AQI sites.
///
/// Stations whose `aqi` is not a non-negative integer ("-", garbage, or a
/// negative sentinel) are dropped silently, logged at debug level.
pub fn parse_map_response(body: &str) -> Result<Vec<Site>, IngestError> {
    let response: WaqiMapResponse =
        serde_json::from_str(body).map_err(|e| IngestError::ParseError(e.to_string()))?;

    if response.status != "ok" {
        return Err(IngestError::NoData(format!(
            "upstream status '{}'",
            response.status
        )));
    }

    let mut sites = Vec::with_capacity(response.data.len());
    for entry in response.data {
        let name = entry
            .station
            .as_ref()
            .and_then(|s| s.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let Ok(aqi) = entry.aqi.parse::<i32>() else {
            logging::debug(
                DataSource::Waqi,
                Some(&name),
                &format!("dropping station with non-numeric aqi '{}'", entry.aqi),
            );
            continue;
        };
        if aqi < 0 {
            logging::debug(DataSource::Waqi, Some(&name), "dropping negative aqi");
            continue;
        }

        let last_updated = entry
            .station
            .as_ref()
            .and_then(|s| s.time.as_deref())
            .and_then(parse_timestamp);

        sites.push(Site {
            id: name.clone(),
            name,
            city: None,
            latitude: entry.lat,
            longitude: entry.lon,
            data: SiteData::Precomputed { aqi },
            last_updated,
        });
    }
    Ok(sites)
}

/// WAQI station times are RFC 3339 with a local offset, e.g.
/// "2024-05-01T21:00:00+09:00".
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ============================================================================
// URL construction / live fetch
// ============================================================================

/// Builds a `/map/bounds` request URL. Corners are `[longitude, latitude]`
/// (matching the rest of the crate); the WAQI query wants lat,lng order.
pub fn build_bounds_url(base_url: &str, token: &str, sw: [f64; 2], ne: [f64; 2]) -> String {
    format!(
        "{}/map/bounds/?latlng={},{},{},{}&token={}",
        base_url, sw[1], sw[0], ne[1], ne[0], token
    )
}

/// Fetches and parses all stations inside a bounding box.
#[cfg(feature = "fetch")]
pub fn fetch_bounds(
    client: &reqwest::blocking::Client,
    base_url: &str,
    token: &str,
    sw: [f64; 2],
    ne: [f64; 2],
) -> Result<Vec<Site>, IngestError> {
    let url = build_bounds_url(base_url, token, sw, ne);

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| IngestError::ParseError(e.to_string()))?;

    if !response.status().is_success() {
        return Err(IngestError::HttpError(response.status().as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| IngestError::ParseError(e.to_string()))?;
    let sites = parse_map_response(&body)?;
    logging::info(
        DataSource::Waqi,
        None,
        &format!("fetched {} stations in bounds", sites.len()),
    );
    Ok(sites)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const SAMPLE: &str = r#"{
        "status": "ok",
        "data": [
            { "lat": 35.69, "lon": 139.70, "aqi": "42",
              "station": { "name": "Shinjuku", "time": "2024-05-01T21:00:00+09:00" } },
            { "lat": 35.66, "lon": 139.73, "aqi": "-",
              "station": { "name": "Offline" } },
            { "lat": 35.44, "lon": 139.64, "aqi": "155" }
        ]
    }"#;

    #[test]
    fn test_parse_map_response_builds_precomputed_sites() {
        let sites = parse_map_response(SAMPLE).expect("sample should parse");
        assert_eq!(sites.len(), 2);

        assert_eq!(sites[0].name, "Shinjuku");
        assert_eq!(sites[0].data, SiteData::Precomputed { aqi: 42 });
        // 21:00 +09:00 is 12:00 UTC.
        assert_eq!(
            sites[0].last_updated,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
        );

        assert_eq!(sites[1].name, "Unknown");
        assert_eq!(sites[1].data, SiteData::Precomputed { aqi: 155 });
        assert_eq!(sites[1].last_updated, None);
    }

    #[test]
    fn test_non_numeric_aqi_stations_are_dropped() {
        let sites = parse_map_response(SAMPLE).unwrap();
        assert!(sites.iter().all(|s| s.name != "Offline"));
    }

    #[test]
    fn test_error_status_is_surfaced() {
        let body = r#"{ "status": "error", "data": [] }"#;
        let result = parse_map_response(body);
        assert!(matches!(result, Err(IngestError::NoData(_))));
    }

    #[test]
    fn test_malformed_body_is_a_parse_error() {
        assert!(matches!(
            parse_map_response("<html>"),
            Err(IngestError::ParseError(_))
        ));
    }

    #[test]
    fn test_build_bounds_url_swaps_to_lat_lng_order() {
        let url = build_bounds_url(
            "https://api.waqi.info",
            "demo",
            [139.5, 35.4],
            [139.9, 35.8],
        );
        assert_eq!(
            url,
            "https://api.waqi.info/map/bounds/?latlng=35.4,139.5,35.8,139.9&token=demo"
        );
    }
}
