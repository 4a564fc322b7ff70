/// OpenAQ data client.
///
/// Parses `/v2/latest`-style payloads into per-site raw measurement sets
/// (the pipeline's raw input mode). Parameter codes outside the six
/// AQI-relevant pollutants are discarded here, at ingestion - never
/// carried downstream.
///
/// API documentation: https://docs.openaq.org/

use crate::ingest::IngestError;
use crate::logging::{self, DataSource};
use crate::model::{Pollutant, RawMeasurement, SiteMeasurements};
use chrono::{DateTime, Utc};
use serde::Deserialize;

// ============================================================================
// OpenAQ API Response Structures
// ============================================================================

/// Top-level `/v2/latest` response.
#[derive(Debug, Deserialize)]
pub struct OpenAqLatestResponse {
    pub results: Vec<OpenAqLocation>,
}

/// One observation location with its latest measurement per parameter.
#[derive(Debug, Deserialize)]
pub struct OpenAqLocation {
    pub location: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub coordinates: Option<OpenAqCoordinates>,
    #[serde(default)]
    pub measurements: Vec<OpenAqMeasurement>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAqCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct OpenAqMeasurement {
    pub parameter: String,
    pub value: f64,
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses a `/v2/latest` response body into per-site measurement sets.
///
/// Locations without coordinates or without any AQI-relevant measurement
/// are dropped silently (logged at debug level). Unparseable timestamps
/// degrade to `None` rather than rejecting the reading.
pub fn parse_latest_response(body: &str) -> Result<Vec<SiteMeasurements>, IngestError> {
    let response: OpenAqLatestResponse =
        serde_json::from_str(body).map_err(|e| IngestError::ParseError(e.to_string()))?;

    let mut sites = Vec::with_capacity(response.results.len());
    for location in response.results {
        let Some(coordinates) = location.coordinates else {
            logging::debug(
                DataSource::OpenAq,
                Some(&location.location),
                "dropping location without coordinates",
            );
            continue;
        };

        let mut measurements = Vec::with_capacity(location.measurements.len());
        for m in &location.measurements {
            let Some(parameter) = Pollutant::parse(&m.parameter) else {
                logging::debug(
                    DataSource::OpenAq,
                    Some(&location.location),
                    &format!("dropping non-AQI parameter '{}'", m.parameter),
                );
                continue;
            };
            measurements.push(RawMeasurement {
                parameter,
                value: m.value,
                observed_at: m.last_updated.as_deref().and_then(parse_timestamp),
            });
        }

        if measurements.is_empty() {
            logging::debug(
                DataSource::OpenAq,
                Some(&location.location),
                "dropping location with no AQI-relevant measurements",
            );
            continue;
        }

        sites.push(SiteMeasurements {
            id: location.location.clone(),
            name: location.location,
            city: location.city,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            measurements,
        });
    }
    Ok(sites)
}

/// OpenAQ timestamps are RFC 3339 with an offset, e.g.
/// "2024-05-01T12:00:00+00:00".
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ============================================================================
// URL construction / live fetch
// ============================================================================

/// Builds a `/v2/latest` request URL against the relay's base URL,
/// requesting all six AQI-relevant parameters for one country scope.
pub fn build_latest_url(base_url: &str, country_id: &str, limit: u32) -> String {
    let mut url = format!(
        "{}?path=/v2/latest&spatial=country&country_id={}&limit={}",
        base_url, country_id, limit
    );
    for pollutant in Pollutant::ALL {
        url.push_str("&parameter=");
        url.push_str(pollutant.code());
    }
    url
}

/// Fetches and parses the latest measurements for one country.
#[cfg(feature = "fetch")]
pub fn fetch_latest(
    client: &reqwest::blocking::Client,
    base_url: &str,
    country_id: &str,
    limit: u32,
) -> Result<Vec<SiteMeasurements>, IngestError> {
    let url = build_latest_url(base_url, country_id, limit);

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
    let sites = parse_latest_response(&body)?;
    logging::info(
        DataSource::OpenAq,
        None,
        &format!("fetched {} sites for country {}", sites.len(), country_id),
    );
    Ok(sites)
}

// ============================================================================
// Tests
// ============================================================================
