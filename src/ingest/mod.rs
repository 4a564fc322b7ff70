/// Payload ingestion for the two upstream air quality APIs.
///
/// Parsing is pure: a JSON body string goes in, typed domain data comes
/// out. The live fetch helpers are behind the `fetch` cargo feature and
/// are a convenience around the same parsers - the pipeline itself never
/// performs I/O.
///
/// Submodules:
/// - `openaq` - OpenAQ `/v2/latest`-style payloads (raw measurements).
/// - `waqi` - WAQI map-bounds payloads (pre-computed station AQI).

pub mod openaq;
pub mod waqi;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or parsing an upstream payload.
///
/// These exist only at the ingest boundary; inside the pipeline every
/// error condition is data (the -1 sentinel), never an error value.
#[derive(Debug, PartialEq)]
pub enum IngestError {
    /// Non-2xx HTTP response from the upstream API.
    HttpError(u16),
    /// The response body could not be deserialized.
    ParseError(String),
    /// The payload was well-formed but reported an upstream error status
    /// or contained no usable entries.
    NoData(String),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::HttpError(code) => write!(f, "HTTP error: {}", code),
            IngestError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            IngestError::NoData(msg) => write!(f, "No data available: {}", msg),
        }
    }
}

impl std::error::Error for IngestError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formats() {
        assert_eq!(IngestError::HttpError(429).to_string(), "HTTP error: 429");
        assert_eq!(
            IngestError::NoData("empty results".to_string()).to_string(),
            "No data available: empty results"
        );
    }
}
