/// Air quality measurement pipeline.
///
/// Transforms raw pollutant measurements from public air quality APIs into
/// display-ready artifacts: EPA AQI sub-indices, map features, and chart
/// series. The pipeline is deterministic and pure - all I/O lives at the
/// ingest boundary (and only with the `fetch` feature enabled).
///
/// Stage order for raw input:
/// ingest -> normalize -> breakpoints -> aggregate -> render.
/// Pre-computed input (WAQI) skips straight from ingest to render.

pub mod aggregate;
pub mod breakpoints;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod render;
