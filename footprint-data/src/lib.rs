//! Building footprint acquisition from Overpass mirrors.
//!
//! Responsibilities:
//! - Render the bounded building query and fetch it with ordered mirror
//!   failover.
//! - Normalise Overpass elements into validated building features.
//! - Persist the resulting collection as a single GeoJSON artefact.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `footprint-core`).
//! - Keep the pipeline synchronous; the HTTP transport bridges to async
//!   internally.
//!
//! Invariants:
//! - Mirrors are tried strictly in order and each at most once per run.
//! - Collection order is the order in which elements parsed successfully.
//! - Nothing is written unless a collection was produced.

use std::time::Duration;

use footprint_core::{EmptyResultPolicy, FeatureCollection, GeoBounds};
use log::info;
use thiserror::Error;

pub mod export;
pub mod ingest;
pub mod overpass;

pub use export::{ExportError, to_geojson, write_geojson};
pub use ingest::{IngestError, IngestReport, IngestSummary, ingest_elements};
pub use overpass::{
    FetchError, HttpOverpassTransport, HttpTransportConfig, MirrorEndpoint, MirrorFetcher,
    OverpassQuery, OverpassTransport,
};

/// Inputs for one acquisition run.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectRequest {
    /// Area to query.
    pub bounds: GeoBounds,
    /// Mirrors in attempt order.
    pub mirrors: Vec<MirrorEndpoint>,
    /// Server-side query budget sent in the query header.
    pub server_timeout: Duration,
    /// Treatment of a run that yields no buildings.
    pub empty_result: EmptyResultPolicy,
}

impl CollectRequest {
    /// Request the given area from the default mirrors with default settings.
    #[must_use]
    pub fn new(bounds: GeoBounds) -> Self {
        Self {
            bounds,
            mirrors: MirrorEndpoint::defaults(),
            server_timeout: overpass::DEFAULT_SERVER_TIMEOUT,
            empty_result: EmptyResultPolicy::default(),
        }
    }
}

/// Outcome of a successful acquisition run.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectReport {
    /// Buildings in parse order.
    pub collection: FeatureCollection,
    /// Element counts for the run.
    pub summary: IngestSummary,
    /// Mirror that served the data.
    pub endpoint: MirrorEndpoint,
}

/// Fatal errors of an acquisition run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectError {
    /// Every mirror failed.
    #[error(transparent)]
    ExhaustedMirrors(#[from] FetchError),
    /// The data contained no usable building.
    #[error("no usable buildings: {summary}")]
    EmptyResult {
        /// Counts explaining why every element was dropped.
        summary: IngestSummary,
    },
}

impl From<IngestError> for CollectError {
    fn from(err: IngestError) -> Self {
        let IngestError::EmptyResult { summary } = err;
        Self::EmptyResult { summary }
    }
}

/// Query, fetch and normalise the buildings inside `request.bounds`.
///
/// # Errors
///
/// Returns [`CollectError::ExhaustedMirrors`] when no mirror answers and
/// [`CollectError::EmptyResult`] when nothing usable came back under
/// [`EmptyResultPolicy::Fail`].
///
/// # Examples
/// ```
/// use footprint_core::GeoBounds;
/// use footprint_data::overpass::test_support::ScriptedTransport;
/// use footprint_data::{CollectRequest, MirrorEndpoint, collect_buildings};
///
/// let mut request = CollectRequest::new(GeoBounds::new(1.0, 0.0, 1.0, 0.0)?);
/// request.mirrors = vec![MirrorEndpoint::parse("https://a.example/api")?];
/// let transport = ScriptedTransport::new().with_json(
///     "https://a.example/api",
///     r#"{"elements": [{"type": "way", "id": 5, "geometry": [
///         {"lat": 0.1, "lon": 0.1}, {"lat": 0.1, "lon": 0.2}, {"lat": 0.2, "lon": 0.2}
///     ]}]}"#,
/// );
///
/// let report = collect_buildings(&request, &transport)?;
/// assert_eq!(report.collection.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn collect_buildings<T>(
    request: &CollectRequest,
    transport: &T,
) -> Result<CollectReport, CollectError>
where
    T: OverpassTransport + ?Sized,
{
    let query = OverpassQuery::buildings_with_timeout(&request.bounds, request.server_timeout);
    let fetched = MirrorFetcher::new(request.mirrors.clone()).fetch(transport, &query)?;
    let report = ingest_elements(&fetched.response.elements, request.empty_result)?;
    log_summary(&report);
    Ok(CollectReport {
        collection: report.collection,
        summary: report.summary,
        endpoint: fetched.endpoint,
    })
}

fn log_summary(report: &IngestReport) {
    info!("built {}", report.summary);
    for (building_type, count) in report.collection.building_type_counts() {
        info!("  {building_type}: {count}");
    }
}
