//! Normalisation of Overpass elements into building features.
//!
//! [`parse_element`] validates one element, [`FootprintCandidate::assemble`]
//! turns it into a [`BuildingFeature`](footprint_core::BuildingFeature) and
//! [`FootprintAccumulator`] gathers the results into a
//! [`FeatureCollection`].

use std::fmt;

use footprint_core::{EmptyResultPolicy, FeatureCollection};
use thiserror::Error;

mod accumulator;
mod element;
mod tags;

pub use accumulator::FootprintAccumulator;
pub use element::{ElementRejection, FootprintCandidate, parse_element};

use crate::overpass::RawElement;

/// Counts of elements seen and dropped during one ingest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestSummary {
    /// Elements received.
    pub elements: u64,
    /// Ways received.
    pub ways: u64,
    /// Relations received.
    pub relations: u64,
    /// Elements of any other type.
    pub unsupported: u64,
    /// Ways or relations without geometry.
    pub missing_geometry: u64,
    /// Ways or relations whose geometry could not be read.
    pub malformed_geometry: u64,
    /// Ways or relations with fewer than three vertices.
    pub degenerate_geometry: u64,
    /// Valid elements dropped because their id was already accepted.
    pub duplicates: u64,
    /// Features kept.
    pub features: u64,
}

impl IngestSummary {
    /// Elements that produced no feature for any reason.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.unsupported
            + self.missing_geometry
            + self.malformed_geometry
            + self.degenerate_geometry
            + self.duplicates
    }
}

impl fmt::Display for IngestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} buildings from {} elements ({} missing geometry, {} malformed, {} degenerate, {} duplicate, {} unsupported)",
            self.features,
            self.elements,
            self.missing_geometry,
            self.malformed_geometry,
            self.degenerate_geometry,
            self.duplicates,
            self.unsupported
        )
    }
}

/// Result of a successful ingest run.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    /// Element counts.
    pub summary: IngestSummary,
    /// Accepted features in parse order.
    pub collection: FeatureCollection,
}

/// Errors returned when finishing an ingest run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// No element produced a usable building and empty results are not allowed.
    #[error("no usable buildings: {summary}")]
    EmptyResult {
        /// Counts explaining why every element was dropped.
        summary: IngestSummary,
    },
}

/// Parse every element in order and build the collection.
///
/// # Errors
///
/// See [`FootprintAccumulator::finish`].
///
/// # Examples
/// ```
/// use footprint_core::EmptyResultPolicy;
/// use footprint_data::ingest::ingest_elements;
/// use footprint_data::overpass::decode_body;
///
/// let response = decode_body("https://a.example/api", r#"{"elements": [
///     {"type": "way", "id": 1, "geometry": [
///         {"lat": 0.0, "lon": 0.0}, {"lat": 0.0, "lon": 1.0}, {"lat": 1.0, "lon": 1.0}
///     ]},
///     {"type": "way", "id": 2}
/// ]}"#)?;
/// let report = ingest_elements(&response.elements, EmptyResultPolicy::Fail)?;
/// assert_eq!(report.collection.len(), 1);
/// assert_eq!(report.summary.missing_geometry, 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn ingest_elements(
    elements: &[RawElement],
    policy: EmptyResultPolicy,
) -> Result<IngestReport, IngestError> {
    let mut accumulator = FootprintAccumulator::new();
    for element in elements {
        accumulator.process_element(element);
    }
    accumulator.finish(policy)
}
