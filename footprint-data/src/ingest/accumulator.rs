//! Ordered accumulation of parsed buildings into a feature collection.
//!
//! Elements are processed one at a time in response order; the resulting
//! collection keeps that order.
use footprint_core::{EmptyResultPolicy, FeatureCollection};
use log::{debug, warn};

use super::element::{ElementRejection, parse_element};
use super::{IngestError, IngestReport, IngestSummary};
use crate::overpass::RawElement;

/// Collects features from raw elements and counts what was dropped.
#[derive(Debug, Default)]
pub struct FootprintAccumulator {
    summary: IngestSummary,
    collection: FeatureCollection,
}

impl FootprintAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one element and keep the resulting feature, if any.
    ///
    /// Rejected elements are logged at debug level and counted. A feature
    /// whose `osm_id` was already accepted is dropped with a warning.
    pub fn process_element(&mut self, element: &RawElement) {
        self.summary.record_kind(element);
        let candidate = match parse_element(element) {
            Ok(candidate) => candidate,
            Err(rejection) => {
                debug!("skipping {rejection}");
                self.summary.record_rejection(rejection);
                return;
            }
        };
        let osm_id = candidate.osm_id;
        if self.collection.insert(candidate.assemble()) {
            self.summary.features += 1;
        } else {
            warn!("dropping duplicate building {osm_id}");
            self.summary.duplicates += 1;
        }
    }

    /// Counts gathered so far.
    #[must_use]
    pub const fn summary(&self) -> &IngestSummary {
        &self.summary
    }

    /// Hand over the accepted features.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::EmptyResult`] when no feature was accepted and
    /// `policy` is [`EmptyResultPolicy::Fail`].
    pub fn finish(self, policy: EmptyResultPolicy) -> Result<IngestReport, IngestError> {
        let Self {
            summary,
            collection,
        } = self;
        if collection.is_empty() && policy == EmptyResultPolicy::Fail {
            return Err(IngestError::EmptyResult { summary });
        }
        Ok(IngestReport {
            summary,
            collection,
        })
    }
}

impl IngestSummary {
    fn record_kind(&mut self, element: &RawElement) {
        self.elements += 1;
        match element {
            RawElement::Way(_) => self.ways += 1,
            RawElement::Relation(_) => self.relations += 1,
            RawElement::Unsupported => {}
        }
    }

    fn record_rejection(&mut self, rejection: ElementRejection) {
        match rejection {
            ElementRejection::MissingGeometry { .. } => self.missing_geometry += 1,
            ElementRejection::MalformedGeometry { .. } => self.malformed_geometry += 1,
            ElementRejection::DegenerateGeometry { .. } => self.degenerate_geometry += 1,
            ElementRejection::UnsupportedKind => self.unsupported += 1,
        }
    }
}
