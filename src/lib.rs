//! Facade crate for the building footprint engine.
//!
//! This crate re-exports the core domain types and, behind the `http`
//! feature, the Overpass acquisition pipeline.

#![forbid(unsafe_code)]

pub use footprint_core::{
    BuildingAttributes, BuildingFeature, Crs, EmptyResultPolicy, FeatureCollection,
    FeatureCollectionError, Footprint, FootprintError, GeoBounds, GeoBoundsError,
};

#[cfg(feature = "http")]
pub use footprint_data::{
    CollectError, CollectReport, CollectRequest, ExportError, FetchError, HttpOverpassTransport,
    HttpTransportConfig, IngestSummary, MirrorEndpoint, MirrorFetcher, OverpassQuery,
    OverpassTransport, collect_buildings, to_geojson, write_geojson,
};
