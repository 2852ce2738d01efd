//! Core domain types for building footprint acquisition.
//!
//! These models provide basic validation to keep downstream
//! components honest. Constructors return `Result` to surface
//! invalid input early.
//!
//! Coordinates are WGS84 throughout, with `x = longitude` and
//! `y = latitude`.

#![forbid(unsafe_code)]

pub mod bounds;
pub mod building;
pub mod collection;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use bounds::{GeoBounds, GeoBoundsError};
pub use building::{
    BuildingAttributes, BuildingFeature, DEFAULT_BUILDING_TYPE, Footprint, FootprintError,
    MIN_FOOTPRINT_VERTICES,
};
pub use collection::{
    Crs, EmptyResultPolicy, FeatureCollection, FeatureCollectionError, ParsePolicyError,
};
