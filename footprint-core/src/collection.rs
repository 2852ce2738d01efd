//! Ordered collections of building features.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::BuildingFeature;

/// Coordinate reference system attached to a [`FeatureCollection`].
///
/// Only WGS84 longitude/latitude is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Crs {
    /// WGS84 geographic coordinates (EPSG:4326).
    #[default]
    Wgs84,
}

impl Crs {
    /// EPSG registry code.
    #[must_use]
    pub const fn epsg_code(self) -> u32 {
        match self {
            Self::Wgs84 => 4326,
        }
    }

    /// Short `AUTHORITY:CODE` identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wgs84 => "EPSG:4326",
        }
    }

    /// OGC URN form used by GeoJSON `crs` members.
    #[must_use]
    pub const fn urn(self) -> &'static str {
        match self {
            Self::Wgs84 => "urn:ogc:def:crs:EPSG::4326",
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a run treats a fetch that produced no usable buildings.
///
/// An empty result may mean the area genuinely has no buildings or that the
/// data source returned nothing usable. The two cases are indistinguishable
/// here, so the choice is left to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum EmptyResultPolicy {
    /// Treat an empty collection as a failed run.
    #[default]
    Fail,
    /// Accept an empty collection as a valid result.
    Allow,
}

/// Error returned when parsing an [`EmptyResultPolicy`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown empty-result policy {0:?} (expected `fail` or `allow`)")]
pub struct ParsePolicyError(pub String);

impl FromStr for EmptyResultPolicy {
    type Err = ParsePolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "allow" => Ok(Self::Allow),
            _ => Err(ParsePolicyError(value.to_owned())),
        }
    }
}

impl fmt::Display for EmptyResultPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => f.write_str("fail"),
            Self::Allow => f.write_str("allow"),
        }
    }
}

/// Errors returned by [`FeatureCollection::from_features`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureCollectionError {
    /// No features were supplied and the policy forbids empty results.
    #[error("feature collection is empty")]
    Empty,
    /// Two features shared an OpenStreetMap identifier.
    #[error("duplicate osm_id {osm_id} in feature collection")]
    DuplicateOsmId {
        /// The repeated identifier.
        osm_id: i64,
    },
}

/// The terminal output of a run: ordered features plus their CRS.
///
/// # Examples
///
/// ```
/// use footprint_core::{EmptyResultPolicy, FeatureCollection, FeatureCollectionError};
///
/// let err = FeatureCollection::from_features(Vec::new(), EmptyResultPolicy::Fail)
///     .expect_err("empty collections fail by default");
/// assert_eq!(err, FeatureCollectionError::Empty);
///
/// let empty = FeatureCollection::from_features(Vec::new(), EmptyResultPolicy::Allow)?;
/// assert!(empty.is_empty());
/// assert_eq!(empty.crs().epsg_code(), 4326);
/// # Ok::<(), FeatureCollectionError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FeatureCollection {
    crs: Crs,
    features: Vec<BuildingFeature>,
    #[cfg_attr(feature = "serde", serde(skip))]
    osm_ids: HashSet<i64>,
}

impl FeatureCollection {
    /// Validate and wrap features in their original order.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureCollectionError::Empty`] when `features` is empty and
    /// `policy` is [`EmptyResultPolicy::Fail`], or
    /// [`FeatureCollectionError::DuplicateOsmId`] when an identifier repeats.
    pub fn from_features(
        features: Vec<BuildingFeature>,
        policy: EmptyResultPolicy,
    ) -> Result<Self, FeatureCollectionError> {
        if features.is_empty() && policy == EmptyResultPolicy::Fail {
            return Err(FeatureCollectionError::Empty);
        }
        let mut collection = Self::new();
        for feature in features {
            let osm_id = feature.osm_id();
            if !collection.insert(feature) {
                return Err(FeatureCollectionError::DuplicateOsmId { osm_id });
            }
        }
        Ok(collection)
    }

    /// Create an empty WGS84 collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `feature` unless its `osm_id` is already present.
    ///
    /// Returns `false`, leaving the collection unchanged, for a repeated
    /// identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use footprint_core::{BuildingAttributes, BuildingFeature, FeatureCollection, Footprint};
    /// use geo::Coord;
    ///
    /// let ring = vec![
    ///     Coord { x: 0.0, y: 0.0 },
    ///     Coord { x: 1.0, y: 0.0 },
    ///     Coord { x: 1.0, y: 1.0 },
    /// ];
    /// let feature = BuildingFeature::new(7, Footprint::new(ring)?, BuildingAttributes::default());
    ///
    /// let mut collection = FeatureCollection::new();
    /// assert!(collection.insert(feature.clone()));
    /// assert!(!collection.insert(feature));
    /// assert_eq!(collection.len(), 1);
    /// # Ok::<(), footprint_core::FootprintError>(())
    /// ```
    pub fn insert(&mut self, feature: BuildingFeature) -> bool {
        if !self.osm_ids.insert(feature.osm_id()) {
            return false;
        }
        self.features.push(feature);
        true
    }

    /// Coordinate reference system of every footprint.
    #[must_use]
    pub const fn crs(&self) -> Crs {
        self.crs
    }

    /// Features in the order they were parsed.
    #[must_use]
    pub fn features(&self) -> &[BuildingFeature] {
        &self.features
    }

    /// Iterate over features in order.
    pub fn iter(&self) -> std::slice::Iter<'_, BuildingFeature> {
        self.features.iter()
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Count features per building type, sorted by type name.
    #[must_use]
    pub fn building_type_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for feature in &self.features {
            *counts.entry(feature.building_type()).or_insert(0) += 1;
        }
        counts
    }

    /// Consume the collection, returning its features.
    #[must_use]
    pub fn into_features(self) -> Vec<BuildingFeature> {
        self.features
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a BuildingFeature;
    type IntoIter = std::slice::Iter<'a, BuildingFeature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
