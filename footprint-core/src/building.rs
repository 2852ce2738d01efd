//! Building footprints and their normalised attributes.

use geo::{Coord, LineString, Polygon};
use thiserror::Error;

/// Building type recorded when an element carries no `building` value.
pub const DEFAULT_BUILDING_TYPE: &str = "yes";

/// Smallest number of vertices accepted for a footprint ring.
pub const MIN_FOOTPRINT_VERTICES: usize = 3;

/// Errors returned by [`Footprint::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FootprintError {
    /// Fewer than [`MIN_FOOTPRINT_VERTICES`] vertices were supplied.
    #[error("footprint needs at least 3 vertices, got {count}")]
    TooFewVertices {
        /// Number of vertices supplied.
        count: usize,
    },
}

/// The outer ring of a building, exactly as the data source described it.
///
/// Vertex order, winding and closure are preserved. No repair is attempted;
/// the only guarantee is that at least three vertices are present.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use footprint_core::Footprint;
///
/// # fn main() -> Result<(), footprint_core::FootprintError> {
/// let footprint = Footprint::new(vec![
///     Coord { x: -2.59, y: 51.45 },
///     Coord { x: -2.58, y: 51.45 },
///     Coord { x: -2.58, y: 51.46 },
/// ])?;
/// assert_eq!(footprint.vertex_count(), 3);
/// assert!(!footprint.is_closed());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Footprint(LineString<f64>);

impl Footprint {
    /// Validates the vertex count and wraps the ring.
    ///
    /// # Errors
    ///
    /// Returns [`FootprintError::TooFewVertices`] when fewer than three
    /// vertices are supplied.
    pub fn new(vertices: Vec<Coord<f64>>) -> Result<Self, FootprintError> {
        if vertices.len() < MIN_FOOTPRINT_VERTICES {
            return Err(FootprintError::TooFewVertices {
                count: vertices.len(),
            });
        }
        Ok(Self(LineString::new(vertices)))
    }

    /// Vertices in source order.
    #[must_use]
    pub fn vertices(&self) -> &[Coord<f64>] {
        &self.0.0
    }

    /// Number of vertices in the ring, including any closing vertex.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.0.0.len()
    }

    /// Whether the first and last vertices coincide.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }

    /// Borrow the ring as a `geo` line string.
    #[must_use]
    pub const fn as_line_string(&self) -> &LineString<f64> {
        &self.0
    }

    /// Build a polygon from the ring.
    ///
    /// `geo` closes the exterior ring when it is open, so the result may hold
    /// one more vertex than [`Footprint::vertices`].
    #[must_use]
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(self.0.clone(), Vec::new())
    }
}

/// Normalised building attributes extracted from source tags.
///
/// `building_levels` and `name` stay `None` when the source omitted them;
/// they are never defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BuildingAttributes {
    /// Value of the `building` tag, or [`DEFAULT_BUILDING_TYPE`].
    pub building_type: String,
    /// Value of the `building:levels` tag, if present.
    pub building_levels: Option<String>,
    /// Value of the `name` tag, if present.
    pub name: Option<String>,
}

impl Default for BuildingAttributes {
    fn default() -> Self {
        Self {
            building_type: DEFAULT_BUILDING_TYPE.to_owned(),
            building_levels: None,
            name: None,
        }
    }
}

/// A validated building record, immutable once assembled.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use footprint_core::{BuildingAttributes, BuildingFeature, Footprint};
///
/// # fn main() -> Result<(), footprint_core::FootprintError> {
/// let footprint = Footprint::new(vec![
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 1.0, y: 0.0 },
///     Coord { x: 1.0, y: 1.0 },
/// ])?;
/// let feature = BuildingFeature::new(42, footprint, BuildingAttributes::default());
/// assert_eq!(feature.osm_id(), 42);
/// assert_eq!(feature.building_type(), "yes");
/// assert_eq!(feature.name(), None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BuildingFeature {
    osm_id: i64,
    footprint: Footprint,
    attributes: BuildingAttributes,
}

impl BuildingFeature {
    /// Combine an identifier, a footprint and its attributes.
    #[must_use]
    pub const fn new(osm_id: i64, footprint: Footprint, attributes: BuildingAttributes) -> Self {
        Self {
            osm_id,
            footprint,
            attributes,
        }
    }

    /// OpenStreetMap identifier of the source element.
    #[must_use]
    pub const fn osm_id(&self) -> i64 {
        self.osm_id
    }

    /// The building outline.
    #[must_use]
    pub const fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// All normalised attributes.
    #[must_use]
    pub const fn attributes(&self) -> &BuildingAttributes {
        &self.attributes
    }

    /// Building type, `"yes"` when the source did not classify it.
    #[must_use]
    pub fn building_type(&self) -> &str {
        &self.attributes.building_type
    }

    /// Number of levels as tagged, if tagged.
    #[must_use]
    pub fn building_levels(&self) -> Option<&str> {
        self.attributes.building_levels.as_deref()
    }

    /// Name as tagged, if tagged.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.attributes.name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn open_square() -> Vec<Coord<f64>> {
        vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
            Coord { x: 0.0, y: 1.0 },
        ]
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    fn footprint_rejects_degenerate_rings(open_square: Vec<Coord<f64>>, #[case] count: usize) {
        let vertices: Vec<_> = open_square.into_iter().take(count).collect();
        let err = Footprint::new(vertices).expect_err("degenerate ring");
        assert_eq!(err, FootprintError::TooFewVertices { count });
    }

    #[rstest]
    fn footprint_preserves_vertices_verbatim(open_square: Vec<Coord<f64>>) {
        let footprint = Footprint::new(open_square.clone()).expect("valid ring");
        assert_eq!(footprint.vertices(), open_square.as_slice());
        assert_eq!(footprint.vertex_count(), 4);
        assert!(!footprint.is_closed(), "open ring must not be closed");
    }

    #[rstest]
    fn polygon_conversion_closes_open_rings(open_square: Vec<Coord<f64>>) {
        let footprint = Footprint::new(open_square).expect("valid ring");
        let polygon = footprint.to_polygon();
        assert_eq!(polygon.exterior().0.len(), 5);
        assert_eq!(footprint.vertex_count(), 4, "source ring is untouched");
    }

    #[rstest]
    fn default_attributes_mark_missing_values() {
        let attributes = BuildingAttributes::default();
        assert_eq!(attributes.building_type, DEFAULT_BUILDING_TYPE);
        assert!(attributes.building_levels.is_none());
        assert!(attributes.name.is_none());
    }

    #[rstest]
    fn feature_exposes_attributes(open_square: Vec<Coord<f64>>) {
        let attributes = BuildingAttributes {
            building_type: "house".to_owned(),
            building_levels: Some("2".to_owned()),
            name: Some("Corner House".to_owned()),
        };
        let footprint = Footprint::new(open_square).expect("valid ring");
        let feature = BuildingFeature::new(7, footprint, attributes);
        assert_eq!(feature.osm_id(), 7);
        assert_eq!(feature.building_type(), "house");
        assert_eq!(feature.building_levels(), Some("2"));
        assert_eq!(feature.name(), Some("Corner House"));
    }
}
