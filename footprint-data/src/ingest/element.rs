//! Conversion of raw Overpass elements into footprint candidates.

use footprint_core::{BuildingAttributes, BuildingFeature, Footprint, FootprintError};
use geo::Coord;
use thiserror::Error;

use super::tags::building_attributes;
use crate::overpass::{RawElement, RawGeometry, RawVertex};

/// Why an element produced no building.
///
/// Rejections are per element and never abort a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ElementRejection {
    /// The element carried no usable geometry.
    #[error("element {osm_id} has no geometry")]
    MissingGeometry {
        /// Element identifier.
        osm_id: i64,
    },
    /// The geometry field could not be read as a vertex list.
    #[error("element {osm_id} has malformed geometry")]
    MalformedGeometry {
        /// Element identifier.
        osm_id: i64,
    },
    /// The geometry had fewer than three vertices.
    #[error("element {osm_id} has only {vertices} vertices")]
    DegenerateGeometry {
        /// Element identifier.
        osm_id: i64,
        /// Number of vertices present.
        vertices: usize,
    },
    /// The element is neither a way nor a relation.
    #[error("element type is not a way or relation")]
    UnsupportedKind,
}

/// A parsed element whose geometry and attributes have been validated.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintCandidate {
    /// OpenStreetMap identifier, taken verbatim.
    pub osm_id: i64,
    /// Outer ring as supplied by the source.
    pub footprint: Footprint,
    /// Normalised tag values.
    pub attributes: BuildingAttributes,
}

impl FootprintCandidate {
    /// Combine the parsed parts into an immutable feature.
    #[must_use]
    pub fn assemble(self) -> BuildingFeature {
        BuildingFeature::new(self.osm_id, self.footprint, self.attributes)
    }
}

/// Parse one raw element into a footprint candidate.
///
/// Vertices are passed through unchanged, including a closing vertex when the
/// source repeats the first point.
///
/// # Errors
///
/// Returns an [`ElementRejection`] when the element has no readable geometry,
/// has fewer than three vertices or is not a way or relation. Relations are
/// read from their own `geometry` field only.
///
/// # Examples
/// ```
/// use footprint_data::ingest::{ElementRejection, parse_element};
/// use footprint_data::overpass::RawElement;
///
/// let element: RawElement = serde_json::from_str(r#"{"type": "way", "id": 9}"#)?;
/// assert_eq!(
///     parse_element(&element),
///     Err(ElementRejection::MissingGeometry { osm_id: 9 })
/// );
/// # Ok::<(), serde_json::Error>(())
/// ```
pub fn parse_element(element: &RawElement) -> Result<FootprintCandidate, ElementRejection> {
    let osm_id = element.id().ok_or(ElementRejection::UnsupportedKind)?;
    let geometry = match element.geometry() {
        None => return Err(ElementRejection::MissingGeometry { osm_id }),
        Some(RawGeometry::Malformed { .. }) => {
            return Err(ElementRejection::MalformedGeometry { osm_id });
        }
        Some(RawGeometry::Vertices(vertices)) => vertices,
    };
    let vertices: Vec<Coord<f64>> = geometry.iter().map(vertex_to_coord).collect();
    let footprint = Footprint::new(vertices).map_err(|err| match err {
        FootprintError::TooFewVertices { count } => ElementRejection::DegenerateGeometry {
            osm_id,
            vertices: count,
        },
    })?;
    let attributes = element.tags().map_or_else(BuildingAttributes::default, |tags| {
        building_attributes(tags.iter().map(|(key, value)| (key.as_str(), value.as_str())))
    });
    Ok(FootprintCandidate {
        osm_id,
        footprint,
        attributes,
    })
}

const fn vertex_to_coord(vertex: &RawVertex) -> Coord<f64> {
    Coord {
        x: vertex.lon,
        y: vertex.lat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn element(json: &str) -> RawElement {
        serde_json::from_str(json).expect("valid element JSON")
    }

    #[rstest]
    fn two_vertices_are_degenerate_three_are_accepted() {
        let two = element(
            r#"{"type": "way", "id": 1,
                "geometry": [{"lat": 0.0, "lon": 0.0}, {"lat": 0.0, "lon": 1.0}]}"#,
        );
        let three = element(
            r#"{"type": "way", "id": 1,
                "geometry": [{"lat": 0.0, "lon": 0.0}, {"lat": 0.0, "lon": 1.0},
                             {"lat": 1.0, "lon": 1.0}]}"#,
        );

        assert_eq!(
            parse_element(&two),
            Err(ElementRejection::DegenerateGeometry {
                osm_id: 1,
                vertices: 2
            })
        );
        let candidate = parse_element(&three).expect("three vertices suffice");
        assert_eq!(candidate.footprint.vertex_count(), 3);
    }

    #[rstest]
    #[case(r#"{"type": "way", "id": 2}"#)]
    #[case(r#"{"type": "way", "id": 2, "geometry": null}"#)]
    #[case(r#"{"type": "relation", "id": 2, "members": [{"role": "inner",
               "geometry": [{"lat": 0.0, "lon": 0.0}, {"lat": 0.0, "lon": 1.0},
                            {"lat": 1.0, "lon": 1.0}]}]}"#)]
    fn elements_without_geometry_are_rejected(#[case] json: &str) {
        assert_eq!(
            parse_element(&element(json)),
            Err(ElementRejection::MissingGeometry { osm_id: 2 })
        );
    }

    #[rstest]
    fn untagged_element_gets_default_attributes() {
        let candidate = parse_element(&element(
            r#"{"type": "way", "id": 3,
                "geometry": [{"lat": 0.0, "lon": 0.0}, {"lat": 0.0, "lon": 1.0},
                             {"lat": 1.0, "lon": 1.0}]}"#,
        ))
        .expect("valid element");

        assert_eq!(candidate.attributes.building_type, "yes");
        assert_eq!(candidate.attributes.building_levels, None);
        assert_eq!(candidate.attributes.name, None);
    }

    #[rstest]
    fn vertices_pass_through_unchanged() {
        let candidate = parse_element(&element(
            r#"{"type": "way", "id": -4,
                "geometry": [{"lat": 51.45, "lon": -2.59}, {"lat": 51.45, "lon": -2.58},
                             {"lat": 51.46, "lon": -2.58}, {"lat": 51.45, "lon": -2.59}],
                "tags": {"building": "house", "building:levels": "2"}}"#,
        ))
        .expect("valid element");

        assert_eq!(candidate.osm_id, -4);
        assert_eq!(
            candidate.footprint.vertices(),
            &[
                Coord { x: -2.59, y: 51.45 },
                Coord { x: -2.58, y: 51.45 },
                Coord { x: -2.58, y: 51.46 },
                Coord { x: -2.59, y: 51.45 },
            ]
        );
        let feature = candidate.assemble();
        assert_eq!(feature.building_type(), "house");
        assert_eq!(feature.building_levels(), Some("2"));
        assert_eq!(feature.name(), None);
    }

    #[rstest]
    fn relation_with_split_outer_ring_is_rejected() {
        let relation = element(
            r#"{"type": "relation", "id": 5,
                "members": [
                    {"type": "way", "ref": 10, "role": "outer",
                     "geometry": [{"lat": 0.0, "lon": 0.0}, {"lat": 0.0, "lon": 1.0},
                                  {"lat": 1.0, "lon": 1.0}]},
                    {"type": "way", "ref": 11, "role": "outer",
                     "geometry": [{"lat": 1.0, "lon": 1.0}, {"lat": 1.0, "lon": 0.0},
                                  {"lat": 0.0, "lon": 0.0}]}
                ],
                "tags": {"building": "church", "type": "multipolygon"}}"#,
        );

        assert_eq!(
            parse_element(&relation),
            Err(ElementRejection::MissingGeometry { osm_id: 5 })
        );
    }

    #[rstest]
    fn relation_uses_its_own_geometry() {
        let candidate = parse_element(&element(
            r#"{"type": "relation", "id": 6,
                "geometry": [{"lat": 0.0, "lon": 0.0}, {"lat": 0.0, "lon": 2.0},
                             {"lat": 2.0, "lon": 2.0}, {"lat": 2.0, "lon": 0.0}],
                "tags": {"building": "church", "type": "multipolygon"}}"#,
        ))
        .expect("valid relation");

        assert_eq!(candidate.footprint.vertex_count(), 4);
        assert_eq!(candidate.attributes.building_type, "church");
    }

    #[rstest]
    #[case(r#"{"type": "way", "id": 8, "geometry": [{"lat": 0.0},
               {"lat": 0.0, "lon": 1.0}, {"lat": 1.0, "lon": 1.0}]}"#)]
    #[case(r#"{"type": "way", "id": 8, "geometry": [{"lat": "north", "lon": 0.0},
               {"lat": 0.0, "lon": 1.0}, {"lat": 1.0, "lon": 1.0}]}"#)]
    #[case(r#"{"type": "relation", "id": 8, "geometry": {"lat": 0.0, "lon": 0.0}}"#)]
    fn elements_with_malformed_geometry_are_rejected(#[case] json: &str) {
        assert_eq!(
            parse_element(&element(json)),
            Err(ElementRejection::MalformedGeometry { osm_id: 8 })
        );
    }

    #[rstest]
    fn unsupported_elements_are_rejected() {
        assert_eq!(
            parse_element(&RawElement::Unsupported),
            Err(ElementRejection::UnsupportedKind)
        );
    }
}
