//! Deterministic feature builders shared by unit and behaviour tests.

use geo::Coord;

use crate::{BuildingAttributes, BuildingFeature, Footprint};

/// Vertices of an open unit square anchored at the origin.
#[must_use]
pub fn unit_square() -> Vec<Coord<f64>> {
    vec![
        Coord { x: 0.0, y: 0.0 },
        Coord { x: 1.0, y: 0.0 },
        Coord { x: 1.0, y: 1.0 },
        Coord { x: 0.0, y: 1.0 },
    ]
}

/// A unit-square building with the given identifier and type.
///
/// # Panics
///
/// Never in practice; the unit square always satisfies the vertex minimum.
#[must_use]
#[expect(
    clippy::expect_used,
    reason = "the fixed unit square is always a valid footprint"
)]
pub fn feature_with_type(osm_id: i64, building_type: &str) -> BuildingFeature {
    let footprint = Footprint::new(unit_square()).expect("unit square is a valid footprint");
    BuildingFeature::new(
        osm_id,
        footprint,
        BuildingAttributes {
            building_type: building_type.to_owned(),
            ..BuildingAttributes::default()
        },
    )
}
