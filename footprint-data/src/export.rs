//! GeoJSON export of building collections.
//!
//! Each building becomes a `Polygon` feature with the properties `building`,
//! `osm_id`, `building_levels` and `name`. Absent attributes are written as
//! JSON `null`. Open rings are closed in the output only.

use camino::{Utf8Path, Utf8PathBuf};
use footprint_core::{BuildingFeature, FeatureCollection};
use geojson::{Feature, Geometry, JsonObject, Value};
use serde_json::json;
use thiserror::Error;

/// Errors returned by [`write_geojson`].
#[derive(Debug, Error)]
pub enum ExportError {
    /// The collection could not be serialised.
    #[error("failed to serialise GeoJSON")]
    Serialise(#[source] serde_json::Error),
    /// The artefact could not be written.
    #[error("failed to write GeoJSON to {path}")]
    Write {
        /// Target path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Convert a collection into a GeoJSON feature collection.
///
/// The collection's CRS is recorded as a `crs` foreign member naming its OGC
/// URN.
#[must_use]
pub fn to_geojson(collection: &FeatureCollection) -> geojson::FeatureCollection {
    let mut foreign_members = JsonObject::new();
    foreign_members.insert(
        "crs".to_owned(),
        json!({
            "type": "name",
            "properties": { "name": collection.crs().urn() },
        }),
    );
    geojson::FeatureCollection {
        bbox: None,
        features: collection.iter().map(to_feature).collect(),
        foreign_members: Some(foreign_members),
    }
}

fn to_feature(building: &BuildingFeature) -> Feature {
    let ring = building
        .footprint()
        .to_polygon()
        .exterior()
        .coords()
        .map(|coord| vec![coord.x, coord.y])
        .collect();
    let mut properties = JsonObject::new();
    properties.insert("building".to_owned(), json!(building.building_type()));
    properties.insert("osm_id".to_owned(), json!(building.osm_id()));
    properties.insert(
        "building_levels".to_owned(),
        json!(building.building_levels()),
    );
    properties.insert("name".to_owned(), json!(building.name()));
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Serialise `collection` as pretty-printed GeoJSON and write it atomically.
///
/// Parent directories are created as needed. Either the complete file appears
/// at `path` or nothing does.
///
/// # Errors
///
/// Returns [`ExportError`] when serialisation or the filesystem write fails.
pub fn write_geojson(collection: &FeatureCollection, path: &Utf8Path) -> Result<(), ExportError> {
    let bytes = serde_json::to_vec_pretty(&to_geojson(collection)).map_err(ExportError::Serialise)?;
    footprint_fs::write_atomically(path, &bytes).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint_core::{
        BuildingAttributes, EmptyResultPolicy, Footprint, test_support::unit_square,
    };
    use geo::Coord;
    use rstest::{fixture, rstest};
    use serde_json::Value as JsonValue;
    use tempfile::TempDir;

    #[fixture]
    fn collection() -> FeatureCollection {
        let open = BuildingFeature::new(
            11,
            Footprint::new(unit_square()).expect("valid ring"),
            BuildingAttributes {
                building_type: "house".to_owned(),
                building_levels: Some("2".to_owned()),
                name: None,
            },
        );
        let mut closed_ring = unit_square();
        closed_ring.push(Coord { x: 0.0, y: 0.0 });
        let closed = BuildingFeature::new(
            12,
            Footprint::new(closed_ring).expect("valid ring"),
            BuildingAttributes::default(),
        );
        FeatureCollection::from_features(vec![open, closed], EmptyResultPolicy::Fail)
            .expect("valid collection")
    }

    fn as_json(collection: &FeatureCollection) -> JsonValue {
        serde_json::to_value(to_geojson(collection)).expect("serialisable")
    }

    #[rstest]
    fn writes_properties_with_nulls(collection: FeatureCollection) {
        let json = as_json(&collection);

        assert_eq!(json["type"], "FeatureCollection");
        let properties = &json["features"][0]["properties"];
        assert_eq!(properties["building"], "house");
        assert_eq!(properties["osm_id"], 11);
        assert_eq!(properties["building_levels"], "2");
        assert!(properties["name"].is_null());
        assert!(properties.as_object().expect("object").contains_key("name"));
    }

    #[rstest]
    fn closes_open_rings_without_duplicating_closed_ones(collection: FeatureCollection) {
        let json = as_json(&collection);

        let open_ring = &json["features"][0]["geometry"]["coordinates"][0];
        let closed_ring = &json["features"][1]["geometry"]["coordinates"][0];
        assert_eq!(json["features"][0]["geometry"]["type"], "Polygon");
        assert_eq!(open_ring.as_array().expect("ring").len(), 5);
        assert_eq!(open_ring[0], open_ring[4]);
        assert_eq!(closed_ring.as_array().expect("ring").len(), 5);
        assert_eq!(
            collection.features()[0].footprint().vertex_count(),
            4,
            "in-memory footprint is untouched"
        );
    }

    #[rstest]
    fn records_wgs84_crs(collection: FeatureCollection) {
        let json = as_json(&collection);

        assert_eq!(
            json["crs"]["properties"]["name"],
            "urn:ogc:def:crs:EPSG::4326"
        );
    }

    #[rstest]
    fn writes_file_atomically(collection: FeatureCollection) {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        let target = root.join("out/buildings.geojson");

        write_geojson(&collection, &target).expect("write succeeds");

        let written: JsonValue =
            serde_json::from_slice(&std::fs::read(&target).expect("read back")).expect("json");
        assert_eq!(written["features"].as_array().expect("features").len(), 2);
        assert_eq!(written, as_json(&collection));
    }
}
