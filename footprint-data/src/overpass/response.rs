//! Overpass JSON response types.
//!
//! Only the fields read by the footprint parser are modelled; everything
//! else in the document is ignored during deserialisation.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Output_Formats#JSON>

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::MirrorAttemptError;

/// OpenStreetMap tag map attached to an element.
pub type Tags = HashMap<String, String>;

/// Top-level Overpass response document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OverpassResponse {
    /// Returned elements in server order.
    #[serde(default)]
    pub elements: Vec<RawElement>,
    /// Server remark, present when the query was cut short (for example by
    /// the server-side timeout).
    #[serde(default)]
    pub remark: Option<String>,
}

/// One element from the `elements` array, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawElement {
    /// A closed or open way.
    Way(RawWay),
    /// A multipolygon or building relation.
    Relation(RawRelation),
    /// Nodes, areas and any other element type.
    #[serde(other)]
    Unsupported,
}

/// Way payload produced by `out geom`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawWay {
    /// OpenStreetMap way identifier.
    pub id: i64,
    /// Inline vertex list.
    #[serde(default, deserialize_with = "lenient_geometry")]
    pub geometry: Option<RawGeometry>,
    /// Element tags.
    #[serde(default)]
    pub tags: Option<Tags>,
}

/// Relation payload produced by `out geom`.
///
/// Only the relation's own `geometry` field is read; member geometry is
/// ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRelation {
    /// OpenStreetMap relation identifier.
    pub id: i64,
    /// Top-level vertex list.
    #[serde(default, deserialize_with = "lenient_geometry")]
    pub geometry: Option<RawGeometry>,
    /// Element tags.
    #[serde(default)]
    pub tags: Option<Tags>,
}

/// Geometry field of a way or relation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawGeometry {
    /// Every vertex decoded.
    Vertices(Vec<RawVertex>),
    /// The field was present but did not hold a list of `{lat, lon}` pairs.
    Malformed {
        /// Decoder message.
        message: String,
    },
}

impl RawGeometry {
    /// Decoded vertices, or `None` when the field was malformed.
    #[must_use]
    pub fn vertices(&self) -> Option<&[RawVertex]> {
        match self {
            Self::Vertices(vertices) => Some(vertices),
            Self::Malformed { .. } => None,
        }
    }
}

/// One geometry vertex in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RawVertex {
    /// Longitude.
    pub lon: f64,
    /// Latitude.
    pub lat: f64,
}

// A bad vertex only spoils its own element; the rest of the document must
// still decode.
fn lenient_geometry<'de, D>(deserializer: D) -> Result<Option<RawGeometry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(
        |value| match serde_json::from_value::<Vec<RawVertex>>(value) {
            Ok(vertices) => RawGeometry::Vertices(vertices),
            Err(err) => RawGeometry::Malformed {
                message: err.to_string(),
            },
        },
    ))
}

impl RawElement {
    /// Element identifier, absent for unsupported kinds.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Way(way) => Some(way.id),
            Self::Relation(relation) => Some(relation.id),
            Self::Unsupported => None,
        }
    }

    /// Element tags, if any were returned.
    #[must_use]
    pub fn tags(&self) -> Option<&Tags> {
        match self {
            Self::Way(way) => way.tags.as_ref(),
            Self::Relation(relation) => relation.tags.as_ref(),
            Self::Unsupported => None,
        }
    }

    /// The element's own `geometry` field, absent when the server sent none.
    #[must_use]
    pub fn geometry(&self) -> Option<&RawGeometry> {
        match self {
            Self::Way(way) => way.geometry.as_ref(),
            Self::Relation(relation) => relation.geometry.as_ref(),
            Self::Unsupported => None,
        }
    }
}

/// Decode a response body received from `url`.
///
/// # Errors
///
/// Returns [`MirrorAttemptError::Decode`] when the body is not an Overpass
/// JSON document.
pub fn decode_body(url: &str, body: &str) -> Result<OverpassResponse, MirrorAttemptError> {
    serde_json::from_str(body).map_err(|err| MirrorAttemptError::Decode {
        url: url.to_owned(),
        message: err.to_string(),
    })
}
