//! Overpass QL query construction for building footprints.

use std::fmt;
use std::time::Duration;

use footprint_core::GeoBounds;

/// Server-side query budget used when none is configured.
pub const DEFAULT_SERVER_TIMEOUT: Duration = Duration::from_secs(60);

/// Overpass QL text requesting every building way and relation in a box.
///
/// The text is a pure function of the bounds and the server timeout, so two
/// queries built from the same inputs are byte-identical.
///
/// # Examples
/// ```
/// use footprint_core::GeoBounds;
/// use footprint_data::overpass::OverpassQuery;
///
/// # fn main() -> Result<(), footprint_core::GeoBoundsError> {
/// let bounds = GeoBounds::new(51.4595, 51.4495, -2.5829, -2.5929)?;
/// let query = OverpassQuery::buildings(&bounds);
/// assert!(query.as_str().contains(r#"way["building"](51.4495,-2.5929,51.4595,-2.5829);"#));
/// assert!(query.as_str().ends_with("out geom;\n"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverpassQuery(String);

impl OverpassQuery {
    /// Build the footprint query with the default server timeout.
    #[must_use]
    pub fn buildings(bounds: &GeoBounds) -> Self {
        Self::buildings_with_timeout(bounds, DEFAULT_SERVER_TIMEOUT)
    }

    /// Build the footprint query with an explicit server-side timeout.
    ///
    /// The timeout is sent in whole seconds, rounded down but never below one
    /// second; the Overpass server aborts the query once it is exceeded.
    #[must_use]
    pub fn buildings_with_timeout(bounds: &GeoBounds, server_timeout: Duration) -> Self {
        // Overpass bounding boxes are (south, west, north, east).
        let bbox = format!(
            "{},{},{},{}",
            bounds.south(),
            bounds.west(),
            bounds.north(),
            bounds.east()
        );
        Self(format!(
            "[out:json][timeout:{timeout}];\n\
             (\n  \
             way[\"building\"]({bbox});\n  \
             relation[\"building\"]({bbox});\n\
             );\n\
             out geom;\n",
            timeout = server_timeout.as_secs().max(1),
        ))
    }

    /// The query text sent as the request body.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for OverpassQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OverpassQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
