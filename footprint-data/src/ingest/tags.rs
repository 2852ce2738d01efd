//! Tag utilities for building extraction.
//!
//! Tags are read once here and turned into [`BuildingAttributes`]; nothing
//! downstream looks at raw tag maps.
use footprint_core::{BuildingAttributes, DEFAULT_BUILDING_TYPE};

const BUILDING_KEY: &str = "building";
const LEVELS_KEY: &str = "building:levels";
const NAME_KEY: &str = "name";

/// Extract the building attributes from an element's tags.
///
/// Values are copied verbatim. A missing `building` tag yields
/// [`DEFAULT_BUILDING_TYPE`]; missing `building:levels` and `name` stay `None`.
pub(super) fn building_attributes<'a, T>(tags: T) -> BuildingAttributes
where
    T: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut building_type = None;
    let mut building_levels = None;
    let mut name = None;
    for (key, value) in tags {
        match key {
            BUILDING_KEY => building_type = Some(value.to_owned()),
            LEVELS_KEY => building_levels = Some(value.to_owned()),
            NAME_KEY => name = Some(value.to_owned()),
            _ => {}
        }
    }
    BuildingAttributes {
        building_type: building_type.unwrap_or_else(|| DEFAULT_BUILDING_TYPE.to_owned()),
        building_levels,
        name,
    }
}
