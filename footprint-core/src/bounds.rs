//! Geographic bounding boxes used to scope footprint queries.

use geo::{Coord, Rect};
use thiserror::Error;

/// A rectangular WGS84 area delimited by latitude and longitude bounds.
///
/// The invariant `south < north` and `west < east` holds for every value
/// constructed through [`GeoBounds::new`]. Boxes crossing the antimeridian are
/// not representable.
///
/// # Examples
///
/// ```
/// use footprint_core::GeoBounds;
///
/// # fn main() -> Result<(), footprint_core::GeoBoundsError> {
/// let bounds = GeoBounds::new(51.4595, 51.4495, -2.5829, -2.5929)?;
/// assert_eq!(bounds.north(), 51.4595);
/// assert_eq!(bounds.west(), -2.5929);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GeoBounds {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

/// Errors returned by [`GeoBounds::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoBoundsError {
    /// A bound was NaN or infinite.
    #[error("{edge} bound must be a finite number, got {value}")]
    NonFinite {
        /// Name of the offending edge.
        edge: &'static str,
        /// Supplied value.
        value: f64,
    },
    /// A latitude fell outside `[-90, 90]` or a longitude outside `[-180, 180]`.
    #[error("{edge} bound {value} is outside the valid WGS84 range")]
    OutOfRange {
        /// Name of the offending edge.
        edge: &'static str,
        /// Supplied value.
        value: f64,
    },
    /// The southern bound was not strictly below the northern bound.
    #[error("south bound {south} must be less than north bound {north}")]
    InvertedLatitude {
        /// Supplied northern latitude.
        north: f64,
        /// Supplied southern latitude.
        south: f64,
    },
    /// The western bound was not strictly below the eastern bound.
    #[error("west bound {west} must be less than east bound {east}")]
    InvertedLongitude {
        /// Supplied eastern longitude.
        east: f64,
        /// Supplied western longitude.
        west: f64,
    },
}

impl GeoBounds {
    /// Validates and constructs a [`GeoBounds`].
    ///
    /// # Errors
    ///
    /// Returns [`GeoBoundsError`] when any value is non-finite, outside the
    /// WGS84 range, or when the box is empty or inverted.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, GeoBoundsError> {
        for (edge, value, limit) in [
            ("north", north, 90.0),
            ("south", south, 90.0),
            ("east", east, 180.0),
            ("west", west, 180.0),
        ] {
            if !value.is_finite() {
                return Err(GeoBoundsError::NonFinite { edge, value });
            }
            if !(-limit..=limit).contains(&value) {
                return Err(GeoBoundsError::OutOfRange { edge, value });
            }
        }
        if south >= north {
            return Err(GeoBoundsError::InvertedLatitude { north, south });
        }
        if west >= east {
            return Err(GeoBoundsError::InvertedLongitude { east, west });
        }
        Ok(Self {
            north,
            south,
            east,
            west,
        })
    }

    /// Northern latitude in decimal degrees.
    #[must_use]
    pub const fn north(&self) -> f64 {
        self.north
    }

    /// Southern latitude in decimal degrees.
    #[must_use]
    pub const fn south(&self) -> f64 {
        self.south
    }

    /// Eastern longitude in decimal degrees.
    #[must_use]
    pub const fn east(&self) -> f64 {
        self.east
    }

    /// Western longitude in decimal degrees.
    #[must_use]
    pub const fn west(&self) -> f64 {
        self.west
    }

    /// The box as a `geo` rectangle with `x = longitude`, `y = latitude`.
    #[must_use]
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.west,
                y: self.south,
            },
            Coord {
                x: self.east,
                y: self.north,
            },
        )
    }
}
