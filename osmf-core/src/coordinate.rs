//! Fixed-point coordinates and the planar distance approximation.
//!
//! Coordinates are stored as nanodegrees (degrees scaled by 10⁹) so that
//! comparisons against a bounding rectangle are exact integer comparisons.
//! Distances use an equirectangular projection anchored at the query point,
//! which is accurate enough for radii of a few tens of kilometres.

use std::f64::consts::PI;

use geo::Coord;

/// Nanodegrees in one degree.
pub const NANODEGREES_PER_DEGREE: f64 = 1_000_000_000.0;

/// Approximate length of one degree of latitude in metres.
pub const METERS_PER_DEGREE_LAT: f64 = 111_000.0;

/// Earth radius used to scale longitude differences, in metres.
pub const EARTH_RADIUS_METERS: f64 = 6_367_000.0;

const MAX_LAT_NANODEGREES: i64 = 90_000_000_000;
const MAX_LON_NANODEGREES: i64 = 180_000_000_000;

/// Convert decimal degrees to nanodegrees, truncating towards zero.
///
/// # Examples
/// ```
/// use osmf_core::to_nanodegrees;
///
/// assert_eq!(to_nanodegrees(52.52), 52_520_000_000);
/// assert_eq!(to_nanodegrees(-0.000_000_000_9), 0);
/// ```
#[must_use]
pub fn to_nanodegrees(degrees: f64) -> i64 {
    // `as` truncates towards zero and saturates on overflow.
    (degrees * NANODEGREES_PER_DEGREE) as i64
}

/// Length of one degree of longitude at `lat_degrees`, in metres.
#[must_use]
pub fn meters_per_degree_lon(lat_degrees: f64) -> f64 {
    EARTH_RADIUS_METERS * lat_degrees.to_radians().cos() * (PI / 180.0)
}

/// A WGS84 position in nanodegrees.
///
/// Internally a [`geo::Coord`] with `x = longitude` and `y = latitude`,
/// matching the axis order used by `geo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate(Coord<i64>);

impl Coordinate {
    /// Build a coordinate from nanodegree components.
    ///
    /// Returns `None` when the position lies outside the WGS84 range.
    #[must_use]
    pub fn from_nanodegrees(lat: i64, lon: i64) -> Option<Self> {
        ((-MAX_LAT_NANODEGREES..=MAX_LAT_NANODEGREES).contains(&lat)
            && (-MAX_LON_NANODEGREES..=MAX_LON_NANODEGREES).contains(&lon))
        .then_some(Self(Coord { x: lon, y: lat }))
    }

    /// Build a coordinate from decimal degrees.
    ///
    /// # Examples
    /// ```
    /// use osmf_core::Coordinate;
    ///
    /// let berlin = Coordinate::from_degrees(52.52, 13.405).expect("valid position");
    /// assert_eq!(berlin.lat(), 52_520_000_000);
    /// assert!(Coordinate::from_degrees(91.0, 0.0).is_none());
    /// ```
    #[must_use]
    pub fn from_degrees(lat: f64, lon: f64) -> Option<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        Self::from_nanodegrees(to_nanodegrees(lat), to_nanodegrees(lon))
    }

    /// Latitude in nanodegrees.
    #[must_use]
    pub const fn lat(&self) -> i64 {
        self.0.y
    }

    /// Longitude in nanodegrees.
    #[must_use]
    pub const fn lon(&self) -> i64 {
        self.0.x
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub fn lat_degrees(&self) -> f64 {
        self.0.y as f64 / NANODEGREES_PER_DEGREE
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub fn lon_degrees(&self) -> f64 {
        self.0.x as f64 / NANODEGREES_PER_DEGREE
    }

    pub(crate) const fn as_coord(&self) -> Coord<i64> {
        self.0
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Coord {
            x: value.lon_degrees(),
            y: value.lat_degrees(),
        }
    }
}

/// Approximate distance in whole metres from `origin` to `target`.
///
/// The longitude scale is evaluated at the origin's latitude, not at the
/// midpoint of the two positions.
///
/// # Examples
/// ```
/// use osmf_core::{Coordinate, planar_distance_meters};
///
/// let origin = Coordinate::from_nanodegrees(52_520_000_000, 13_405_000_000).unwrap();
/// let north = Coordinate::from_nanodegrees(52_521_081_000, 13_405_000_000).unwrap();
/// assert_eq!(planar_distance_meters(origin, north), 120);
/// ```
#[must_use]
pub fn planar_distance_meters(origin: Coordinate, target: Coordinate) -> u64 {
    let offset = planar_offset_meters(origin, target, meters_per_degree_lon(origin.lat_degrees()));
    offset.x.hypot(offset.y).round() as u64
}

/// Offset of `target` from `origin` in metres (`x` east, `y` north), with
/// longitude scaled by `lon_scale` metres per degree.
pub(crate) fn planar_offset_meters(
    origin: Coordinate,
    target: Coordinate,
    lon_scale: f64,
) -> Coord<f64> {
    let delta_lat = (target.lat() as f64 - origin.lat() as f64) / NANODEGREES_PER_DEGREE;
    let delta_lon = (target.lon() as f64 - origin.lon() as f64) / NANODEGREES_PER_DEGREE;
    Coord {
        x: delta_lon * lon_scale,
        y: delta_lat * METERS_PER_DEGREE_LAT,
    }
}
