//! Rectangular prefilter around a query radius.

use geo::{Coord, Rect};

use crate::coordinate::{
    Coordinate, METERS_PER_DEGREE_LAT, NANODEGREES_PER_DEGREE, meters_per_degree_lon,
};

/// Distances are rounded to whole metres before the radius cutoff, so a
/// position up to half a metre beyond the radius still counts as inside it.
const ROUNDING_SLACK_METERS: f64 = 0.5;

/// Axis-aligned rectangle in nanodegrees that contains a radius disc.
///
/// The rectangle is a superset of the disc: it may admit positions that are
/// further away than the radius, but never rejects one whose rounded planar
/// distance is within it. Regions crossing the antimeridian are not modelled.
///
/// # Examples
/// ```
/// use osmf_core::{BoundingBox, Coordinate};
///
/// let origin = Coordinate::from_degrees(52.52, 13.405).unwrap();
/// let bbox = BoundingBox::around(origin, 500.0);
/// assert!(bbox.admits(origin));
/// assert!(!bbox.admits(Coordinate::from_degrees(52.53, 13.405).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    rect: Rect<i64>,
}

impl BoundingBox {
    /// Build the rectangle covering `radius_meters` around `origin`.
    ///
    /// Latitude and longitude extents are scaled independently because a
    /// degree of longitude shrinks towards the poles. Both extents include
    /// the half metre lost to distance rounding and are rounded up to whole
    /// nanodegrees.
    #[must_use]
    pub fn around(origin: Coordinate, radius_meters: f64) -> Self {
        let reach = radius_meters + ROUNDING_SLACK_METERS;
        let radius_lat = nanodegree_extent(reach / METERS_PER_DEGREE_LAT);
        let lon_scale = meters_per_degree_lon(origin.lat_degrees());
        let radius_lon = if lon_scale > 0.0 {
            nanodegree_extent(reach / lon_scale)
        } else {
            i64::MAX
        };

        let centre = origin.as_coord();
        let min = Coord {
            x: centre.x.saturating_sub(radius_lon),
            y: centre.y.saturating_sub(radius_lat),
        };
        let max = Coord {
            x: centre.x.saturating_add(radius_lon),
            y: centre.y.saturating_add(radius_lat),
        };
        Self {
            rect: Rect::new(min, max),
        }
    }

    /// Whether `coordinate` lies inside the rectangle, boundary included.
    #[must_use]
    pub fn admits(&self, coordinate: Coordinate) -> bool {
        let min = self.rect.min();
        let max = self.rect.max();
        (min.y..=max.y).contains(&coordinate.lat()) && (min.x..=max.x).contains(&coordinate.lon())
    }

    /// Southern and northern latitude bounds in nanodegrees.
    #[must_use]
    pub fn lat_range(&self) -> (i64, i64) {
        (self.rect.min().y, self.rect.max().y)
    }

    /// Western and eastern longitude bounds in nanodegrees.
    #[must_use]
    pub fn lon_range(&self) -> (i64, i64) {
        (self.rect.min().x, self.rect.max().x)
    }

    /// The rectangle in decimal degrees (`x = longitude`, `y = latitude`).
    #[must_use]
    pub fn to_degrees(&self) -> Rect<f64> {
        let convert = |coord: Coord<i64>| Coord {
            x: coord.x as f64 / NANODEGREES_PER_DEGREE,
            y: coord.y as f64 / NANODEGREES_PER_DEGREE,
        };
        Rect::new(convert(self.rect.min()), convert(self.rect.max()))
    }
}

fn nanodegree_extent(degrees: f64) -> i64 {
    // Saturates for the degenerate polar case.
    (degrees * NANODEGREES_PER_DEGREE).ceil() as i64
}
