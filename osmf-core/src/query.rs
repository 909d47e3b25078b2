//! Validated proximity queries.

use thiserror::Error;

use crate::bbox::BoundingBox;
use crate::coordinate::Coordinate;
use crate::tags::TagFilter;

/// Errors returned by [`Query::new`].
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    /// The query point is not a valid WGS84 position.
    #[error("query point ({lat}, {lon}) is outside the WGS84 range")]
    InvalidCoordinate { lat: f64, lon: f64 },
    /// The radius is negative or not finite.
    #[error("radius must be a finite, non-negative number of metres, got {0}")]
    InvalidRadius(f64),
}

/// A point, a radius and a tag filter.
///
/// # Examples
/// ```
/// use osmf_core::{Query, TagFilter};
///
/// # fn main() -> Result<(), osmf_core::QueryError> {
/// let query = Query::new(52.52, 13.405, 500.0, TagFilter::new())?;
/// assert!(query.bounding_box().admits(query.origin()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    origin: Coordinate,
    radius_meters: f64,
    filter: TagFilter,
}

impl Query {
    /// Validate and construct a query from decimal degrees and metres.
    pub fn new(lat: f64, lon: f64, radius_meters: f64, filter: TagFilter) -> Result<Self, QueryError> {
        let origin =
            Coordinate::from_degrees(lat, lon).ok_or(QueryError::InvalidCoordinate { lat, lon })?;
        if !radius_meters.is_finite() || radius_meters < 0.0 {
            return Err(QueryError::InvalidRadius(radius_meters));
        }
        Ok(Self {
            origin,
            radius_meters,
            filter,
        })
    }

    #[must_use]
    pub const fn origin(&self) -> Coordinate {
        self.origin
    }

    #[must_use]
    pub const fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    #[must_use]
    pub const fn filter(&self) -> &TagFilter {
        &self.filter
    }

    /// The admission rectangle shared by extraction and aggregation.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::around(self.origin, self.radius_meters)
    }
}
