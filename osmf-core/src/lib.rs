//! Core domain types for finding OpenStreetMap entities near a point.
//!
//! Coordinates are integer nanodegrees. Distances use a planar
//! equirectangular approximation rounded to whole metres, which is accurate
//! enough for radii of a few kilometres. Ways and relations have no position
//! of their own and resolve to the nearest of their members.
//!
//! The pipeline is: build a [`Query`], let an [`EntitySource`] extract an
//! [`EntityGraph`], then [`aggregate`] the graph into ranked [`Nearby`]
//! results.

#![forbid(unsafe_code)]

mod aggregate;
mod area;
mod bbox;
mod coordinate;
mod entity;
mod graph;
mod query;
mod resolver;
mod source;
mod tags;

pub use aggregate::{Nearby, aggregate};
pub use area::{entity_area, way_area};
pub use bbox::BoundingBox;
pub use coordinate::{
    Coordinate, EARTH_RADIUS_METERS, METERS_PER_DEGREE_LAT, NANODEGREES_PER_DEGREE,
    meters_per_degree_lon, planar_distance_meters, to_nanodegrees,
};
pub use entity::{Category, Entity, EntityKey, Node, Relation, Way};
pub use graph::EntityGraph;
pub use query::{Query, QueryError};
pub use resolver::{
    BoxReach, Distance, DistanceResolver, reaches_bounding_box, resolve_distance,
};
pub use source::{Admission, EntitySource, MemberResolution, MemorySource};
pub use tags::{AreaBounds, TagFilter, TagFilterError, Tags};
