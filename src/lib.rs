//! Facade crate for the OSM proximity finder.
//!
//! This crate re-exports the core domain types and exposes the PBF-backed
//! entity source behind the `source-pbf` feature flag.

#![forbid(unsafe_code)]

pub use osmf_core::{
    Admission, AreaBounds, BoundingBox, Category, Coordinate, Distance, DistanceResolver, Entity,
    EntityGraph, EntityKey, EntitySource, MemberResolution, MemorySource, Nearby, Node, Query,
    QueryError, Relation, TagFilter, TagFilterError, Tags, Way, aggregate, resolve_distance,
};

#[cfg(feature = "source-pbf")]
pub use osmf_data::{CategoryCounts, Extraction, ExtractionSummary, PbfSource, PbfSourceError};
