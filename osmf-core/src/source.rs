//! Extraction seam between backing data and the resolver.
//!
//! An [`EntitySource`] turns a [`Query`] into an [`EntityGraph`] that has
//! already been narrowed by the query's bounding box and tag filter. The
//! resolver never sees how extraction happened.

use std::convert::Infallible;

use crate::bbox::BoundingBox;
use crate::coordinate::Coordinate;
use crate::entity::{Category, Entity};
use crate::graph::EntityGraph;
use crate::query::Query;
use crate::tags::TagFilter;

/// Which nodes an extraction keeps for resolving way and relation distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemberResolution {
    /// Keep only nodes that pass the tag filter. A way whose member nodes
    /// are untagged therefore resolves to an unknown distance.
    #[default]
    Filtered,
    /// Also keep untagged nodes inside the bounding box so that ways and
    /// relations resolve through them. Such nodes are never reported,
    /// because aggregation re-applies the tag filter.
    UntaggedNodes,
}

/// Produces the entity graph for a query.
///
/// Implementations must admit a node only if the query's bounding box
/// admits its coordinate, and must skip categories the filter does not
/// evaluate. Ways and relations are admitted on their tags alone.
///
/// # Examples
/// ```
/// use osmf_core::{Coordinate, Entity, EntitySource, MemberResolution, MemorySource, Node, Query, TagFilter, Tags};
///
/// let here = Coordinate::from_degrees(52.52, 13.405).unwrap();
/// let source = MemorySource::new(
///     [Entity::from(Node::new(1, here, Tags::new()))],
///     MemberResolution::Filtered,
/// );
/// let query = Query::new(52.52, 13.405, 100.0, TagFilter::new()).unwrap();
/// let graph = source.extract(&query).unwrap();
/// assert_eq!(graph.len(), 1);
/// ```
pub trait EntitySource {
    /// Failure while reading the backing data.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extract the entities relevant to `query`.
    fn extract(&self, query: &Query) -> Result<EntityGraph, Self::Error>;
}

/// Extraction-time admission rules for one query.
///
/// Shared by every source so that extraction filters are identical across
/// backends and consistent with aggregation.
#[derive(Debug, Clone)]
pub struct Admission<'q> {
    filter: &'q TagFilter,
    bbox: BoundingBox,
    resolution: MemberResolution,
}

impl<'q> Admission<'q> {
    #[must_use]
    pub fn new(query: &'q Query, resolution: MemberResolution) -> Self {
        Self {
            filter: query.filter(),
            bbox: query.bounding_box(),
            resolution,
        }
    }

    /// Whether a node at `coordinate` with `tags` is kept.
    ///
    /// Area bounds keep every node inside the box, whatever the resolution
    /// policy, because way areas are measured from their member nodes.
    #[must_use]
    pub fn admits_node<'a, T>(&self, coordinate: Coordinate, tags: T) -> bool
    where
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        if !self.bbox.admits(coordinate) {
            return false;
        }
        if !self.filter.area_bounds().is_unbounded() {
            return true;
        }
        match self.resolution {
            MemberResolution::UntaggedNodes => true,
            MemberResolution::Filtered => {
                self.filter.evaluates(Category::Node) && self.filter.matches(tags)
            }
        }
    }

    /// Whether a way or relation with `tags` is kept.
    #[must_use]
    pub fn admits_grouping<'a, T>(&self, category: Category, tags: T) -> bool
    where
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.filter.evaluates(category) && self.filter.matches(tags)
    }

    /// Whether an owned entity is kept.
    #[must_use]
    pub fn admits(&self, entity: &Entity) -> bool {
        let tags = entity
            .tags()
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()));
        match entity {
            Entity::Node(node) => self.admits_node(node.coordinate, tags),
            Entity::Way(_) | Entity::Relation(_) => self.admits_grouping(entity.category(), tags),
        }
    }
}

/// An [`EntitySource`] over entities already held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entities: Vec<Entity>,
    resolution: MemberResolution,
}

impl MemorySource {
    #[must_use]
    pub fn new<I>(entities: I, resolution: MemberResolution) -> Self
    where
        I: IntoIterator<Item = Entity>,
    {
        Self {
            entities: entities.into_iter().collect(),
            resolution,
        }
    }
}

impl EntitySource for MemorySource {
    type Error = Infallible;

    fn extract(&self, query: &Query) -> Result<EntityGraph, Self::Error> {
        let admission = Admission::new(query, self.resolution);
        Ok(self
            .entities
            .iter()
            .filter(|entity| admission.admits(entity))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityKey, Node, Way};
    use crate::tags::Tags;
    use rstest::rstest;

    fn entities() -> Vec<Entity> {
        let near = Coordinate::from_nanodegrees(52_521_081_000, 13_405_000_000).expect("valid");
        let far = Coordinate::from_nanodegrees(52_620_000_000, 13_405_000_000).expect("valid");
        let cafe = Tags::from([("amenity".to_owned(), "cafe".to_owned())]);
        vec![
            Entity::from(Node::new(1, near, cafe.clone())),
            Entity::from(Node::new(2, near, Tags::new())),
            Entity::from(Node::new(3, far, cafe.clone())),
            Entity::from(Way::new(10, vec![2], cafe)),
            Entity::from(Way::new(11, vec![1], Tags::new())),
        ]
    }

    fn extract(resolution: MemberResolution, arguments: &[&str]) -> EntityGraph {
        let filter = TagFilter::parse(arguments.iter().copied()).expect("valid filter");
        let query = Query::new(52.52, 13.405, 500.0, filter).expect("valid query");
        let source = MemorySource::new(entities(), resolution);
        match source.extract(&query) {
            Ok(graph) => graph,
            Err(never) => match never {},
        }
    }

    #[rstest]
    fn filtered_extraction_applies_tags_and_box() {
        let graph = extract(MemberResolution::Filtered, &["amenity=cafe"]);
        let mut keys: Vec<_> = graph.iter().map(Entity::key).collect();
        keys.sort();
        assert_eq!(keys, vec![EntityKey::node(1), EntityKey::way(10)]);
    }

    #[rstest]
    fn untagged_nodes_are_kept_for_resolution() {
        let graph = extract(MemberResolution::UntaggedNodes, &["amenity=cafe"]);
        assert!(graph.contains(EntityKey::node(2)));
        assert!(!graph.contains(EntityKey::node(3)), "outside the box");
        assert!(!graph.contains(EntityKey::way(11)), "ways still need tags");
    }

    #[rstest]
    fn skipped_categories_are_not_extracted() {
        let graph = extract(MemberResolution::Filtered, &["capital="]);
        assert!(graph.is_empty());
        let ways_only = extract(MemberResolution::Filtered, &["tracktype="]);
        assert!(ways_only.is_empty());
    }

    #[rstest]
    fn area_bounds_keep_member_nodes_inside_the_box() {
        let graph = extract(MemberResolution::Filtered, &["amenity=cafe", "way_area>10"]);
        let mut keys: Vec<_> = graph.iter().map(Entity::key).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![EntityKey::node(1), EntityKey::node(2), EntityKey::way(10)]
        );
    }
}
