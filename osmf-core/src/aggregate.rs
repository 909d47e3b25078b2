//! Turning an extracted graph into ranked results.

use log::debug;

use crate::area::entity_area;
use crate::entity::Entity;
use crate::graph::EntityGraph;
use crate::query::Query;
use crate::resolver::{BoxReach, Distance, DistanceResolver};

/// An entity reported by [`aggregate`] with its resolved distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearby<'g> {
    pub entity: &'g Entity,
    pub distance: Distance,
}

/// Rank every entity in `graph` that satisfies `query`.
///
/// An entity is reported when its category is evaluated by the filter, its
/// tags match, some reachable coordinate lies inside the query's bounding
/// box, and its resolved distance is known and within the radius. When the
/// filter carries `way_area` bounds the entity must also be a closed way whose
/// area lies strictly between them. Results are ordered by distance and then by category and ID, so the output is
/// deterministic regardless of graph iteration order.
///
/// # Examples
/// ```
/// use osmf_core::{Coordinate, Distance, Entity, EntityGraph, Node, Query, TagFilter, Tags, aggregate};
///
/// let near = Coordinate::from_nanodegrees(52_521_081_000, 13_405_000_000).unwrap();
/// let graph: EntityGraph = [Entity::from(Node::new(1, near, Tags::new()))].into_iter().collect();
/// let query = Query::new(52.52, 13.405, 500.0, TagFilter::new()).unwrap();
///
/// let results = aggregate(&graph, &query);
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].distance, Distance::Meters(120));
/// ```
#[must_use]
pub fn aggregate<'g>(graph: &'g EntityGraph, query: &Query) -> Vec<Nearby<'g>> {
    let filter = query.filter();
    let bounds = filter.area_bounds();
    let mut reach = BoxReach::new(graph, query.bounding_box());
    let mut resolver = DistanceResolver::new(query.origin(), graph);
    let mut results = Vec::new();
    for entity in graph.iter() {
        if !filter.evaluates(entity.category()) || !filter.matches_tags(entity.tags()) {
            continue;
        }
        if !bounds.is_unbounded()
            && !entity_area(query.origin(), entity, graph).is_some_and(|area| bounds.admits(area))
        {
            continue;
        }
        if !reach.reaches(entity) {
            continue;
        }
        let distance = resolver.resolve(entity);
        if distance.within(query.radius_meters()) {
            results.push(Nearby { entity, distance });
        }
    }
    results.sort_by_key(|nearby| (nearby.distance, nearby.entity.key()));
    debug!(
        "aggregated {} of {} extracted entities within {} m",
        results.len(),
        graph.len(),
        query.radius_meters()
    );
    results
}
