//! Enclosed area of closed ways.
//!
//! Areas use the same planar projection as distances, anchored at the query
//! point, and are measured in square metres.

use geo::{Area, Coord, LineString, Polygon};

use crate::coordinate::{Coordinate, meters_per_degree_lon, planar_offset_meters};
use crate::entity::{Entity, EntityKey, Way};
use crate::graph::EntityGraph;

/// Area enclosed by `way` in square metres, projected around `origin`.
///
/// Returns `None` unless the way is closed (at least four references, the
/// first equal to the last) and every referenced node is in `graph`.
///
/// # Examples
/// ```
/// use osmf_core::{Coordinate, Entity, EntityGraph, Node, Tags, Way, way_area};
///
/// let origin = Coordinate::from_nanodegrees(0, 0).unwrap();
/// let corners = [(0, 0), (0, 1_000_000), (1_000_000, 1_000_000), (1_000_000, 0)];
/// let graph: EntityGraph = corners
///     .iter()
///     .zip(1..)
///     .map(|(&(lat, lon), id)| {
///         Entity::from(Node::new(id, Coordinate::from_nanodegrees(lat, lon).unwrap(), Tags::new()))
///     })
///     .collect();
///
/// let closed = Way::new(10, vec![1, 2, 3, 4, 1], Tags::new());
/// assert!(way_area(origin, &closed, &graph).is_some_and(|area| area > 12_000.0));
/// let open = Way::new(11, vec![1, 2, 3, 4], Tags::new());
/// assert_eq!(way_area(origin, &open, &graph), None);
/// ```
#[must_use]
pub fn way_area(origin: Coordinate, way: &Way, graph: &EntityGraph) -> Option<f64> {
    let (first, last) = (way.node_ids.first()?, way.node_ids.last()?);
    if way.node_ids.len() < 4 || first != last {
        return None;
    }
    let lon_scale = meters_per_degree_lon(origin.lat_degrees());
    let ring = way
        .node_ids
        .iter()
        .map(|id| match graph.lookup(EntityKey::node(*id)) {
            Some(Entity::Node(node)) => {
                Some(planar_offset_meters(origin, node.coordinate, lon_scale))
            }
            _ => None,
        })
        .collect::<Option<Vec<Coord<f64>>>>()?;
    Some(Polygon::new(LineString::from(ring), Vec::new()).unsigned_area())
}

/// Area enclosed by `entity`. Only closed ways have one.
#[must_use]
pub fn entity_area(origin: Coordinate, entity: &Entity, graph: &EntityGraph) -> Option<f64> {
    match entity {
        Entity::Way(way) => way_area(origin, way, graph),
        Entity::Node(_) | Entity::Relation(_) => None,
    }
}
