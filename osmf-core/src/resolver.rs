//! Recursive distance resolution through membership.
//!
//! A node's distance is measured directly. A way resolves to its nearest
//! member node and a relation to its nearest member of any category, recursing
//! through member ways and relations. Members missing from the graph and
//! members already on the current recursion path contribute
//! [`Distance::Unknown`], which never wins a minimum against a known distance.
//!
//! Resolvers cache per-entity results for the lifetime of one query, so
//! hierarchies where sub-relations are reachable along many paths are
//! walked once instead of once per path.

use std::collections::HashMap;
use std::fmt;

use crate::bbox::BoundingBox;
use crate::coordinate::{Coordinate, planar_distance_meters};
use crate::entity::{Category, Entity, EntityKey};
use crate::graph::EntityGraph;

/// Outcome of resolving an entity's distance to the query point.
///
/// Known distances order before [`Distance::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Distance {
    /// Rounded distance in metres.
    Meters(u64),
    /// No member of the entity had a resolvable coordinate.
    Unknown,
}

impl Distance {
    /// The distance in metres, if known.
    #[must_use]
    pub const fn meters(self) -> Option<u64> {
        match self {
            Self::Meters(meters) => Some(meters),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub const fn is_known(self) -> bool {
        matches!(self, Self::Meters(_))
    }

    /// The smaller of two distances, ignoring unknown branches.
    ///
    /// # Examples
    /// ```
    /// use osmf_core::Distance;
    ///
    /// assert_eq!(Distance::Meters(5).nearer(Distance::Unknown), Distance::Meters(5));
    /// assert_eq!(Distance::Meters(5).nearer(Distance::Meters(3)), Distance::Meters(3));
    /// assert_eq!(Distance::Unknown.nearer(Distance::Unknown), Distance::Unknown);
    /// ```
    #[must_use]
    pub fn nearer(self, other: Self) -> Self {
        match (self, other) {
            (Self::Meters(left), Self::Meters(right)) => Self::Meters(left.min(right)),
            (Self::Meters(known), Self::Unknown) | (Self::Unknown, Self::Meters(known)) => {
                Self::Meters(known)
            }
            (Self::Unknown, Self::Unknown) => Self::Unknown,
        }
    }

    /// Whether the distance is known and no greater than `radius_meters`.
    #[must_use]
    pub fn within(self, radius_meters: f64) -> bool {
        self.meters()
            .is_some_and(|meters| meters as f64 <= radius_meters)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meters(meters) => write!(f, "{meters}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Resolve the distance from `origin` to `entity` with a fresh resolver.
///
/// # Examples
/// ```
/// use osmf_core::{Coordinate, Distance, Entity, EntityGraph, Node, Tags, Way, resolve_distance};
///
/// let origin = Coordinate::from_nanodegrees(52_520_000_000, 13_405_000_000).unwrap();
/// let north = Coordinate::from_nanodegrees(52_521_081_000, 13_405_000_000).unwrap();
/// let graph: EntityGraph = [Entity::from(Node::new(1, north, Tags::new()))].into_iter().collect();
/// let way = Entity::from(Way::new(10, vec![1, 2], Tags::new()));
///
/// assert_eq!(resolve_distance(origin, &way, &graph), Distance::Meters(120));
/// ```
#[must_use]
pub fn resolve_distance(origin: Coordinate, entity: &Entity, graph: &EntityGraph) -> Distance {
    DistanceResolver::new(origin, graph).resolve(entity)
}

/// Whether any coordinate reachable from `entity` lies inside `bbox`.
///
/// Follows the same membership and cycle rules as [`resolve_distance`].
#[must_use]
pub fn reaches_bounding_box(entity: &Entity, graph: &EntityGraph, bbox: BoundingBox) -> bool {
    BoxReach::new(graph, bbox).reaches(entity)
}

/// Distance resolution for one query point over one graph.
///
/// Members missing from the graph and members already on the current
/// recursion path contribute [`Distance::Unknown`]. An entity's result is
/// kept once it no longer depends on the path it was reached by, so members
/// shared by many parents are resolved once per resolver.
///
/// Results are keyed by [`EntityKey`]: only pass entities taken from the
/// resolver's own graph, or entities whose key the graph does not hold.
#[derive(Debug)]
pub struct DistanceResolver<'g> {
    origin: Coordinate,
    graph: &'g EntityGraph,
    walk: Walk<Distance>,
}

impl<'g> DistanceResolver<'g> {
    #[must_use]
    pub fn new(origin: Coordinate, graph: &'g EntityGraph) -> Self {
        Self {
            origin,
            graph,
            walk: Walk::default(),
        }
    }

    /// The distance from the resolver's origin to `entity`.
    pub fn resolve(&mut self, entity: &Entity) -> Distance {
        self.visit(entity).value
    }

    fn visit(&mut self, entity: &Entity) -> Step<Distance> {
        let key = entity.key();
        let depth = match self.walk.enter(key) {
            Entry::Settled(distance) => return Step::settled(distance),
            Entry::OnPath(depth) => return Step::cut(Distance::Unknown, depth),
            Entry::Fresh(depth) => depth,
        };
        let step = match entity {
            Entity::Node(node) => Step::settled(Distance::Meters(planar_distance_meters(
                self.origin,
                node.coordinate,
            ))),
            Entity::Way(way) => self.nearest(Category::Node, &way.node_ids),
            Entity::Relation(relation) => self
                .nearest(Category::Node, &relation.node_ids)
                .merge(
                    self.nearest(Category::Way, &relation.way_ids),
                    Distance::nearer,
                )
                .merge(
                    self.nearest(Category::Relation, &relation.relation_ids),
                    Distance::nearer,
                ),
        };
        self.walk.leave(key, depth, step)
    }

    fn nearest(&mut self, category: Category, ids: &[i64]) -> Step<Distance> {
        let graph = self.graph;
        let mut nearest = Step::settled(Distance::Unknown);
        for id in ids {
            if let Some(member) = graph.lookup(EntityKey::new(category, *id)) {
                nearest = nearest.merge(self.visit(member), Distance::nearer);
            }
        }
        nearest
    }
}

/// Bounding box reachability for one rectangle over one graph.
///
/// Shares the caching rules of [`DistanceResolver`].
#[derive(Debug)]
pub struct BoxReach<'g> {
    graph: &'g EntityGraph,
    bbox: BoundingBox,
    walk: Walk<bool>,
}

impl<'g> BoxReach<'g> {
    #[must_use]
    pub fn new(graph: &'g EntityGraph, bbox: BoundingBox) -> Self {
        Self {
            graph,
            bbox,
            walk: Walk::default(),
        }
    }

    /// Whether any coordinate reachable from `entity` lies inside the box.
    pub fn reaches(&mut self, entity: &Entity) -> bool {
        self.visit(entity).value
    }

    fn visit(&mut self, entity: &Entity) -> Step<bool> {
        let key = entity.key();
        let depth = match self.walk.enter(key) {
            Entry::Settled(reached) => return Step::settled(reached),
            Entry::OnPath(depth) => return Step::cut(false, depth),
            Entry::Fresh(depth) => depth,
        };
        let step = match entity {
            Entity::Node(node) => Step::settled(self.bbox.admits(node.coordinate)),
            Entity::Way(way) => self.any_member(Category::Node, &way.node_ids),
            Entity::Relation(relation) => {
                let mut step = self.any_member(Category::Node, &relation.node_ids);
                if !step.value {
                    step = step.merge(self.any_member(Category::Way, &relation.way_ids), |a, b| {
                        a || b
                    });
                }
                if !step.value {
                    step = step.merge(
                        self.any_member(Category::Relation, &relation.relation_ids),
                        |a, b| a || b,
                    );
                }
                step
            }
        };
        self.walk.leave(key, depth, step)
    }

    fn any_member(&mut self, category: Category, ids: &[i64]) -> Step<bool> {
        let graph = self.graph;
        let mut step = Step::settled(false);
        for id in ids {
            if let Some(member) = graph.lookup(EntityKey::new(category, *id)) {
                step = step.merge(self.visit(member), |a, b| a || b);
                if step.value {
                    // A reached coordinate holds whatever path led here.
                    return Step::settled(true);
                }
            }
        }
        step
    }
}

/// Partial result together with the shallowest path depth it was cut at.
#[derive(Debug, Clone, Copy)]
struct Step<T> {
    value: T,
    cut: Option<usize>,
}

impl<T> Step<T> {
    const fn settled(value: T) -> Self {
        Self { value, cut: None }
    }

    const fn cut(value: T, depth: usize) -> Self {
        Self {
            value,
            cut: Some(depth),
        }
    }

    fn merge(self, other: Self, combine: impl FnOnce(T, T) -> T) -> Self {
        let cut = match (self.cut, other.cut) {
            (Some(left), Some(right)) => Some(left.min(right)),
            (left, None) => left,
            (None, right) => right,
        };
        Self {
            value: combine(self.value, other.value),
            cut,
        }
    }
}

enum Entry<T> {
    Settled(T),
    OnPath(usize),
    Fresh(usize),
}

/// Recursion path with depths, plus results that hold for any path.
#[derive(Debug)]
struct Walk<T> {
    path: HashMap<EntityKey, usize>,
    settled: HashMap<EntityKey, T>,
}

impl<T> Default for Walk<T> {
    fn default() -> Self {
        Self {
            path: HashMap::new(),
            settled: HashMap::new(),
        }
    }
}

impl<T: Copy> Walk<T> {
    fn enter(&mut self, key: EntityKey) -> Entry<T> {
        if let Some(value) = self.settled.get(&key) {
            return Entry::Settled(*value);
        }
        if let Some(depth) = self.path.get(&key) {
            return Entry::OnPath(*depth);
        }
        let depth = self.path.len();
        self.path.insert(key, depth);
        Entry::Fresh(depth)
    }

    /// Pop `key` and settle its result unless it was cut at an ancestor.
    fn leave(&mut self, key: EntityKey, depth: usize, step: Step<T>) -> Step<T> {
        self.path.remove(&key);
        match step.cut {
            Some(cut) if cut < depth => step,
            _ => {
                self.settled.insert(key, step.value);
                Step::settled(step.value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Node, Relation, Way};
    use crate::tags::Tags;
    use rstest::{fixture, rstest};

    fn origin() -> Coordinate {
        Coordinate::from_nanodegrees(52_520_000_000, 13_405_000_000).expect("valid origin")
    }

    fn node_north(id: i64, lat_offset: i64) -> Entity {
        let coordinate =
            Coordinate::from_nanodegrees(52_520_000_000 + lat_offset, 13_405_000_000)
                .expect("valid node");
        Entity::from(Node::new(id, coordinate, Tags::new()))
    }

    fn resolve(entity: &Entity, graph: &EntityGraph) -> Distance {
        resolve_distance(origin(), entity, graph)
    }

    /// Nodes at 120 m (1) and 600 m (2) north of the origin.
    #[fixture]
    fn graph() -> EntityGraph {
        [node_north(1, 1_081_000), node_north(2, 5_405_400)]
            .into_iter()
            .collect()
    }

    #[rstest]
    fn way_resolves_to_nearest_member(graph: EntityGraph) {
        let way = Entity::from(Way::new(10, vec![2, 1, 99], Tags::new()));
        assert_eq!(resolve(&way, &graph), Distance::Meters(120));
    }

    #[rstest]
    #[case(vec![])]
    #[case(vec![98, 99])]
    fn way_without_resolvable_members_is_unknown(graph: EntityGraph, #[case] refs: Vec<i64>) {
        let way = Entity::from(Way::new(10, refs, Tags::new()));
        assert_eq!(resolve(&way, &graph), Distance::Unknown);
    }

    #[rstest]
    fn relation_ignores_unresolvable_way_branch(mut graph: EntityGraph) {
        graph.insert(Entity::from(Way::new(10, vec![98], Tags::new())));
        graph.insert(Entity::from(Way::new(11, vec![2], Tags::new())));
        let relation = Entity::from(
            Relation::new(20, Tags::new())
                .with_member(Category::Way, 10)
                .with_member(Category::Way, 11),
        );
        assert_eq!(resolve(&relation, &graph), Distance::Meters(600));
    }

    #[rstest]
    fn self_reference_matches_relation_without_it(mut graph: EntityGraph) {
        let plain = Relation::new(20, Tags::new()).with_member(Category::Node, 2);
        let looped = plain.clone().with_member(Category::Relation, 20);
        graph.insert(Entity::from(looped.clone()));
        assert_eq!(
            resolve(&Entity::from(looped), &graph),
            resolve(&Entity::from(plain), &graph)
        );
    }

    #[rstest]
    fn mutual_cycle_terminates(mut graph: EntityGraph) {
        graph.insert(Entity::from(
            Relation::new(20, Tags::new()).with_member(Category::Relation, 21),
        ));
        graph.insert(Entity::from(
            Relation::new(21, Tags::new())
                .with_member(Category::Relation, 20)
                .with_member(Category::Node, 1),
        ));
        let outer = graph
            .lookup(EntityKey::relation(20))
            .cloned()
            .expect("relation present");
        assert_eq!(resolve(&outer, &graph), Distance::Meters(120));
    }

    #[rstest]
    fn shared_member_resolves_in_each_branch(mut graph: EntityGraph) {
        graph.insert(Entity::from(Way::new(10, vec![1], Tags::new())));
        graph.insert(Entity::from(
            Relation::new(30, Tags::new()).with_member(Category::Way, 10),
        ));
        let relation = Entity::from(
            Relation::new(31, Tags::new())
                .with_member(Category::Way, 10)
                .with_member(Category::Relation, 30),
        );
        let mut resolver = DistanceResolver::new(origin(), &graph);
        assert_eq!(resolver.resolve(&relation), Distance::Meters(120));
        let way = graph.lookup(EntityKey::way(10)).expect("way present");
        assert_eq!(resolver.resolve(way), Distance::Meters(120));
    }

    /// Relations 0..=depth where each level reaches the next through two
    /// intermediate relations, ending at node 2.
    fn diamond(mut graph: EntityGraph, depth: i64) -> EntityGraph {
        for level in 0..depth {
            let next = (level + 1) * 10;
            graph.insert(Entity::from(
                Relation::new(level * 10, Tags::new())
                    .with_member(Category::Relation, level * 10 + 1)
                    .with_member(Category::Relation, level * 10 + 2),
            ));
            for side in [1, 2] {
                graph.insert(Entity::from(
                    Relation::new(level * 10 + side, Tags::new())
                        .with_member(Category::Relation, next),
                ));
            }
        }
        graph.insert(Entity::from(
            Relation::new(depth * 10, Tags::new()).with_member(Category::Node, 2),
        ));
        graph
    }

    #[rstest]
    fn deep_diamonds_resolve_each_relation_once(graph: EntityGraph) {
        let graph = diamond(graph, 64);
        let top = graph.lookup(EntityKey::relation(0)).expect("top relation");
        assert_eq!(resolve(top, &graph), Distance::Meters(600));
        let bbox = BoundingBox::around(origin(), 1_000.0);
        assert!(reaches_bounding_box(top, &graph, bbox));
        let tight = BoundingBox::around(origin(), 100.0);
        assert!(!reaches_bounding_box(top, &graph, tight));
    }

    #[rstest]
    fn cycle_results_match_fresh_resolution(mut graph: EntityGraph) {
        graph.insert(Entity::from(
            Relation::new(20, Tags::new())
                .with_member(Category::Relation, 21)
                .with_member(Category::Node, 2),
        ));
        graph.insert(Entity::from(
            Relation::new(21, Tags::new())
                .with_member(Category::Relation, 20)
                .with_member(Category::Node, 1),
        ));
        let mut resolver = DistanceResolver::new(origin(), &graph);
        for key in [EntityKey::relation(20), EntityKey::relation(21)] {
            let entity = graph.lookup(key).expect("relation present");
            assert_eq!(resolver.resolve(entity), resolve(entity, &graph), "{key}");
            assert_eq!(resolver.resolve(entity), Distance::Meters(120), "{key}");
        }
    }

    #[rstest]
    fn bounding_box_reach_follows_members(graph: EntityGraph) {
        let bbox = BoundingBox::around(origin(), 500.0);
        let near = Entity::from(Way::new(10, vec![2, 1], Tags::new()));
        let far = Entity::from(Way::new(11, vec![2], Tags::new()));
        let mut reach = BoxReach::new(&graph, bbox);
        assert!(reach.reaches(&near));
        assert!(!reach.reaches(&far));
        assert!(!reaches_bounding_box(&far, &graph, bbox));
    }

    #[rstest]
    #[case(Distance::Meters(500), true)]
    #[case(Distance::Meters(501), false)]
    #[case(Distance::Unknown, false)]
    fn within_requires_known_distance(#[case] distance: Distance, #[case] expected: bool) {
        assert_eq!(distance.within(500.0), expected);
    }

    #[rstest]
    fn unknown_sorts_after_known() {
        let mut distances = vec![Distance::Unknown, Distance::Meters(7), Distance::Meters(3)];
        distances.sort();
        assert_eq!(
            distances,
            vec![Distance::Meters(3), Distance::Meters(7), Distance::Unknown]
        );
        assert_eq!(Distance::Unknown.to_string(), "unknown");
    }
}
