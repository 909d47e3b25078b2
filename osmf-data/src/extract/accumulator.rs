//! Per-blob accumulator for OSM PBF extraction.
//!
//! Each decoded element is judged on its own, so accumulators built from
//! different blobs combine in any order.
use geo::{Coord, Rect};
use osmf_core::{Admission, Category, Coordinate, Entity, EntityGraph, Node, Relation, Tags, Way};
use osmpbf::{Element, RelMemberType};

use super::{Extraction, ExtractionSummary};

#[derive(Debug, Default)]
pub(super) struct EntityAccumulator {
    summary: ExtractionSummary,
    entities: Vec<Entity>,
}

impl EntityAccumulator {
    pub(super) fn process_element(&mut self, admission: &Admission<'_>, element: Element<'_>) {
        match element {
            Element::Node(node) => self.process_node(
                admission,
                node.id(),
                node.nano_lat(),
                node.nano_lon(),
                node.tags(),
                node.tags(),
            ),
            Element::DenseNode(node) => self.process_node(
                admission,
                node.id(),
                node.nano_lat(),
                node.nano_lon(),
                node.tags(),
                node.tags(),
            ),
            Element::Way(way) => {
                self.process_way(admission, way.id(), way.refs(), way.tags(), way.tags());
            }
            Element::Relation(relation) => {
                let members = relation
                    .members()
                    .map(|member| (member_category(&member.member_type), member.member_id));
                self.process_relation(
                    admission,
                    relation.id(),
                    members,
                    relation.tags(),
                    relation.tags(),
                );
            }
        }
    }

    /// `filter_tags` and `tags` must yield the same pairs; the first is
    /// consumed by admission and the second only when the node is kept.
    pub(super) fn process_node<'a, F, T>(
        &mut self,
        admission: &Admission<'_>,
        id: i64,
        nano_lat: i64,
        nano_lon: i64,
        filter_tags: F,
        tags: T,
    ) where
        F: IntoIterator<Item = (&'a str, &'a str)>,
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.summary.scanned.record(Category::Node);
        let Some(coordinate) = Coordinate::from_nanodegrees(nano_lat, nano_lon) else {
            self.summary.invalid_nodes += 1;
            return;
        };
        let point = Coord {
            x: coordinate.lon_degrees(),
            y: coordinate.lat_degrees(),
        };
        self.summary.include_bounds(Rect::new(point, point));
        if !admission.admits_node(coordinate, filter_tags) {
            return;
        }
        self.keep(Node::new(id, coordinate, collect_tags(tags)).into());
    }

    pub(super) fn process_way<'a, R, F, T>(
        &mut self,
        admission: &Admission<'_>,
        id: i64,
        refs: R,
        filter_tags: F,
        tags: T,
    ) where
        R: IntoIterator<Item = i64>,
        F: IntoIterator<Item = (&'a str, &'a str)>,
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.summary.scanned.record(Category::Way);
        if !admission.admits_grouping(Category::Way, filter_tags) {
            return;
        }
        let node_ids = refs.into_iter().collect();
        self.keep(Way::new(id, node_ids, collect_tags(tags)).into());
    }

    pub(super) fn process_relation<'a, M, F, T>(
        &mut self,
        admission: &Admission<'_>,
        id: i64,
        members: M,
        filter_tags: F,
        tags: T,
    ) where
        M: IntoIterator<Item = (Category, i64)>,
        F: IntoIterator<Item = (&'a str, &'a str)>,
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.summary.scanned.record(Category::Relation);
        if !admission.admits_grouping(Category::Relation, filter_tags) {
            return;
        }
        let mut relation = Relation::new(id, collect_tags(tags));
        for (category, member_id) in members {
            relation.push_member(category, member_id);
        }
        self.keep(relation.into());
    }

    fn keep(&mut self, entity: Entity) {
        self.summary.kept.record(entity.category());
        self.entities.push(entity);
    }

    pub(super) fn combine(mut self, other: Self) -> Self {
        self.summary = self.summary.combine(other.summary);
        self.entities.extend(other.entities);
        self
    }

    pub(super) fn into_extraction(self) -> Extraction {
        Extraction {
            graph: self.entities.into_iter().collect::<EntityGraph>(),
            summary: self.summary,
        }
    }
}

fn member_category(member_type: &RelMemberType) -> Category {
    match member_type {
        RelMemberType::Node => Category::Node,
        RelMemberType::Way => Category::Way,
        RelMemberType::Relation => Category::Relation,
    }
}

fn collect_tags<'a, I>(tags: I) -> Tags
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    tags.into_iter()
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .collect()
}
