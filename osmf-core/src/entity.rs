//! Nodes, ways and relations.
//!
//! Entities never own each other. Ways and relations hold member IDs that
//! are resolved through an [`EntityGraph`](crate::EntityGraph) lookup, so
//! self-references and cycles need no special ownership handling.

use std::fmt;

use crate::coordinate::Coordinate;
use crate::tags::Tags;

/// Entity category discriminant.
///
/// The derived ordering (node, way, relation) is the enumeration order used
/// to break distance ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Category {
    /// A single point.
    Node,
    /// An ordered list of nodes.
    Way,
    /// A group of nodes, ways and relations.
    Relation,
}

impl Category {
    /// All categories in enumeration order.
    pub const ALL: [Self; 3] = [Self::Node, Self::Way, Self::Relation];

    /// Lowercase name, as used in OpenStreetMap URLs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of an entity: IDs are only unique within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey {
    /// Category the ID belongs to.
    pub category: Category,
    /// Source identifier.
    pub id: i64,
}

impl EntityKey {
    /// Construct a key.
    #[must_use]
    pub const fn new(category: Category, id: i64) -> Self {
        Self { category, id }
    }

    /// Key of a node.
    #[must_use]
    pub const fn node(id: i64) -> Self {
        Self::new(Category::Node, id)
    }

    /// Key of a way.
    #[must_use]
    pub const fn way(id: i64) -> Self {
        Self::new(Category::Way, id)
    }

    /// Key of a relation.
    #[must_use]
    pub const fn relation(id: i64) -> Self {
        Self::new(Category::Relation, id)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.id)
    }
}

/// A tagged point.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i64,
    pub coordinate: Coordinate,
    pub tags: Tags,
}

impl Node {
    #[must_use]
    pub fn new(id: i64, coordinate: Coordinate, tags: Tags) -> Self {
        Self {
            id,
            coordinate,
            tags,
        }
    }
}

/// An ordered path over node references. The list may be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Way {
    pub id: i64,
    pub node_ids: Vec<i64>,
    pub tags: Tags,
}

impl Way {
    #[must_use]
    pub fn new(id: i64, node_ids: Vec<i64>, tags: Tags) -> Self {
        Self { id, node_ids, tags }
    }
}

/// A grouping of members, split by member category and kept in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Relation {
    pub id: i64,
    pub node_ids: Vec<i64>,
    pub way_ids: Vec<i64>,
    pub relation_ids: Vec<i64>,
    pub tags: Tags,
}

impl Relation {
    /// Construct a relation without members.
    #[must_use]
    pub fn new(id: i64, tags: Tags) -> Self {
        Self {
            id,
            tags,
            ..Self::default()
        }
    }

    /// Append a member reference of the given category.
    pub fn push_member(&mut self, category: Category, id: i64) {
        match category {
            Category::Node => self.node_ids.push(id),
            Category::Way => self.way_ids.push(id),
            Category::Relation => self.relation_ids.push(id),
        }
    }

    /// Builder-style variant of [`Relation::push_member`].
    #[must_use]
    pub fn with_member(mut self, category: Category, id: i64) -> Self {
        self.push_member(category, id);
        self
    }
}

/// The unit of matching, filtering and output.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Node(Node),
    Way(Way),
    Relation(Relation),
}

impl Entity {
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Node(_) => Category::Node,
            Self::Way(_) => Category::Way,
            Self::Relation(_) => Category::Relation,
        }
    }

    #[must_use]
    pub const fn id(&self) -> i64 {
        match self {
            Self::Node(node) => node.id,
            Self::Way(way) => way.id,
            Self::Relation(relation) => relation.id,
        }
    }

    #[must_use]
    pub const fn key(&self) -> EntityKey {
        EntityKey::new(self.category(), self.id())
    }

    #[must_use]
    pub fn tags(&self) -> &Tags {
        match self {
            Self::Node(node) => &node.tags,
            Self::Way(way) => &way.tags,
            Self::Relation(relation) => &relation.tags,
        }
    }
}

impl From<Node> for Entity {
    fn from(value: Node) -> Self {
        Self::Node(value)
    }
}

impl From<Way> for Entity {
    fn from(value: Way) -> Self {
        Self::Way(value)
    }
}

impl From<Relation> for Entity {
    fn from(value: Relation) -> Self {
        Self::Relation(value)
    }
}
