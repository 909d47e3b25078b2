//! Arena of extracted entities keyed by category and ID.

use std::collections::HashMap;

use crate::entity::{Category, Entity, EntityKey};

/// Read-only index of the entities extracted for one query.
///
/// Membership references are resolved through [`EntityGraph::lookup`]; a
/// missing entity means the member fell outside the extraction filters and
/// is not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityGraph {
    entities: HashMap<EntityKey, Entity>,
}

impl EntityGraph {
    /// An empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, replacing any previous entity with the same key.
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        self.entities.insert(entity.key(), entity)
    }

    /// Find an entity by key.
    #[must_use]
    pub fn lookup(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(&key)
    }

    /// Whether the graph holds an entity with this key.
    #[must_use]
    pub fn contains(&self, key: EntityKey) -> bool {
        self.entities.contains_key(&key)
    }

    /// Iterate over all entities in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Iterate over the entities of one category in arbitrary order.
    pub fn iter_category(&self, category: Category) -> impl Iterator<Item = &Entity> {
        self.iter().filter(move |entity| entity.category() == category)
    }

    /// Number of entities in `category`.
    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.iter_category(category).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl FromIterator<Entity> for EntityGraph {
    fn from_iter<T: IntoIterator<Item = Entity>>(iter: T) -> Self {
        let mut graph = Self::new();
        graph.extend(iter);
        graph
    }
}

impl Extend<Entity> for EntityGraph {
    fn extend<T: IntoIterator<Item = Entity>>(&mut self, iter: T) {
        for entity in iter {
            self.insert(entity);
        }
    }
}
