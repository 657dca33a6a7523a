//! Normalized, id-keyed entity storage.
//!
//! An [`EntityCollection`] owns entities of one type, looks them up by id, and
//! iterates them in insertion order. Every mutation bumps a [`Version`], which
//! derived queries use to decide whether a cached value is still current.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// A value stored in an [`EntityCollection`].
pub trait Entity {
    /// Identifier type; must stay fixed for the lifetime of the entity.
    type Id: Clone + Eq + Hash + fmt::Debug;

    /// The entity's identifier.
    fn id(&self) -> &Self::Id;
}

/// Change stamp of a collection.
///
/// Stamps are drawn from one process-wide counter, so two collections only
/// share a version while they hold the same contents: both empty, or one a
/// clone of the other that neither has mutated since.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u64);

impl Version {
    /// Raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }

    fn bump(&mut self) {
        *self = Self(NEXT_VERSION.fetch_add(1, Ordering::Relaxed));
    }
}

/// Entities keyed by id, preserving insertion order.
#[derive(Debug, Clone)]
pub struct EntityCollection<T: Entity> {
    ids: Vec<T::Id>,
    entities: HashMap<T::Id, T>,
    version: Version,
}

impl<T: Entity> Default for EntityCollection<T> {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            entities: HashMap::new(),
            version: Version::default(),
        }
    }
}

impl<T: Entity> EntityCollection<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current change version.
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.entities.contains_key(id)
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> &[T::Id] {
        &self.ids
    }

    /// Entities in insertion order.
    pub fn iter(&self) -> impl '_ + Iterator<Item = &T> {
        self.ids.iter().filter_map(|id| self.entities.get(id))
    }

    /// Inserts `entity`, replacing any entity with the same id. Returns the replaced entity.
    ///
    /// A replaced entity keeps its original position in the iteration order.
    pub fn upsert(&mut self, entity: T) -> Option<T> {
        let previous = self.insert_unversioned(entity);
        self.version.bump();
        previous
    }

    /// Inserts every entity of `entities` as one change.
    pub fn upsert_many(&mut self, entities: impl IntoIterator<Item = T>) {
        let mut changed = false;
        for entity in entities {
            self.insert_unversioned(entity);
            changed = true;
        }
        if changed {
            self.version.bump();
        }
    }

    /// Runs `f` on the entity with `id`. Returns false, without touching the
    /// version, when no such entity exists.
    pub fn update(&mut self, id: &T::Id, f: impl FnOnce(&mut T)) -> bool {
        match self.get_mut(id) {
            Some(entity) => {
                f(entity);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the entity with `id`.
    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        let entity = self.entities.remove(id)?;
        self.ids.retain(|i| i != id);
        self.version.bump();
        Some(entity)
    }

    /// Keeps only the entities for which `keep` returns true. Returns the number removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.ids.len();
        self.entities.retain(|_, entity| keep(entity));
        let entities = &self.entities;
        self.ids.retain(|id| entities.contains_key(id));
        let removed = before - self.ids.len();
        if removed > 0 {
            self.version.bump();
        }
        removed
    }

    pub(crate) fn get_mut(&mut self, id: &T::Id) -> Option<&mut T> {
        let entity = self.entities.get_mut(id)?;
        self.version.bump();
        Some(entity)
    }

    fn insert_unversioned(&mut self, entity: T) -> Option<T> {
        let id = entity.id().clone();
        let previous = self.entities.insert(id.clone(), entity);
        if previous.is_none() {
            self.ids.push(id);
        }
        previous
    }
}
