//! Per-entity permanent modifiers with replace-on-write.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use economy_core::{EntityId, PermanentModifiers};

/// Holds one immutable [`PermanentModifiers`] snapshot per entity.
///
/// Readers clone the `Arc` and work on a complete snapshot; writers build a
/// new value and swap it in while holding the entity's shard entry.
#[derive(Debug, Default)]
pub struct PermanentModifierStore {
    entries: DashMap<EntityId, Arc<PermanentModifiers>>,
    empty: Arc<PermanentModifiers>,
}

impl PermanentModifierStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot; an entity with nothing stored gets an empty set.
    pub fn get(&self, entity: EntityId) -> Arc<PermanentModifiers> {
        self.entries
            .get(&entity)
            .map(|entry| Arc::clone(entry.value()))
            .unwrap_or_else(|| Arc::clone(&self.empty))
    }

    pub fn replace(&self, entity: EntityId, modifiers: PermanentModifiers) {
        self.entries.insert(entity, Arc::new(modifiers));
    }

    /// Applies `f` to the current snapshot, stores the set it returns and
    /// hands back its second value.
    ///
    /// The entity's entry stays locked for the duration of `f`, so two
    /// updates of the same entity never interleave. On error nothing changes.
    pub fn update<T, E>(
        &self,
        entity: EntityId,
        f: impl FnOnce(&PermanentModifiers) -> Result<(PermanentModifiers, T), E>,
    ) -> Result<T, E> {
        match self.entries.entry(entity) {
            Entry::Occupied(mut entry) => {
                let (next, out) = f(entry.get())?;
                entry.insert(Arc::new(next));
                Ok(out)
            }
            Entry::Vacant(entry) => {
                let (next, out) = f(&self.empty)?;
                entry.insert(Arc::new(next));
                Ok(out)
            }
        }
    }

    /// Infallible form of [`update`](Self::update).
    pub fn apply<T>(
        &self,
        entity: EntityId,
        f: impl FnOnce(&PermanentModifiers) -> (PermanentModifiers, T),
    ) -> T {
        let Ok(out) = self.update::<T, std::convert::Infallible>(entity, |m| Ok(f(m)));
        out
    }

    pub fn remove(&self, entity: EntityId) -> Option<Arc<PermanentModifiers>> {
        self.entries.remove(&entity).map(|(_, modifiers)| modifiers)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
