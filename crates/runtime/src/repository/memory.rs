//! In-memory ProfileRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use economy_core::EntityId;

use super::error::{RepositoryError, Result};
use super::profile::EntityProfile;
use super::traits::ProfileRepository;

/// Keeps profiles in a process-local map. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryProfileRepo {
    profiles: RwLock<HashMap<EntityId, EntityProfile>>,
}

impl InMemoryProfileRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with profiles already stored.
    pub fn with_profiles(profiles: impl IntoIterator<Item = (EntityId, EntityProfile)>) -> Self {
        Self {
            profiles: RwLock::new(profiles.into_iter().collect()),
        }
    }
}

impl ProfileRepository for InMemoryProfileRepo {
    fn save(&self, entity: EntityId, profile: &EntityProfile) -> Result<()> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        profiles.insert(entity, profile.clone());
        Ok(())
    }

    fn load(&self, entity: EntityId) -> Result<Option<EntityProfile>> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(profiles.get(&entity).cloned())
    }

    fn exists(&self, entity: EntityId) -> bool {
        self.profiles
            .read()
            .map(|profiles| profiles.contains_key(&entity))
            .unwrap_or(false)
    }

    fn delete(&self, entity: EntityId) -> Result<()> {
        let mut profiles = self
            .profiles
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        profiles.remove(&entity);
        Ok(())
    }

    fn list_entities(&self) -> Result<Vec<EntityId>> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut entities: Vec<EntityId> = profiles.keys().copied().collect();
        entities.sort_unstable();
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use economy_core::{Crystal, CrystalId};

    #[test]
    fn save_load_delete() {
        let repo = InMemoryProfileRepo::new();
        let entity = EntityId(7);
        assert_eq!(repo.load(entity).unwrap(), None);

        let profile = EntityProfile {
            crystals: vec![Crystal::unrevealed(CrystalId(1), 4)],
            ..EntityProfile::default()
        };
        repo.save(entity, &profile).unwrap();
        assert!(repo.exists(entity));
        assert_eq!(repo.load(entity).unwrap(), Some(profile));
        assert_eq!(repo.list_entities().unwrap(), vec![entity]);

        repo.delete(entity).unwrap();
        assert!(!repo.exists(entity));
    }
}
