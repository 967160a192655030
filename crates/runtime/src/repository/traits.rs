//! Repository contract for per-entity persisted economy state.

use economy_core::EntityId;

use super::error::Result;
use super::profile::EntityProfile;

/// Storage of [`EntityProfile`]s keyed by entity.
///
/// Calls are blocking; the runtime drives them from `spawn_blocking`.
pub trait ProfileRepository: Send + Sync {
    /// Replace the stored profile of `entity`.
    fn save(&self, entity: EntityId, profile: &EntityProfile) -> Result<()>;

    /// Load the stored profile, `None` if the entity was never saved.
    fn load(&self, entity: EntityId) -> Result<Option<EntityProfile>>;

    fn exists(&self, entity: EntityId) -> bool;

    fn delete(&self, entity: EntityId) -> Result<()>;

    /// List every entity with a stored profile.
    fn list_entities(&self) -> Result<Vec<EntityId>> {
        Ok(vec![])
    }
}
