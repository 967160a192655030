//! File-based ProfileRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use economy_core::EntityId;

use super::error::{RepositoryError, Result};
use super::profile::EntityProfile;
use super::traits::ProfileRepository;

/// Stores each profile as `profile_{entity}.json` under `base_dir`.
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// mid-save leaves the previous profile intact.
pub struct FileProfileRepository {
    base_dir: PathBuf,
}

impl FileProfileRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn profile_path(&self, entity: EntityId) -> PathBuf {
        self.base_dir.join(format!("profile_{}.json", entity.0))
    }
}

impl ProfileRepository for FileProfileRepository {
    fn save(&self, entity: EntityId, profile: &EntityProfile) -> Result<()> {
        let path = self.profile_path(entity);
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(profile)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved profile[{}] to {}", entity, path.display());

        Ok(())
    }

    fn load(&self, entity: EntityId) -> Result<Option<EntityProfile>> {
        let path = self.profile_path(entity);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let profile: EntityProfile =
            serde_json::from_slice(&bytes).map_err(|e| RepositoryError::CorruptedData {
                entity: entity.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!("Loaded profile[{}] from {}", entity, path.display());

        Ok(Some(profile))
    }

    fn exists(&self, entity: EntityId) -> bool {
        self.profile_path(entity).exists()
    }

    fn delete(&self, entity: EntityId) -> Result<()> {
        let path = self.profile_path(entity);

        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted profile[{}]", entity);
        }

        Ok(())
    }

    fn list_entities(&self) -> Result<Vec<EntityId>> {
        let mut entities = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id) = filename
                    .strip_prefix("profile_")
                    .and_then(|s| s.strip_suffix(".json"))
                && let Ok(id) = id.parse::<u64>()
            {
                entities.push(EntityId(id));
            }
        }

        entities.sort_unstable();
        Ok(entities)
    }
}
