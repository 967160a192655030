//! Persisted shape of one entity's economy state.

use serde::{Deserialize, Serialize};

use economy_core::{
    BonusCategory, BoostError, BoostInstance, BoostScope, CatalogError, Crystal, CrystalId, Pet,
    Timestamp,
};

/// A player-scoped boost as stored on disk.
///
/// The category is kept by name so a category removed from the game shows
/// up as an unknown type on load instead of failing the whole profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredBoost {
    pub category: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub bonus_percent: f64,
}

impl StoredBoost {
    pub fn from_instance(boost: &BoostInstance) -> Self {
        Self {
            category: boost.category.as_ref().to_string(),
            start: boost.start,
            end: boost.end,
            bonus_percent: boost.bonus_percent,
        }
    }

    pub fn category(&self) -> Result<BonusCategory, CatalogError> {
        BonusCategory::parse(&self.category)
    }

    /// Rebuilds the player-scoped instance for an already resolved category.
    pub fn to_instance(&self, category: BonusCategory) -> Result<BoostInstance, BoostError> {
        BoostInstance::with_window(
            category,
            BoostScope::Player,
            self.start,
            self.end,
            self.bonus_percent,
        )
    }
}

/// Everything persisted for one entity.
///
/// Admin-global boosts are never part of a profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityProfile {
    pub boosts: Vec<StoredBoost>,
    pub crystals: Vec<Crystal>,
    pub pets: Vec<Pet>,
    pub equipped_crystals: Vec<CrystalId>,
}

impl EntityProfile {
    pub fn is_empty(&self) -> bool {
        self.boosts.is_empty() && self.crystals.is_empty() && self.pets.is_empty()
    }
}
