//! Catalog definition records and the formulas that operate on them.
//!
//! Definitions are plain data: adding a new boost, crystal or pet type is a
//! content change, not a code change.

use std::collections::BTreeMap;

use crate::catalog::CatalogError;
use crate::category::BonusCategory;
use crate::types::ContentId;

/// Common surface of every catalog record.
pub trait CatalogEntry {
    /// Kind label used in error messages and logs.
    const KIND: &'static str;

    fn id(&self) -> &ContentId;

    /// Checks the record's own numeric invariants.
    fn validate(&self) -> Result<(), CatalogError> {
        Ok(())
    }
}

/// A consumable boost item that starts a timed boost when used.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoostTypeDef {
    pub id: ContentId,
    pub display_name: String,
    pub category: BonusCategory,
    pub bonus_percent: f64,
    pub duration_secs: u64,
}

impl CatalogEntry for BoostTypeDef {
    const KIND: &'static str = "boost";

    fn id(&self) -> &ContentId {
        &self.id
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.duration_secs == 0 {
            return Err(CatalogError::invalid(Self::KIND, &self.id, "duration_secs"));
        }
        ensure_rate(Self::KIND, &self.id, "bonus_percent", self.bonus_percent)
    }
}

/// A crystal effect kind: bonus grows linearly with level up to a cap.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrystalTypeDef {
    pub id: ContentId,
    pub display_name: String,
    pub category: BonusCategory,
    pub per_level_rate: f64,
    pub cap: f64,
}

impl CatalogEntry for CrystalTypeDef {
    const KIND: &'static str = "crystal";

    fn id(&self) -> &ContentId {
        &self.id
    }

    fn validate(&self) -> Result<(), CatalogError> {
        ensure_rate(Self::KIND, &self.id, "per_level_rate", self.per_level_rate)?;
        ensure_rate(Self::KIND, &self.id, "cap", self.cap)
    }
}

/// A pet kind: bonus grows linearly with growth.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PetTypeDef {
    pub id: ContentId,
    pub display_name: String,
    pub category: BonusCategory,
    pub base_per_growth: f64,
}

impl CatalogEntry for PetTypeDef {
    const KIND: &'static str = "pet";

    fn id(&self) -> &ContentId {
        &self.id
    }

    fn validate(&self) -> Result<(), CatalogError> {
        ensure_rate(Self::KIND, &self.id, "base_per_growth", self.base_per_growth)
    }
}

/// Extra bonus unlocked when all three named pets are equipped together.
///
/// The bonus for a category is `rate * sum of the three pets' growth`;
/// categories missing from `rates` get nothing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynergyDef {
    pub id: ContentId,
    pub display_name: String,
    pub pets: [ContentId; 3],
    pub rates: BTreeMap<BonusCategory, f64>,
}

impl SynergyDef {
    pub fn rate(&self, category: BonusCategory) -> f64 {
        self.rates.get(&category).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, pet_type: &ContentId) -> bool {
        self.pets.contains(pet_type)
    }
}

impl CatalogEntry for SynergyDef {
    const KIND: &'static str = "synergy";

    fn id(&self) -> &ContentId {
        &self.id
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let [a, b, c] = &self.pets;
        if a == b || b == c || a == c {
            // The three members must be distinct types.
            return Err(CatalogError::invalid(Self::KIND, &self.id, "pets"));
        }
        for rate in self.rates.values() {
            ensure_rate(Self::KIND, &self.id, "rates", *rate)?;
        }
        Ok(())
    }
}

/// `min(level * per_level_rate, cap)`.
pub fn crystal_bonus(def: &CrystalTypeDef, level: u8) -> f64 {
    (f64::from(level) * def.per_level_rate).min(def.cap)
}

/// `base_per_growth * growth`.
pub fn pet_bonus(def: &PetTypeDef, growth: u8) -> f64 {
    def.base_per_growth * f64::from(growth)
}

/// `rate(category) * growth_sum`.
pub fn synergy_bonus(def: &SynergyDef, category: BonusCategory, growth_sum: u32) -> f64 {
    def.rate(category) * f64::from(growth_sum)
}

fn ensure_rate(
    kind: &'static str,
    id: &ContentId,
    field: &'static str,
    value: f64,
) -> Result<(), CatalogError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CatalogError::invalid(kind, id, field))
    }
}
