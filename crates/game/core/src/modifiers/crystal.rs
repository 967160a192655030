//! Crystals: leveled permanent modifiers with a hidden type until revealed.

use rand::Rng;

use crate::catalog::{BonusCatalog, CatalogError, CatalogEntry, CrystalTypeDef, crystal_bonus};
use crate::category::BonusCategory;
use crate::types::{ContentId, CrystalId};

/// Whether a crystal's effect type is known yet.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrystalKind {
    Unrevealed,
    Revealed(ContentId),
}

/// A crystal owned by an entity.
///
/// Immutable: [`Crystal::reveal`] returns a new value with the same id and
/// level, so readers holding the old value never see a half-revealed crystal.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "CrystalRecord", into = "CrystalRecord"))]
pub struct Crystal {
    id: CrystalId,
    level: u8,
    kind: CrystalKind,
}

impl Crystal {
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 20;

    /// Creates a crystal, clamping `level` into `MIN_LEVEL..=MAX_LEVEL`.
    pub fn new(id: CrystalId, level: u8, kind: CrystalKind) -> Self {
        Self {
            id,
            level: level.clamp(Self::MIN_LEVEL, Self::MAX_LEVEL),
            kind,
        }
    }

    pub fn unrevealed(id: CrystalId, level: u8) -> Self {
        Self::new(id, level, CrystalKind::Unrevealed)
    }

    pub fn revealed(id: CrystalId, level: u8, type_id: impl Into<ContentId>) -> Self {
        Self::new(id, level, CrystalKind::Revealed(type_id.into()))
    }

    pub fn id(&self) -> CrystalId {
        self.id
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn kind(&self) -> &CrystalKind {
        &self.kind
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self.kind, CrystalKind::Revealed(_))
    }

    /// Effect type, once revealed.
    pub fn type_id(&self) -> Option<&ContentId> {
        match &self.kind {
            CrystalKind::Revealed(id) => Some(id),
            CrystalKind::Unrevealed => None,
        }
    }

    /// Resolves this crystal's type definition.
    ///
    /// `None` while unrevealed or when the type is not in the catalog.
    pub fn definition<'a>(&self, catalog: &'a BonusCatalog) -> Option<&'a CrystalTypeDef> {
        self.type_id().and_then(|id| catalog.crystals().get(id.as_str()))
    }

    /// Reveals the crystal with a type drawn uniformly from the catalog.
    ///
    /// Revealing an already revealed crystal returns an identical copy, so
    /// the call is idempotent.
    ///
    /// # Errors
    ///
    /// [`CatalogError::EmptyCatalog`] if no crystal types are configured.
    pub fn reveal<R: Rng + ?Sized>(
        &self,
        catalog: &BonusCatalog,
        rng: &mut R,
    ) -> Result<Crystal, CatalogError> {
        if self.is_revealed() {
            return Ok(self.clone());
        }

        let types = catalog.crystals().as_slice();
        if types.is_empty() {
            return Err(CatalogError::EmptyCatalog {
                kind: CrystalTypeDef::KIND,
            });
        }

        let chosen = &types[rng.gen_range(0..types.len())];
        Ok(Self {
            id: self.id,
            level: self.level,
            kind: CrystalKind::Revealed(chosen.id.clone()),
        })
    }

    /// Bonus this crystal contributes to `category` (0 when unrevealed,
    /// unknown, or bound to another category).
    pub fn bonus_for(&self, catalog: &BonusCatalog, category: BonusCategory) -> f64 {
        match self.definition(catalog) {
            Some(def) if def.category == category => crystal_bonus(def, self.level),
            _ => 0.0,
        }
    }
}

/// Serialized shape; deserializing goes through [`Crystal::new`] so stored
/// levels are clamped too.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct CrystalRecord {
    id: CrystalId,
    level: u8,
    kind: CrystalKind,
}

#[cfg(feature = "serde")]
impl From<CrystalRecord> for Crystal {
    fn from(record: CrystalRecord) -> Self {
        Crystal::new(record.id, record.level, record.kind)
    }
}

#[cfg(feature = "serde")]
impl From<Crystal> for CrystalRecord {
    fn from(crystal: Crystal) -> Self {
        CrystalRecord {
            id: crystal.id,
            level: crystal.level,
            kind: crystal.kind,
        }
    }
}
