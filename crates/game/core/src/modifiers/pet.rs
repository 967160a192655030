//! Pets: permanent modifiers that grow with experience.

use crate::catalog::{BonusCatalog, PetTypeDef, pet_bonus};
use crate::category::BonusCategory;
use crate::types::{ContentId, PetId};

/// A pet owned by an entity.
///
/// Growth is a saturating step counter over total XP: every
/// [`Pet::XP_PER_GROWTH`] XP adds one growth point up to
/// [`Pet::MAX_GROWTH`], the remainder carries between calls, and XP gained at
/// the cap is discarded. The result does not depend on how XP was batched.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "PetRecord", into = "PetRecord"))]
pub struct Pet {
    id: PetId,
    kind: ContentId,
    growth: u8,
    xp: u32,
    equipped: bool,
}

impl Pet {
    pub const XP_PER_GROWTH: u32 = 100;
    pub const MAX_GROWTH: u8 = 50;

    pub fn new(id: PetId, kind: impl Into<ContentId>) -> Self {
        Self {
            id,
            kind: kind.into(),
            growth: 0,
            xp: 0,
            equipped: false,
        }
    }

    /// Rebuilds a pet from stored progress, normalizing it so the
    /// growth/xp invariants hold.
    pub fn with_progress(id: PetId, kind: impl Into<ContentId>, growth: u8, xp: u32) -> Self {
        let base = Self {
            growth: growth.min(Self::MAX_GROWTH),
            ..Self::new(id, kind)
        };
        base.gain_xp(xp)
    }

    pub fn id(&self) -> PetId {
        self.id
    }

    pub fn kind(&self) -> &ContentId {
        &self.kind
    }

    pub fn growth(&self) -> u8 {
        self.growth
    }

    /// XP accumulated towards the next growth point.
    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn is_equipped(&self) -> bool {
        self.equipped
    }

    pub fn is_maxed(&self) -> bool {
        self.growth >= Self::MAX_GROWTH
    }

    /// Returns the pet after gaining `amount` XP.
    pub fn gain_xp(&self, amount: u32) -> Pet {
        let mut next = self.clone();
        if next.is_maxed() {
            next.xp = 0;
            return next;
        }

        let total = u64::from(next.xp) + u64::from(amount);
        let per = u64::from(Self::XP_PER_GROWTH);
        let headroom = u64::from(Self::MAX_GROWTH - next.growth);
        let steps = (total / per).min(headroom);

        next.growth += steps as u8;
        next.xp = if next.is_maxed() {
            0
        } else {
            (total - steps * per) as u32
        };
        next
    }

    pub fn with_equipped(&self, equipped: bool) -> Pet {
        Pet {
            equipped,
            ..self.clone()
        }
    }

    pub fn definition<'a>(&self, catalog: &'a BonusCatalog) -> Option<&'a PetTypeDef> {
        catalog.pets().get(self.kind.as_str())
    }

    /// Bonus this pet contributes to `category`, regardless of equip state.
    pub fn bonus_for(&self, catalog: &BonusCatalog, category: BonusCategory) -> f64 {
        match self.definition(catalog) {
            Some(def) if def.category == category => pet_bonus(def, self.growth),
            _ => 0.0,
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct PetRecord {
    id: PetId,
    kind: ContentId,
    growth: u8,
    xp: u32,
    #[serde(default)]
    equipped: bool,
}

#[cfg(feature = "serde")]
impl From<PetRecord> for Pet {
    fn from(record: PetRecord) -> Self {
        Pet::with_progress(record.id, record.kind, record.growth, record.xp)
            .with_equipped(record.equipped)
    }
}

#[cfg(feature = "serde")]
impl From<Pet> for PetRecord {
    fn from(pet: Pet) -> Self {
        PetRecord {
            id: pet.id,
            kind: pet.kind,
            growth: pet.growth,
            xp: pet.xp,
            equipped: pet.equipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet() -> Pet {
        Pet::new(PetId(1), "mole")
    }

    #[test]
    fn xp_carries_between_calls() {
        let once = pet().gain_xp(250);
        let batched = (0..5).fold(pet(), |p, _| p.gain_xp(50));

        assert_eq!(once.growth(), 2);
        assert_eq!(once.xp(), 50);
        assert_eq!(once, batched);
    }

    #[test]
    fn growth_saturates_at_cap() {
        let huge = pet().gain_xp(u32::MAX);
        assert_eq!(huge.growth(), Pet::MAX_GROWTH);
        assert_eq!(huge.xp(), 0);

        let mut small = pet();
        let mut last = 0;
        for _ in 0..700 {
            small = small.gain_xp(10);
            assert!(small.growth() >= last);
            last = small.growth();
        }
        assert_eq!(small.growth(), Pet::MAX_GROWTH);
        assert_eq!(small, huge);
    }

    #[test]
    fn xp_at_cap_is_discarded() {
        let maxed = pet().gain_xp(5_000);
        assert!(maxed.is_maxed());
        assert_eq!(maxed.gain_xp(99), maxed);
    }

    #[test]
    fn boundary_just_below_cap() {
        let near = Pet::with_progress(PetId(2), "mole", 49, 90);
        let next = near.gain_xp(500);
        assert_eq!(next.growth(), 50);
        assert_eq!(next.xp(), 0);
    }

    #[test]
    fn with_progress_normalizes() {
        let p = Pet::with_progress(PetId(3), "mole", 200, 350);
        assert_eq!(p.growth(), 50);
        assert_eq!(p.xp(), 0);

        let q = Pet::with_progress(PetId(3), "mole", 1, 350);
        assert_eq!(q.growth(), 4);
        assert_eq!(q.xp(), 50);
    }
}
