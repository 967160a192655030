//! Permanent modifiers: crystals and pets owned by an entity.
//!
//! [`PermanentModifiers`] is an immutable value. Every mutation returns a new
//! set, which the runtime swaps in atomically so concurrent resolver reads
//! always see a complete snapshot.

mod crystal;
mod error;
mod pet;

pub use crystal::{Crystal, CrystalKind};
pub use error::ModifierError;
pub use pet::Pet;

use crate::catalog::{BonusCatalog, SynergyDef, synergy_bonus};
use crate::category::BonusCategory;
use crate::types::{CrystalId, PetId};

/// Crystals, pets and the equipped crystal set of one entity.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PermanentModifiers {
    pub crystals: Vec<Crystal>,
    pub pets: Vec<Pet>,
    /// Equipped crystals. At most one per revealed type.
    pub equipped_crystals: Vec<CrystalId>,
}

impl PermanentModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.crystals.is_empty() && self.pets.is_empty()
    }

    pub fn crystal(&self, id: CrystalId) -> Option<&Crystal> {
        self.crystals.iter().find(|c| c.id() == id)
    }

    pub fn pet(&self, id: PetId) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id() == id)
    }

    pub fn is_equipped(&self, id: CrystalId) -> bool {
        self.equipped_crystals.contains(&id)
    }

    pub fn equipped_crystals(&self) -> impl Iterator<Item = &Crystal> {
        self.equipped_crystals.iter().filter_map(|id| self.crystal(*id))
    }

    pub fn equipped_pets(&self) -> impl Iterator<Item = &Pet> {
        self.pets.iter().filter(|p| p.is_equipped())
    }

    /// Next unused crystal id.
    ///
    /// Once `u32::MAX` is taken, the lowest free id is used instead.
    pub fn next_crystal_id(&self) -> CrystalId {
        CrystalId(next_free(self.crystals.iter().map(|c| c.id().0)))
    }

    /// Next unused pet id, with the same fallback as crystals.
    pub fn next_pet_id(&self) -> PetId {
        PetId(next_free(self.pets.iter().map(|p| p.id().0)))
    }

    /// Returns the set with `crystal` inserted, replacing any crystal with
    /// the same id.
    pub fn with_crystal(&self, crystal: Crystal) -> Self {
        let mut next = self.clone();
        match next.crystals.iter_mut().find(|c| c.id() == crystal.id()) {
            Some(slot) => *slot = crystal,
            None => next.crystals.push(crystal),
        }
        next
    }

    /// Returns the set with `pet` inserted, replacing any pet with the same id.
    pub fn with_pet(&self, pet: Pet) -> Self {
        let mut next = self.clone();
        match next.pets.iter_mut().find(|p| p.id() == pet.id()) {
            Some(slot) => *slot = pet,
            None => next.pets.push(pet),
        }
        next
    }

    /// Equips a revealed crystal.
    ///
    /// A crystal of the same type that is already equipped is unequipped, so
    /// the set keeps at most one crystal per type. Equipping an already
    /// equipped crystal is a no-op.
    pub fn equip_crystal(&self, id: CrystalId) -> Result<Self, ModifierError> {
        let crystal = self.crystal(id).ok_or(ModifierError::CrystalNotFound(id))?;
        let kind = crystal
            .type_id()
            .ok_or(ModifierError::CrystalUnrevealed(id))?;

        let mut next = self.clone();
        next.equipped_crystals.retain(|other| {
            *other != id && self.crystal(*other).and_then(Crystal::type_id) != Some(kind)
        });
        next.equipped_crystals.push(id);
        Ok(next)
    }

    pub fn unequip_crystal(&self, id: CrystalId) -> Result<Self, ModifierError> {
        if self.crystal(id).is_none() {
            return Err(ModifierError::CrystalNotFound(id));
        }
        let mut next = self.clone();
        next.equipped_crystals.retain(|other| *other != id);
        Ok(next)
    }

    pub fn set_pet_equipped(&self, id: PetId, equipped: bool) -> Result<Self, ModifierError> {
        let pet = self.pet(id).ok_or(ModifierError::PetNotFound(id))?;
        Ok(self.with_pet(pet.with_equipped(equipped)))
    }

    /// Sum of equipped crystal bonuses for `category`.
    pub fn crystal_bonus(&self, catalog: &BonusCatalog, category: BonusCategory) -> f64 {
        self.equipped_crystals()
            .map(|c| c.bonus_for(catalog, category))
            .sum()
    }

    /// Sum of equipped pet bonuses for `category`.
    pub fn pet_bonus(&self, catalog: &BonusCatalog, category: BonusCategory) -> f64 {
        self.equipped_pets()
            .map(|p| p.bonus_for(catalog, category))
            .sum()
    }

    /// Sum of every synergy whose triple is equipped.
    pub fn synergy_bonus(&self, catalog: &BonusCatalog, category: BonusCategory) -> f64 {
        catalog
            .synergies()
            .as_slice()
            .iter()
            .filter_map(|def| self.synergy_growth(def).map(|sum| synergy_bonus(def, category, sum)))
            .sum()
    }

    /// Growth sum of the equipped triple, if exactly its three pets are
    /// equipped.
    fn synergy_growth(&self, def: &SynergyDef) -> Option<u32> {
        let members: Vec<&Pet> = self
            .equipped_pets()
            .filter(|p| def.contains(p.kind()))
            .collect();
        if members.len() != 3 {
            return None;
        }
        let covers_all = def
            .pets
            .iter()
            .all(|kind| members.iter().any(|p| p.kind() == kind));
        covers_all.then(|| members.iter().map(|p| u32::from(p.growth())).sum())
    }
}

/// One past the highest id, or the lowest unused id from 1 when the highest
/// is `u32::MAX`.
fn next_free(ids: impl Iterator<Item = u32> + Clone) -> u32 {
    match ids.clone().max() {
        None => 1,
        Some(max) => match max.checked_add(1) {
            Some(next) => next,
            None => {
                let taken: std::collections::HashSet<u32> = ids.collect();
                (1..=u32::MAX).find(|id| !taken.contains(id)).unwrap_or(0)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CrystalTypeDef, PetTypeDef};
    use std::collections::BTreeMap;

    fn catalog() -> BonusCatalog {
        let pet = |id: &str, category| PetTypeDef {
            id: id.into(),
            display_name: id.into(),
            category,
            base_per_growth: 0.1,
        };
        BonusCatalog::builder()
            .crystal(CrystalTypeDef {
                id: "sell_gleam".into(),
                display_name: "Sell Gleam".into(),
                category: BonusCategory::SellPrice,
                per_level_rate: 1.0,
                cap: 10.0,
            })
            .pets([
                pet("mole", BonusCategory::MiningYield),
                pet("badger", BonusCategory::MiningYield),
                pet("dwarf", BonusCategory::SellPrice),
                pet("owl", BonusCategory::Xp),
            ])
            .synergy(SynergyDef {
                id: "diggers".into(),
                display_name: "Diggers".into(),
                pets: ["mole".into(), "badger".into(), "dwarf".into()],
                rates: BTreeMap::from([(BonusCategory::SellPrice, 0.2)]),
            })
            .build_strict()
            .unwrap()
    }

    fn equipped(id: u32, kind: &str, growth: u8) -> Pet {
        Pet::with_progress(PetId(id), kind, growth, 0).with_equipped(true)
    }

    #[test]
    fn equipping_same_type_replaces_previous() {
        let mods = PermanentModifiers::new()
            .with_crystal(Crystal::revealed(CrystalId(1), 3, "sell_gleam"))
            .with_crystal(Crystal::revealed(CrystalId(2), 9, "sell_gleam"));

        let mods = mods.equip_crystal(CrystalId(1)).unwrap();
        let mods = mods.equip_crystal(CrystalId(2)).unwrap();

        assert_eq!(mods.equipped_crystals, vec![CrystalId(2)]);
        assert_eq!(mods.crystal_bonus(&catalog(), BonusCategory::SellPrice), 9.0);
    }

    #[test]
    fn equip_rejects_unrevealed_and_missing() {
        let mods = PermanentModifiers::new().with_crystal(Crystal::unrevealed(CrystalId(1), 5));
        assert_eq!(
            mods.equip_crystal(CrystalId(1)),
            Err(ModifierError::CrystalUnrevealed(CrystalId(1)))
        );
        assert_eq!(
            mods.equip_crystal(CrystalId(9)),
            Err(ModifierError::CrystalNotFound(CrystalId(9)))
        );
        assert_eq!(
            mods.set_pet_equipped(PetId(1), true),
            Err(ModifierError::PetNotFound(PetId(1)))
        );
    }

    #[test]
    fn synergy_adds_rate_times_growth_sum() {
        let catalog = catalog();
        let mods = PermanentModifiers::new()
            .with_pet(equipped(1, "mole", 10))
            .with_pet(equipped(2, "badger", 20))
            .with_pet(equipped(3, "dwarf", 30));

        let synergy = mods.synergy_bonus(&catalog, BonusCategory::SellPrice);
        assert!((synergy - 12.0).abs() < 1e-9);
        assert_eq!(mods.synergy_bonus(&catalog, BonusCategory::Xp), 0.0);
    }

    #[test]
    fn synergy_needs_exactly_the_triple() {
        let catalog = catalog();
        let two = PermanentModifiers::new()
            .with_pet(equipped(1, "mole", 10))
            .with_pet(equipped(2, "badger", 20))
            .with_pet(Pet::with_progress(PetId(3), "dwarf", 30, 0));
        assert_eq!(two.synergy_bonus(&catalog, BonusCategory::SellPrice), 0.0);

        let four = two
            .with_pet(equipped(3, "dwarf", 30))
            .with_pet(equipped(4, "mole", 5));
        assert_eq!(four.synergy_bonus(&catalog, BonusCategory::SellPrice), 0.0);

        // An unrelated fourth pet does not break the triple.
        let with_owl = two
            .with_pet(equipped(3, "dwarf", 30))
            .with_pet(equipped(5, "owl", 40));
        assert!((with_owl.synergy_bonus(&catalog, BonusCategory::SellPrice) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn pet_bonus_only_counts_equipped() {
        let catalog = catalog();
        let mods = PermanentModifiers::new()
            .with_pet(equipped(1, "mole", 10))
            .with_pet(Pet::with_progress(PetId(2), "badger", 50, 0));
        assert!((mods.pet_bonus(&catalog, BonusCategory::MiningYield) - 1.0).abs() < 1e-9);
        assert_eq!(mods.next_pet_id(), PetId(3));
        assert_eq!(PermanentModifiers::new().next_crystal_id(), CrystalId(1));
    }

    #[test]
    fn next_id_after_max_reuses_a_free_slot() {
        let mods = PermanentModifiers::new()
            .with_pet(Pet::new(PetId(u32::MAX), "owl"))
            .with_pet(Pet::new(PetId(1), "owl"))
            .with_crystal(Crystal::unrevealed(CrystalId(u32::MAX), 4));
        assert_eq!(mods.next_pet_id(), PetId(2));
        assert_eq!(mods.next_crystal_id(), CrystalId(1));

        let grown = mods.with_pet(Pet::new(mods.next_pet_id(), "owl"));
        assert_eq!(grown.pets.len(), 3);
    }
}
