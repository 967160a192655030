//! Static registry of boost, crystal and pet types and pet synergies.
//!
//! The catalog is built once at startup from configuration and is immutable
//! afterwards; share it behind an `Arc`.

mod defs;
mod error;

pub use defs::{
    BoostTypeDef, CatalogEntry, CrystalTypeDef, PetTypeDef, SynergyDef, crystal_bonus, pet_bonus,
    synergy_bonus,
};
pub use error::CatalogError;

use std::collections::HashMap;

use crate::types::ContentId;

/// Declaration-ordered records with an id index.
#[derive(Clone, Debug)]
pub struct Registry<T> {
    entries: Vec<T>,
    index: HashMap<ContentId, usize>,
}

impl<T: CatalogEntry> Registry<T> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn insert(&mut self, entry: T) -> Result<(), CatalogError> {
        entry.validate()?;
        if self.index.contains_key(entry.id()) {
            return Err(CatalogError::DuplicateType {
                kind: T::KIND,
                id: entry.id().to_string(),
            });
        }
        self.index.insert(entry.id().clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// Like [`Registry::get`] but reports a miss as [`CatalogError::UnknownType`].
    pub fn require(&self, id: &str) -> Result<&T, CatalogError> {
        self.get(id).ok_or_else(|| CatalogError::unknown(T::KIND, id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Entries in declaration order.
    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable bonus catalog.
#[derive(Clone, Debug)]
pub struct BonusCatalog {
    boosts: Registry<BoostTypeDef>,
    crystals: Registry<CrystalTypeDef>,
    pets: Registry<PetTypeDef>,
    synergies: Registry<SynergyDef>,
}

impl BonusCatalog {
    pub fn builder() -> BonusCatalogBuilder {
        BonusCatalogBuilder::default()
    }

    /// Catalog with no entries. Every lookup misses and every
    /// contribution resolves to zero.
    pub fn empty() -> Self {
        Self {
            boosts: Registry::new(),
            crystals: Registry::new(),
            pets: Registry::new(),
            synergies: Registry::new(),
        }
    }

    pub fn boosts(&self) -> &Registry<BoostTypeDef> {
        &self.boosts
    }

    pub fn crystals(&self) -> &Registry<CrystalTypeDef> {
        &self.crystals
    }

    pub fn pets(&self) -> &Registry<PetTypeDef> {
        &self.pets
    }

    pub fn synergies(&self) -> &Registry<SynergyDef> {
        &self.synergies
    }
}

impl Default for BonusCatalog {
    fn default() -> Self {
        Self::empty()
    }
}

/// Collects definitions and validates them into a [`BonusCatalog`].
///
/// Validation is per record: a bad record is skipped and reported, the rest
/// of the catalog is still built.
#[derive(Default)]
pub struct BonusCatalogBuilder {
    boosts: Vec<BoostTypeDef>,
    crystals: Vec<CrystalTypeDef>,
    pets: Vec<PetTypeDef>,
    synergies: Vec<SynergyDef>,
}

impl BonusCatalogBuilder {
    pub fn boost(mut self, def: BoostTypeDef) -> Self {
        self.boosts.push(def);
        self
    }

    pub fn crystal(mut self, def: CrystalTypeDef) -> Self {
        self.crystals.push(def);
        self
    }

    pub fn pet(mut self, def: PetTypeDef) -> Self {
        self.pets.push(def);
        self
    }

    pub fn synergy(mut self, def: SynergyDef) -> Self {
        self.synergies.push(def);
        self
    }

    pub fn boosts(mut self, defs: impl IntoIterator<Item = BoostTypeDef>) -> Self {
        self.boosts.extend(defs);
        self
    }

    pub fn crystals(mut self, defs: impl IntoIterator<Item = CrystalTypeDef>) -> Self {
        self.crystals.extend(defs);
        self
    }

    pub fn pets(mut self, defs: impl IntoIterator<Item = PetTypeDef>) -> Self {
        self.pets.extend(defs);
        self
    }

    pub fn synergies(mut self, defs: impl IntoIterator<Item = SynergyDef>) -> Self {
        self.synergies.extend(defs);
        self
    }

    /// Builds the catalog, returning the records that were skipped.
    pub fn build(self) -> (BonusCatalog, Vec<CatalogError>) {
        let mut catalog = BonusCatalog::empty();
        let mut skipped = Vec::new();

        for def in self.boosts {
            if let Err(e) = catalog.boosts.insert(def) {
                skipped.push(e);
            }
        }
        for def in self.crystals {
            if let Err(e) = catalog.crystals.insert(def) {
                skipped.push(e);
            }
        }
        for def in self.pets {
            if let Err(e) = catalog.pets.insert(def) {
                skipped.push(e);
            }
        }

        // Synergies reference pets, so they are checked after all pets exist.
        for def in self.synergies {
            if let Some(missing) = def.pets.iter().find(|p| !catalog.pets.contains(p.as_str())) {
                skipped.push(CatalogError::unknown(PetTypeDef::KIND, missing));
                continue;
            }
            if let Err(e) = catalog.synergies.insert(def) {
                skipped.push(e);
            }
        }

        (catalog, skipped)
    }

    /// Builds the catalog, failing on the first skipped record.
    pub fn build_strict(self) -> Result<BonusCatalog, CatalogError> {
        let (catalog, mut skipped) = self.build();
        match skipped.drain(..).next() {
            Some(err) => Err(err),
            None => Ok(catalog),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::BonusCategory;
    use std::collections::BTreeMap;

    fn pet(id: &str) -> PetTypeDef {
        PetTypeDef {
            id: id.into(),
            display_name: id.to_uppercase(),
            category: BonusCategory::Token,
            base_per_growth: 0.5,
        }
    }

    #[test]
    fn registry_preserves_declaration_order() {
        let (catalog, skipped) = BonusCatalog::builder()
            .pets(["zebra", "alpaca", "mole"].map(pet))
            .build();

        assert!(skipped.is_empty());
        let ids: Vec<&str> = catalog.pets().as_slice().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["zebra", "alpaca", "mole"]);
        assert!(catalog.pets().get("alpaca").is_some());
    }

    #[test]
    fn duplicate_and_dangling_records_are_skipped() {
        let synergy = SynergyDef {
            id: "trio".into(),
            display_name: "Trio".into(),
            pets: ["mole".into(), "alpaca".into(), "ghost".into()],
            rates: BTreeMap::from([(BonusCategory::Token, 0.1)]),
        };

        let (catalog, skipped) = BonusCatalog::builder()
            .pet(pet("mole"))
            .pet(pet("mole"))
            .pet(pet("alpaca"))
            .synergy(synergy)
            .build();

        assert_eq!(catalog.pets().len(), 2);
        assert!(catalog.synergies().is_empty());
        assert_eq!(
            skipped,
            vec![
                CatalogError::DuplicateType {
                    kind: "pet",
                    id: "mole".into()
                },
                CatalogError::UnknownType {
                    kind: "pet",
                    id: "ghost".into()
                },
            ]
        );
    }

    #[test]
    fn require_reports_unknown_type() {
        let catalog = BonusCatalog::empty();
        let err = catalog.boosts().require("mega_boost").unwrap_err();
        assert_eq!(err, CatalogError::unknown("boost", "mega_boost"));
        assert!(BonusCatalog::builder().pet(pet("a")).build_strict().is_ok());
    }
}
