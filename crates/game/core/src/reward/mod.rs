//! Reward tables and the payload descriptors they produce.
//!
//! The core only produces descriptors. Boost, crystal and pet payloads are
//! realized by the runtime against the bonus stores; currency and item
//! payloads are handed to an external realizer.

mod error;
mod table;

pub use error::RewardError;
pub use table::{WeightedEntry, WeightedTable};

use rand::Rng;

use crate::catalog::{BonusCatalog, CatalogError};
use crate::types::ContentId;

/// What a reward draw grants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RewardPayload {
    /// Starts the timed boost described by a boost item type.
    Boost { boost_type: ContentId },
    /// An unrevealed crystal with a level drawn from `min_level..=max_level`.
    Crystal { min_level: u8, max_level: u8 },
    /// A fresh pet of the given type.
    Pet { pet_type: ContentId },
    Currency { currency: ContentId, amount: u64 },
    Item { item_id: ContentId, amount: u32 },
}

impl RewardPayload {
    /// Short human-readable description for announcements.
    pub fn describe(&self) -> String {
        match self {
            RewardPayload::Boost { boost_type } => format!("a {} boost", boost_type),
            RewardPayload::Crystal {
                min_level,
                max_level,
            } if min_level == max_level => format!("a level {} crystal", min_level),
            RewardPayload::Crystal {
                min_level,
                max_level,
            } => format!("a level {}-{} crystal", min_level, max_level),
            RewardPayload::Pet { pet_type } => format!("a {} pet", pet_type),
            RewardPayload::Currency { currency, amount } => format!("{} {}", amount, currency),
            RewardPayload::Item { item_id, amount } => format!("{}x {}", amount, item_id),
        }
    }

    /// Checks that a boost or pet payload names a type present in `catalog`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownType`] for a dangling boost or pet type.
    pub fn check_refs(&self, catalog: &BonusCatalog) -> Result<(), CatalogError> {
        match self {
            RewardPayload::Boost { boost_type } => {
                catalog.boosts().require(boost_type.as_str()).map(|_| ())
            }
            RewardPayload::Pet { pet_type } => catalog.pets().require(pet_type.as_str()).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// Returns true for payloads realized outside the bonus engine.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            RewardPayload::Currency { .. } | RewardPayload::Item { .. }
        )
    }
}

/// One entry of a configured reward table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardEntryDef {
    pub payload: RewardPayload,
    pub weight: f64,
}

/// Configured reward table, before validation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardTableDef {
    pub id: ContentId,
    pub display_name: String,
    pub entries: Vec<RewardEntryDef>,
}

/// A validated, immutable reward table (e.g. one crate tier).
#[derive(Clone, Debug, PartialEq)]
pub struct RewardTable {
    pub id: ContentId,
    pub display_name: String,
    pub table: WeightedTable<RewardPayload>,
}

impl RewardTable {
    /// Validates a definition into a table.
    ///
    /// # Errors
    ///
    /// - [`RewardError::EmptyTable`] if the definition has no entries
    /// - [`RewardError::InvalidWeight`] for a non-positive weight
    pub fn from_def(def: &RewardTableDef) -> Result<Self, RewardError> {
        if def.entries.is_empty() {
            return Err(RewardError::EmptyTable);
        }
        let table = WeightedTable::new(
            def.entries
                .iter()
                .map(|entry| (entry.payload.clone(), entry.weight)),
        )?;

        Ok(Self {
            id: def.id.clone(),
            display_name: def.display_name.clone(),
            table,
        })
    }

    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&RewardPayload, RewardError> {
        self.table.sample(rng)
    }
}

/// Rolls the level of a crystal reward, uniform over `min..=max`.
///
/// Reversed bounds are swapped.
pub fn roll_crystal_level<R: Rng + ?Sized>(min: u8, max: u8, rng: &mut R) -> u8 {
    let (low, high) = (min.min(max), min.max(max));
    WeightedTable::uniform(low..=high)
        .sample(rng)
        .copied()
        .unwrap_or(low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn def(entries: Vec<RewardEntryDef>) -> RewardTableDef {
        RewardTableDef {
            id: "crate_common".into(),
            display_name: "Common Crate".into(),
            entries,
        }
    }

    #[test]
    fn empty_definition_is_rejected() {
        assert_eq!(
            RewardTable::from_def(&def(Vec::new())),
            Err(RewardError::EmptyTable)
        );
    }

    #[test]
    fn definition_keeps_declaration_order() {
        let table = RewardTable::from_def(&def(vec![
            RewardEntryDef {
                payload: RewardPayload::Pet {
                    pet_type: "mole".into(),
                },
                weight: 1.0,
            },
            RewardEntryDef {
                payload: RewardPayload::Currency {
                    currency: "coins".into(),
                    amount: 250,
                },
                weight: 3.0,
            },
        ]))
        .unwrap();

        assert_eq!(table.table.len(), 2);
        assert_eq!(table.table.probability_of(1), Some(0.75));
        assert!(matches!(table.table.pick(0.5), Ok(RewardPayload::Pet { .. })));
        assert!(table.table.pick(1.0).unwrap().is_external());
    }

    #[test]
    fn describe_payloads() {
        let single = RewardPayload::Crystal {
            min_level: 5,
            max_level: 5,
        };
        let ranged = RewardPayload::Crystal {
            min_level: 1,
            max_level: 10,
        };
        assert_eq!(single.describe(), "a level 5 crystal");
        assert_eq!(ranged.describe(), "a level 1-10 crystal");
        assert_eq!(
            RewardPayload::Item {
                item_id: "pickaxe".into(),
                amount: 2
            }
            .describe(),
            "2x pickaxe"
        );
    }

    #[test]
    fn crystal_levels_cover_the_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [0usize; 16];
        for _ in 0..2_000 {
            let level = roll_crystal_level(5, 15, &mut rng);
            assert!((5..=15).contains(&level), "level {level} out of range");
            seen[level as usize] += 1;
        }
        assert!(seen[5..=15].iter().all(|&n| n > 0), "{seen:?}");

        assert!((5..=15).contains(&roll_crystal_level(15, 5, &mut rng)));
        assert_eq!(roll_crystal_level(3, 3, &mut rng), 3);
    }
}
