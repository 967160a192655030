//! Bonus aggregation.
//!
//! The resolver sums every contribution for one entity and category:
//!
//! 1. player boost for the category
//! 2. admin-global boost for the category
//! 3. player boost for [`BonusCategory::All`]
//! 4. admin-global boost for [`BonusCategory::All`]
//! 5. equipped crystals bound to the category
//! 6. equipped pets bound to the category
//! 7. synergies whose pet triple is equipped
//!
//! All terms are raw percentages (12.5 means +12.5%) and are purely
//! additive. The resolver never applies the total; callers convert it with
//! [`as_multiplier`] or use it as an additive amount.

use crate::catalog::BonusCatalog;
use crate::category::BonusCategory;
use crate::modifiers::PermanentModifiers;
use crate::types::{EntityId, Timestamp};

/// Read access to the active timed boosts.
///
/// Implementations must answer from current state without blocking; an
/// expired or missing boost is `None`.
pub trait BoostLookup {
    /// Bonus of the entity's active player-scoped boost in `category`.
    fn player_boost(&self, entity: EntityId, category: BonusCategory, now: Timestamp)
    -> Option<f64>;

    /// Bonus of the active admin-global boost in `category`.
    fn admin_boost(&self, category: BonusCategory, now: Timestamp) -> Option<f64>;
}

/// Per-step contributions of one resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusBreakdown {
    pub player: f64,
    pub admin: f64,
    pub player_all: f64,
    pub admin_all: f64,
    pub crystals: f64,
    pub pets: f64,
    pub synergy: f64,
}

impl BonusBreakdown {
    /// Sum of every step, as a percentage.
    pub fn total(&self) -> f64 {
        self.timed() + self.permanent()
    }

    /// Contributions from timed boosts (steps 1-4).
    pub fn timed(&self) -> f64 {
        self.player + self.admin + self.player_all + self.admin_all
    }

    /// Contributions from crystals, pets and synergies (steps 5-7).
    pub fn permanent(&self) -> f64 {
        self.crystals + self.pets + self.synergy
    }
}

/// Stateless aggregator over the catalog.
#[derive(Clone, Copy, Debug)]
pub struct BonusResolver<'a> {
    catalog: &'a BonusCatalog,
}

impl<'a> BonusResolver<'a> {
    pub fn new(catalog: &'a BonusCatalog) -> Self {
        Self { catalog }
    }

    /// Total bonus percentage for `entity` in `category`.
    ///
    /// Never fails: missing data contributes zero.
    pub fn compute_total<L: BoostLookup + ?Sized>(
        &self,
        lookup: &L,
        entity: EntityId,
        modifiers: &PermanentModifiers,
        category: BonusCategory,
        now: Timestamp,
    ) -> f64 {
        self.breakdown(lookup, entity, modifiers, category, now)
            .total()
    }

    /// Same as [`compute_total`](Self::compute_total) but keeps each step.
    ///
    /// Asking for [`BonusCategory::All`] directly reads the "applies to all"
    /// boosts once, in steps 1-2, and leaves steps 3-4 at zero.
    pub fn breakdown<L: BoostLookup + ?Sized>(
        &self,
        lookup: &L,
        entity: EntityId,
        modifiers: &PermanentModifiers,
        category: BonusCategory,
        now: Timestamp,
    ) -> BonusBreakdown {
        let mut out = BonusBreakdown {
            player: lookup.player_boost(entity, category, now).unwrap_or(0.0),
            admin: lookup.admin_boost(category, now).unwrap_or(0.0),
            ..BonusBreakdown::default()
        };

        if !category.is_all() {
            out.player_all = lookup
                .player_boost(entity, BonusCategory::All, now)
                .unwrap_or(0.0);
            out.admin_all = lookup.admin_boost(BonusCategory::All, now).unwrap_or(0.0);
        }

        out.crystals = modifiers.crystal_bonus(self.catalog, category);
        out.pets = modifiers.pet_bonus(self.catalog, category);
        out.synergy = modifiers.synergy_bonus(self.catalog, category);
        out
    }
}

/// Converts a percentage total into a multiplier (`1 + total / 100`).
#[inline]
pub fn as_multiplier(total: f64) -> f64 {
    1.0 + total / 100.0
}
