//! Pure economy rules: timed boosts, permanent modifiers, bonus resolution
//! and weighted rewards.
//!
//! `economy-core` owns no state and performs no I/O. Every time-dependent
//! check takes `now` explicitly, and every random choice takes the caller's
//! RNG, so the rules are deterministic under test. Concurrent storage and
//! background work live in `economy-runtime`.
pub mod boost;
pub mod catalog;
pub mod category;
pub mod config;
pub mod error;
pub mod modifiers;
pub mod resolver;
pub mod reward;
pub mod types;

pub use boost::{BoostError, BoostInstance, BoostScope, BoostState, format_duration};
pub use catalog::{
    BonusCatalog, BonusCatalogBuilder, BoostTypeDef, CatalogEntry, CatalogError, CrystalTypeDef,
    PetTypeDef, Registry, SynergyDef, crystal_bonus, pet_bonus, synergy_bonus,
};
pub use category::BonusCategory;
pub use config::EconomyConfig;
pub use error::{EconomyError, ErrorSeverity};
pub use modifiers::{Crystal, CrystalKind, ModifierError, PermanentModifiers, Pet};
pub use resolver::{BonusBreakdown, BonusResolver, BoostLookup, as_multiplier};
pub use reward::{
    RewardEntryDef, RewardError, RewardPayload, RewardTable, RewardTableDef, WeightedEntry,
    WeightedTable, roll_crystal_level,
};
pub use types::{ContentId, CrystalId, EntityId, PetId, Timestamp};
