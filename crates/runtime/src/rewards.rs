//! Reward table registry.
//!
//! Table definitions are registered at startup; each table's cumulative
//! weights are built on first use and cached for the process lifetime.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use rand::Rng;

use economy_core::{ContentId, RewardError, RewardPayload, RewardTable, RewardTableDef};

struct Slot {
    def: RewardTableDef,
    built: OnceLock<Result<Arc<RewardTable>, RewardError>>,
}

/// Reward tables keyed by id.
#[derive(Default)]
pub struct RewardRegistry {
    tables: HashMap<ContentId, Slot>,
}

impl RewardRegistry {
    /// Registers `defs`. A later definition with a repeated id replaces the
    /// earlier one.
    pub fn new(defs: impl IntoIterator<Item = RewardTableDef>) -> Self {
        let tables = defs
            .into_iter()
            .map(|def| {
                let slot = Slot {
                    def,
                    built: OnceLock::new(),
                };
                (slot.def.id.clone(), slot)
            })
            .collect();
        Self { tables }
    }

    /// Built table for `id`.
    ///
    /// Concurrent first calls may both build the table; only one result is
    /// kept and both are equal.
    pub fn table(&self, id: &str) -> Result<Arc<RewardTable>, RewardError> {
        let slot = self
            .tables
            .get(id)
            .ok_or_else(|| RewardError::UnknownTable(id.to_string()))?;
        slot.built
            .get_or_init(|| RewardTable::from_def(&slot.def).map(Arc::new))
            .clone()
    }

    /// Draws one payload from table `id`.
    pub fn select<R: Rng + ?Sized>(
        &self,
        id: &str,
        rng: &mut R,
    ) -> Result<RewardPayload, RewardError> {
        let table = self.table(id)?;
        table.select(rng).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tables.contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<ContentId> {
        let mut ids: Vec<ContentId> = self.tables.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
