//! Concurrent store of timed boosts.
//!
//! Player boosts live in a per-entity bucket, admin-global boosts in a
//! separate map keyed by category. Reads re-check `now < end` every time, so
//! they are correct even between sweeps; the sweeper only reclaims memory and
//! drives persistence and announcements.
//!
//! No method holds a guard on one map while touching the other, and no
//! method locks two entity buckets at once.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use economy_core::{
    BonusCategory, BoostError, BoostInstance, BoostLookup, BoostScope, EntityId, Timestamp,
};

/// Player-scoped boosts of one entity, in activation order.
///
/// Holds at most one instance per category.
#[derive(Clone, Debug, Default)]
pub struct PlayerBoosts {
    instances: Vec<BoostInstance>,
}

impl PlayerBoosts {
    pub fn get(&self, category: BonusCategory) -> Option<&BoostInstance> {
        self.instances.iter().find(|b| b.category == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoostInstance> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Inserts `boost`, dropping any previous instance of its category.
    fn replace(&mut self, boost: BoostInstance) {
        self.instances.retain(|b| b.category != boost.category);
        self.instances.push(boost);
    }

    fn remove_expired(&mut self, now: Timestamp) -> Vec<BoostInstance> {
        let (active, expired) = std::mem::take(&mut self.instances)
            .into_iter()
            .partition(|b| b.is_active(now));
        self.instances = active;
        expired
    }
}

/// Player boosts removed from one entity by a sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpiredBoosts {
    pub entity: EntityId,
    pub boosts: Vec<BoostInstance>,
}

/// Outcome of [`TemporalBonusStore::sweep`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SweepReport {
    pub players: Vec<ExpiredBoosts>,
    pub admin: Vec<BoostInstance>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.admin.is_empty()
    }

    /// Entities whose persisted boosts changed.
    pub fn changed_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.players.iter().map(|e| e.entity)
    }

    pub fn removed(&self) -> usize {
        self.admin.len() + self.players.iter().map(|e| e.boosts.len()).sum::<usize>()
    }
}

/// Owner of every live [`BoostInstance`].
#[derive(Debug, Default)]
pub struct TemporalBonusStore {
    players: DashMap<EntityId, PlayerBoosts>,
    admin: DashMap<BonusCategory, BoostInstance>,
}

impl TemporalBonusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a timed boost.
    ///
    /// Player scope is rejected with [`BoostError::AlreadyActive`] while a
    /// player boost of the same category is running for `entity`; the
    /// running boost is left untouched. An expired leftover is replaced.
    /// Admin scope ignores `entity` and always replaces the category's
    /// previous global boost.
    pub fn activate(
        &self,
        entity: EntityId,
        category: BonusCategory,
        duration_secs: u64,
        bonus_percent: f64,
        scope: BoostScope,
        now: Timestamp,
    ) -> Result<BoostInstance, BoostError> {
        let boost = BoostInstance::new(category, scope, now, duration_secs, bonus_percent)?;
        match scope {
            BoostScope::Player => self.insert_player(entity, boost),
            BoostScope::AdminGlobal => {
                self.admin.insert(category, boost.clone());
                Ok(boost)
            }
        }
    }

    fn insert_player(
        &self,
        entity: EntityId,
        boost: BoostInstance,
    ) -> Result<BoostInstance, BoostError> {
        let now = boost.start;
        let mut bucket = self.players.entry(entity).or_default();
        if let Some(running) = bucket.get(boost.category)
            && running.is_active(now)
        {
            return Err(BoostError::AlreadyActive {
                entity,
                category: boost.category,
                ends_at: running.end,
            });
        }
        bucket.replace(boost.clone());
        Ok(boost)
    }

    /// True if a player or admin boost of `category` is running for `entity`.
    pub fn is_active(&self, entity: EntityId, category: BonusCategory, now: Timestamp) -> bool {
        self.player_boost(entity, category, now).is_some()
            || self.admin_boost(category, now).is_some()
    }

    /// Running player boosts followed by running admin boosts.
    pub fn list_active(&self, entity: EntityId, now: Timestamp) -> Vec<BoostInstance> {
        let mut active = self.player_boosts(entity, now);
        active.extend(self.admin_boosts(now));
        active
    }

    /// Running player boosts of `entity`, in activation order.
    pub fn player_boosts(&self, entity: EntityId, now: Timestamp) -> Vec<BoostInstance> {
        self.players
            .get(&entity)
            .map(|bucket| bucket.iter().filter(|b| b.is_active(now)).cloned().collect())
            .unwrap_or_default()
    }

    /// Running admin boosts, ordered by category.
    pub fn admin_boosts(&self, now: Timestamp) -> Vec<BoostInstance> {
        let mut boosts: Vec<BoostInstance> = self
            .admin
            .iter()
            .filter(|entry| entry.is_active(now))
            .map(|entry| entry.value().clone())
            .collect();
        boosts.sort_by_key(|b| b.category);
        boosts
    }

    /// Removes every player boost of `entity`, returning what was held.
    pub fn deactivate_all(&self, entity: EntityId) -> Vec<BoostInstance> {
        self.players
            .remove(&entity)
            .map(|(_, bucket)| bucket.instances)
            .unwrap_or_default()
    }

    /// Replaces the player boosts of `entity` with persisted instances.
    ///
    /// Expired instances, admin-scoped instances and repeated categories are
    /// discarded. Returns how many were discarded.
    pub fn load_from(
        &self,
        entity: EntityId,
        instances: impl IntoIterator<Item = BoostInstance>,
        now: Timestamp,
    ) -> usize {
        let mut bucket = PlayerBoosts::default();
        let mut dropped = 0;
        for boost in instances {
            let usable = boost.scope == BoostScope::Player
                && boost.is_active(now)
                && bucket.get(boost.category).is_none();
            if usable {
                bucket.instances.push(boost);
            } else {
                dropped += 1;
            }
        }

        match self.players.entry(entity) {
            Entry::Occupied(entry) if bucket.is_empty() => {
                entry.remove();
            }
            Entry::Occupied(mut entry) => {
                entry.insert(bucket);
            }
            Entry::Vacant(entry) => {
                if !bucket.is_empty() {
                    entry.insert(bucket);
                }
            }
        }
        dropped
    }

    /// Removes every boost with `end <= now`.
    pub fn sweep(&self, now: Timestamp) -> SweepReport {
        let mut report = SweepReport::default();

        self.players.retain(|entity, bucket| {
            let expired = bucket.remove_expired(now);
            if !expired.is_empty() {
                report.players.push(ExpiredBoosts {
                    entity: *entity,
                    boosts: expired,
                });
            }
            !bucket.is_empty()
        });

        self.admin.retain(|_, boost| {
            if boost.is_active(now) {
                true
            } else {
                report.admin.push(boost.clone());
                false
            }
        });

        report.players.sort_by_key(|e| e.entity);
        report.admin.sort_by_key(|b| b.category);
        report
    }

    /// Number of entities holding at least one player boost.
    pub fn tracked_entities(&self) -> usize {
        self.players.len()
    }
}

impl BoostLookup for TemporalBonusStore {
    fn player_boost(
        &self,
        entity: EntityId,
        category: BonusCategory,
        now: Timestamp,
    ) -> Option<f64> {
        self.players
            .get(&entity)
            .and_then(|bucket| bucket.get(category).and_then(|b| b.active_bonus(now)))
    }

    fn admin_boost(&self, category: BonusCategory, now: Timestamp) -> Option<f64> {
        self.admin
            .get(&category)
            .and_then(|boost| boost.active_bonus(now))
    }
}
