//! The economy service: every bonus operation a game host calls.
//!
//! One [`EconomyService`] owns the boost and modifier stores and the
//! collaborators they report to. It is built by the runtime builder and
//! shared as `Arc<EconomyService>`; there is no global instance.
//!
//! Every mutation of player-scoped state hands a fresh profile snapshot to
//! the persistence worker without waiting for the write.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use economy_core::{
    BonusBreakdown, BonusCatalog, BonusCategory, BonusResolver, BoostInstance, BoostScope,
    CatalogEntry, CatalogError, ContentId, Crystal, CrystalId, CrystalTypeDef, EntityId,
    ModifierError, PermanentModifiers, Pet, PetId, PetTypeDef, RewardPayload, Timestamp,
    as_multiplier, format_duration, roll_crystal_level,
};

use crate::api::{Clock, Result, RewardRealizer};
use crate::events::{
    Announcement, BoostEvent, EconomyEvent, EventBus, ModifierEvent, Notifier, RewardEvent,
};
use crate::repository::{EntityProfile, StoredBoost};
use crate::rewards::RewardRegistry;
use crate::store::{PermanentModifierStore, SweepReport, TemporalBonusStore};
use crate::workers::PersistRequest;

/// Outcome of restoring one entity's persisted state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HydrateReport {
    /// Player boosts that were still running and got restored.
    pub restored_boosts: usize,
    /// Boosts discarded because they expired offline or were malformed.
    pub dropped_boosts: usize,
    /// Entries whose type no longer exists in the catalog.
    pub skipped: Vec<CatalogError>,
}

/// Collaborators an [`EconomyService`] is assembled from.
pub(crate) struct ServiceParts {
    pub catalog: Arc<BonusCatalog>,
    pub rewards: Arc<RewardRegistry>,
    pub clock: Arc<dyn Clock>,
    pub notifier: Arc<dyn Notifier>,
    pub realizer: Arc<dyn RewardRealizer>,
    pub events: EventBus,
    pub persist_tx: mpsc::UnboundedSender<PersistRequest>,
    pub rng: StdRng,
}

pub struct EconomyService {
    catalog: Arc<BonusCatalog>,
    rewards: Arc<RewardRegistry>,
    boosts: TemporalBonusStore,
    modifiers: PermanentModifierStore,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    realizer: Arc<dyn RewardRealizer>,
    events: EventBus,
    persist_tx: mpsc::UnboundedSender<PersistRequest>,
    /// Held from snapshot to send, so queued snapshots are in the order taken.
    persist_order: Mutex<()>,
    rng: Mutex<StdRng>,
}

impl EconomyService {
    pub(crate) fn new(parts: ServiceParts) -> Self {
        Self {
            catalog: parts.catalog,
            rewards: parts.rewards,
            boosts: TemporalBonusStore::new(),
            modifiers: PermanentModifierStore::new(),
            clock: parts.clock,
            notifier: parts.notifier,
            realizer: parts.realizer,
            events: parts.events,
            persist_tx: parts.persist_tx,
            persist_order: Mutex::new(()),
            rng: Mutex::new(parts.rng),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn catalog(&self) -> &BonusCatalog {
        &self.catalog
    }

    pub fn rewards(&self) -> &RewardRegistry {
        &self.rewards
    }

    pub fn boosts(&self) -> &TemporalBonusStore {
        &self.boosts
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ===== timed boosts =====

    /// Starts a timed boost now.
    ///
    /// `entity` is ignored for [`BoostScope::AdminGlobal`].
    pub fn activate(
        &self,
        entity: EntityId,
        category: BonusCategory,
        duration_secs: u64,
        bonus_percent: f64,
        scope: BoostScope,
    ) -> Result<BoostInstance> {
        let boost = self.boosts.activate(
            entity,
            category,
            duration_secs,
            bonus_percent,
            scope,
            self.now(),
        )?;

        match scope {
            BoostScope::Player => {
                debug!(
                    "Activated {} boost +{}% for {} ({}s)",
                    category, bonus_percent, entity, duration_secs
                );
                self.publish(EconomyEvent::Boost(BoostEvent::Activated {
                    entity: Some(entity),
                    boost: boost.clone(),
                }));
                self.persist(entity);
            }
            BoostScope::AdminGlobal => {
                info!(
                    "Global {} boost +{}% active for {}s",
                    category, bonus_percent, duration_secs
                );
                self.publish(EconomyEvent::Boost(BoostEvent::Activated {
                    entity: None,
                    boost: boost.clone(),
                }));
                self.announce(Announcement::everyone(format!(
                    "A global +{}% {} boost is active for {}!",
                    bonus_percent,
                    category.display_name(),
                    format_duration(duration_secs)
                )));
            }
        }

        Ok(boost)
    }

    /// Uses a boost item: starts the player boost its catalog entry describes.
    pub fn activate_boost_item(&self, entity: EntityId, boost_type: &str) -> Result<BoostInstance> {
        let def = self.catalog.boosts().require(boost_type)?;
        let boost = self.activate(
            entity,
            def.category,
            def.duration_secs,
            def.bonus_percent,
            BoostScope::Player,
        )?;
        self.announce(Announcement::to_entity(
            entity,
            format!(
                "{} activated: +{}% {} for {}",
                def.display_name,
                def.bonus_percent,
                def.category.display_name(),
                format_duration(def.duration_secs)
            ),
        ));
        Ok(boost)
    }

    /// Starts a server-wide boost, replacing any global boost of `category`.
    pub fn activate_global(
        &self,
        category: BonusCategory,
        duration_secs: u64,
        bonus_percent: f64,
    ) -> Result<BoostInstance> {
        self.activate(
            EntityId::default(),
            category,
            duration_secs,
            bonus_percent,
            BoostScope::AdminGlobal,
        )
    }

    pub fn is_active(&self, entity: EntityId, category: BonusCategory) -> bool {
        self.boosts.is_active(entity, category, self.now())
    }

    /// Running boosts that apply to `entity`: its own first, then global.
    pub fn list_active(&self, entity: EntityId) -> Vec<BoostInstance> {
        self.boosts.list_active(entity, self.now())
    }

    // ===== resolution =====

    /// Total bonus percentage for `entity` in `category`.
    pub fn compute_total(&self, entity: EntityId, category: BonusCategory) -> f64 {
        let modifiers = self.modifiers.get(entity);
        BonusResolver::new(&self.catalog).compute_total(
            &self.boosts,
            entity,
            &modifiers,
            category,
            self.now(),
        )
    }

    pub fn breakdown(&self, entity: EntityId, category: BonusCategory) -> BonusBreakdown {
        let modifiers = self.modifiers.get(entity);
        BonusResolver::new(&self.catalog).breakdown(
            &self.boosts,
            entity,
            &modifiers,
            category,
            self.now(),
        )
    }

    /// `1 + total / 100`, for multiplying a base amount.
    pub fn multiplier(&self, entity: EntityId, category: BonusCategory) -> f64 {
        as_multiplier(self.compute_total(entity, category))
    }

    // ===== lifecycle =====

    /// Loads persisted state for an entity that just connected.
    ///
    /// Replaces whatever was held in memory. Boosts that expired while the
    /// entity was away are dropped; crystals and pets whose type left the
    /// catalog are skipped and reported.
    pub fn hydrate(&self, entity: EntityId, profile: EntityProfile) -> HydrateReport {
        let now = self.now();
        let mut report = HydrateReport::default();

        let mut boosts = Vec::with_capacity(profile.boosts.len());
        for stored in &profile.boosts {
            match stored.category() {
                Ok(category) => match stored.to_instance(category) {
                    Ok(boost) => boosts.push(boost),
                    Err(e) => {
                        warn!("Dropping malformed boost for {}: {}", entity, e);
                        report.dropped_boosts += 1;
                    }
                },
                Err(e) => {
                    warn!("Skipping persisted boost for {}: {}", entity, e);
                    report.skipped.push(e);
                }
            }
        }
        let candidates = boosts.len();
        let dropped = self.boosts.load_from(entity, boosts, now);
        report.dropped_boosts += dropped;
        report.restored_boosts = candidates - dropped;

        let mut modifiers = PermanentModifiers::new();
        for crystal in profile.crystals {
            match crystal.type_id() {
                Some(kind) if !self.catalog.crystals().contains(kind.as_str()) => {
                    let e = CatalogError::unknown(CrystalTypeDef::KIND, kind);
                    warn!("Skipping {} of {}: {}", crystal.id(), entity, e);
                    report.skipped.push(e);
                }
                _ => modifiers.crystals.push(crystal),
            }
        }
        for pet in profile.pets {
            if self.catalog.pets().contains(pet.kind().as_str()) {
                modifiers.pets.push(pet);
            } else {
                let e = CatalogError::unknown(PetTypeDef::KIND, pet.kind());
                warn!("Skipping {} of {}: {}", pet.id(), entity, e);
                report.skipped.push(e);
            }
        }
        for id in profile.equipped_crystals {
            match modifiers.equip_crystal(id) {
                Ok(next) => modifiers = next,
                Err(e) => debug!("Not re-equipping {} for {}: {}", id, entity, e),
            }
        }

        if modifiers.is_empty() {
            self.modifiers.remove(entity);
        } else {
            self.modifiers.replace(entity, modifiers);
        }

        debug!(
            "Hydrated {}: {} boost(s) restored, {} dropped, {} skipped",
            entity,
            report.restored_boosts,
            report.dropped_boosts,
            report.skipped.len()
        );
        report
    }

    /// Current persistable state of `entity`.
    pub fn snapshot(&self, entity: EntityId) -> EntityProfile {
        self.snapshot_at(entity, self.now())
    }

    fn snapshot_at(&self, entity: EntityId, now: Timestamp) -> EntityProfile {
        let modifiers = self.modifiers.get(entity);
        EntityProfile {
            boosts: self
                .boosts
                .player_boosts(entity, now)
                .iter()
                .map(StoredBoost::from_instance)
                .collect(),
            crystals: modifiers.crystals.clone(),
            pets: modifiers.pets.clone(),
            equipped_crystals: modifiers.equipped_crystals.clone(),
        }
    }

    /// Persists and evicts an entity that left.
    ///
    /// The profile is built from what eviction removed, so nothing that was
    /// evicted is missing from it. Mutations for `entity` that race with its
    /// disconnect land in fresh in-memory state; hosts stop routing calls for
    /// an entity before disconnecting it.
    ///
    /// Returns the profile that was handed to persistence.
    pub fn disconnect(&self, entity: EntityId) -> EntityProfile {
        let _order = self.lock_persist_order();
        let now = self.now();
        let boosts = self.boosts.deactivate_all(entity);
        let modifiers = self.modifiers.remove(entity).unwrap_or_default();

        let profile = EntityProfile {
            boosts: boosts
                .iter()
                .filter(|boost| boost.is_active(now))
                .map(StoredBoost::from_instance)
                .collect(),
            crystals: modifiers.crystals.clone(),
            pets: modifiers.pets.clone(),
            equipped_crystals: modifiers.equipped_crystals.clone(),
        };
        self.send_persist(entity, profile.clone());
        debug!("Disconnected {}", entity);
        profile
    }

    // ===== crystals =====

    pub fn modifiers(&self, entity: EntityId) -> Arc<PermanentModifiers> {
        self.modifiers.get(entity)
    }

    /// Gives `entity` a new unrevealed crystal.
    pub fn add_crystal(&self, entity: EntityId, level: u8) -> Crystal {
        let crystal = self.modifiers.apply(entity, |m| {
            let crystal = Crystal::unrevealed(m.next_crystal_id(), level);
            (m.with_crystal(crystal.clone()), crystal)
        });

        debug!("Added {} (level {}) to {}", crystal.id(), crystal.level(), entity);
        self.publish(EconomyEvent::Modifier(ModifierEvent::CrystalAdded {
            entity,
            crystal: crystal.clone(),
        }));
        self.persist(entity);
        crystal
    }

    /// Reveals a crystal's type. Revealing twice returns the same crystal.
    pub fn reveal_crystal(&self, entity: EntityId, id: CrystalId) -> Result<Crystal> {
        let (crystal, changed) =
            self.modifiers
                .update(entity, |m| -> Result<(PermanentModifiers, (Crystal, bool))> {
                    let current = m.crystal(id).ok_or(ModifierError::CrystalNotFound(id))?;
                    if current.is_revealed() {
                        return Ok((m.clone(), (current.clone(), false)));
                    }
                    // The entity's entry is held here; never take it while holding the rng.
                    let revealed = current.reveal(&self.catalog, &mut *self.rng())?;
                    Ok((m.with_crystal(revealed.clone()), (revealed, true)))
                })?;
        if changed {
            let name = crystal
                .definition(&self.catalog)
                .map(|def| def.display_name.as_str())
                .unwrap_or("unknown");
            debug!("Revealed {} of {} as {}", id, entity, name);
            self.publish(EconomyEvent::Modifier(ModifierEvent::CrystalRevealed {
                entity,
                crystal: crystal.clone(),
            }));
            self.announce(Announcement::to_entity(
                entity,
                format!(
                    "Your level {} crystal was revealed: {}",
                    crystal.level(),
                    name
                ),
            ));
            self.persist(entity);
        }
        Ok(crystal)
    }

    /// Equips a revealed crystal, replacing an equipped one of the same type.
    pub fn equip_crystal(&self, entity: EntityId, id: CrystalId) -> Result<()> {
        self.modifiers
            .update(entity, |m| m.equip_crystal(id).map(|next| (next, ())))?;
        debug!("Equipped {} for {}", id, entity);
        self.persist(entity);
        Ok(())
    }

    pub fn unequip_crystal(&self, entity: EntityId, id: CrystalId) -> Result<()> {
        self.modifiers
            .update(entity, |m| m.unequip_crystal(id).map(|next| (next, ())))?;
        debug!("Unequipped {} for {}", id, entity);
        self.persist(entity);
        Ok(())
    }

    // ===== pets =====

    /// Gives `entity` a fresh pet of a catalog type.
    pub fn add_pet(&self, entity: EntityId, pet_type: &str) -> Result<Pet> {
        let def = self.catalog.pets().require(pet_type)?;
        let pet = self.modifiers.apply(entity, |m| {
            let pet = Pet::new(m.next_pet_id(), def.id.clone());
            (m.with_pet(pet.clone()), pet)
        });

        debug!("Added {} ({}) to {}", pet.id(), def.id, entity);
        self.publish(EconomyEvent::Modifier(ModifierEvent::PetAdded {
            entity,
            pet: pet.id(),
        }));
        self.persist(entity);
        Ok(pet)
    }

    pub fn set_pet_equipped(&self, entity: EntityId, id: PetId, equipped: bool) -> Result<()> {
        self.modifiers.update(entity, |m| {
            m.set_pet_equipped(id, equipped).map(|next| (next, ()))
        })?;
        debug!("Set {} equipped={} for {}", id, equipped, entity);
        self.persist(entity);
        Ok(())
    }

    /// Feeds XP to a pet and returns its new state.
    pub fn gain_pet_xp(&self, entity: EntityId, id: PetId, amount: u32) -> Result<Pet> {
        let (growth_before, pet) = self.modifiers.update(entity, |m| {
            let before = m.pet(id).ok_or(ModifierError::PetNotFound(id))?;
            let after = before.gain_xp(amount);
            Ok::<_, ModifierError>((m.with_pet(after.clone()), (before.growth(), after)))
        })?;

        if pet.growth() > growth_before {
            debug!("{} of {} grew to {}", id, entity, pet.growth());
            self.publish(EconomyEvent::Modifier(ModifierEvent::PetGrew {
                entity,
                pet: id,
                growth: pet.growth(),
            }));
            if pet.is_maxed() {
                self.announce(Announcement::to_entity(
                    entity,
                    format!("Your {} reached max growth!", pet.kind()),
                ));
            }
        }
        self.persist(entity);
        Ok(pet)
    }

    // ===== rewards =====

    /// Realizes one reward payload for `entity`.
    pub fn grant(&self, entity: EntityId, payload: &RewardPayload) -> Result<()> {
        self.grant_from(entity, None, payload)
    }

    /// Draws from reward table `table_id` and grants the result.
    pub fn open_reward(&self, entity: EntityId, table_id: &str) -> Result<RewardPayload> {
        let payload = {
            let mut rng = self.rng();
            self.rewards.select(table_id, &mut *rng)?
        };
        self.grant_from(entity, Some(ContentId::new(table_id)), &payload)?;
        Ok(payload)
    }

    fn grant_from(
        &self,
        entity: EntityId,
        table: Option<ContentId>,
        payload: &RewardPayload,
    ) -> Result<()> {
        match payload {
            RewardPayload::Boost { boost_type } => {
                self.activate_boost_item(entity, boost_type.as_str())?;
            }
            RewardPayload::Crystal {
                min_level,
                max_level,
            } => {
                let level = roll_crystal_level(*min_level, *max_level, &mut *self.rng());
                self.add_crystal(entity, level);
            }
            RewardPayload::Pet { pet_type } => {
                self.add_pet(entity, pet_type.as_str())?;
            }
            RewardPayload::Currency { .. } | RewardPayload::Item { .. } => {
                self.realizer.realize(entity, payload);
            }
        }

        debug!("Granted {} to {}", payload.describe(), entity);
        self.announce(Announcement::to_entity(
            entity,
            format!("You received {}!", payload.describe()),
        ));
        self.publish(EconomyEvent::Reward(RewardEvent {
            entity,
            table,
            payload: payload.clone(),
        }));
        Ok(())
    }

    // ===== expiry =====

    /// Removes every boost that ended by `now` and reports what went.
    ///
    /// Entities that lost a boost are persisted and notified; expired
    /// global boosts are announced to everyone.
    pub fn sweep(&self, now: Timestamp) -> SweepReport {
        let report = self.boosts.sweep(now);

        for expired in &report.players {
            for boost in &expired.boosts {
                self.publish(EconomyEvent::Boost(BoostEvent::Expired {
                    entity: Some(expired.entity),
                    boost: boost.clone(),
                }));
                self.announce(Announcement::to_entity(
                    expired.entity,
                    format!(
                        "Your {} boost has expired.",
                        boost.category.display_name()
                    ),
                ));
            }
            let _order = self.lock_persist_order();
            self.send_persist(expired.entity, self.snapshot_at(expired.entity, now));
        }

        for boost in &report.admin {
            info!("Global {} boost expired", boost.category);
            self.publish(EconomyEvent::Boost(BoostEvent::Expired {
                entity: None,
                boost: boost.clone(),
            }));
            self.announce(Announcement::everyone(format!(
                "The global {} boost has ended.",
                boost.category.display_name()
            )));
        }

        report
    }

    // ===== plumbing =====

    /// Queues the current state of `entity` for saving.
    ///
    /// Snapshot and send happen under one lock: a snapshot taken later is
    /// queued later and the worker keeps the last one per entity.
    fn persist(&self, entity: EntityId) {
        let _order = self.lock_persist_order();
        self.send_persist(entity, self.snapshot(entity));
    }

    fn lock_persist_order(&self) -> MutexGuard<'_, ()> {
        self.persist_order
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn send_persist(&self, entity: EntityId, profile: EntityProfile) {
        if self
            .persist_tx
            .send(PersistRequest { entity, profile })
            .is_err()
        {
            warn!("Persistence worker is gone, {} was not saved", entity);
        }
    }

    fn publish(&self, event: EconomyEvent) {
        self.events.publish(event);
    }

    fn announce(&self, announcement: Announcement) {
        self.notifier.announce(&announcement);
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
