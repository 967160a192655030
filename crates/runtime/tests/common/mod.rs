//! Shared fixtures for runtime integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use economy_core::{
    BonusCatalog, BonusCategory, BoostTypeDef, CrystalTypeDef, EntityId, PetTypeDef,
    RewardEntryDef, RewardPayload, RewardTableDef, SynergyDef, Timestamp,
};
use economy_runtime::{
    Announcement, Audience, ManualClock, Notifier, ProfileRepository, RewardRealizer, Runtime,
    RuntimeConfig,
};

pub const PLAYER: EntityId = EntityId(1);
pub const OTHER: EntityId = EntityId(2);
pub const START: Timestamp = Timestamp::from_secs(1_700_000_000);

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub fn catalog() -> BonusCatalog {
    BonusCatalog::builder()
        .boost(BoostTypeDef {
            id: "sell_boost".into(),
            display_name: "Merchant's Charm".into(),
            category: BonusCategory::SellPrice,
            bonus_percent: 30.0,
            duration_secs: 3_600,
        })
        .boost(BoostTypeDef {
            id: "xp_potion".into(),
            display_name: "XP Potion".into(),
            category: BonusCategory::Xp,
            bonus_percent: 25.0,
            duration_secs: 600,
        })
        .crystal(CrystalTypeDef {
            id: "token_greed".into(),
            display_name: "Token Greed".into(),
            category: BonusCategory::Token,
            per_level_rate: 2.0,
            cap: 30.0,
        })
        .crystal(CrystalTypeDef {
            id: "sell_savvy".into(),
            display_name: "Sell Savvy".into(),
            category: BonusCategory::SellPrice,
            per_level_rate: 1.5,
            cap: 20.0,
        })
        .pet(PetTypeDef {
            id: "fox".into(),
            display_name: "Fox".into(),
            category: BonusCategory::Money,
            base_per_growth: 0.5,
        })
        .pet(PetTypeDef {
            id: "owl".into(),
            display_name: "Owl".into(),
            category: BonusCategory::Xp,
            base_per_growth: 0.4,
        })
        .pet(PetTypeDef {
            id: "cat".into(),
            display_name: "Cat".into(),
            category: BonusCategory::SellPrice,
            base_per_growth: 0.1,
        })
        .synergy(SynergyDef {
            id: "trio".into(),
            display_name: "Woodland Trio".into(),
            pets: ["fox".into(), "owl".into(), "cat".into()],
            rates: BTreeMap::from([(BonusCategory::SellPrice, 0.2)]),
        })
        .build_strict()
        .expect("fixture catalog is valid")
}

fn single(id: &str, payload: RewardPayload) -> RewardTableDef {
    RewardTableDef {
        id: id.into(),
        display_name: id.to_string(),
        entries: vec![RewardEntryDef {
            payload,
            weight: 1.0,
        }],
    }
}

pub fn reward_tables() -> Vec<RewardTableDef> {
    vec![
        single(
            "coins",
            RewardPayload::Currency {
                currency: "coins".into(),
                amount: 100,
            },
        ),
        single(
            "crystal",
            RewardPayload::Crystal {
                min_level: 3,
                max_level: 5,
            },
        ),
        single(
            "potion",
            RewardPayload::Boost {
                boost_type: "xp_potion".into(),
            },
        ),
        single(
            "fox",
            RewardPayload::Pet {
                pet_type: "fox".into(),
            },
        ),
        RewardTableDef {
            id: "empty".into(),
            display_name: "Empty".into(),
            entries: vec![],
        },
    ]
}

/// Notifier that records every announcement.
#[derive(Default)]
pub struct CollectingNotifier {
    seen: Mutex<Vec<Announcement>>,
}

impl CollectingNotifier {
    pub fn all(&self) -> Vec<Announcement> {
        self.seen.lock().unwrap().clone()
    }

    pub fn messages_for(&self, audience: &Audience) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|a| &a.audience == audience)
            .map(|a| a.message)
            .collect()
    }
}

impl Notifier for CollectingNotifier {
    fn announce(&self, announcement: &Announcement) {
        self.seen.lock().unwrap().push(announcement.clone());
    }
}

/// Realizer that records currency and item payloads.
#[derive(Default)]
pub struct CollectingRealizer {
    seen: Mutex<Vec<(EntityId, RewardPayload)>>,
}

impl CollectingRealizer {
    pub fn all(&self) -> Vec<(EntityId, RewardPayload)> {
        self.seen.lock().unwrap().clone()
    }
}

impl RewardRealizer for CollectingRealizer {
    fn realize(&self, entity: EntityId, payload: &RewardPayload) {
        self.seen.lock().unwrap().push((entity, payload.clone()));
    }
}

pub struct Harness {
    pub runtime: Runtime,
    pub clock: Arc<ManualClock>,
    pub notifier: Arc<CollectingNotifier>,
    pub realizer: Arc<CollectingRealizer>,
}

/// Runtime on a manual clock whose sweeper never fires on its own.
pub async fn harness(repository: Arc<dyn ProfileRepository>) -> Harness {
    harness_with_interval(repository, Duration::from_secs(3_600)).await
}

pub async fn harness_with_interval(
    repository: Arc<dyn ProfileRepository>,
    sweep_interval: Duration,
) -> Harness {
    let clock = Arc::new(ManualClock::new(START));
    let notifier = Arc::new(CollectingNotifier::default());
    let realizer = Arc::new(CollectingRealizer::default());

    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            sweep_interval,
            event_buffer_size: 64,
        })
        .catalog(catalog())
        .rewards(reward_tables())
        .repository(repository)
        .notifier(notifier.clone())
        .realizer(realizer.clone())
        .clock(clock.clone())
        .rng_seed(42)
        .build()
        .await
        .expect("runtime should build");

    Harness {
        runtime,
        clock,
        notifier,
        realizer,
    }
}
