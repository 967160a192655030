//! End-to-end service behaviour on a manual clock.

mod common;

use std::sync::Arc;

use common::{OTHER, PLAYER, assert_close, harness};
use economy_core::{
    BonusCategory, BoostError, BoostScope, CrystalKind, ModifierError, RewardError, RewardPayload,
};
use economy_runtime::{
    Audience, BoostEvent, EconomyEvent, InMemoryProfileRepo, RuntimeError, Topic,
};

fn repo() -> Arc<InMemoryProfileRepo> {
    Arc::new(InMemoryProfileRepo::new())
}

#[tokio::test]
async fn player_admin_and_all_boosts_add_up() {
    let h = harness(repo()).await;
    let service = h.runtime.service();

    service
        .activate(PLAYER, BonusCategory::SellPrice, 3_600, 30.0, BoostScope::Player)
        .expect("player boost");
    service
        .activate_global(BonusCategory::SellPrice, 3_600, 10.0)
        .expect("global boost");
    service
        .activate(PLAYER, BonusCategory::All, 3_600, 5.0, BoostScope::Player)
        .expect("all boost");

    assert_close(service.compute_total(PLAYER, BonusCategory::SellPrice), 45.0);
    assert_close(service.multiplier(PLAYER, BonusCategory::SellPrice), 1.45);

    let breakdown = service.breakdown(PLAYER, BonusCategory::SellPrice);
    assert_close(breakdown.player, 30.0);
    assert_close(breakdown.admin, 10.0);
    assert_close(breakdown.player_all, 5.0);
    assert_close(breakdown.permanent(), 0.0);

    // Another player only sees the global boost.
    assert_close(service.compute_total(OTHER, BonusCategory::SellPrice), 10.0);
    assert_close(service.compute_total(PLAYER, BonusCategory::Xp), 5.0);

    h.runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn second_activation_is_rejected_without_extending() {
    let h = harness(repo()).await;
    let service = h.runtime.service();

    let first = service
        .activate_boost_item(PLAYER, "sell_boost")
        .expect("first use");
    h.clock.advance_secs(600);

    let err = service
        .activate_boost_item(PLAYER, "sell_boost")
        .expect_err("second use must fail");
    assert!(matches!(
        err,
        RuntimeError::Boost(BoostError::AlreadyActive { ends_at, .. }) if ends_at == first.end
    ));

    let active = service.list_active(PLAYER);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].end, first.end);

    assert!(matches!(
        service.activate_boost_item(PLAYER, "luck_charm"),
        Err(RuntimeError::Catalog(_))
    ));

    h.runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn expiry_is_immediate_and_sweep_notifies() {
    let h = harness(repo()).await;
    let service = h.runtime.service();
    let mut boost_events = h.runtime.subscribe(Topic::Boost);

    service
        .activate_boost_item(PLAYER, "xp_potion")
        .expect("activate");
    service
        .activate_global(BonusCategory::Money, 60, 15.0)
        .expect("global");
    assert!(matches!(
        boost_events.recv().await,
        Ok(EconomyEvent::Boost(BoostEvent::Activated { entity: Some(PLAYER), .. }))
    ));
    assert!(matches!(
        boost_events.recv().await,
        Ok(EconomyEvent::Boost(BoostEvent::Activated { entity: None, .. }))
    ));

    h.clock.advance_secs(600);

    // Expired boosts stop counting before any sweep runs.
    assert!(!service.is_active(PLAYER, BonusCategory::Xp));
    assert!(!service.is_active(PLAYER, BonusCategory::Money));
    assert_close(service.compute_total(PLAYER, BonusCategory::Xp), 0.0);
    assert!(service.list_active(PLAYER).is_empty());

    let report = service.sweep(service.now());
    assert_eq!(report.removed(), 2);
    assert!(service.sweep(service.now()).is_empty());

    let personal = h.notifier.messages_for(&Audience::Entity(PLAYER));
    assert!(personal.iter().any(|m| m.contains("XP boost has expired")));
    let global = h.notifier.messages_for(&Audience::Everyone);
    assert!(global.iter().any(|m| m.contains("global Money boost has ended")));

    let mut expired = 0;
    while let Ok(event) = boost_events.try_recv() {
        if matches!(event, EconomyEvent::Boost(BoostEvent::Expired { .. })) {
            expired += 1;
        }
    }
    assert_eq!(expired, 2);

    h.runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn synergy_adds_on_top_of_pet_bonuses() {
    let h = harness(repo()).await;
    let service = h.runtime.service();

    for (kind, xp) in [("fox", 1_000), ("owl", 2_000), ("cat", 3_000)] {
        let pet = service.add_pet(PLAYER, kind).expect("add pet");
        service
            .gain_pet_xp(PLAYER, pet.id(), xp)
            .expect("gain xp");
        service
            .set_pet_equipped(PLAYER, pet.id(), true)
            .expect("equip");
    }

    // cat: 0.1 * 30 = 3.0, trio: 0.2 * (10 + 20 + 30) = 12.0
    let breakdown = service.breakdown(PLAYER, BonusCategory::SellPrice);
    assert_close(breakdown.pets, 3.0);
    assert_close(breakdown.synergy, 12.0);
    assert_close(service.compute_total(PLAYER, BonusCategory::SellPrice), 15.0);
    assert_close(service.compute_total(PLAYER, BonusCategory::Money), 5.0);

    let owl = service.modifiers(PLAYER).pets[1].id();
    service
        .set_pet_equipped(PLAYER, owl, false)
        .expect("unequip");
    assert_close(service.compute_total(PLAYER, BonusCategory::SellPrice), 3.0);

    h.runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn pet_growth_caps_at_fifty() {
    let h = harness(repo()).await;
    let service = h.runtime.service();

    let pet = service.add_pet(PLAYER, "fox").expect("add pet");
    let grown = service
        .gain_pet_xp(PLAYER, pet.id(), u32::MAX)
        .expect("gain xp");
    assert_eq!(grown.growth(), 50);
    assert_eq!(grown.xp(), 0);
    assert!(grown.is_maxed());

    assert!(matches!(
        service.gain_pet_xp(PLAYER, economy_core::PetId(99), 10),
        Err(RuntimeError::Modifier(ModifierError::PetNotFound(_)))
    ));
    assert!(
        h.notifier
            .messages_for(&Audience::Entity(PLAYER))
            .iter()
            .any(|m| m.contains("max growth"))
    );

    h.runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn crystals_must_be_revealed_before_equipping() {
    let h = harness(repo()).await;
    let service = h.runtime.service();

    let crystal = service.add_crystal(PLAYER, 10);
    assert_eq!(crystal.level(), 10);
    assert!(matches!(
        service.equip_crystal(PLAYER, crystal.id()),
        Err(RuntimeError::Modifier(ModifierError::CrystalUnrevealed(_)))
    ));

    let revealed = service
        .reveal_crystal(PLAYER, crystal.id())
        .expect("reveal");
    let again = service
        .reveal_crystal(PLAYER, crystal.id())
        .expect("reveal twice");
    assert_eq!(revealed, again);
    assert_eq!(revealed.level(), 10);

    service
        .equip_crystal(PLAYER, crystal.id())
        .expect("equip revealed");

    let (category, expected) = match revealed.kind() {
        CrystalKind::Revealed(kind) if kind.as_str() == "token_greed" => {
            (BonusCategory::Token, 20.0)
        }
        CrystalKind::Revealed(_) => (BonusCategory::SellPrice, 15.0),
        CrystalKind::Unrevealed => panic!("crystal should be revealed"),
    };
    assert_close(service.compute_total(PLAYER, category), expected);

    service
        .unequip_crystal(PLAYER, crystal.id())
        .expect("unequip");
    assert_close(service.compute_total(PLAYER, category), 0.0);

    h.runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn reward_tables_realize_each_payload_kind() {
    let h = harness(repo()).await;
    let service = h.runtime.service();
    let mut rewards = h.runtime.subscribe(Topic::Reward);

    let coins = service.open_reward(PLAYER, "coins").expect("coins");
    assert!(coins.is_external());
    assert_eq!(h.realizer.all(), vec![(PLAYER, coins.clone())]);

    service.open_reward(PLAYER, "crystal").expect("crystal");
    let crystals = service.modifiers(PLAYER).crystals.clone();
    assert_eq!(crystals.len(), 1);
    assert!((3..=5).contains(&crystals[0].level()));
    assert!(!crystals[0].is_revealed());

    service.open_reward(PLAYER, "potion").expect("potion");
    assert!(service.is_active(PLAYER, BonusCategory::Xp));

    service.open_reward(PLAYER, "fox").expect("fox");
    assert_eq!(service.modifiers(PLAYER).pets.len(), 1);

    // A boost reward for a running boost surfaces the rejection.
    assert!(matches!(
        service.open_reward(PLAYER, "potion"),
        Err(RuntimeError::Boost(BoostError::AlreadyActive { .. }))
    ));
    assert!(matches!(
        service.open_reward(PLAYER, "missing"),
        Err(RuntimeError::Reward(RewardError::UnknownTable(_)))
    ));
    assert!(matches!(
        service.open_reward(PLAYER, "empty"),
        Err(RuntimeError::Reward(RewardError::EmptyTable))
    ));

    match rewards.recv().await.expect("reward event") {
        EconomyEvent::Reward(event) => {
            assert_eq!(event.entity, PLAYER);
            assert_eq!(event.table.as_ref().map(|t| t.as_str()), Some("coins"));
            assert_eq!(event.payload, coins);
        }
        other => panic!("unexpected event {other:?}"),
    }

    let direct = RewardPayload::Item {
        item_id: "rare_ore".into(),
        amount: 2,
    };
    service.grant(OTHER, &direct).expect("direct grant");
    assert_eq!(h.realizer.all().last(), Some(&(OTHER, direct)));
    assert!(
        h.notifier
            .messages_for(&Audience::Entity(OTHER))
            .iter()
            .any(|m| m == "You received 2x rare_ore!")
    );

    h.runtime.shutdown().await.expect("shutdown");
}
