//! End-to-end character scenarios driven through the runtime with the
//! bundled content.

mod common;

use character_core::engine::ScheduledAction;
use character_core::state::{FightMode, MajorStat, PassiveKind};
use character_core::{
    CreatureId, CreatureView, EquipError, EquipRequest, ItemInstance, ItemTypeId, SkillKind, Slot,
};
use character_runtime::{Event, RuntimeError, Topic, WorldEdit};

use common::{HOME, TEMPLE, knight, start};

const SWORD: ItemTypeId = ItemTypeId(3264);
const GIANT_SWORD: ItemTypeId = ItemTypeId(3281);
const SHIELD: ItemTypeId = ItemTypeId(3409);

#[tokio::test]
async fn shield_in_defensive_stance_mitigates_sixty_hundredths() {
    let mut character = knight();
    character.combat.fight_mode = FightMode::Defense;
    character.progression.skills.get_mut(SkillKind::Shield).level = 40;
    let runtime = start(character).await;
    let handle = runtime.handle();

    let shield = handle.create_item(ItemInstance::new(SHIELD)).await.unwrap();
    handle
        .equip(EquipRequest::new(shield, Slot::Right))
        .await
        .unwrap();

    let stats = handle.derived_stats().await.unwrap();
    assert!(
        (stats.mitigation - 0.60).abs() < 1e-9,
        "mitigation was {}",
        stats.mitigation
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn sword_advances_cross_two_levels() {
    let runtime = start(knight()).await;
    let handle = runtime.handle();

    // 50 tries to reach 11, 55 more to reach 12
    let levels = handle.add_skill_advance(SkillKind::Sword, 105).await.unwrap();
    assert_eq!(levels, 2);

    let snapshot = handle.snapshot().await.unwrap();
    let sword = snapshot.character.skill(SkillKind::Sword);
    assert_eq!(sword.level, 12);
    assert_eq!(sword.tries, 0);
    assert_eq!(sword.percent, 0.0);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn unblessed_death_to_a_monster_costs_a_level() {
    let runtime = start(knight()).await;
    let handle = runtime.handle();
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);

    let outcome = handle
        .die(Some(CreatureView::monster(CreatureId(300))))
        .await
        .unwrap();
    assert!((outcome.loss_applied - 0.10).abs() < 1e-9);
    assert_eq!(outcome.levels_lost, 1);
    assert!(!outcome.pvp_death);
    assert_eq!(outcome.unfair_fight_reduction, 100);

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.character.level(), 7);
    assert_eq!(snapshot.character.progression.experience, 3_780);
    assert_eq!(snapshot.character.position, TEMPLE);

    match lifecycle.recv().await.unwrap() {
        Event::Died { character, outcome: published } => {
            assert_eq!(character, CreatureId(1));
            assert_eq!(published, outcome);
        }
        other => panic!("unexpected event {other:?}"),
    }

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn battle_instinct_kicks_in_at_five_neighbors() {
    let mut character = knight();
    character.passives.unlock(PassiveKind::BattleInstinct, 1);
    let runtime = start(character).await;
    let handle = runtime.handle();

    let ring = [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0)];
    for (index, (dx, dy)) in ring.iter().take(4).enumerate() {
        handle
            .edit_world(WorldEdit::PlaceCreature {
                at: HOME.offset(*dx, *dy),
                creature: CreatureView::monster(CreatureId(100 + index as u32)),
                level: None,
            })
            .await
            .unwrap();
    }

    handle.enter_fight(true).await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.character.passives.major(MajorStat::Melee), 0);

    let (dx, dy) = ring[4];
    handle
        .edit_world(WorldEdit::PlaceCreature {
            at: HOME.offset(dx, dy),
            creature: CreatureView::monster(CreatureId(104)),
            level: None,
        })
        .await
        .unwrap();
    handle
        .schedule(0, ScheduledAction::ForcePassiveRefresh)
        .await
        .unwrap();
    let report = handle.advance(0).await.unwrap();
    assert_eq!(report.scheduled_ran, 1);

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.character.passives.major(MajorStat::Melee), 1);
    assert_eq!(snapshot.character.passives.major(MajorStat::Shield), 6);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn two_handed_weapon_needs_both_hands_free() {
    let runtime = start(knight()).await;
    let handle = runtime.handle();

    let sword = handle.create_item(ItemInstance::new(SWORD)).await.unwrap();
    let giant = handle
        .create_item(ItemInstance::new(GIANT_SWORD))
        .await
        .unwrap();
    handle
        .equip(EquipRequest::new(sword, Slot::Left))
        .await
        .unwrap();

    let blocked = handle.equip(EquipRequest::new(giant, Slot::Right)).await;
    assert!(matches!(
        blocked,
        Err(RuntimeError::Equip(EquipError::BothHandsNeedToBeFree))
    ));

    handle.unequip(Slot::Left, 1).await.unwrap();
    let outcome = handle
        .equip(EquipRequest::new(giant, Slot::Right))
        .await
        .unwrap();
    assert_eq!(outcome.placed, giant);

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.character.equipment.get(Slot::Right), Some(giant));
    assert_eq!(snapshot.character.equipment.get(Slot::Left), None);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn cancelled_schedule_never_runs() {
    let runtime = start(knight()).await;
    let handle = runtime.handle();

    let sword = handle.create_item(ItemInstance::new(SWORD)).await.unwrap();
    let pending = handle
        .schedule(500, ScheduledAction::Equip(EquipRequest::new(sword, Slot::Left)))
        .await
        .unwrap();
    assert!(handle.cancel(pending).await.unwrap());
    assert!(!handle.cancel(pending).await.unwrap());

    let report = handle.advance(1_000).await.unwrap();
    assert_eq!(report.scheduled_ran, 0);
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.character.equipment.get(Slot::Left), None);

    runtime.shutdown().await.unwrap();
}
