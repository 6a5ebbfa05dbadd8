//! Shared fixtures for unit tests.

use std::collections::HashMap;

use crate::config::GameConfig;
use crate::context::RuleContext;
use crate::env::{
    AmmoType, CombatType, CreatureView, Env, GameEnv, ItemCatalog, ItemType, ItemTypeId,
    SlotPositions, Vocation, VocationId, VocationTable, WeaponType, WorldOracle, ZoneType,
};
use crate::state::{
    Character, CreatureId, ItemArena, ItemId, ItemInstance, Position, SkillKind, Slot, Timestamp,
};

pub const SWORD: ItemTypeId = ItemTypeId(3264);
pub const GIANT_SWORD: ItemTypeId = ItemTypeId(3281);
pub const SHIELD: ItemTypeId = ItemTypeId(3409);
pub const TOWER_SHIELD: ItemTypeId = ItemTypeId(3428);
pub const SPELLBOOK: ItemTypeId = ItemTypeId(3059);
pub const BOW: ItemTypeId = ItemTypeId(3350);
pub const CROSSBOW: ItemTypeId = ItemTypeId(3349);
pub const ARROW: ItemTypeId = ItemTypeId(3447);
pub const BOLT: ItemTypeId = ItemTypeId(3446);
pub const QUIVER: ItemTypeId = ItemTypeId(35562);
pub const HELMET: ItemTypeId = ItemTypeId(3351);
pub const PLATE_ARMOR: ItemTypeId = ItemTypeId(3357);
pub const MIGHT_RING: ItemTypeId = ItemTypeId(3048);
pub const BACKPACK: ItemTypeId = ItemTypeId(2854);
pub const GOLD: ItemTypeId = ItemTypeId(3031);
pub const ALTAR: ItemTypeId = ItemTypeId(2196);
pub const EMPOWERMENT_FIELD: ItemTypeId = ItemTypeId(12_500);

pub const KNIGHT: VocationId = VocationId(4);
pub const ELITE_KNIGHT: VocationId = VocationId(8);
pub const PALADIN: VocationId = VocationId(3);

pub const HOME: Position = Position::new(100, 100, 7);

pub fn item_catalog() -> ItemCatalog {
    [
        ItemType::new(SWORD, "sword")
            .with_weight(3_500)
            .with_weapon(WeaponType::Sword)
            .with_slots(SlotPositions::HAND)
            .with_defense(14, 1),
        ItemType::new(GIANT_SWORD, "giant sword")
            .with_weight(18_000)
            .with_weapon(WeaponType::Sword)
            .with_slots(SlotPositions::HAND | SlotPositions::TWO_HAND)
            .with_defense(22, 2),
        ItemType::new(SHIELD, "steel shield")
            .with_weight(6_900)
            .with_weapon(WeaponType::Shield)
            .with_slots(SlotPositions::HAND)
            .with_defense(20, 0),
        ItemType::new(TOWER_SHIELD, "tower shield")
            .with_weight(8_200)
            .with_weapon(WeaponType::Shield)
            .with_slots(SlotPositions::HAND)
            .with_defense(32, 0),
        ItemType::new(SPELLBOOK, "spellbook")
            .with_weight(1_800)
            .with_weapon(WeaponType::Shield)
            .with_slots(SlotPositions::HAND)
            .with_defense(12, 0)
            .spellbook(),
        ItemType::new(BOW, "bow")
            .with_weight(3_100)
            .with_weapon(WeaponType::Distance)
            .with_ammo(AmmoType::Arrow)
            .with_slots(SlotPositions::HAND | SlotPositions::TWO_HAND),
        ItemType::new(CROSSBOW, "crossbow")
            .with_weight(4_000)
            .with_weapon(WeaponType::Distance)
            .with_ammo(AmmoType::Bolt)
            .with_slots(SlotPositions::HAND | SlotPositions::TWO_HAND),
        ItemType::new(ARROW, "arrow")
            .with_weight(70)
            .with_weapon(WeaponType::Ammo)
            .with_ammo(AmmoType::Arrow)
            .with_slots(SlotPositions::AMMO)
            .stackable(),
        ItemType::new(BOLT, "bolt")
            .with_weight(80)
            .with_weapon(WeaponType::Ammo)
            .with_ammo(AmmoType::Bolt)
            .with_slots(SlotPositions::AMMO)
            .stackable(),
        ItemType::new(QUIVER, "quiver")
            .with_weight(1_100)
            .with_slots(SlotPositions::RIGHT)
            .quiver(),
        ItemType::new(HELMET, "steel helmet")
            .with_weight(4_600)
            .with_slots(SlotPositions::HEAD)
            .with_armor(6),
        ItemType::new(PLATE_ARMOR, "plate armor")
            .with_weight(12_000)
            .with_slots(SlotPositions::ARMOR)
            .with_armor(10),
        ItemType::new(MIGHT_RING, "might ring")
            .with_weight(100)
            .with_slots(SlotPositions::RING)
            .with_charges(20)
            .with_absorb(CombatType::Physical, 20)
            .with_absorb(CombatType::Fire, 20),
        ItemType::new(BACKPACK, "backpack")
            .with_weight(1_800)
            .with_slots(SlotPositions::BACKPACK)
            .container(),
        ItemType::new(GOLD, "gold coin").with_weight(10).stackable(),
        ItemType::new(ALTAR, "altar").fixed(),
        ItemType::new(EMPOWERMENT_FIELD, "divine empowerment").fixed(),
    ]
    .into_iter()
    .collect()
}

pub fn vocation_table() -> VocationTable {
    let mut knight = Vocation::new(KNIGHT, "Knight")
        .with_promotion(ELITE_KNIGHT)
        .with_gains(15, 5, 2_500)
        .with_mitigation(1.0, 1.0, 1.0)
        .with_skill_multiplier(SkillKind::Sword, 1.1)
        .with_skill_multiplier(SkillKind::Shield, 1.1)
        .with_mana_multiplier(3.0)
        .with_attack_speed(2_000);
    knight.base_speed = 220;
    let mut elite = knight.clone();
    elite.id = ELITE_KNIGHT;
    elite.name = String::from("Elite Knight");
    elite.promotion = None;
    let paladin = Vocation::new(PALADIN, "Paladin")
        .with_promotion(VocationId(7))
        .with_gains(10, 15, 2_000)
        .with_mitigation(1.0, 1.0, 0.9)
        .with_skill_multiplier(SkillKind::Distance, 1.1)
        .with_mana_multiplier(1.4);

    [knight, elite, paladin].into_iter().collect()
}

/// World with hand-placed creatures, ground items and zones.
#[derive(Default)]
pub struct StaticWorld {
    pub creatures: HashMap<Position, CreatureView>,
    pub ground: HashMap<(Position, ItemTypeId), u32>,
    pub zones: HashMap<Position, ZoneType>,
    pub levels: HashMap<CreatureId, u32>,
}

impl StaticWorld {
    pub fn place(&mut self, at: Position, creature: CreatureView) {
        self.creatures.insert(at, creature);
    }

    pub fn place_player(&mut self, at: Position, id: CreatureId, level: u32) {
        self.creatures.insert(at, CreatureView::player(id));
        self.levels.insert(id, level);
    }
}

impl WorldOracle for StaticWorld {
    fn top_visible_creature(&self, at: Position) -> Option<CreatureView> {
        self.creatures.get(&at).copied()
    }

    fn tile_item_count(&self, at: Position, item: ItemTypeId) -> u32 {
        self.ground.get(&(at, item)).copied().unwrap_or(0)
    }

    fn zone(&self, at: Position) -> ZoneType {
        self.zones.get(&at).copied().unwrap_or_default()
    }

    fn player_level(&self, id: CreatureId) -> Option<u32> {
        self.levels.get(&id).copied()
    }
}

pub struct Fixture {
    pub catalog: ItemCatalog,
    pub vocations: VocationTable,
    pub world: StaticWorld,
    pub arena: ItemArena,
    pub config: GameConfig,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            catalog: item_catalog(),
            vocations: vocation_table(),
            world: StaticWorld::default(),
            arena: ItemArena::new(),
            config: GameConfig::default(),
        }
    }

    pub fn env(&self) -> GameEnv<'_> {
        Env::with_all(&self.catalog, &self.vocations, &self.world).into_game_env()
    }

    /// Environment plus mutable arena, for calls that move items.
    pub fn split(&mut self) -> (GameEnv<'_>, &mut ItemArena, &GameConfig) {
        let env = Env::with_all(&self.catalog, &self.vocations, &self.world).into_game_env();
        (env, &mut self.arena, &self.config)
    }

    pub fn cx(&self, now: Timestamp) -> RuleContext<'_> {
        RuleContext::new(self.env(), &self.config, now)
    }

    /// Rule context plus mutable arena.
    pub fn cx_mut(&mut self, now: Timestamp) -> (RuleContext<'_>, &mut ItemArena) {
        let env = Env::with_all(&self.catalog, &self.vocations, &self.world).into_game_env();
        (RuleContext::new(env, &self.config, now), &mut self.arena)
    }

    pub fn spawn(&mut self, type_id: ItemTypeId) -> ItemId {
        let charges = self
            .catalog
            .iter()
            .find(|t| t.id == type_id)
            .map_or(0, |t| t.charges);
        self.arena
            .insert(ItemInstance::new(type_id).with_charges(charges))
    }

    pub fn spawn_stack(&mut self, type_id: ItemTypeId, count: u32) -> ItemId {
        self.arena.insert(ItemInstance::new(type_id).with_count(count))
    }

    /// Puts `child` inside `container`.
    pub fn stow(&mut self, container: ItemId, child: ItemId) {
        if let Some(parent) = self.arena.get_mut(container) {
            parent.contents.push(child);
        }
    }

    /// Places an item directly into a slot, bypassing placement rules.
    pub fn wear(&mut self, character: &mut Character, slot: Slot, type_id: ItemTypeId) -> ItemId {
        let id = self.spawn(type_id);
        character.equipment.set(slot, id);
        id
    }
}

pub fn knight() -> Character {
    Character::builder(CreatureId(1), "Sir Test")
        .vocation(KNIGHT)
        .position(HOME)
        .temple(Position::new(95, 95, 7))
        .health(185)
        .mana(35)
        .capacity(47_000)
        .level(8, 4_200)
        .build()
}
