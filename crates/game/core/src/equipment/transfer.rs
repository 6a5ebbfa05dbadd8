//! Mutating equip and unequip transactions.
//!
//! Each call either applies completely or returns an [`EquipError`] with the
//! character and arena untouched. A rejection is also reported to the sink as
//! a `Cancel` notification carrying the error code.

use tracing::debug;

use crate::config::GameConfig;
use crate::context::RuleContext;
use crate::env::GameEnv;
use crate::error::GameError;
use crate::notify::{Notification, NotificationSink};
use crate::passive;
use crate::state::{Character, ItemArena, ItemId, ItemInstance, Slot, SlotTarget};
use crate::stats::compute_derived_stats;

use super::resolver::{Destination, Placement, query_add, query_max_count, query_remove};
use super::{EquipError, EquipHook};

/// Request to move `count` of `item` onto the character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipRequest {
    pub item: ItemId,
    pub target: SlotTarget,
    /// Ignored for items that do not stack.
    pub count: u32,
}

impl EquipRequest {
    pub fn new(item: ItemId, target: impl Into<SlotTarget>) -> Self {
        Self {
            item,
            target: target.into(),
            count: 1,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EquipOutcome {
    /// Item now sitting at the destination. Differs from the request when a
    /// partial stack was split off or merged into an existing stack.
    pub placed: ItemId,
    pub destination: Destination,
    /// Item pushed out of the slot; the caller decides where it goes.
    pub displaced: Option<ItemId>,
}

/// Equips an item, exchanging or merging with the slot occupant as needed.
///
/// On success the inventory weight, derived stats and passive overlay are
/// refreshed and `InventorySlot` + `Stats` are emitted.
pub fn try_equip(
    character: &mut Character,
    arena: &mut ItemArena,
    cx: &RuleContext<'_>,
    request: EquipRequest,
    hook: &mut dyn EquipHook,
    sink: &mut dyn NotificationSink,
) -> Result<EquipOutcome, EquipError> {
    let result = equip(character, arena, cx, request, hook, sink);
    if let Err(error) = &result {
        debug!(character = %character.id, item = %request.item, %error, "equip rejected");
        sink.notify(Notification::Cancel {
            code: error.error_code().to_string(),
        });
    }
    result
}

fn equip(
    character: &mut Character,
    arena: &mut ItemArena,
    cx: &RuleContext<'_>,
    request: EquipRequest,
    hook: &mut dyn EquipHook,
    sink: &mut dyn NotificationSink,
) -> Result<EquipOutcome, EquipError> {
    let EquipRequest { item, target, .. } = request;
    let instance = arena.get(item).ok_or(EquipError::NotPossible)?;
    let item_type = cx
        .env
        .item_type(instance.type_id)
        .map_err(|_| EquipError::NotPossible)?;
    let count = if item_type.stackable { request.count } else { 1 };
    if count == 0 || count > instance.count {
        return Err(EquipError::NotPossible);
    }

    let placement = query_add(character, arena, cx, item, target, count)?;
    let (slot, displaced) = match placement {
        Placement::Stored { container } => {
            let placed = store(character, arena, cx, item, count, container, sink);
            refresh_inventory(character, arena, cx, sink);
            return Ok(EquipOutcome {
                placed,
                destination: Destination::Container(container),
                displaced: None,
            });
        }
        Placement::Accepted(slot) => (slot, None),
        Placement::NeedsExchange { slot, displaced } => (slot, Some(displaced)),
    };

    if let Some(displaced) = displaced
        && !hook.can_unequip(character, displaced, slot)
    {
        return Err(EquipError::HookRejected);
    }
    if !hook.can_equip(character, item, item_type, slot) {
        return Err(EquipError::HookRejected);
    }

    let merge_into = character
        .equipment
        .get(slot)
        .filter(|&occupant| occupant != item && displaced.is_none());
    if merge_into.is_some() {
        query_max_count(character, arena, cx, item, SlotTarget::Named(slot), count)?;
    }

    let placed = match merge_into {
        Some(stack) => {
            let moved = take_from(character, arena, item, count, sink);
            arena.remove(moved);
            if let Some(existing) = arena.get_mut(stack) {
                existing.count += count;
            }
            stack
        }
        None => {
            let placed = take_from(character, arena, item, count, sink);
            character.equipment.set(slot, placed);
            placed
        }
    };

    debug!(
        character = %character.id,
        item = %placed,
        slot = <&'static str>::from(slot),
        count,
        exchanged = displaced.is_some(),
        "equipped"
    );

    refresh_inventory(character, arena, cx, sink);
    sink.notify(Notification::InventorySlot {
        slot,
        item: Some(placed),
    });
    if let Some(displaced) = displaced {
        hook.on_unequip(character, displaced, slot);
    }
    hook.on_equip(character, placed, slot);

    Ok(EquipOutcome {
        placed,
        destination: Destination::Slot(slot),
        displaced,
    })
}

/// Takes `count` off the item in `slot`.
///
/// A partial stack is split into a new arena entry, which is returned; the
/// remainder stays equipped. The returned item is no longer carried and the
/// caller decides where it goes.
pub fn try_unequip(
    character: &mut Character,
    arena: &mut ItemArena,
    cx: &RuleContext<'_>,
    slot: Slot,
    count: u32,
    hook: &mut dyn EquipHook,
    sink: &mut dyn NotificationSink,
) -> Result<ItemId, EquipError> {
    let result = unequip(character, arena, cx, slot, count, hook, sink);
    if let Err(error) = &result {
        debug!(character = %character.id, slot = <&'static str>::from(slot), %error, "unequip rejected");
        sink.notify(Notification::Cancel {
            code: error.error_code().to_string(),
        });
    }
    result
}

fn unequip(
    character: &mut Character,
    arena: &mut ItemArena,
    cx: &RuleContext<'_>,
    slot: Slot,
    count: u32,
    hook: &mut dyn EquipHook,
    sink: &mut dyn NotificationSink,
) -> Result<ItemId, EquipError> {
    let item = character
        .equipment
        .get(slot)
        .ok_or(EquipError::NotPossible)?;
    query_remove(character, arena, &cx.env, item, count)?;
    if !hook.can_unequip(character, item, slot) {
        return Err(EquipError::HookRejected);
    }

    let taken = take_from(character, arena, item, count, sink);
    debug!(character = %character.id, item = %taken, slot = <&'static str>::from(slot), count, "unequipped");

    refresh_inventory(character, arena, cx, sink);
    if taken != item {
        sink.notify(Notification::InventorySlot {
            slot,
            item: Some(item),
        });
    }
    hook.on_unequip(character, taken, slot);
    Ok(taken)
}

/// Destroys the items in `slots`, used when charges run out.
pub fn discard_slots(
    character: &mut Character,
    arena: &mut ItemArena,
    cx: &RuleContext<'_>,
    slots: &[Slot],
    sink: &mut dyn NotificationSink,
) {
    if slots.is_empty() {
        return;
    }
    for &slot in slots {
        if let Some(item) = character.equipment.take(slot) {
            debug!(character = %character.id, %item, slot = <&'static str>::from(slot), "item exhausted");
            arena.remove(item);
            sink.notify(Notification::InventorySlot { slot, item: None });
        }
    }
    refresh_inventory(character, arena, cx, sink);
}

/// Total weight of everything equipped, containers included.
pub fn inventory_weight(character: &Character, arena: &ItemArena, env: &GameEnv<'_>) -> u32 {
    let Ok(items) = env.items() else {
        return character.inventory_weight;
    };
    character
        .equipment
        .iter()
        .fold(0u32, |acc, (_, id)| acc.saturating_add(arena.total_weight(id, items)))
}

/// Recomputes weight, passive overlay and derived stats after the inventory
/// changed.
pub(crate) fn refresh_inventory(
    character: &mut Character,
    arena: &ItemArena,
    cx: &RuleContext<'_>,
    sink: &mut dyn NotificationSink,
) {
    character.inventory_weight = inventory_weight(character, arena, &cx.env);
    passive::on_combat_tick(character, arena, cx, true, sink);
    character.combat.cached = compute_derived_stats(character, arena, &cx.env, cx.now);
    sink.notify(Notification::Stats);
}

/// Detaches `count` of `item` from wherever it sits on the character.
///
/// Moving a whole item detaches the item itself; a partial count splits a new
/// instance off and leaves the source in place.
fn take_from(
    character: &mut Character,
    arena: &mut ItemArena,
    item: ItemId,
    count: u32,
    sink: &mut dyn NotificationSink,
) -> ItemId {
    let Some(source) = arena.get_mut(item) else {
        return item;
    };
    if count < source.count {
        source.count -= count;
        let split = ItemInstance::new(source.type_id).with_count(count);
        return arena.insert(split);
    }

    if let Some(slot) = character.equipment.slot_of(item) {
        character.equipment.take(slot);
        sink.notify(Notification::InventorySlot { slot, item: None });
    } else {
        let roots: Vec<ItemId> = character.equipment.iter().map(|(_, id)| id).collect();
        for root in roots {
            if remove_child(arena, root, item) {
                break;
            }
        }
    }
    item
}

fn remove_child(arena: &mut ItemArena, parent: ItemId, item: ItemId) -> bool {
    let Some(children) = arena.get(parent).map(|p| p.contents.clone()) else {
        return false;
    };
    if let Some(index) = children.iter().position(|&child| child == item) {
        if let Some(parent) = arena.get_mut(parent) {
            parent.contents.remove(index);
        }
        return true;
    }
    children
        .into_iter()
        .any(|child| remove_child(arena, child, item))
}

/// Puts `count` of `item` into `container`, merging into a matching stack
/// with room when there is one.
fn store(
    character: &mut Character,
    arena: &mut ItemArena,
    cx: &RuleContext<'_>,
    item: ItemId,
    count: u32,
    container: ItemId,
    sink: &mut dyn NotificationSink,
) -> ItemId {
    let stackable = arena
        .get(item)
        .and_then(|i| cx.env.item_type(i.type_id).ok())
        .is_some_and(|t| t.stackable);
    let type_id = arena.get(item).map(|i| i.type_id);
    let stack = stackable
        .then(|| arena.get(container))
        .flatten()
        .and_then(|bag| {
            bag.contents.iter().copied().find(|&child| {
                child != item
                    && arena.get(child).is_some_and(|c| {
                        Some(c.type_id) == type_id && c.count + count <= GameConfig::MAX_STACK
                    })
            })
        });

    let moved = take_from(character, arena, item, count, sink);
    match stack {
        Some(stack) => {
            arena.remove(moved);
            if let Some(existing) = arena.get_mut(stack) {
                existing.count += count;
            }
            stack
        }
        None => {
            if let Some(bag) = arena.get_mut(container) {
                bag.contents.push(moved);
            }
            moved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::NoHooks;
    use crate::state::Timestamp;
    use crate::testing::*;

    const NOW: Timestamp = Timestamp(1_000);

    #[derive(Default)]
    struct Recorder {
        equipped: Vec<(ItemId, Slot)>,
        unequipped: Vec<(ItemId, Slot)>,
        veto: bool,
    }

    impl EquipHook for Recorder {
        fn can_equip(
            &mut self,
            _character: &Character,
            _item: ItemId,
            _item_type: &crate::env::ItemType,
            _slot: Slot,
        ) -> bool {
            !self.veto
        }

        fn on_equip(&mut self, _character: &mut Character, item: ItemId, slot: Slot) {
            self.equipped.push((item, slot));
        }

        fn on_unequip(&mut self, _character: &mut Character, item: ItemId, slot: Slot) {
            self.unequipped.push((item, slot));
        }
    }

    #[test]
    fn equip_updates_weight_stats_and_notifies() {
        let mut fx = Fixture::new();
        let mut character = knight();
        let shield = fx.spawn(SHIELD);
        let mut sink = Vec::new();

        let (cx, arena) = fx.cx_mut(NOW);
        let outcome = try_equip(
            &mut character,
            arena,
            &cx,
            EquipRequest::new(shield, Slot::Right),
            &mut NoHooks,
            &mut sink,
        )
        .unwrap();

        assert_eq!(outcome.placed, shield);
        assert_eq!(outcome.destination, Destination::Slot(Slot::Right));
        assert_eq!(character.equipment.get(Slot::Right), Some(shield));
        assert_eq!(character.inventory_weight, 6_900);
        assert!(character.combat.cached.defense > 0);
        assert!(sink.contains(&Notification::Stats));
        assert!(sink.contains(&Notification::InventorySlot {
            slot: Slot::Right,
            item: Some(shield)
        }));
    }

    #[test]
    fn rejected_equip_leaves_state_and_emits_cancel() {
        let mut fx = Fixture::new();
        let mut character = knight();
        let sword = fx.wear(&mut character, Slot::Left, SWORD);
        let giant = fx.spawn(GIANT_SWORD);
        let before = character.clone();
        let mut sink = Vec::new();

        let (cx, arena) = fx.cx_mut(NOW);
        let result = try_equip(
            &mut character,
            arena,
            &cx,
            EquipRequest::new(giant, Slot::Right),
            &mut NoHooks,
            &mut sink,
        );

        assert_eq!(result, Err(EquipError::BothHandsNeedToBeFree));
        assert_eq!(character, before);
        assert_eq!(character.equipment.get(Slot::Left), Some(sword));
        assert_eq!(
            sink,
            vec![Notification::Cancel {
                code: "EQUIP_BOTH_HANDS_NEED_TO_BE_FREE".into()
            }]
        );
    }

    #[test]
    fn exchange_returns_displaced_item_and_runs_hooks() {
        let mut fx = Fixture::new();
        let mut character = knight();
        let old = fx.wear(&mut character, Slot::Head, HELMET);
        let new = fx.spawn(HELMET);
        let mut hooks = Recorder::default();

        let (cx, arena) = fx.cx_mut(NOW);
        let outcome = try_equip(
            &mut character,
            arena,
            &cx,
            EquipRequest::new(new, Slot::Head),
            &mut hooks,
            &mut Vec::new(),
        )
        .unwrap();

        assert_eq!(outcome.displaced, Some(old));
        assert_eq!(character.equipment.get(Slot::Head), Some(new));
        assert_eq!(hooks.unequipped, vec![(old, Slot::Head)]);
        assert_eq!(hooks.equipped, vec![(new, Slot::Head)]);
    }

    #[test]
    fn hook_veto_rejects_without_mutation() {
        let mut fx = Fixture::new();
        let mut character = knight();
        let ring = fx.spawn(MIGHT_RING);
        let mut hooks = Recorder {
            veto: true,
            ..Recorder::default()
        };

        let (cx, arena) = fx.cx_mut(NOW);
        let result = try_equip(
            &mut character,
            arena,
            &cx,
            EquipRequest::new(ring, Slot::Ring),
            &mut hooks,
            &mut Vec::new(),
        );

        assert_eq!(result, Err(EquipError::HookRejected));
        assert!(character.equipment.is_empty(Slot::Ring));
        assert!(hooks.equipped.is_empty());
    }

    #[test]
    fn partial_stack_merges_into_ammo_slot() {
        let mut fx = Fixture::new();
        let mut character = knight();
        let quiver_stack = fx.spawn_stack(ARROW, 60);
        character.equipment.set(Slot::Ammo, quiver_stack);
        let loose = fx.spawn_stack(ARROW, 50);

        let (cx, arena) = fx.cx_mut(NOW);
        let outcome = try_equip(
            &mut character,
            arena,
            &cx,
            EquipRequest::new(loose, Slot::Ammo).with_count(30),
            &mut NoHooks,
            &mut Vec::new(),
        )
        .unwrap();

        assert_eq!(outcome.placed, quiver_stack);
        assert_eq!(arena.get(quiver_stack).map(|i| i.count), Some(90));
        assert_eq!(arena.get(loose).map(|i| i.count), Some(20));
    }

    #[test]
    fn merge_beyond_stack_size_is_rejected() {
        let mut fx = Fixture::new();
        let mut character = knight();
        let stack = fx.spawn_stack(ARROW, 90);
        character.equipment.set(Slot::Ammo, stack);
        let loose = fx.spawn_stack(ARROW, 20);

        let (cx, arena) = fx.cx_mut(NOW);
        let result = try_equip(
            &mut character,
            arena,
            &cx,
            EquipRequest::new(loose, Slot::Ammo).with_count(20),
            &mut NoHooks,
            &mut Vec::new(),
        );

        assert_eq!(result, Err(EquipError::NotEnoughRoom));
        assert_eq!(arena.get(stack).map(|i| i.count), Some(90));
    }

    #[test]
    fn moving_between_hands_frees_the_old_slot() {
        let mut fx = Fixture::new();
        let mut character = knight();
        let sword = fx.wear(&mut character, Slot::Left, SWORD);
        let mut sink = Vec::new();

        let (cx, arena) = fx.cx_mut(NOW);
        try_equip(
            &mut character,
            arena,
            &cx,
            EquipRequest::new(sword, Slot::Right),
            &mut NoHooks,
            &mut sink,
        )
        .unwrap();

        assert!(character.equipment.is_empty(Slot::Left));
        assert_eq!(character.equipment.get(Slot::Right), Some(sword));
        assert!(sink.contains(&Notification::InventorySlot {
            slot: Slot::Left,
            item: None
        }));
    }

    #[test]
    fn unequip_splits_stacks() {
        let mut fx = Fixture::new();
        let mut character = knight();
        let stack = fx.spawn_stack(ARROW, 40);
        character.equipment.set(Slot::Ammo, stack);

        let (cx, arena) = fx.cx_mut(NOW);
        let taken = try_unequip(
            &mut character,
            arena,
            &cx,
            Slot::Ammo,
            15,
            &mut NoHooks,
            &mut Vec::new(),
        )
        .unwrap();

        assert_ne!(taken, stack);
        assert_eq!(arena.get(taken).map(|i| i.count), Some(15));
        assert_eq!(arena.get(stack).map(|i| i.count), Some(25));
        assert_eq!(character.equipment.get(Slot::Ammo), Some(stack));
        assert_eq!(character.inventory_weight, 25 * 70);
    }

    #[test]
    fn unequip_whole_item_clears_slot() {
        let mut fx = Fixture::new();
        let mut character = knight();
        let helmet = fx.wear(&mut character, Slot::Head, HELMET);
        let mut hooks = Recorder::default();

        let (cx, arena) = fx.cx_mut(NOW);
        let taken = try_unequip(
            &mut character,
            arena,
            &cx,
            Slot::Head,
            1,
            &mut hooks,
            &mut Vec::new(),
        )
        .unwrap();

        assert_eq!(taken, helmet);
        assert!(character.equipment.is_empty(Slot::Head));
        assert_eq!(hooks.unequipped, vec![(helmet, Slot::Head)]);
        assert_eq!(character.inventory_weight, 0);
    }

    #[test]
    fn unequip_empty_slot_is_not_possible() {
        let mut fx = Fixture::new();
        let mut character = knight();
        let mut sink = Vec::new();

        let (cx, arena) = fx.cx_mut(NOW);
        let result = try_unequip(
            &mut character,
            arena,
            &cx,
            Slot::Feet,
            1,
            &mut NoHooks,
            &mut sink,
        );

        assert_eq!(result, Err(EquipError::NotPossible));
        assert_eq!(
            sink,
            vec![Notification::Cancel {
                code: "EQUIP_NOT_POSSIBLE".into()
            }]
        );
    }

    #[test]
    fn wherever_stores_into_backpack() {
        let mut fx = Fixture::new();
        fx.config = GameConfig::with_modern_slots();
        let mut character = knight();
        let backpack = fx.wear(&mut character, Slot::Backpack, BACKPACK);
        fx.wear(&mut character, Slot::Head, HELMET);
        let helmet = fx.spawn(HELMET);

        let (cx, arena) = fx.cx_mut(NOW);
        let outcome = try_equip(
            &mut character,
            arena,
            &cx,
            EquipRequest::new(helmet, SlotTarget::Wherever),
            &mut NoHooks,
            &mut Vec::new(),
        )
        .unwrap();

        assert_eq!(outcome.destination, Destination::Container(backpack));
        assert!(arena.is_within(backpack, helmet));
        assert_eq!(character.inventory_weight, 1_800 + 4_600 + 4_600);
    }

    #[test]
    fn discard_removes_exhausted_items() {
        let mut fx = Fixture::new();
        let mut character = knight();
        let ring = fx.wear(&mut character, Slot::Ring, MIGHT_RING);
        let mut sink = Vec::new();

        let (cx, arena) = fx.cx_mut(NOW);
        discard_slots(&mut character, arena, &cx, &[Slot::Ring], &mut sink);

        assert!(character.equipment.is_empty(Slot::Ring));
        assert!(!arena.contains(ring));
        assert!(sink.contains(&Notification::InventorySlot {
            slot: Slot::Ring,
            item: None
        }));
    }
}
