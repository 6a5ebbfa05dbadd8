#![allow(dead_code)]

use std::path::PathBuf;

use character_content::{Content, ContentFactory};
use character_core::{Character, CreatureId, ItemArena, Position, Timestamp, VocationId};
use character_runtime::{CharacterSnapshot, Runtime};

pub const KNIGHT: VocationId = VocationId(4);
pub const HOME: Position = Position::new(1_000, 1_000, 7);
pub const TEMPLE: Position = Position::new(990, 990, 7);
pub const START: Timestamp = Timestamp(10_000);

pub fn content() -> Content {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../game/content/data");
    ContentFactory::new(dir).load().expect("bundled content loads")
}

/// Level 8 knight standing at [`HOME`].
pub fn knight() -> Character {
    Character::builder(CreatureId(1), "Sir Test")
        .vocation(KNIGHT)
        .position(HOME)
        .temple(TEMPLE)
        .health(185)
        .mana(35)
        .capacity(47_000)
        .level(8, 4_200)
        .build()
}

pub async fn start(character: Character) -> Runtime {
    Runtime::builder()
        .content(&content())
        .snapshot(CharacterSnapshot {
            character,
            arena: ItemArena::new(),
            saved_at: START,
        })
        .build()
        .await
        .expect("runtime builds")
}
