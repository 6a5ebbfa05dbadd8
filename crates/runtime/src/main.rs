//! Headless demo host: loads content, equips a knight and runs a short
//! session, logging every notification.

use anyhow::Result;
use character_content::ContentFactory;
use character_core::{
    Character, CreatureId, EquipRequest, ItemInstance, ItemTypeId, Position, SkillKind, Slot,
    VocationId,
};
use character_runtime::{Event, Runtime, Topic, logging};

const DEFAULT_DATA_DIR: &str = "crates/game/content/data";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init()?;

    let data_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
    let content = ContentFactory::new(data_dir).load()?;

    let temple = Position::new(1_000, 1_000, 7);
    let character = Character::builder(CreatureId(1), "Sir Demo")
        .vocation(VocationId(4))
        .position(temple)
        .temple(temple)
        .health(185)
        .mana(35)
        .capacity(47_000)
        .level(8, 4_200)
        .build();

    let runtime = Runtime::builder()
        .content(&content)
        .character(character)
        .build()
        .await?;

    let mut notifications = runtime.subscribe(Topic::Notification);
    let printer = tokio::spawn(async move {
        while let Ok(Event::Notification { notification, .. }) = notifications.recv().await {
            tracing::info!(?notification, "notification");
        }
    });

    let handle = runtime.handle();
    let sword = handle.create_item(ItemInstance::new(ItemTypeId(3264))).await?;
    let shield = handle.create_item(ItemInstance::new(ItemTypeId(3409))).await?;
    handle.equip(EquipRequest::new(sword, Slot::Left)).await?;
    handle.equip(EquipRequest::new(shield, Slot::Right)).await?;

    handle.add_skill_advance(SkillKind::Sword, 200).await?;
    handle.add_experience(5_000, None).await?;
    handle.advance(2_000).await?;

    let stats = handle.derived_stats().await?;
    tracing::info!(?stats, "derived stats");

    drop(handle);
    runtime.shutdown().await?;
    printer.abort();
    Ok(())
}
