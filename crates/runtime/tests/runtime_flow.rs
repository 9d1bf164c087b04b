//! Drives the runtime through its handle with manual stepping and fixture
//! generators.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use game_content::ContentFactory;
use game_core::{
    Archetype, ChargeOutcome, GameConfig, GameEvent, Item, ItemCategory, ItemKind, ObstacleSpec,
    RemovalCause, RunState, SessionError,
};
use runtime::{
    Event, GenerationError, GenerationEvent, GenerationRequest, ItemGenerator, Runtime,
    RuntimeError, Topic,
};
use serde_json::{Value, json};
use tokio::sync::{Notify, broadcast};

/// Returns the same payload for every request.
struct ScriptedGenerator(Value);

#[async_trait]
impl ItemGenerator for ScriptedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Value, GenerationError> {
        Ok(self.0.clone())
    }
}

struct FailingGenerator;

#[async_trait]
impl ItemGenerator for FailingGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Value, GenerationError> {
        Err(GenerationError::Unavailable("offline".into()))
    }
}

/// Holds every request until the test opens the gate.
struct GatedGenerator {
    gate: Arc<Notify>,
    payload: Value,
}

#[async_trait]
impl ItemGenerator for GatedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<Value, GenerationError> {
        self.gate.notified().await;
        Ok(self.payload.clone())
    }
}

/// Holds weapon and magic requests behind separate gates.
struct CategoryGatedGenerator {
    weapon: Arc<Notify>,
    magic: Arc<Notify>,
}

#[async_trait]
impl ItemGenerator for CategoryGatedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, GenerationError> {
        match request.category {
            ItemCategory::Weapon => {
                self.weapon.notified().await;
                Ok(sword_payload())
            }
            ItemCategory::Magic => {
                self.magic.notified().await;
                Ok(json!({ "name": "Ember Bolt", "type": "magic", "damage": 40 }))
            }
        }
    }
}

fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.boss.enabled = false;
    config
}

fn sword_payload() -> Value {
    json!({
        "name": "Glass Sword",
        "type": "melee",
        "damage": 35,
        "mpCost": 10,
        "range": "short",
        "element": "ice",
        "sprite": "🗡",
        "color": "#88CCFF",
        "attack_animation": "slash",
        "uniqueness": 70,
    })
}

async fn next_generation_event(rx: &mut broadcast::Receiver<Event>) -> GenerationEvent {
    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("generation event within timeout")
            .expect("event bus open");
        if let Event::Generation(event) = event {
            return event;
        }
    }
}

async fn manual_runtime(generator: impl ItemGenerator + 'static) -> Runtime {
    Runtime::builder()
        .game_config(quiet_config())
        .auto_tick(false)
        .generator(generator)
        .build()
        .await
        .expect("runtime builds")
}

#[tokio::test]
async fn generated_item_lands_in_weapon_inventory() {
    let runtime = manual_runtime(ScriptedGenerator(sword_payload())).await;
    let handle = runtime.handle();
    let mut generation = handle.subscribe(Topic::Generation);

    let outcome = handle
        .request_generation(GenerationRequest::text(ItemCategory::Weapon, "a sword of glass"))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        ChargeOutcome::Charging {
            category: ItemCategory::Weapon,
            cost: 20
        }
    );

    assert_eq!(
        next_generation_event(&mut generation).await,
        GenerationEvent::Requested {
            category: ItemCategory::Weapon,
            cost: 20
        }
    );
    assert_eq!(
        next_generation_event(&mut generation).await,
        GenerationEvent::Completed {
            category: ItemCategory::Weapon,
            name: "Glass Sword".into()
        }
    );

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.mp, 80);
    assert_eq!(snapshot.charging, None);
    assert_eq!(snapshot.inventory.weapons.len(), 1);
    assert_eq!(snapshot.inventory.weapons[0].damage(), 35);
    assert_eq!(snapshot.inventory.active_weapon, Some(0));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn malformed_payload_becomes_fallback_for_category() {
    let runtime = manual_runtime(ScriptedGenerator(json!("not an item"))).await;
    let handle = runtime.handle();
    let mut generation = handle.subscribe(Topic::Generation);

    handle
        .request_generation(GenerationRequest::image(ItemCategory::Magic, "photo.jpg"))
        .await
        .unwrap();

    next_generation_event(&mut generation).await;
    assert_eq!(
        next_generation_event(&mut generation).await,
        GenerationEvent::Completed {
            category: ItemCategory::Magic,
            name: "Mysterious Spell".into()
        }
    );

    let items = handle.arsenal_items().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].category(), ItemCategory::Magic);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn failed_generation_releases_lock_without_refund() {
    let runtime = manual_runtime(FailingGenerator).await;
    let handle = runtime.handle();
    let mut generation = handle.subscribe(Topic::Generation);
    let mut player = handle.subscribe(Topic::Player);

    handle
        .request_generation(GenerationRequest::text(ItemCategory::Magic, "fireball"))
        .await
        .unwrap();

    next_generation_event(&mut generation).await;
    assert!(matches!(
        next_generation_event(&mut generation).await,
        GenerationEvent::Failed {
            category: ItemCategory::Magic,
            ..
        }
    ));

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.mp, 70);
    assert_eq!(snapshot.charging, None);
    assert!(snapshot.inventory.magics.is_empty());

    let mut cancelled = false;
    while let Ok(event) = player.try_recv() {
        cancelled |= event.game_event() == Some(&GameEvent::ChargingCancelled);
    }
    assert!(cancelled);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn second_request_while_charging_is_ignored() {
    let gate = Arc::new(Notify::new());
    let runtime = manual_runtime(GatedGenerator {
        gate: Arc::clone(&gate),
        payload: sword_payload(),
    })
    .await;
    let handle = runtime.handle();
    let mut generation = handle.subscribe(Topic::Generation);

    let first = handle
        .request_generation(GenerationRequest::text(ItemCategory::Weapon, "one"))
        .await
        .unwrap();
    let second = handle
        .request_generation(GenerationRequest::text(ItemCategory::Weapon, "two"))
        .await
        .unwrap();
    assert!(matches!(first, ChargeOutcome::Charging { .. }));
    assert_eq!(second, ChargeOutcome::AlreadyCharging);
    assert_eq!(handle.snapshot().await.unwrap().mp, 80);

    gate.notify_one();
    next_generation_event(&mut generation).await;
    assert!(matches!(
        next_generation_event(&mut generation).await,
        GenerationEvent::Completed { .. }
    ));
    assert_eq!(handle.arsenal_items().await.unwrap().len(), 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn insufficient_mp_is_reported_not_charged() {
    let runtime = manual_runtime(ScriptedGenerator(sword_payload())).await;
    let handle = runtime.handle();

    let outcome = handle
        .request_generation(GenerationRequest::text(ItemCategory::Magic, "meteor").with_cost(150))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        ChargeOutcome::InsufficientMp {
            required: 150,
            available: 100
        }
    );
    assert_eq!(handle.snapshot().await.unwrap().mp, 100);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn generation_without_generator_fails_before_charging() {
    let runtime = Runtime::builder().auto_tick(false).build().await.unwrap();
    let handle = runtime.handle();

    let result = handle
        .request_generation(GenerationRequest::text(ItemCategory::Weapon, "axe"))
        .await;
    assert!(matches!(result, Err(RuntimeError::GeneratorNotSet)));
    assert_eq!(handle.snapshot().await.unwrap().mp, 100);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn item_arriving_after_death_is_discarded() {
    let gate = Arc::new(Notify::new());
    let runtime = manual_runtime(GatedGenerator {
        gate: Arc::clone(&gate),
        payload: sword_payload(),
    })
    .await;
    let handle = runtime.handle();
    let mut generation = handle.subscribe(Topic::Generation);

    handle
        .request_generation(GenerationRequest::text(ItemCategory::Weapon, "late"))
        .await
        .unwrap();
    next_generation_event(&mut generation).await;

    let layout = GameConfig::default().field;
    handle
        .spawn_obstacle(
            ObstacleSpec::archetype(Archetype::CactusLarge, &layout, 0.0)
                .at(layout.player_x, layout.player_y())
                .with_contact_damage(500),
        )
        .await
        .unwrap();
    let snapshot = handle.advance(16).await.unwrap();
    assert_eq!(snapshot.state, RunState::Dying);
    assert_eq!(snapshot.hp, 0);

    gate.notify_one();
    assert_eq!(
        next_generation_event(&mut generation).await,
        GenerationEvent::Discarded {
            category: ItemCategory::Weapon,
            name: "Glass Sword".into()
        }
    );
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.charging, None);
    assert!(snapshot.inventory.weapons.is_empty());

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn generation_from_previous_run_is_discarded_after_restart() {
    let weapon_gate = Arc::new(Notify::new());
    let magic_gate = Arc::new(Notify::new());
    let runtime = manual_runtime(CategoryGatedGenerator {
        weapon: Arc::clone(&weapon_gate),
        magic: Arc::clone(&magic_gate),
    })
    .await;
    let handle = runtime.handle();
    let mut generation = handle.subscribe(Topic::Generation);

    handle
        .request_generation(GenerationRequest::text(ItemCategory::Weapon, "first run"))
        .await
        .unwrap();
    next_generation_event(&mut generation).await;

    let layout = GameConfig::default().field;
    handle
        .spawn_obstacle(
            ObstacleSpec::archetype(Archetype::CactusLarge, &layout, 0.0)
                .at(layout.player_x, layout.player_y())
                .with_contact_damage(500),
        )
        .await
        .unwrap();
    handle.advance(16).await.unwrap();
    assert_eq!(handle.advance(1_000).await.unwrap().state, RunState::Over);
    handle.restart().await.unwrap();

    let charged = handle
        .request_generation(GenerationRequest::text(ItemCategory::Magic, "second run"))
        .await
        .unwrap();
    assert!(matches!(charged, ChargeOutcome::Charging { .. }));
    next_generation_event(&mut generation).await;

    weapon_gate.notify_one();
    assert_eq!(
        next_generation_event(&mut generation).await,
        GenerationEvent::Discarded {
            category: ItemCategory::Weapon,
            name: "Glass Sword".into()
        }
    );

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.charging, Some(ItemCategory::Magic));
    assert!(snapshot.inventory.weapons.is_empty());
    assert_eq!(
        handle
            .request_generation(GenerationRequest::text(ItemCategory::Weapon, "sneaky"))
            .await
            .unwrap(),
        ChargeOutcome::AlreadyCharging
    );
    assert_eq!(handle.snapshot().await.unwrap().mp, 70);

    magic_gate.notify_one();
    assert_eq!(
        next_generation_event(&mut generation).await,
        GenerationEvent::Completed {
            category: ItemCategory::Magic,
            name: "Ember Bolt".into()
        }
    );
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.charging, None);
    assert_eq!(snapshot.inventory.magics.len(), 1);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn attack_publishes_kill_on_field_topic() {
    let runtime = manual_runtime(ScriptedGenerator(sword_payload())).await;
    let handle = runtime.handle();
    let mut field = handle.subscribe(Topic::Field);

    let layout = GameConfig::default().field;
    let id = handle
        .spawn_obstacle(
            ObstacleSpec::archetype(Archetype::CactusSmall, &layout, 0.0)
                .at(layout.player_x + 20.0, layout.ground_y())
                .with_hp(5),
        )
        .await
        .unwrap();
    handle.attack().await.unwrap();

    let mut destroyed = None;
    while let Ok(event) = field.try_recv() {
        if let Some(GameEvent::ObstacleDestroyed { id: hit, cause, .. }) = event.game_event() {
            destroyed = Some((*hit, *cause));
        }
    }
    assert_eq!(destroyed, Some((id, RemovalCause::Killed)));
    assert_eq!(handle.snapshot().await.unwrap().score, 50);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn finished_run_rejects_stage_confirmation() {
    let runtime = manual_runtime(ScriptedGenerator(sword_payload())).await;
    let handle = runtime.handle();

    let result = handle.confirm_stage().await;
    assert!(matches!(
        result,
        Err(RuntimeError::Session(SessionError::RunNotActive { .. }))
    ));

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn saved_arsenal_is_restored_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let content = ContentFactory::new(dir.path());
    content
        .save_arsenal(&[
            Item::new("Bone Club", ItemKind::Melee).with_damage(12),
            Item::new("Spark", ItemKind::Magic).with_damage(18),
        ])
        .unwrap();

    let runtime = Runtime::builder()
        .game_config(quiet_config())
        .auto_tick(false)
        .saved_items(content.load_arsenal().unwrap())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    let names: Vec<String> = handle
        .arsenal_items()
        .await
        .unwrap()
        .iter()
        .map(|item| item.name().to_owned())
        .collect();
    assert_eq!(names, ["Bone Club", "Spark"]);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn ticker_advances_clock_in_fixed_steps() {
    let mut config = runtime::RuntimeConfig {
        tick_interval: Duration::from_millis(5),
        ..Default::default()
    };
    config.game_config.boss.enabled = false;
    let runtime = Runtime::builder().config(config).build().await.unwrap();
    let handle = runtime.handle();

    tokio::time::sleep(Duration::from_millis(120)).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.clock_ms > 0);
    assert_eq!(snapshot.clock_ms % 5, 0);

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn handle_reports_closed_channel_after_shutdown() {
    let runtime = manual_runtime(ScriptedGenerator(sword_payload())).await;
    let handle = runtime.handle();

    runtime.shutdown().await.unwrap();

    assert!(matches!(
        handle.snapshot().await,
        Err(RuntimeError::CommandChannelClosed)
    ));
}

#[tokio::test]
async fn zero_tick_interval_is_rejected() {
    let config = runtime::RuntimeConfig {
        tick_interval: Duration::ZERO,
        ..Default::default()
    };
    let result = Runtime::builder().config(config).build().await;
    assert!(matches!(result, Err(RuntimeError::InvalidConfig(_))));
}
