//! End-to-end runs of `GameSession` driven by frame ticks and intents.

use game_core::{
    Archetype, BossPhase, ChargeOutcome, GameConfig, GameEvent, GameSession, Intent, Item,
    ItemCategory, ItemKind, MovementPattern, ObstacleKind, ObstacleSpec, RangeClass, RemovalCause,
    RunState, SessionError,
};

const FRAME_MS: u64 = 16;

fn config_without_boss() -> GameConfig {
    let mut config = GameConfig::default();
    config.boss.enabled = false;
    config
}

fn config_with_early_boss() -> GameConfig {
    let mut config = GameConfig::default();
    config.boss.spawn_time_sec = 1.0;
    config
}

/// Obstacle parked in front of the player, inside short reach.
fn parked_obstacle(session: &GameSession, hp: u32, contact_damage: u32) -> ObstacleSpec {
    let layout = session.config().field;
    ObstacleSpec::archetype(Archetype::CactusSmall, &layout, 0.0)
        .at(layout.player_x + 70.0, layout.ground_y())
        .with_hp(hp)
        .with_contact_damage(contact_damage)
}

fn give(session: &mut GameSession, item: Item) {
    session
        .complete_generation(session.run_id(), item)
        .expect("session accepts items while playing");
}

fn run_until(
    session: &mut GameSession,
    limit_ms: u64,
    mut done: impl FnMut(&GameEvent) -> bool,
) -> Vec<GameEvent> {
    let mut seen = Vec::new();
    let end = session.clock_ms() + limit_ms;
    while session.clock_ms() < end {
        session.tick(FRAME_MS);
        let events = session.drain_events();
        let finished = events.iter().any(&mut done);
        seen.extend(events);
        if finished {
            break;
        }
    }
    seen
}

#[test]
fn kill_awards_pre_hit_hp_times_ten() {
    let mut session = GameSession::new(config_without_boss(), 7);
    give(&mut session, Item::new("Stick", ItemKind::Melee).with_damage(15));
    let id = session.spawn_obstacle(parked_obstacle(&session, 10, 20));
    session.drain_events();

    session.apply(Intent::Attack).unwrap();

    let events = session.drain_events();
    assert!(events.contains(&GameEvent::ObstacleDestroyed {
        id,
        cause: RemovalCause::Killed,
        points: 100,
    }));
    assert!(events.contains(&GameEvent::ScoreChanged { score: 100 }));
    assert_eq!(session.score(), 100);
    assert!(session.field().get(id).is_none());
}

#[test]
fn bare_hand_attack_obeys_melee_recovery() {
    let mut session = GameSession::new(config_without_boss(), 7);
    let id = session.spawn_obstacle(parked_obstacle(&session, 100, 0));
    session.drain_events();

    session.apply(Intent::Attack).unwrap();
    session.tick(100);
    session.apply(Intent::Attack).unwrap();

    let executed: Vec<_> = session
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, GameEvent::AttackExecuted { .. }))
        .collect();
    assert_eq!(
        executed,
        [GameEvent::AttackExecuted {
            item: None,
            reach: 100.0,
            animation: game_core::AttackAnimation::Slash,
        }]
    );
    assert_eq!(session.field().get(id).map(|o| o.hp), Some(95));

    session.tick(300);
    session.apply(Intent::Attack).unwrap();
    assert_eq!(session.field().get(id).map(|o| o.hp), Some(90));
}

#[test]
fn melee_item_inside_recovery_window_hits_once() {
    let mut session = GameSession::new(config_without_boss(), 7);
    give(&mut session, Item::new("Club", ItemKind::Melee).with_damage(10));
    let id = session.spawn_obstacle(parked_obstacle(&session, 100, 0));

    session.apply(Intent::Attack).unwrap();
    session.tick(FRAME_MS);
    session.apply(Intent::Attack).unwrap();
    session.tick(FRAME_MS);

    assert_eq!(session.field().get(id).map(|o| o.hp), Some(90));
}

#[test]
fn insufficient_mp_leaves_everything_untouched() {
    let mut session = GameSession::new(config_without_boss(), 7);
    assert!(matches!(
        session.request_generation(ItemCategory::Magic, 85),
        Ok(ChargeOutcome::Charging { cost: 85, .. })
    ));
    session.abort_generation(session.run_id());
    assert_eq!(session.vitals().mp.current, 15);
    session.drain_events();

    let outcome = session.request_generation(ItemCategory::Weapon, 20).unwrap();

    assert_eq!(
        outcome,
        ChargeOutcome::InsufficientMp {
            required: 20,
            available: 15
        }
    );
    assert_eq!(
        session.drain_events(),
        [GameEvent::InsufficientMp {
            required: 20,
            available: 15
        }]
    );
    assert_eq!(session.vitals().mp.current, 15);
    assert!(session.arsenal().weapons().is_empty());
}

#[test]
fn fourth_weapon_evicts_the_first() {
    let mut session = GameSession::new(config_without_boss(), 7);
    for name in ["one", "two", "three", "four"] {
        give(&mut session, Item::new(name, ItemKind::Ranged));
    }

    let weapons = session.arsenal().weapons();
    let names: Vec<_> = weapons.items().iter().map(Item::name).collect();
    assert_eq!(names, ["two", "three", "four"]);
    assert_eq!(weapons.active_index(), Some(2));
}

#[test]
fn select_is_exact_and_idempotent() {
    let mut session = GameSession::new(config_without_boss(), 7);
    give(&mut session, Item::new("Zap", ItemKind::Magic));
    give(&mut session, Item::new("Bolt", ItemKind::Magic));
    give(&mut session, Item::new("Sword", ItemKind::Melee));

    let select = Intent::SelectSlot {
        category: ItemCategory::Magic,
        index: 0,
    };
    session.apply(select).unwrap();
    let first = session.arsenal().snapshot();
    session.apply(select).unwrap();

    assert_eq!(session.arsenal().snapshot(), first);
    assert_eq!(first.active_mode, ItemCategory::Magic);
    assert_eq!(first.active_magic, Some(0));

    session
        .apply(Intent::SelectSlot {
            category: ItemCategory::Weapon,
            index: 2,
        })
        .unwrap();
    assert_eq!(session.arsenal().snapshot(), first);
}

#[test]
fn magic_is_single_use_and_heal_skips_hitbox() {
    let mut session = GameSession::new(config_without_boss(), 7);
    let layout = session.config().field;
    session.spawn_obstacle(
        ObstacleSpec::archetype(Archetype::CactusLarge, &layout, 0.0)
            .at(layout.player_x, layout.ground_y()),
    );
    session.tick(FRAME_MS);
    assert_eq!(session.vitals().hp.current, 80);

    give(&mut session, Item::new("Mend", ItemKind::Heal));
    session.apply(Intent::Attack).unwrap();

    assert_eq!(session.vitals().hp.current, 100);
    assert!(session.arsenal().magics().is_empty());
    assert!(
        session
            .drain_events()
            .contains(&GameEvent::HealApplied { amount: 20, hp: 100 })
    );

    give(
        &mut session,
        Item::new("Fireball", ItemKind::Magic).with_range(RangeClass::Long),
    );
    session.apply(Intent::Attack).unwrap();
    assert!(session.arsenal().magics().is_empty());
    assert!(session.arsenal().current().is_none());
}

#[test]
fn vitals_stay_within_bounds_over_a_long_run() {
    let mut session = GameSession::new(config_without_boss(), 42);
    give(&mut session, Item::new("Spear", ItemKind::Ranged).with_damage(12));

    for frame in 0..6_000u64 {
        session.tick(FRAME_MS);
        if frame % 30 == 0 && session.state() == RunState::Playing {
            session.apply(Intent::Attack).unwrap();
        }
        if frame % 200 == 0 && session.state() == RunState::Playing {
            let _ = session.request_generation(ItemCategory::Weapon, 20);
            session.abort_generation(session.run_id());
        }
        let vitals = session.vitals();
        assert!(vitals.hp.current <= session.config().initial_hp);
        assert!(vitals.mp.current <= session.config().initial_mp);
    }
}

#[test]
fn boss_beam_escalates_then_kills() {
    let mut session = GameSession::new(config_with_early_boss(), 3);

    let events = run_until(&mut session, 30_000, |event| {
        matches!(event, GameEvent::GameOver { .. })
    });

    let beam_hits: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            GameEvent::BossBeamHit { hp } => Some(*hp),
            _ => None,
        })
        .collect();
    assert_eq!(beam_hits, [1, 0]);
    assert!(events.iter().any(|e| matches!(e, GameEvent::BossWarning { .. })));
    assert!(events.iter().any(|e| matches!(e, GameEvent::BossSpawned { max_hp: 150, .. })));
    assert!(matches!(
        events.last(),
        Some(GameEvent::GameOver { cleared: false, .. })
    ));
    assert_eq!(session.boss().phase(), BossPhase::Aborted);
    assert!(session.field().boss().is_none());
}

#[test]
fn no_timer_fires_after_the_run_ends() {
    let mut session = GameSession::new(config_with_early_boss(), 3);
    run_until(&mut session, 30_000, |event| {
        matches!(event, GameEvent::GameOver { .. })
    });
    assert_eq!(session.state(), RunState::Over);
    assert_eq!(session.pending_timers(), 0);

    for _ in 0..1_000 {
        session.tick(FRAME_MS);
    }
    assert!(session.drain_events().is_empty());
}

#[test]
fn obstacles_stop_spawning_during_the_encounter() {
    let mut config = config_with_early_boss();
    config.boss.spawn_time_sec = 3.0;
    let mut session = GameSession::new(config, 9);

    let before = run_until(&mut session, 10_000, |event| {
        matches!(event, GameEvent::BossWarning { .. })
    });
    assert!(
        before
            .iter()
            .any(|e| matches!(e, GameEvent::ObstacleSpawned { .. }))
    );

    let during = run_until(&mut session, 6_000, |_| false);
    let regular_spawns = during
        .iter()
        .filter(|e| {
            matches!(
                e,
                GameEvent::ObstacleSpawned {
                    kind: game_core::ObstacleKind::Regular(_),
                    ..
                }
            )
        })
        .count();
    assert_eq!(regular_spawns, 0);
}

/// Kills the player with one contact and waits for the game-over reveal.
fn die_and_wait(session: &mut GameSession) {
    let layout = session.config().field;
    session.spawn_obstacle(
        ObstacleSpec::archetype(Archetype::CactusSmall, &layout, 0.0)
            .at(layout.player_x, layout.ground_y())
            .with_contact_damage(1_000),
    );
    run_until(session, 5_000, |event| {
        matches!(event, GameEvent::GameOver { .. })
    });
    assert_eq!(session.state(), RunState::Over);
}

#[test]
fn generation_charged_before_restart_cannot_touch_the_new_run() {
    let mut session = GameSession::new(config_without_boss(), 4);
    session.request_generation(ItemCategory::Weapon, 20).unwrap();
    let first_run = session.run_id();

    die_and_wait(&mut session);
    session.apply(Intent::Restart).unwrap();
    assert_ne!(session.run_id(), first_run);

    assert_eq!(
        session.request_generation(ItemCategory::Magic, 30).unwrap(),
        ChargeOutcome::Charging {
            category: ItemCategory::Magic,
            cost: 30
        }
    );
    session.drain_events();

    let late = session.complete_generation(first_run, Item::new("Run One Sword", ItemKind::Melee));
    assert!(matches!(late, Err(SessionError::StaleGeneration { .. })));
    session.abort_generation(first_run);

    assert!(session.arsenal().weapons().is_empty());
    assert_eq!(session.vitals().charging(), Some(ItemCategory::Magic));
    assert!(session.drain_events().is_empty());
    assert_eq!(
        session.request_generation(ItemCategory::Weapon, 20).unwrap(),
        ChargeOutcome::AlreadyCharging
    );
    assert_eq!(session.vitals().mp.current, 70);

    give(&mut session, Item::new("Run Two Spell", ItemKind::Magic));
    assert_eq!(session.vitals().charging(), None);
    assert_eq!(session.arsenal().magics().len(), 1);
}

#[test]
fn boss_contact_hurts_without_removing_and_respects_cooldown() {
    let mut session = GameSession::new(config_without_boss(), 8);
    let layout = session.config().field;
    let boss = session.spawn_obstacle(ObstacleSpec {
        kind: ObstacleKind::Boss,
        x: layout.player_x,
        y: layout.player_y(),
        hp: 150,
        contact_damage: 40,
        speed: 0.0,
        pattern: MovementPattern::Linear,
    });
    session.drain_events();

    session.tick(FRAME_MS);
    assert_eq!(session.vitals().hp.current, 60);
    assert!(session.field().get(boss).is_some());

    // 16 + 61 * 16 = 992 ms: still inside the cooldown.
    for _ in 0..61 {
        session.tick(FRAME_MS);
    }
    assert_eq!(session.vitals().hp.current, 60);
    assert!(session.field().get(boss).is_some());

    session.tick(24);
    assert_eq!(session.vitals().hp.current, 20);
    assert!(session.field().get(boss).is_some());
    assert!(!session.drain_events().iter().any(|event| matches!(
        event,
        GameEvent::ObstacleDestroyed {
            cause: RemovalCause::Contact,
            ..
        }
    )));
}

fn defeat_boss(session: &mut GameSession) -> Vec<GameEvent> {
    run_until(session, 10_000, |event| {
        matches!(event, GameEvent::BossSpawned { .. })
    });
    give(
        session,
        Item::new("Railgun", ItemKind::Ranged)
            .with_damage(999)
            .with_range(RangeClass::Long),
    );
    session.apply(Intent::Attack).unwrap();
    session.drain_events()
}

#[test]
fn boss_defeat_clears_stage_and_confirm_starts_next() {
    let mut session = GameSession::new(config_with_early_boss(), 5);

    let events = defeat_boss(&mut session);
    assert!(events.contains(&GameEvent::BossDefeated { bonus: 1_500 }));
    assert_eq!(session.state(), RunState::Clearing);
    let score = session.score();
    assert!(score >= 1_500);

    let events = run_until(&mut session, 5_000, |event| {
        matches!(event, GameEvent::StageClear { .. })
    });
    assert_eq!(events.last(), Some(&GameEvent::StageClear { score, stage: 1 }));
    assert_eq!(session.state(), RunState::Cleared);

    session.apply(Intent::ConfirmStage).unwrap();
    let events = session.drain_events();
    assert_eq!(events.first(), Some(&GameEvent::RunStarted { stage: 2 }));
    assert_eq!(session.stage(), 2);
    assert_eq!(session.score(), 0);
    assert_eq!(session.vitals().hp.current, 100);
    assert_eq!(session.vitals().mp.current, 100);
    assert_eq!(session.boss().phase(), BossPhase::Dormant);
}

#[test]
fn hits_after_the_boss_kill_score_nothing() {
    let mut session = GameSession::new(config_with_early_boss(), 5);
    run_until(&mut session, 10_000, |event| {
        matches!(event, GameEvent::BossSpawned { .. })
    });
    let bystander = session.spawn_obstacle(parked_obstacle(&session, 10, 0));
    give(
        &mut session,
        Item::new("Railgun", ItemKind::Ranged)
            .with_damage(999)
            .with_range(RangeClass::Long),
    );
    let before = session.score();
    session.drain_events();

    session.apply(Intent::Attack).unwrap();

    let events = session.drain_events();
    assert!(events.contains(&GameEvent::BossDefeated { bonus: 1_500 }));
    assert!(!events.iter().any(|event| matches!(
        event,
        GameEvent::ObstacleDestroyed { id, .. } if *id == bystander
    )));
    assert_eq!(session.score(), before + 1_500);
    assert_eq!(session.state(), RunState::Clearing);
}

#[test]
fn final_stage_boss_ends_the_game_cleared() {
    let mut config = config_with_early_boss();
    config.final_stage = Some(1);
    let mut session = GameSession::new(config, 5);

    defeat_boss(&mut session);
    let events = run_until(&mut session, 5_000, |event| {
        matches!(event, GameEvent::GameOver { .. })
    });

    assert!(matches!(
        events.last(),
        Some(GameEvent::GameOver { cleared: true, .. })
    ));
    assert_eq!(session.state(), RunState::Over);
    assert!(session.apply(Intent::ConfirmStage).is_err());
}

#[test]
fn saved_items_are_restored_on_restart() {
    let mut session = GameSession::new(config_without_boss(), 1);
    session.load_saved(vec![
        Item::new("Heirloom", ItemKind::Melee),
        Item::new("Old Spell", ItemKind::Magic),
    ]);
    give(&mut session, Item::new("Fresh", ItemKind::Ranged));
    assert_eq!(session.arsenal().weapons().len(), 2);

    let layout = session.config().field;
    session.spawn_obstacle(
        ObstacleSpec::archetype(Archetype::CactusSmall, &layout, 0.0)
            .at(layout.player_x, layout.ground_y())
            .with_contact_damage(1_000),
    );
    run_until(&mut session, 5_000, |event| {
        matches!(event, GameEvent::GameOver { .. })
    });
    session.apply(Intent::Restart).unwrap();

    let snapshot = session.arsenal().snapshot();
    let weapons: Vec<_> = snapshot.weapons.iter().map(Item::name).collect();
    assert_eq!(weapons, ["Heirloom"]);
    assert_eq!(snapshot.magics.len(), 1);
}
