mod common;

use std::time::Duration;

use action_core::{
    ActionEvent, ActionId, ActionRequest, BuffableValue, LifeState, PlayOutcome, Vec3,
};
use action_runtime::{
    CharacterEvent, CharacterSpec, Event, MovementState, Runtime, RuntimeConfig, RuntimeError,
    Topic,
};

use common::*;

fn hero(max_hp: i32) -> CharacterSpec {
    CharacterSpec::new(HERO, false, Vec3::ZERO, max_hp)
}

#[tokio::test]
async fn spawn_and_lookup_errors_are_reported() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();

    handle.spawn_character(hero(50)).await.expect("first spawn");
    let err = handle.spawn_character(hero(50)).await.unwrap_err();
    assert!(matches!(err, RuntimeError::DuplicateCharacter(id) if id == HERO));

    let err = handle.query_character(GRUNT).await.unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownCharacter(id) if id == GRUNT));

    let err = handle
        .play(HERO, ActionRequest::new(ActionId(99)))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownAction(ActionId(99))));

    let snapshot = handle.query_character(HERO).await.expect("hero exists");
    assert_eq!(snapshot.hp, 50);
    assert_eq!(snapshot.life, LifeState::Alive);
    assert_eq!(snapshot.running_actions, 0);

    drop(handle);
    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn melee_hit_lowers_hp_and_tracks_the_target() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();
    let mut characters = handle.subscribe(Topic::Character);

    handle.spawn_character(hero(50)).await.unwrap();
    handle
        .spawn_character(CharacterSpec::new(GRUNT, true, Vec3::new(0.0, 0.0, 1.5), 40))
        .await
        .unwrap();

    let outcome = handle
        .play(HERO, ActionRequest::new(SWING).with_target(GRUNT))
        .await
        .unwrap();
    assert!(matches!(outcome, Some(PlayOutcome::Queued(_))));

    handle.step(8).await.unwrap();

    let grunt = handle.query_character(GRUNT).await.unwrap();
    assert_eq!(grunt.hp, 35);
    let hero = handle.query_character(HERO).await.unwrap();
    assert_eq!(hero.target, Some(GRUNT));

    let hits: Vec<_> = drain(&mut characters)
        .into_iter()
        .filter_map(|event| match event {
            Event::Character(CharacterEvent::HpChanged {
                id, source, delta, hp,
            }) => Some((id, source, delta, hp)),
            _ => None,
        })
        .collect();
    assert_eq!(hits, vec![(GRUNT, HERO, -5, 35)]);
}

#[tokio::test]
async fn incoming_damage_is_scaled_by_the_victims_buffs() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();

    handle.spawn_character(hero(50)).await.unwrap();
    handle
        .spawn_character(CharacterSpec::new(GRUNT, true, Vec3::new(0.0, 0.0, 1.5), 40))
        .await
        .unwrap();

    handle.play(GRUNT, ActionRequest::new(RALLY)).await.unwrap();
    assert_eq!(
        handle
            .buffed_value(GRUNT, BuffableValue::PercentDamageReceived)
            .await
            .unwrap(),
        2.0
    );

    handle
        .play(HERO, ActionRequest::new(SWING).with_target(GRUNT))
        .await
        .unwrap();
    handle.step(8).await.unwrap();

    assert_eq!(handle.query_character(GRUNT).await.unwrap().hp, 30);
}

#[tokio::test]
async fn lethal_damage_kills_npcs_and_clears_their_actions() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();
    let mut characters = handle.subscribe(Topic::Character);

    handle.spawn_character(hero(50)).await.unwrap();
    handle
        .spawn_character(CharacterSpec::new(GRUNT, true, Vec3::new(0.0, 0.0, 1.5), 5))
        .await
        .unwrap();
    handle.play(GRUNT, ActionRequest::new(RALLY)).await.unwrap();
    assert_eq!(handle.running_action_count(GRUNT).await.unwrap(), 1);

    handle
        .play(HERO, ActionRequest::new(SWING).with_target(GRUNT))
        .await
        .unwrap();
    handle.step(8).await.unwrap();

    let grunt = handle.query_character(GRUNT).await.unwrap();
    assert_eq!(grunt.hp, 0);
    assert_eq!(grunt.life, LifeState::Dead);
    assert_eq!(handle.running_action_count(GRUNT).await.unwrap(), 0);

    assert!(drain(&mut characters).iter().any(|event| matches!(
        event,
        Event::Character(CharacterEvent::LifeStateChanged { id, life: LifeState::Dead }) if *id == GRUNT
    )));

    // the dead do not act
    let outcome = handle.play(GRUNT, ActionRequest::new(SWING)).await.unwrap();
    assert_eq!(outcome, None);
}

#[tokio::test]
async fn fainted_hero_is_revived_by_an_ally() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();

    handle.spawn_character(hero(5)).await.unwrap();
    handle
        .spawn_character(CharacterSpec::new(HEALER, false, Vec3::new(-3.0, 0.0, 0.0), 50))
        .await
        .unwrap();
    handle
        .spawn_character(CharacterSpec::new(BRUTE, true, Vec3::new(0.0, 0.0, 1.5), 50))
        .await
        .unwrap();

    handle
        .play(BRUTE, ActionRequest::new(SWING).with_target(HERO))
        .await
        .unwrap();
    handle.step(8).await.unwrap();

    let fallen = handle.query_character(HERO).await.unwrap();
    assert_eq!(fallen.life, LifeState::Fainted);
    assert_eq!(fallen.hp, 0);

    handle
        .play(HEALER, ActionRequest::new(REVIVE).with_target(HERO))
        .await
        .unwrap();
    handle.step(8).await.unwrap();

    let revived = handle.query_character(HERO).await.unwrap();
    assert_eq!(revived.life, LifeState::Alive);
    // revive hp is capped at max hp
    assert_eq!(revived.hp, 5);
}

#[tokio::test]
async fn oversized_heal_saturates_at_max_hp() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();
    let mut characters = handle.subscribe(Topic::Character);

    handle.spawn_character(hero(50)).await.unwrap();
    handle
        .spawn_character(CharacterSpec::new(HEALER, false, Vec3::new(1.5, 0.0, 0.0), 50))
        .await
        .unwrap();

    handle.play(HERO, ActionRequest::new(BLESSING)).await.unwrap();
    handle
        .play(HEALER, ActionRequest::new(MEND).with_target(HERO))
        .await
        .unwrap();
    handle.step(8).await.unwrap();

    assert_eq!(handle.query_character(HERO).await.unwrap().hp, 50);
    let heals: Vec<_> = drain(&mut characters)
        .into_iter()
        .filter_map(|event| match event {
            Event::Character(CharacterEvent::HpChanged { id, delta, hp, .. }) if id == HERO => {
                Some((delta, hp))
            }
            _ => None,
        })
        .collect();
    assert_eq!(heals, vec![(i32::MAX, 50)]);
}

#[tokio::test]
async fn trample_damages_and_knocks_back_what_it_hits() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();

    handle
        .spawn_character(CharacterSpec::new(BRUTE, true, Vec3::ZERO, 80))
        .await
        .unwrap();
    handle
        .spawn_character(CharacterSpec::new(HERO, false, Vec3::new(0.0, 0.0, 2.0), 50))
        .await
        .unwrap();

    handle
        .play(BRUTE, ActionRequest::new(TRAMPLE).with_target(HERO))
        .await
        .unwrap();
    handle.step(10).await.unwrap();

    let hero = handle.query_character(HERO).await.unwrap();
    assert_eq!(hero.hp, 43);
    assert!(hero.position.z > 2.0, "hero should be pushed away, got {:?}", hero.position);
}

#[tokio::test]
async fn braced_victim_stuns_the_trampler() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();
    let mut actions = handle.subscribe(Topic::Action);

    handle
        .spawn_character(CharacterSpec::new(BRUTE, true, Vec3::ZERO, 80))
        .await
        .unwrap();
    handle
        .spawn_character(CharacterSpec::new(HERO, false, Vec3::new(0.0, 0.0, 2.0), 50))
        .await
        .unwrap();

    handle.play(HERO, ActionRequest::new(BRACE)).await.unwrap();
    handle
        .play(BRUTE, ActionRequest::new(TRAMPLE).with_target(HERO))
        .await
        .unwrap();
    handle.step(10).await.unwrap();

    assert_eq!(handle.query_character(HERO).await.unwrap().hp, 50);

    let brute_started: Vec<ActionId> = drain(&mut actions)
        .into_iter()
        .filter_map(|event| match event {
            Event::Action(record) if record.character == BRUTE => match record.event {
                ActionEvent::Started { action_id, .. } => Some(action_id),
                _ => None,
            },
            _ => None,
        })
        .collect();
    assert!(brute_started.contains(&STUNNED), "started: {brute_started:?}");
}

#[tokio::test]
async fn projectile_flies_into_its_target() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();
    let mut characters = handle.subscribe(Topic::Character);

    handle
        .spawn_character(CharacterSpec::new(GRUNT, true, Vec3::ZERO, 30))
        .await
        .unwrap();
    handle
        .spawn_character(CharacterSpec::new(HERO, false, Vec3::new(0.0, 0.0, 4.0), 50))
        .await
        .unwrap();

    handle
        .play(GRUNT, ActionRequest::new(ARROW).with_target(HERO))
        .await
        .unwrap();
    handle.step(10).await.unwrap();

    assert_eq!(handle.query_character(HERO).await.unwrap().hp, 46);
    assert!(drain(&mut characters).iter().any(|event| matches!(
        event,
        Event::Character(CharacterEvent::ProjectileHit { owner, victim, prefab })
            if *owner == GRUNT && *victim == HERO && prefab == "arrow"
    )));
}

#[tokio::test]
async fn moving_interrupts_an_interruptible_action() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();
    handle.spawn_character(hero(50)).await.unwrap();

    handle.play(HERO, ActionRequest::new(WAVE)).await.unwrap();
    assert_eq!(
        handle.active_action(HERO).await.unwrap().map(|r| r.action_id),
        Some(WAVE)
    );

    let destination = Vec3::new(10.0, 0.0, 0.0);
    assert!(handle.move_to(HERO, destination).await.unwrap());
    assert_eq!(handle.active_action(HERO).await.unwrap(), None);

    handle.step(2).await.unwrap();
    let snapshot = handle.query_character(HERO).await.unwrap();
    assert_eq!(snapshot.movement, MovementState::MovingTo(destination));
    assert!(snapshot.position.x > 0.5);
}

#[tokio::test]
async fn attacking_breaks_stealth() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();
    handle.spawn_character(hero(50)).await.unwrap();

    handle.play(HERO, ActionRequest::new(STEALTH)).await.unwrap();
    handle.step(6).await.unwrap();
    assert!(handle.query_character(HERO).await.unwrap().stealthy);

    handle.play(HERO, ActionRequest::new(SWING)).await.unwrap();
    assert!(!handle.query_character(HERO).await.unwrap().stealthy);
}

#[tokio::test]
async fn starting_action_plays_on_spawn_and_despawn_cancels_it() {
    let runtime = manual_runtime().await;
    let handle = runtime.handle();
    let mut actions = handle.subscribe(Topic::Action);

    handle
        .spawn_character(hero(50).with_starting_action(RALLY))
        .await
        .unwrap();
    assert_eq!(handle.running_action_count(HERO).await.unwrap(), 1);
    assert!(handle.is_reuse_elapsed(HERO, RALLY).await.unwrap());

    handle.despawn_character(HERO).await.unwrap();
    assert!(matches!(
        handle.query_character(HERO).await,
        Err(RuntimeError::UnknownCharacter(_))
    ));

    assert!(drain(&mut actions).iter().any(|event| matches!(
        event,
        Event::Action(record)
            if matches!(record.event, ActionEvent::Cancelled { action_id, .. } if action_id == RALLY)
    )));
}

#[tokio::test]
async fn auto_tick_advances_on_its_own() {
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            tick_rate_hz: 100.0,
            ..RuntimeConfig::default()
        })
        .catalog(test_catalog())
        .build()
        .await
        .unwrap();
    let mut ticks = runtime.subscribe(Topic::Tick);

    let event = tokio::time::timeout(Duration::from_secs(2), ticks.recv())
        .await
        .expect("a tick within two seconds")
        .expect("tick channel open");
    assert!(matches!(event, Event::Tick(tick) if tick.tick >= 1));

    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn building_without_a_catalog_fails() {
    let result = Runtime::builder().build().await;
    assert!(matches!(result, Err(RuntimeError::MissingCatalog)));
}
