//! Integration tests for the floating text spawn/animate lifecycle
//!
//! These tests drive a windowless `App` with a manually advanced `Time`
//! resource, so every animation phase is deterministic:
//! - every preset runs motion-then-fade and despawns its element
//! - stored elements are never animated until asked
//! - the at-most-one-animation guard holds, including within one frame
//! - alignment positions elements against their parent's bounds

use bevy::ecs::world::CommandQueue;
use bevy::prelude::*;
use std::time::Duration;

use floatext::config::{
    Align, MotionPreset, TextEffectConfig, TextEffectOverrides, DEFAULT_PHYSICS_IMPULSE,
};
use floatext::effects::log::{EffectLog, EffectLogEventType};
use floatext::effects::{
    AnimateStoredText, EffectsRng, FloatingText, FloatingTextCommands, FloatingTextPlugin,
    SpawnFloatingText,
};
use floatext::tooltip::TooltipPlugin;

/// Phase duration used by most tests; short so runs stay fast.
const TTL_MS: u64 = 160;

/// Frame step. 10 frames cover one phase, ~21 cover a full lifecycle.
const STEP_MS: u64 = 16;

fn create_app() -> App {
    let mut app = App::new();
    app.init_resource::<Time>();
    app.add_plugins((
        FloatingTextPlugin {
            defaults: Some(TextEffectConfig::default()),
        },
        TooltipPlugin,
    ));
    app.insert_resource(EffectsRng::from_seed(7));
    app
}

fn tick(app: &mut App, ms: u64) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_millis(ms));
    app.update();
}

/// Run a closure against a `Commands` buffer and apply it immediately.
fn run_commands<F: FnOnce(&mut Commands) -> Entity>(app: &mut App, f: F) -> Entity {
    let mut queue = CommandQueue::default();
    let entity = {
        let mut commands = Commands::new(&mut queue, app.world());
        f(&mut commands)
    };
    queue.apply(app.world_mut());
    entity
}

fn short_overrides(preset: MotionPreset) -> TextEffectOverrides {
    TextEffectOverrides {
        preset: Some(preset),
        time_to_live: Some(Duration::from_millis(TTL_MS)),
        text: Some("128".to_string()),
        ..Default::default()
    }
}

fn animated_count(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<(), With<FloatingText>>()
        .iter(app.world())
        .count()
}

fn element_count(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<(), With<Text2d>>()
        .iter(app.world())
        .count()
}

fn sole_animated_entity(app: &mut App) -> Entity {
    app.world_mut()
        .query_filtered::<Entity, With<FloatingText>>()
        .single(app.world())
}

#[test]
fn test_every_preset_despawns_within_two_phases() {
    let presets = [
        MotionPreset::Up { distance: 50.0 },
        MotionPreset::Down { distance: 50.0 },
        MotionPreset::Left { distance: 50.0 },
        MotionPreset::Right { distance: 50.0 },
        MotionPreset::Fade,
        MotionPreset::Explode { scale: 3.0 },
        MotionPreset::Smoke,
        MotionPreset::Custom {
            points: [
                Vec2::ZERO,
                Vec2::new(-40.0, 40.0),
                Vec2::new(40.0, 80.0),
                Vec2::new(0.0, 120.0),
            ],
        },
        MotionPreset::Physics {
            impulse: DEFAULT_PHYSICS_IMPULSE,
        },
    ];

    let mut app = create_app();
    for preset in presets {
        app.world_mut()
            .send_event(SpawnFloatingText::new(short_overrides(preset)));
    }
    tick(&mut app, STEP_MS);
    assert_eq!(animated_count(&mut app), 9);

    // Two phases of TTL_MS each, plus slack for phase boundaries
    for _ in 0..(2 * TTL_MS / STEP_MS + 4) {
        tick(&mut app, STEP_MS);
    }
    assert_eq!(animated_count(&mut app), 0, "every preset must clean up");
    assert_eq!(element_count(&mut app), 0, "no text entities may leak");
}

#[test]
fn test_up_preset_rises_then_fades() {
    let mut app = create_app();
    app.world_mut()
        .send_event(SpawnFloatingText::new(short_overrides(MotionPreset::Up {
            distance: 50.0,
        })));
    tick(&mut app, STEP_MS);

    let entity = sole_animated_entity(&mut app);

    // Run out the motion phase
    for _ in 0..(TTL_MS / STEP_MS) {
        tick(&mut app, STEP_MS);
    }
    let transform = app.world().get::<Transform>(entity).unwrap();
    assert!(
        (transform.translation.y - 50.0).abs() < 0.5,
        "motion phase ends at full distance, got y={}",
        transform.translation.y
    );

    // Mid-fade the label is partially transparent
    for _ in 0..(TTL_MS / STEP_MS / 2) {
        tick(&mut app, STEP_MS);
    }
    let color = app.world().get::<TextColor>(entity).unwrap();
    let alpha = color.0.alpha();
    assert!(alpha > 0.0 && alpha < 1.0, "mid-fade alpha was {}", alpha);
}

#[test]
fn test_left_right_presets_move_horizontally() {
    let mut app = create_app();
    app.world_mut()
        .send_event(SpawnFloatingText::new(short_overrides(MotionPreset::Left {
            distance: 50.0,
        })));
    tick(&mut app, STEP_MS);
    let entity = sole_animated_entity(&mut app);

    for _ in 0..(TTL_MS / STEP_MS) {
        tick(&mut app, STEP_MS);
    }
    let transform = app.world().get::<Transform>(entity).unwrap();
    assert!(
        (transform.translation.x + 50.0).abs() < 0.5,
        "left preset slides to -distance on X, got x={}",
        transform.translation.x
    );
    assert_eq!(
        transform.translation.y, 0.0,
        "left preset must not move vertically"
    );

    // Drain, then check the opposite direction
    for _ in 0..(TTL_MS / STEP_MS + 4) {
        tick(&mut app, STEP_MS);
    }
    assert_eq!(animated_count(&mut app), 0);

    app.world_mut()
        .send_event(SpawnFloatingText::new(short_overrides(
            MotionPreset::Right { distance: 50.0 },
        )));
    tick(&mut app, STEP_MS);
    let entity = sole_animated_entity(&mut app);
    for _ in 0..(TTL_MS / STEP_MS) {
        tick(&mut app, STEP_MS);
    }
    let transform = app.world().get::<Transform>(entity).unwrap();
    assert!(
        (transform.translation.x - 50.0).abs() < 0.5,
        "right preset slides to +distance on X, got x={}",
        transform.translation.x
    );
    assert_eq!(transform.translation.y, 0.0);
}

#[test]
fn test_explode_scales_to_target() {
    let mut app = create_app();
    app.world_mut()
        .send_event(SpawnFloatingText::new(short_overrides(
            MotionPreset::Explode { scale: 3.0 },
        )));
    tick(&mut app, STEP_MS);
    let entity = sole_animated_entity(&mut app);

    for _ in 0..(TTL_MS / STEP_MS) {
        tick(&mut app, STEP_MS);
    }
    let transform = app.world().get::<Transform>(entity).unwrap();
    assert!(
        (transform.scale.x - 3.0).abs() < 0.05,
        "explode reaches its scale target, got {}",
        transform.scale.x
    );
}

#[test]
fn test_store_spawns_without_animation() {
    let mut app = create_app();
    let config = TextEffectConfig {
        store: true,
        text: "held".to_string(),
        ..Default::default()
    };
    let entity = run_commands(&mut app, |commands| commands.spawn_floating_text(config));
    tick(&mut app, STEP_MS);

    assert!(app.world().get::<FloatingText>(entity).is_none());
    let before = *app.world().get::<Transform>(entity).unwrap();
    let alpha_before = app.world().get::<TextColor>(entity).unwrap().0.alpha();

    for _ in 0..40 {
        tick(&mut app, STEP_MS);
    }

    // Still alive, still untouched: the caller owns it
    let after = app.world().get::<Transform>(entity).unwrap();
    assert_eq!(before.translation, after.translation);
    assert_eq!(
        alpha_before,
        app.world().get::<TextColor>(entity).unwrap().0.alpha()
    );
    assert!(app.world().get::<FloatingText>(entity).is_none());
}

#[test]
fn test_stored_element_can_be_animated_later() {
    let mut app = create_app();
    let config = TextEffectConfig {
        store: true,
        text: "held".to_string(),
        ..Default::default()
    };
    let entity = run_commands(&mut app, |commands| commands.spawn_floating_text(config));
    tick(&mut app, STEP_MS);

    app.world_mut().send_event(AnimateStoredText {
        entity,
        overrides: short_overrides(MotionPreset::Up { distance: 30.0 }),
    });
    tick(&mut app, STEP_MS);
    assert!(app.world().get::<FloatingText>(entity).is_some());

    for _ in 0..(2 * TTL_MS / STEP_MS + 4) {
        tick(&mut app, STEP_MS);
    }
    assert!(
        app.world().get_entity(entity).is_err(),
        "animated stored element despawns after its sequence"
    );
}

#[test]
fn test_animate_guard_rejects_second_sequence() {
    let mut app = create_app();
    let config = TextEffectConfig {
        store: true,
        text: "held".to_string(),
        ..Default::default()
    };
    let entity = run_commands(&mut app, |commands| commands.spawn_floating_text(config));
    tick(&mut app, STEP_MS);

    // Two requests in the same frame: the first wins
    app.world_mut().send_event(AnimateStoredText {
        entity,
        overrides: short_overrides(MotionPreset::Up { distance: 30.0 }),
    });
    app.world_mut().send_event(AnimateStoredText {
        entity,
        overrides: short_overrides(MotionPreset::Down { distance: 99.0 }),
    });
    tick(&mut app, STEP_MS);

    let fx = app.world().get::<FloatingText>(entity).unwrap();
    assert_eq!(fx.preset, MotionPreset::Up { distance: 30.0 });

    // A later request while animating is also ignored
    tick(&mut app, STEP_MS);
    let elapsed_before = app.world().get::<FloatingText>(entity).unwrap().elapsed;
    app.world_mut().send_event(AnimateStoredText {
        entity,
        overrides: short_overrides(MotionPreset::Smoke),
    });
    tick(&mut app, STEP_MS);

    let fx = app.world().get::<FloatingText>(entity).unwrap();
    assert_eq!(fx.preset, MotionPreset::Up { distance: 30.0 });
    assert!(
        fx.elapsed > elapsed_before,
        "the original sequence keeps running instead of restarting"
    );
}

#[test]
fn test_alignment_against_parent_sprite() {
    let mut app = create_app();
    let parent = app
        .world_mut()
        .spawn((
            Sprite {
                custom_size: Some(Vec2::new(100.0, 40.0)),
                ..Default::default()
            },
            Transform::from_xyz(200.0, 100.0, 0.0),
        ))
        .id();

    // Store so the animator does not move the element after alignment
    app.world_mut()
        .send_event(SpawnFloatingText::new(TextEffectOverrides {
            parent: Some(parent),
            align: Some(Align::RightCenter),
            offset: Some(Vec2::new(5.0, 0.0)),
            store: Some(true),
            text: Some("aligned".to_string()),
            ..Default::default()
        }));
    tick(&mut app, STEP_MS);

    let mut elements = app.world_mut().query_filtered::<&Transform, With<Text2d>>();
    let transform = elements.single(app.world());
    assert_eq!(transform.translation.x, 255.0);
    assert_eq!(transform.translation.y, 100.0);
}

#[test]
fn test_top_center_alignment() {
    let mut app = create_app();
    let parent = app
        .world_mut()
        .spawn((
            Sprite {
                custom_size: Some(Vec2::new(100.0, 40.0)),
                ..Default::default()
            },
            Transform::from_xyz(-50.0, 10.0, 0.0),
        ))
        .id();

    app.world_mut()
        .send_event(SpawnFloatingText::new(TextEffectOverrides {
            parent: Some(parent),
            align: Some(Align::TopCenter),
            store: Some(true),
            text: Some("aligned".to_string()),
            ..Default::default()
        }));
    tick(&mut app, STEP_MS);

    let mut elements = app.world_mut().query_filtered::<&Transform, With<Text2d>>();
    let transform = elements.single(app.world());
    assert_eq!(transform.translation.x, -50.0);
    assert_eq!(transform.translation.y, 30.0);
}

#[test]
fn test_missing_parent_leaves_element_unaligned() {
    let mut app = create_app();
    let parent = app.world_mut().spawn_empty().id();
    app.world_mut().despawn(parent);

    app.world_mut()
        .send_event(SpawnFloatingText::new(TextEffectOverrides {
            parent: Some(parent),
            store: Some(true),
            offset: Some(Vec2::new(7.0, 3.0)),
            text: Some("orphan".to_string()),
            ..Default::default()
        }));
    tick(&mut app, STEP_MS);

    // Still spawned, at its offset, with no pending alignment left behind
    let mut elements = app.world_mut().query_filtered::<&Transform, With<Text2d>>();
    let transform = elements.single(app.world());
    assert_eq!(transform.translation.x, 7.0);
    assert_eq!(transform.translation.y, 3.0);
}

#[test]
fn test_camera_fixed_reparents_under_camera() {
    let mut app = create_app();
    let camera = app.world_mut().spawn(Camera2d).id();

    app.world_mut()
        .send_event(SpawnFloatingText::new(TextEffectOverrides {
            camera_fixed: Some(true),
            store: Some(true),
            text: Some("pinned".to_string()),
            ..Default::default()
        }));
    tick(&mut app, STEP_MS);
    tick(&mut app, STEP_MS);

    let mut elements = app
        .world_mut()
        .query_filtered::<(Entity, &Parent), With<Text2d>>();
    let (_, parent) = elements.single(app.world());
    assert_eq!(parent.get(), camera);
}

#[test]
fn test_lifecycle_is_recorded_in_effect_log() {
    let mut app = create_app();
    app.world_mut()
        .send_event(SpawnFloatingText::new(short_overrides(MotionPreset::Up {
            distance: 50.0,
        })));
    for _ in 0..(2 * TTL_MS / STEP_MS + 6) {
        tick(&mut app, STEP_MS);
    }

    let log = app.world().resource::<EffectLog>();
    assert_eq!(log.filter_by_type(EffectLogEventType::Spawned).len(), 1);
    assert_eq!(
        log.filter_by_type(EffectLogEventType::AnimationStarted).len(),
        1
    );
    assert_eq!(log.filter_by_type(EffectLogEventType::PhaseChanged).len(), 1);
    assert_eq!(log.filter_by_type(EffectLogEventType::Despawned).len(), 1);
}

#[test]
fn test_animated_spawns_are_raised_in_overlay_order() {
    let mut app = create_app();
    app.world_mut()
        .send_event(SpawnFloatingText::new(short_overrides(MotionPreset::Up {
            distance: 50.0,
        })));
    tick(&mut app, STEP_MS);
    let first = sole_animated_entity(&mut app);
    let first_z = app.world().get::<Transform>(first).unwrap().translation.z;

    app.world_mut()
        .send_event(SpawnFloatingText::new(short_overrides(MotionPreset::Up {
            distance: 50.0,
        })));
    tick(&mut app, STEP_MS);

    let mut zs: Vec<f32> = app
        .world_mut()
        .query_filtered::<&Transform, With<FloatingText>>()
        .iter(app.world())
        .map(|t| t.translation.z)
        .collect();
    zs.sort_by(f32::total_cmp);
    assert_eq!(zs.len(), 2);
    assert!(zs[1] > zs[0], "later spawn draws on top");
    assert_eq!(zs[0], first_z);
    assert!(first_z > 100.0, "overlays sit above world sprites");
}
