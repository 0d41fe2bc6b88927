//! Floatext - Floating Text & Tooltip Effects for Bevy
//!
//! Demo showcase: a target dummy sprite, number keys spawn each motion
//! preset over it, and `T` toggles a tooltip. Pass `--headless <script>`
//! to run a scripted effect sequence without a window instead.

use bevy::prelude::*;

use floatext::cli;
use floatext::config::{Align, MotionPreset, TextEffectOverrides, DEFAULT_PHYSICS_IMPULSE};
use floatext::effects::{EffectsRng, FloatingTextPlugin, SpawnFloatingText};
use floatext::headless::{run_headless_script, HeadlessScript};
use floatext::tooltip::{
    HideTooltip, ShowTooltip, TooltipBackground, TooltipCommands, TooltipOptions, TooltipPlugin,
};

/// Marker for the sprite the demo spawns numbers over
#[derive(Component)]
struct TargetDummy;

fn main() {
    let args = cli::parse_args();

    if let Some(script_path) = args.headless {
        let mut script = match HeadlessScript::load_from_file(&script_path) {
            Ok(script) => script,
            Err(e) => {
                eprintln!("Failed to load script: {}", e);
                std::process::exit(1);
            }
        };
        if let Some(output) = args.output {
            script.output_path = Some(output.to_string_lossy().into_owned());
        }
        if let Some(seed) = args.seed {
            script.random_seed = Some(seed);
        }
        if let Err(e) = run_headless_script(script) {
            eprintln!("Headless run failed: {}", e);
            std::process::exit(1);
        }
        return;
    }

    App::new()
        // Bevy default plugins with custom window settings
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Floatext Demo".to_string(),
                resolution: (1280.0, 720.0).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        // The effect plugins
        .add_plugins((FloatingTextPlugin::default(), TooltipPlugin))
        .add_systems(Startup, setup_demo)
        .add_systems(Update, (spawn_preset_on_key, toggle_tooltip))
        .run();
}

/// Spawn the camera, the target dummy, and the controls tooltip.
fn setup_demo(mut commands: Commands) {
    commands.spawn(Camera2d);

    commands.spawn((
        Sprite {
            color: Color::srgb(0.55, 0.45, 0.3),
            custom_size: Some(Vec2::new(80.0, 120.0)),
            ..default()
        },
        Transform::from_xyz(0.0, -60.0, 0.0),
        TargetDummy,
    ));

    let mut options = TooltipOptions::new(
        "controls",
        Vec2::new(-480.0, 280.0),
        "1-9: spawn presets\nT: toggle this tooltip",
    );
    options.background = Some(TooltipBackground {
        size: Vec2::new(280.0, 70.0),
        ..Default::default()
    });
    commands.create_tooltip(options);
}

/// Number keys spawn one floating number per preset over the dummy.
fn spawn_preset_on_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    dummy: Query<Entity, With<TargetDummy>>,
    mut rng: ResMut<EffectsRng>,
    mut events: EventWriter<SpawnFloatingText>,
) {
    let Ok(dummy) = dummy.get_single() else {
        return;
    };

    let preset = if keyboard.just_pressed(KeyCode::Digit1) {
        MotionPreset::Up { distance: 60.0 }
    } else if keyboard.just_pressed(KeyCode::Digit2) {
        MotionPreset::Down { distance: 60.0 }
    } else if keyboard.just_pressed(KeyCode::Digit3) {
        MotionPreset::Left { distance: 60.0 }
    } else if keyboard.just_pressed(KeyCode::Digit4) {
        MotionPreset::Right { distance: 60.0 }
    } else if keyboard.just_pressed(KeyCode::Digit5) {
        MotionPreset::Fade
    } else if keyboard.just_pressed(KeyCode::Digit6) {
        MotionPreset::Explode { scale: 2.5 }
    } else if keyboard.just_pressed(KeyCode::Digit7) {
        MotionPreset::Smoke
    } else if keyboard.just_pressed(KeyCode::Digit8) {
        MotionPreset::Custom {
            points: [
                Vec2::new(0.0, 0.0),
                Vec2::new(-80.0, 80.0),
                Vec2::new(80.0, 160.0),
                Vec2::new(0.0, 220.0),
            ],
        }
    } else if keyboard.just_pressed(KeyCode::Digit9) {
        MotionPreset::Physics {
            impulse: DEFAULT_PHYSICS_IMPULSE,
        }
    } else {
        return;
    };

    let damage = (rng.random_f32() * 900.0) as u32 + 100;
    events.send(SpawnFloatingText::new(TextEffectOverrides {
        preset: Some(preset),
        parent: Some(dummy),
        align: Some(Align::TopCenter),
        offset: Some(Vec2::new(0.0, 24.0)),
        text: Some(format!("{}", damage)),
        ..Default::default()
    }));
}

/// `T` toggles the controls tooltip with a fade.
fn toggle_tooltip(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut visible: Local<Option<bool>>,
    mut show_events: EventWriter<ShowTooltip>,
    mut hide_events: EventWriter<HideTooltip>,
) {
    if !keyboard.just_pressed(KeyCode::KeyT) {
        return;
    }

    let currently_visible = visible.unwrap_or(true);
    if currently_visible {
        hide_events.send(HideTooltip::new("controls", true));
    } else {
        show_events.send(ShowTooltip::new("controls", true));
    }
    *visible = Some(!currently_visible);
}
