//! Headless script execution
//!
//! Runs effect scripts without any graphical output, suitable for automated
//! testing. The app ticks on a fixed-step schedule runner, fires script
//! steps as the clock passes them, waits for every animation to finish, and
//! writes the effect log to disk.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use std::time::Duration;

use crate::config::TextEffectConfig;
use crate::effects::log::EffectLog;
use crate::effects::{EffectsRng, FloatingText, FloatingTextPlugin, SpawnFloatingText};
use crate::tooltip::{
    HideTooltip, ShowTooltip, TooltipBackground, TooltipCommands, TooltipFade, TooltipOptions,
    TooltipPlugin,
};

use super::config::{HeadlessScript, ScriptStep};

/// Resource holding the script's steps, sorted by timestamp
#[derive(Resource)]
struct ActiveScript {
    steps: Vec<ScriptStep>,
}

/// Resource to track headless run state
#[derive(Resource)]
pub struct HeadlessRunState {
    /// Hard cap on the run duration
    pub max_duration: f32,
    /// Elapsed run time in seconds
    pub elapsed_time: f32,
    /// Index of the next unfired step
    pub next_step: usize,
    /// Custom output path for the effect log
    pub output_path: Option<String>,
    /// Consecutive frames with every step fired and nothing active.
    /// Spawn requests travel through events and deferred commands, so a
    /// just-fired step is invisible for a frame or two; completion waits
    /// out that window.
    pub drained_frames: u32,
    /// Whether the run has completed
    pub run_complete: bool,
}

/// Frames the run must stay drained before it is declared complete.
const DRAIN_GRACE_FRAMES: u32 = 3;

/// Plugin for headless script execution
pub struct HeadlessPlugin {
    pub script: HeadlessScript,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        let mut steps = self.script.steps.clone();
        steps.sort_by_key(|step| step.at_ms);

        app.insert_resource(ActiveScript { steps })
            .insert_resource(HeadlessRunState {
                max_duration: self.script.max_duration_ms as f32 / 1000.0,
                elapsed_time: 0.0,
                next_step: 0,
                output_path: self.script.output_path.clone(),
                drained_frames: 0,
                run_complete: false,
            })
            .add_systems(Startup, headless_setup)
            .add_systems(
                Update,
                (headless_dispatch_steps, headless_check_complete).chain(),
            )
            .add_systems(PostUpdate, headless_exit_on_complete);
    }
}

/// Startup system: reset the effect log for the run.
fn headless_setup(mut effect_log: ResMut<EffectLog>, rng: Res<EffectsRng>) {
    effect_log.clear();
    match rng.seed {
        Some(seed) => info!("Headless run using deterministic RNG with seed: {}", seed),
        None => info!("Headless run using non-deterministic RNG"),
    }
}

/// Fire script steps as the run clock passes their timestamps.
fn headless_dispatch_steps(
    mut commands: Commands,
    time: Res<Time>,
    script: Res<ActiveScript>,
    mut state: ResMut<HeadlessRunState>,
    mut spawn_events: EventWriter<SpawnFloatingText>,
    mut show_events: EventWriter<ShowTooltip>,
    mut hide_events: EventWriter<HideTooltip>,
) {
    if state.run_complete {
        return;
    }
    state.elapsed_time += time.delta_secs();
    let elapsed_ms = (state.elapsed_time * 1000.0) as u64;

    while state.next_step < script.steps.len() && script.steps[state.next_step].at_ms <= elapsed_ms
    {
        let step = &script.steps[state.next_step];
        state.next_step += 1;

        if let Some(effect) = &step.effect {
            // Validated up front; a failure here means the script changed
            // underneath us, so just skip the step.
            match effect.to_overrides() {
                Ok(overrides) => {
                    spawn_events.send(SpawnFloatingText::new(overrides));
                }
                Err(e) => warn!("skipping effect step at {}ms: {}", step.at_ms, e),
            }
        }

        if let Some(tooltip) = &step.tooltip {
            match tooltip.action.as_str() {
                "create" => {
                    let position = tooltip
                        .position
                        .map(|[x, y]| Vec2::new(x, y))
                        .unwrap_or(Vec2::ZERO);
                    let mut options = TooltipOptions::new(
                        tooltip.id.clone(),
                        position,
                        tooltip.text.clone().unwrap_or_default(),
                    );
                    options.background = tooltip.background.map(|[w, h]| TooltipBackground {
                        size: Vec2::new(w, h),
                        ..Default::default()
                    });
                    commands.create_tooltip(options);
                }
                "show" => {
                    show_events.send(ShowTooltip::new(tooltip.id.clone(), tooltip.animate));
                }
                "hide" => {
                    hide_events.send(HideTooltip::new(tooltip.id.clone(), tooltip.animate));
                }
                other => warn!("skipping unknown tooltip action '{}'", other),
            }
        }
    }
}

/// Declare the run complete once every step has fired and every animation
/// has drained, or when the duration cap is hit.
fn headless_check_complete(
    script: Res<ActiveScript>,
    mut state: ResMut<HeadlessRunState>,
    effect_log: Res<EffectLog>,
    active_texts: Query<(), With<FloatingText>>,
    active_fades: Query<(), With<TooltipFade>>,
) {
    if state.run_complete {
        return;
    }

    let timed_out = state.elapsed_time >= state.max_duration;
    let drained = state.next_step >= script.steps.len()
        && active_texts.is_empty()
        && active_fades.is_empty();

    if drained {
        state.drained_frames += 1;
    } else {
        state.drained_frames = 0;
    }

    if !timed_out && state.drained_frames < DRAIN_GRACE_FRAMES {
        return;
    }

    if timed_out && !drained {
        warn!(
            "Headless run hit the {:.1}s cap with work still active",
            state.max_duration
        );
    }

    match effect_log.save_to_file(state.output_path.as_deref()) {
        Ok(path) => println!("Run complete. Effect log saved to: {}", path),
        Err(e) => eprintln!("Failed to save effect log: {}", e),
    }
    state.run_complete = true;
}

/// Exit the app when the run is complete
fn headless_exit_on_complete(state: Res<HeadlessRunState>, mut exit: EventWriter<AppExit>) {
    if state.run_complete {
        exit.send(AppExit::Success);
    }
}

/// Run a headless effect script to completion
pub fn run_headless_script(script: HeadlessScript) -> Result<(), String> {
    script.validate()?;

    println!("Starting headless effect run...");
    println!("  Steps: {}", script.steps.len());
    println!("  Max duration: {}ms", script.max_duration_ms);

    let rng = match script.random_seed {
        Some(seed) => EffectsRng::from_seed(seed),
        None => EffectsRng::from_entropy(),
    };

    App::new()
        // Minimal plugins - no window, no rendering
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        // Transform and hierarchy plugins needed for container children
        .add_plugins(TransformPlugin)
        .add_plugins(HierarchyPlugin)
        // The effect plugins under test, on the built-in default template
        // so runs do not depend on a local settings file
        .add_plugins((
            FloatingTextPlugin {
                defaults: Some(TextEffectConfig::default()),
            },
            TooltipPlugin,
        ))
        .insert_resource(rng)
        // The scripted run itself
        .add_plugins(HeadlessPlugin { script })
        .run();

    Ok(())
}
