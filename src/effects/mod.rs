//! Floating text effects
//!
//! Implements the two cooperating halves of the effect path:
//! - **Spawner**: merges per-call overrides over the immutable default
//!   template, creates the text element, aligns it against an optional
//!   parent, and hands it to the animator (or leaves it stored).
//! - **Animator**: a per-element phase state machine
//!   (`Pending -> Moving -> FadingOut -> Finished`) advanced once per frame
//!   from the `Time` resource, ending in despawn.

use bevy::prelude::*;

pub mod animate;
pub mod components;
pub mod log;
pub mod spawn;

pub use components::{
    AnimationPhase, CameraFixed, EffectsRng, FloatingText, OverlayOrder, PendingAlign,
};
pub use spawn::{AnimateStoredText, FloatingTextCommands, SpawnFloatingText};

use crate::config::TextEffectConfig;
use crate::settings::EffectSettings;
use self::log::EffectLogPlugin;

/// Immutable default template for effect configuration.
///
/// This is the merge base for every spawn; it is installed once by the
/// plugin and never mutated afterwards.
#[derive(Resource, Clone)]
pub struct EffectDefaults(pub TextEffectConfig);

/// Plugin for spawning and animating floating text elements.
#[derive(Default)]
pub struct FloatingTextPlugin {
    /// Default template to install. `None` loads the settings file
    /// (falling back to built-in defaults).
    pub defaults: Option<TextEffectConfig>,
}

impl Plugin for FloatingTextPlugin {
    fn build(&self, app: &mut App) {
        let defaults = self
            .defaults
            .clone()
            .unwrap_or_else(EffectSettings::load_config);

        if !app.is_plugin_added::<EffectLogPlugin>() {
            app.add_plugins(EffectLogPlugin);
        }

        app
            // Effect events
            .add_event::<SpawnFloatingText>()
            .add_event::<AnimateStoredText>()
            // Resources
            .insert_resource(EffectDefaults(defaults))
            .init_resource::<OverlayOrder>()
            .init_resource::<EffectsRng>()
            // Systems: spawn, align, animate, clean up. Chained so a spawn
            // request is aligned and animated within a single frame.
            .add_systems(
                Update,
                (
                    spawn::process_spawn_events,
                    spawn::animate_stored_text,
                    spawn::resolve_alignment,
                    spawn::attach_camera_fixed,
                    animate::advance_floating_text,
                    animate::cleanup_finished_text,
                )
                    .chain(),
            );
    }
}
