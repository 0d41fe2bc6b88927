//! Effect Spawner
//!
//! Creates floating text entities from resolved configurations and hands
//! them to the animator, or leaves them stored for caller-managed use.
//! Alignment against a parent element is deferred to a system so the
//! parent's transform can be read safely.

use bevy::prelude::*;
use smallvec::SmallVec;

use super::components::{CameraFixed, FloatingText, OverlayOrder, PendingAlign};
use super::log::{EffectLog, EffectLogEventType};
use super::EffectDefaults;
use crate::config::{Align, TextEffectConfig, TextEffectOverrides};

// ============================================================================
// Events
// ============================================================================

/// Fire-and-forget spawn request. Overrides are merged over the
/// [`EffectDefaults`] template when the event is processed.
#[derive(Event)]
pub struct SpawnFloatingText {
    pub overrides: TextEffectOverrides,
}

impl SpawnFloatingText {
    pub fn new(overrides: TextEffectOverrides) -> Self {
        Self { overrides }
    }
}

/// Request to start animating a stored element. A no-op if the entity is
/// already animating or no longer exists.
#[derive(Event)]
pub struct AnimateStoredText {
    pub entity: Entity,
    pub overrides: TextEffectOverrides,
}

// ============================================================================
// Commands Extension
// ============================================================================

/// `Commands` extension for callers that need the spawned entity handle,
/// in particular the `store: true` path where the caller owns the element.
pub trait FloatingTextCommands {
    /// Spawn a floating text element from a fully-resolved configuration.
    fn spawn_floating_text(&mut self, config: TextEffectConfig) -> Entity;
}

impl FloatingTextCommands for Commands<'_, '_> {
    fn spawn_floating_text(&mut self, config: TextEffectConfig) -> Entity {
        spawn_text_element(self, config)
    }
}

/// Shared spawn path for the event and the `Commands` extension.
pub(crate) fn spawn_text_element(commands: &mut Commands, config: TextEffectConfig) -> Entity {
    debug!("spawning floating text: {:?}", config);

    let entity = commands
        .spawn((
            Text2d::new(config.text.clone()),
            TextFont {
                font: config.appearance.font.clone(),
                font_size: config.appearance.font_size,
                ..default()
            },
            TextColor(config.appearance.color),
            Transform::from_translation(config.offset.extend(0.0)),
        ))
        .id();

    if let Some(parent) = config.parent {
        commands.entity(entity).insert(PendingAlign {
            parent,
            align: config.align,
            offset: config.offset,
        });
    }

    if config.camera_fixed {
        commands.entity(entity).insert(CameraFixed);
    }

    let stored = config.store;
    if !stored {
        commands.entity(entity).insert(FloatingText::new(&config));
    }

    let preset_name = config.preset.name();
    let text = config.text;
    commands.queue(move |world: &mut World| {
        // Animated elements go to the top of the overlay order; stored
        // elements keep whatever order the caller gives them.
        if !stored {
            let z = world.resource_mut::<OverlayOrder>().bring_to_top();
            if let Ok(mut element) = world.get_entity_mut(entity) {
                if let Some(mut transform) = element.get_mut::<Transform>() {
                    transform.translation.z = z;
                }
            }
        }
        world.resource_mut::<EffectLog>().log(
            EffectLogEventType::Spawned,
            format!(
                "'{}' preset={} stored={}",
                text, preset_name, stored
            ),
        );
    });

    entity
}

// ============================================================================
// Systems
// ============================================================================

/// Process fire-and-forget spawn events by resolving overrides against the
/// immutable default template.
pub fn process_spawn_events(
    mut commands: Commands,
    mut events: EventReader<SpawnFloatingText>,
    defaults: Res<EffectDefaults>,
) {
    for event in events.read() {
        let config = event.overrides.clone().resolve(&defaults.0);
        spawn_text_element(&mut commands, config);
    }
}

/// Attach an animation to stored elements on request.
///
/// The presence of a [`FloatingText`] component is the at-most-one guard;
/// duplicate requests within a single frame are deduplicated locally since
/// the component insert is deferred until commands apply.
pub fn animate_stored_text(
    mut commands: Commands,
    mut events: EventReader<AnimateStoredText>,
    defaults: Res<EffectDefaults>,
    animating: Query<(), With<FloatingText>>,
    elements: Query<(), With<Text2d>>,
) {
    // SmallVec avoids heap allocation for typical per-frame request counts
    let mut claimed: SmallVec<[Entity; 4]> = SmallVec::new();

    for event in events.read() {
        if animating.get(event.entity).is_ok() || claimed.contains(&event.entity) {
            debug!(
                "ignoring animate request for {:?}: already animating",
                event.entity
            );
            continue;
        }
        if elements.get(event.entity).is_err() {
            warn!(
                "animate request for missing text element {:?}",
                event.entity
            );
            continue;
        }

        let config = event.overrides.clone().resolve(&defaults.0);
        claimed.push(event.entity);
        commands
            .entity(event.entity)
            .insert(FloatingText::new(&config));
    }
}

/// Resolve deferred alignment against the parent element.
///
/// Positions the element on the parent's center or edge midpoints, using
/// the parent's sprite size for half-extents when one is present. A parent
/// that disappeared before alignment leaves the element where it spawned.
pub fn resolve_alignment(
    mut commands: Commands,
    mut pending: Query<(Entity, &PendingAlign, &mut Transform)>,
    parents: Query<(&Transform, Option<&Sprite>), Without<PendingAlign>>,
) {
    for (entity, request, mut transform) in pending.iter_mut() {
        match parents.get(request.parent) {
            Ok((parent_transform, sprite)) => {
                let half = sprite
                    .and_then(|s| s.custom_size)
                    .unwrap_or(Vec2::ZERO)
                    * 0.5;
                let center = parent_transform.translation.truncate();
                let aligned = match request.align {
                    Align::Center => center,
                    Align::LeftCenter => center - Vec2::new(half.x, 0.0),
                    Align::RightCenter => center + Vec2::new(half.x, 0.0),
                    Align::TopCenter => center + Vec2::new(0.0, half.y),
                } + request.offset;

                transform.translation.x = aligned.x;
                transform.translation.y = aligned.y;
            }
            Err(_) => {
                warn!(
                    "floating text parent {:?} missing; leaving element unaligned",
                    request.parent
                );
            }
        }
        commands.entity(entity).remove::<PendingAlign>();
    }
}

/// Re-parent camera-fixed elements under the 2D camera so they stay pinned
/// to the viewport. Waits until a camera exists.
pub fn attach_camera_fixed(
    mut commands: Commands,
    camera: Query<Entity, With<Camera2d>>,
    pinned: Query<Entity, With<CameraFixed>>,
) {
    let Ok(camera) = camera.get_single() else {
        return;
    };

    for entity in pinned.iter() {
        commands
            .entity(entity)
            .set_parent(camera)
            .remove::<CameraFixed>();
    }
}
