//! Tooltip Registry
//!
//! Persistent, id-keyed overlay containers with show/hide operations and
//! optional opacity fades. A container holds a text label, an optional
//! background sprite, and an optional drop shadow (an offset dark copy of
//! the label, the same trick the game uses for text outlines).
//!
//! Fades are last-writer-wins: re-triggering show or hide on an id replaces
//! the in-flight fade component, which cancels the previous transition.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::config::EffectError;
use crate::effects::components::OverlayOrder;
use crate::effects::log::{EffectLog, EffectLogEventType, EffectLogPlugin};

// ============================================================================
// Constants
// ============================================================================

/// Fade-in duration for an animated show.
pub const SHOW_FADE_SECS: f32 = 0.5;

/// Fade-out duration for an animated hide.
pub const HIDE_FADE_SECS: f32 = 0.25;

/// Easing used by tooltip fades.
const TOOLTIP_FADE_EASE: EaseFunction = EaseFunction::QuadraticOut;

/// Default label font size.
const TOOLTIP_FONT_SIZE: f32 = 19.0;

// ============================================================================
// Options
// ============================================================================

/// Label styling for a tooltip.
#[derive(Debug, Clone)]
pub struct TooltipText {
    pub text: String,
    pub font: Handle<Font>,
    pub font_size: f32,
    pub color: Color,
}

impl Default for TooltipText {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: Handle::default(),
            font_size: TOOLTIP_FONT_SIZE,
            color: Color::WHITE,
        }
    }
}

impl TooltipText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Background panel behind the label.
#[derive(Debug, Clone)]
pub struct TooltipBackground {
    pub size: Vec2,
    pub color: Color,
}

impl Default for TooltipBackground {
    fn default() -> Self {
        Self {
            size: Vec2::new(160.0, 48.0),
            color: Color::srgba(0.1, 0.1, 0.1, 0.85),
        }
    }
}

/// Drop shadow rendered as an offset dark copy behind the label.
#[derive(Debug, Clone)]
pub struct TooltipShadow {
    pub color: Color,
    pub offset: Vec2,
}

impl Default for TooltipShadow {
    fn default() -> Self {
        Self {
            color: Color::srgb(0.118, 0.118, 0.118),
            offset: Vec2::new(1.0, -1.0),
        }
    }
}

/// Options for creating a tooltip container.
#[derive(Debug, Clone, Default)]
pub struct TooltipOptions {
    pub id: String,
    pub position: Vec2,
    pub text: TooltipText,
    pub background: Option<TooltipBackground>,
    pub shadow: Option<TooltipShadow>,
}

impl TooltipOptions {
    pub fn new(id: impl Into<String>, position: Vec2, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position,
            text: TooltipText::new(text),
            ..Default::default()
        }
    }
}

// ============================================================================
// Registry & Components
// ============================================================================

/// Id-keyed collection of tooltip containers.
#[derive(Resource, Default)]
pub struct TooltipRegistry {
    entries: HashMap<String, Entity>,
}

impl TooltipRegistry {
    /// Look up the container for an id.
    pub fn get(&self, id: &str) -> Result<Entity, EffectError> {
        self.entries
            .get(id)
            .copied()
            .ok_or_else(|| EffectError::UnknownTooltip(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a container, returning the entry it replaced.
    fn register(&mut self, id: String, container: Entity) -> Option<Entity> {
        self.entries.insert(id, container)
    }
}

/// Marker for tooltip container entities.
#[derive(Component)]
pub struct TooltipContainer {
    pub id: String,
}

/// An in-flight opacity fade on a tooltip container. Inserting a new fade
/// replaces the old one: that is the cancellation policy.
#[derive(Component)]
pub struct TooltipFade {
    /// Starting alpha; `None` captures the current alpha at the first tick.
    start: Option<f32>,
    target: f32,
    timer: Timer,
    ease: EaseFunction,
    /// Hide the container when the fade completes (hide path).
    hide_on_finish: bool,
}

impl TooltipFade {
    fn new(start: Option<f32>, target: f32, secs: f32, hide_on_finish: bool) -> Self {
        Self {
            start,
            target,
            timer: Timer::from_seconds(secs, TimerMode::Once),
            ease: TOOLTIP_FADE_EASE,
            hide_on_finish,
        }
    }

    /// Zero-duration fade: snaps alpha to `target` on the next tick.
    fn instant(target: f32) -> Self {
        Self::new(None, target, 0.0, false)
    }
}

// ============================================================================
// Events
// ============================================================================

/// Show a registered tooltip, optionally fading it in over
/// [`SHOW_FADE_SECS`]. Raises the container to the top of the overlay
/// order either way.
#[derive(Event)]
pub struct ShowTooltip {
    pub id: String,
    pub animate: bool,
}

impl ShowTooltip {
    pub fn new(id: impl Into<String>, animate: bool) -> Self {
        Self {
            id: id.into(),
            animate,
        }
    }
}

/// Hide a registered tooltip, optionally fading it out over
/// [`HIDE_FADE_SECS`].
#[derive(Event)]
pub struct HideTooltip {
    pub id: String,
    pub animate: bool,
}

impl HideTooltip {
    pub fn new(id: impl Into<String>, animate: bool) -> Self {
        Self {
            id: id.into(),
            animate,
        }
    }
}

// ============================================================================
// Commands Extension
// ============================================================================

/// `Commands` extension for building tooltip containers.
pub trait TooltipCommands {
    /// Build a tooltip container and register it under `options.id`,
    /// replacing (and despawning) any previous container with that id.
    /// Returns the container entity.
    fn create_tooltip(&mut self, options: TooltipOptions) -> Entity;
}

impl TooltipCommands for Commands<'_, '_> {
    fn create_tooltip(&mut self, options: TooltipOptions) -> Entity {
        let TooltipOptions {
            id,
            position,
            text,
            background,
            shadow,
        } = options;

        let container = self
            .spawn((
                Transform::from_translation(position.extend(0.0)),
                Visibility::Inherited,
                TooltipContainer { id: id.clone() },
            ))
            .id();

        self.entity(container).with_children(|children| {
            if let Some(background) = &background {
                children.spawn((
                    Sprite {
                        color: background.color,
                        custom_size: Some(background.size),
                        ..default()
                    },
                    Transform::from_xyz(0.0, 0.0, 0.0),
                ));
            }

            if let Some(shadow) = &shadow {
                children.spawn((
                    Text2d::new(text.text.clone()),
                    TextFont {
                        font: text.font.clone(),
                        font_size: text.font_size,
                        ..default()
                    },
                    TextColor(shadow.color),
                    Transform::from_translation(shadow.offset.extend(0.1)),
                ));
            }

            // Label last so it draws over the background and shadow. Both
            // the label and the background are center-anchored at the
            // container origin, which keeps the label centered over the
            // background's bounds.
            children.spawn((
                Text2d::new(text.text.clone()),
                TextFont {
                    font: text.font,
                    font_size: text.font_size,
                    ..default()
                },
                TextColor(text.color),
                Transform::from_xyz(0.0, 0.0, 0.2),
            ));
        });

        self.queue(move |world: &mut World| {
            let replaced = world
                .resource_mut::<TooltipRegistry>()
                .register(id.clone(), container);

            if let Some(old) = replaced {
                if let Ok(entity) = world.get_entity_mut(old) {
                    entity.despawn_recursive();
                }
                world.resource_mut::<EffectLog>().log(
                    EffectLogEventType::TooltipReplaced,
                    format!("id={}", id),
                );
            }
            world
                .resource_mut::<EffectLog>()
                .log(EffectLogEventType::TooltipCreated, format!("id={}", id));
        });

        container
    }
}

// ============================================================================
// Systems
// ============================================================================

/// Process show requests: make the container visible, raise it to the top
/// of the overlay order, and start (or replace) the fade-in.
pub fn process_show_tooltips(
    mut commands: Commands,
    mut events: EventReader<ShowTooltip>,
    registry: Res<TooltipRegistry>,
    mut order: ResMut<OverlayOrder>,
    mut log: ResMut<EffectLog>,
    mut containers: Query<(&mut Transform, &mut Visibility), With<TooltipContainer>>,
) {
    for event in events.read() {
        let container = match registry.get(&event.id) {
            Ok(container) => container,
            Err(err) => {
                warn!("show tooltip: {}", err);
                continue;
            }
        };
        let Ok((mut transform, mut visibility)) = containers.get_mut(container) else {
            continue;
        };

        *visibility = Visibility::Inherited;
        transform.translation.z = order.bring_to_top();

        let fade = if event.animate {
            // Reset to transparent, then fade up to full opacity.
            TooltipFade::new(Some(0.0), 1.0, SHOW_FADE_SECS, false)
        } else {
            TooltipFade::instant(1.0)
        };
        commands.entity(container).insert(fade);

        log.log(
            EffectLogEventType::TooltipShown,
            format!("id={} animate={}", event.id, event.animate),
        );
    }
}

/// Process hide requests: fade out and hide, or hide synchronously.
pub fn process_hide_tooltips(
    mut commands: Commands,
    mut events: EventReader<HideTooltip>,
    registry: Res<TooltipRegistry>,
    mut log: ResMut<EffectLog>,
    mut containers: Query<&mut Visibility, With<TooltipContainer>>,
) {
    for event in events.read() {
        let container = match registry.get(&event.id) {
            Ok(container) => container,
            Err(err) => {
                warn!("hide tooltip: {}", err);
                continue;
            }
        };
        let Ok(mut visibility) = containers.get_mut(container) else {
            continue;
        };

        if event.animate {
            commands
                .entity(container)
                .insert(TooltipFade::new(None, 0.0, HIDE_FADE_SECS, true));
        } else {
            *visibility = Visibility::Hidden;
            commands.entity(container).remove::<TooltipFade>();
        }

        log.log(
            EffectLogEventType::TooltipHidden,
            format!("id={} animate={}", event.id, event.animate),
        );
    }
}

/// Advance in-flight tooltip fades, applying the eased alpha to every
/// direct child (background sprite, shadow, label).
pub fn advance_tooltip_fades(
    mut commands: Commands,
    time: Res<Time>,
    mut fades: Query<(Entity, &mut TooltipFade, &Children, &mut Visibility)>,
    mut labels: Query<&mut TextColor>,
    mut sprites: Query<&mut Sprite>,
) {
    for (container, mut fade, children, mut visibility) in fades.iter_mut() {
        if fade.start.is_none() {
            fade.start = Some(current_alpha(children, &labels, &sprites));
        }
        let start = fade.start.unwrap_or(1.0);

        fade.timer.tick(time.delta());
        let t = if fade.timer.duration().is_zero() {
            1.0
        } else {
            fade.timer.fraction()
        };
        let progress = EasingCurve::new(0.0, 1.0, fade.ease).sample_clamped(t);
        let alpha = start + (fade.target - start) * progress;

        for &child in children.iter() {
            if let Ok(mut color) = labels.get_mut(child) {
                color.0 = color.0.with_alpha(alpha);
            } else if let Ok(mut sprite) = sprites.get_mut(child) {
                sprite.color = sprite.color.with_alpha(alpha);
            }
        }

        if fade.timer.finished() {
            if fade.hide_on_finish {
                *visibility = Visibility::Hidden;
            }
            commands.entity(container).remove::<TooltipFade>();
        }
    }
}

/// Current label alpha, used as the starting point when a fade begins from
/// whatever an interrupted transition left behind.
fn current_alpha(
    children: &Children,
    labels: &Query<&mut TextColor>,
    sprites: &Query<&mut Sprite>,
) -> f32 {
    for &child in children.iter() {
        if let Ok(color) = labels.get(child) {
            return color.0.alpha();
        }
    }
    for &child in children.iter() {
        if let Ok(sprite) = sprites.get(child) {
            return sprite.color.alpha();
        }
    }
    1.0
}

// ============================================================================
// Plugin
// ============================================================================

/// Plugin for the tooltip registry and its show/hide/fade systems.
pub struct TooltipPlugin;

impl Plugin for TooltipPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EffectLogPlugin>() {
            app.add_plugins(EffectLogPlugin);
        }

        app.add_event::<ShowTooltip>()
            .add_event::<HideTooltip>()
            .init_resource::<TooltipRegistry>()
            .init_resource::<OverlayOrder>()
            .add_systems(
                Update,
                (
                    process_show_tooltips,
                    process_hide_tooltips,
                    advance_tooltip_fades,
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup_unknown_id() {
        let registry = TooltipRegistry::default();
        assert_eq!(
            registry.get("missing"),
            Err(EffectError::UnknownTooltip("missing".to_string()))
        );
    }

    #[test]
    fn test_registry_replacement_returns_old_entry() {
        let mut registry = TooltipRegistry::default();
        let first = Entity::from_raw(1);
        let second = Entity::from_raw(2);

        assert!(registry.register("hp".to_string(), first).is_none());
        assert_eq!(registry.register("hp".to_string(), second), Some(first));
        assert_eq!(registry.get("hp"), Ok(second));
        assert_eq!(registry.len(), 1);
    }
}
