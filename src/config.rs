//! Effect configuration
//!
//! Typed configuration contract for floating text effects. Callers describe
//! a spawn with [`TextEffectOverrides`] (every field optional); the plugin
//! resolves it against an immutable default template to produce the
//! [`TextEffectConfig`] that drives the spawner and animator.
//!
//! The default template is never mutated. Each call copies it, so rapid
//! successive spawns cannot observe each other's configuration.

use bevy::prelude::*;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Default animation distance in pixels (vertical rise, horizontal slide,
/// or explode scale target, depending on the preset).
pub const DEFAULT_ANIMATION_DISTANCE: f32 = 50.0;

/// Default time-to-live for one animation phase, in milliseconds.
/// A motion-then-fade preset is on screen for twice this long.
pub const DEFAULT_TIME_TO_LIVE_MS: u64 = 400;

/// Default font size for floating text labels.
pub const DEFAULT_FONT_SIZE: f32 = 24.0;

/// Default launch impulse for the physics preset (px/sec, Y-up).
pub const DEFAULT_PHYSICS_IMPULSE: Vec2 = Vec2::new(60.0, 160.0);

// ============================================================================
// Errors
// ============================================================================

/// Errors produced at the untyped boundaries of the crate: settings and
/// script parsing, custom-curve construction, and tooltip registry lookups.
#[derive(Debug, Error, PartialEq)]
pub enum EffectError {
    /// A custom curve needs exactly four control points.
    #[error("custom curve requires exactly 4 control points, got {got}")]
    InvalidCurvePoints { got: usize },
    /// A preset name that is not part of the closed preset set.
    #[error("unknown animation preset '{0}'")]
    UnknownPreset(String),
    /// An easing name with no [`EaseFunction`] mapping.
    #[error("unknown easing function '{0}'")]
    UnknownEase(String),
    /// An alignment name outside the four supported modes.
    #[error("unknown alignment '{0}'")]
    UnknownAlign(String),
    /// A tooltip id that was never registered.
    #[error("no tooltip registered under id '{0}'")]
    UnknownTooltip(String),
}

// ============================================================================
// Alignment & Presets
// ============================================================================

/// How a spawned element is positioned relative to its parent's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Centered on the parent.
    Center,
    /// Centered vertically on the parent's left edge.
    LeftCenter,
    /// Centered vertically on the parent's right edge.
    RightCenter,
    /// Centered horizontally on the parent's top edge.
    TopCenter,
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Center => "center",
            Align::LeftCenter => "left",
            Align::RightCenter => "right",
            Align::TopCenter => "top-center",
        }
    }

    pub fn all() -> [Align; 4] {
        [
            Align::Center,
            Align::LeftCenter,
            Align::RightCenter,
            Align::TopCenter,
        ]
    }
}

/// The closed set of motion presets. Each variant carries only the data its
/// motion needs; there is no stringly dispatch anywhere past the settings
/// boundary.
///
/// All two-phase presets (everything here) run their motion over one
/// time-to-live, then fade out over a second one and despawn.
/// Directions are in Bevy's Y-up convention.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionPreset {
    /// Rise by `distance` pixels.
    Up { distance: f32 },
    /// Sink by `distance` pixels.
    Down { distance: f32 },
    /// Slide left by `distance` pixels.
    Left { distance: f32 },
    /// Slide right by `distance` pixels.
    Right { distance: f32 },
    /// Fade in from transparent during the motion phase.
    Fade,
    /// Uniformly scale from 1.0 to `scale`.
    Explode { scale: f32 },
    /// Wobble upward along a cubic curve with a randomly mirrored zigzag.
    Smoke,
    /// Follow a caller-supplied cubic Bezier through four control points.
    Custom { points: [Vec2; 4] },
    /// Ballistic arc: launched with `impulse`, pulled down by gravity.
    Physics { impulse: Vec2 },
}

impl MotionPreset {
    /// Build a `Custom` preset from a runtime point list, enforcing the
    /// four-control-point requirement.
    pub fn custom(points: &[Vec2]) -> Result<Self, EffectError> {
        match points {
            &[p0, p1, p2, p3] => Ok(MotionPreset::Custom {
                points: [p0, p1, p2, p3],
            }),
            other => Err(EffectError::InvalidCurvePoints { got: other.len() }),
        }
    }

    /// Short preset name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            MotionPreset::Up { .. } => "up",
            MotionPreset::Down { .. } => "down",
            MotionPreset::Left { .. } => "left",
            MotionPreset::Right { .. } => "right",
            MotionPreset::Fade => "fade",
            MotionPreset::Explode { .. } => "explode",
            MotionPreset::Smoke => "smoke",
            MotionPreset::Custom { .. } => "custom",
            MotionPreset::Physics { .. } => "physics",
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Visual appearance of a floating text label. Opaque to the animator; the
/// spawner forwards it into the host's text components.
#[derive(Debug, Clone)]
pub struct TextAppearance {
    /// Font asset. The default weak handle renders with the engine's
    /// built-in font.
    pub font: Handle<Font>,
    pub font_size: f32,
    pub color: Color,
}

impl Default for TextAppearance {
    fn default() -> Self {
        Self {
            font: Handle::default(),
            font_size: DEFAULT_FONT_SIZE,
            color: Color::WHITE,
        }
    }
}

/// A fully-resolved effect configuration. Produced by merging
/// [`TextEffectOverrides`] over the default template; consumed by the
/// spawner and animator.
#[derive(Debug, Clone)]
pub struct TextEffectConfig {
    /// Alignment relative to `parent` (only applied when a parent is set).
    pub align: Align,
    /// Pixel offset. Applied on top of alignment, or used as the spawn
    /// position when there is no parent.
    pub offset: Vec2,
    pub preset: MotionPreset,
    /// Duration of one animation phase. Motion and fade each take this long.
    pub time_to_live: Duration,
    pub ease: EaseFunction,
    /// Pin the element to the 2D camera instead of the world.
    pub camera_fixed: bool,
    pub text: String,
    /// When true, no animation starts and the caller owns the entity.
    pub store: bool,
    /// Parent element to align against.
    pub parent: Option<Entity>,
    pub appearance: TextAppearance,
}

impl Default for TextEffectConfig {
    fn default() -> Self {
        Self {
            align: Align::Center,
            offset: Vec2::ZERO,
            preset: MotionPreset::Up {
                distance: DEFAULT_ANIMATION_DISTANCE,
            },
            time_to_live: Duration::from_millis(DEFAULT_TIME_TO_LIVE_MS),
            ease: EaseFunction::SineOut,
            camera_fixed: false,
            text: String::new(),
            store: false,
            parent: None,
            appearance: TextAppearance::default(),
        }
    }
}

/// Per-call partial configuration. Unset fields fall through to the default
/// template during [`resolve`](Self::resolve).
#[derive(Debug, Clone, Default)]
pub struct TextEffectOverrides {
    pub align: Option<Align>,
    pub offset: Option<Vec2>,
    pub preset: Option<MotionPreset>,
    pub time_to_live: Option<Duration>,
    pub ease: Option<EaseFunction>,
    pub camera_fixed: Option<bool>,
    pub text: Option<String>,
    pub store: Option<bool>,
    pub parent: Option<Entity>,
    pub appearance: Option<TextAppearance>,
}

impl TextEffectOverrides {
    /// Overrides carrying just the label text, the common case for damage
    /// numbers.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Merge these overrides over the default template. Caller fields win;
    /// everything else keeps the template value. The template itself is
    /// left untouched.
    pub fn resolve(self, defaults: &TextEffectConfig) -> TextEffectConfig {
        TextEffectConfig {
            align: self.align.unwrap_or(defaults.align),
            offset: self.offset.unwrap_or(defaults.offset),
            preset: self.preset.unwrap_or_else(|| defaults.preset.clone()),
            time_to_live: self.time_to_live.unwrap_or(defaults.time_to_live),
            ease: self.ease.unwrap_or(defaults.ease),
            camera_fixed: self.camera_fixed.unwrap_or(defaults.camera_fixed),
            text: self.text.unwrap_or_else(|| defaults.text.clone()),
            store: self.store.unwrap_or(defaults.store),
            parent: self.parent.or(defaults.parent),
            appearance: self
                .appearance
                .unwrap_or_else(|| defaults.appearance.clone()),
        }
    }
}
