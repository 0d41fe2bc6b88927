//! Component and resource definitions for the floating text effect system.

use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::time::Duration;

use crate::config::{Align, MotionPreset, TextEffectConfig};

// ============================================================================
// Resources
// ============================================================================

/// Seeded random number generator for the effect system.
///
/// The smoke preset mirrors its curve left or right per spawn; with a seed
/// the mirroring sequence is reproducible (headless runs, tests). Without a
/// seed, uses system entropy.
#[derive(Resource)]
pub struct EffectsRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl EffectsRng {
    /// Create an RNG with a specific seed for deterministic behavior.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create an RNG from system entropy (non-deterministic).
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// 50/50 coin flip.
    pub fn coin(&mut self) -> bool {
        self.random_f32() < 0.5
    }
}

impl Default for EffectsRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Monotonic z counter for overlay render order.
///
/// "Bring to top" assigns the next z value, so the most recently raised
/// element always draws over everything raised before it. Overlays start
/// well above typical world sprites.
#[derive(Resource)]
pub struct OverlayOrder {
    next: f32,
}

impl Default for OverlayOrder {
    fn default() -> Self {
        Self { next: 100.0 }
    }
}

impl OverlayOrder {
    /// Claim the next topmost z value.
    pub fn bring_to_top(&mut self) -> f32 {
        self.next += 1.0;
        self.next
    }

    /// The highest z value handed out so far.
    pub fn current(&self) -> f32 {
        self.next
    }
}

// ============================================================================
// Components
// ============================================================================

/// Phase of a floating text animation. Phases are strictly sequential per
/// element; the cleanup system despawns `Finished` entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    /// Waiting for alignment to resolve before capturing the origin.
    Pending,
    /// Running the preset motion.
    Moving,
    /// Fading opacity to zero.
    FadingOut,
    /// Ready to be despawned.
    Finished,
}

/// Animation state machine for one floating text element.
///
/// Presence of this component is the "is animating" guard: an entity is
/// never given a second one while a sequence is active. Stored elements
/// simply never receive it until the caller asks for animation.
#[derive(Component)]
pub struct FloatingText {
    pub phase: AnimationPhase,
    pub preset: MotionPreset,
    pub ease: EaseFunction,
    /// Duration of each phase (motion and fade).
    pub time_to_live: Duration,
    /// Seconds elapsed within the current phase.
    pub elapsed: f32,
    /// Transform captured when the animation left `Pending`.
    pub origin: Vec3,
    /// Evaluated curve for the smoke and custom presets.
    pub curve: Option<CubicCurve<Vec2>>,
    /// Integrated velocity for the physics preset.
    pub velocity: Vec2,
}

impl FloatingText {
    pub fn new(config: &TextEffectConfig) -> Self {
        Self {
            phase: AnimationPhase::Pending,
            preset: config.preset.clone(),
            ease: config.ease,
            time_to_live: config.time_to_live,
            elapsed: 0.0,
            origin: Vec3::ZERO,
            curve: None,
            velocity: Vec2::ZERO,
        }
    }

    /// Seconds one phase lasts. Clamped away from zero so progress math
    /// stays finite for degenerate configurations.
    pub fn phase_secs(&self) -> f32 {
        self.time_to_live.as_secs_f32().max(f32::EPSILON)
    }
}

/// Deferred alignment request: position this element relative to `parent`
/// once its transform can be read. Removed by the alignment system.
#[derive(Component)]
pub struct PendingAlign {
    pub parent: Entity,
    pub align: Align,
    /// Pixel offset applied after alignment.
    pub offset: Vec2,
}

/// Marker for elements that should be pinned to the 2D camera. The pinning
/// system re-parents the entity under the camera and removes the marker.
#[derive(Component)]
pub struct CameraFixed;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = EffectsRng::from_seed(42);
        let mut b = EffectsRng::from_seed(42);
        for _ in 0..16 {
            assert_eq!(a.coin(), b.coin());
        }
    }

    #[test]
    fn test_overlay_order_is_monotonic() {
        let mut order = OverlayOrder::default();
        let first = order.bring_to_top();
        let second = order.bring_to_top();
        assert!(second > first);
        assert_eq!(order.current(), second);
    }

    #[test]
    fn test_new_floating_text_starts_pending() {
        let fx = FloatingText::new(&TextEffectConfig::default());
        assert_eq!(fx.phase, AnimationPhase::Pending);
        assert_eq!(fx.elapsed, 0.0);
        assert!(fx.curve.is_none());
    }
}
