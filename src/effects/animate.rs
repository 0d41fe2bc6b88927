//! Animator
//!
//! Drives the floating text phase state machine: capture the origin, run
//! the preset motion, fade out, despawn. All progress is sampled from the
//! configured easing curve against the phase clock, so motion is absolute
//! interpolation from the captured origin rather than accumulated deltas
//! (the physics preset is the one integrator).

use bevy::prelude::*;

use super::components::{AnimationPhase, EffectsRng, FloatingText, PendingAlign};
use super::log::{EffectLog, EffectLogEventType};
use crate::config::MotionPreset;

// ============================================================================
// Constants
// ============================================================================

/// Gravity for the physics preset, in px/sec^2 (Y-up, so negative pulls
/// the element down).
pub const PHYSICS_GRAVITY: f32 = -600.0;

/// Control-point offset magnitudes for the smoke preset's rising zigzag,
/// in pixels from the element's starting position.
const SMOKE_OFFSETS: [f32; 4] = [25.0, 50.0, 75.0, 100.0];

// ============================================================================
// Systems
// ============================================================================

/// Advance every active floating text animation by one frame.
///
/// Elements still waiting on alignment are skipped so the origin is only
/// captured after the element has reached its aligned position.
pub fn advance_floating_text(
    time: Res<Time>,
    mut rng: ResMut<EffectsRng>,
    mut log: ResMut<EffectLog>,
    mut elements: Query<
        (&mut FloatingText, &mut Transform, &mut TextColor),
        Without<PendingAlign>,
    >,
) {
    let dt = time.delta_secs();

    for (mut fx, mut transform, mut color) in elements.iter_mut() {
        if fx.phase == AnimationPhase::Pending {
            begin_animation(&mut fx, &transform, &mut color, &mut rng);
            log.log(
                EffectLogEventType::AnimationStarted,
                format!("preset={}", fx.preset.name()),
            );
        }

        match fx.phase {
            AnimationPhase::Moving => {
                fx.elapsed += dt;
                let phase_secs = fx.phase_secs();
                let t = (fx.elapsed / phase_secs).min(1.0);
                let progress = EasingCurve::new(0.0, 1.0, fx.ease).sample_clamped(t);

                apply_motion(&mut fx, &mut transform, &mut color, progress, dt);

                if fx.elapsed >= phase_secs {
                    fx.phase = AnimationPhase::FadingOut;
                    fx.elapsed = 0.0;
                    log.log(
                        EffectLogEventType::PhaseChanged,
                        format!("preset={} fading out", fx.preset.name()),
                    );
                }
            }
            AnimationPhase::FadingOut => {
                fx.elapsed += dt;
                let phase_secs = fx.phase_secs();
                let t = (fx.elapsed / phase_secs).min(1.0);
                let progress = EasingCurve::new(0.0, 1.0, fx.ease).sample_clamped(t);
                color.0 = color.0.with_alpha(1.0 - progress);

                if fx.elapsed >= phase_secs {
                    fx.phase = AnimationPhase::Finished;
                }
            }
            AnimationPhase::Pending | AnimationPhase::Finished => {}
        }
    }
}

/// Despawn elements whose animation has finished.
pub fn cleanup_finished_text(
    mut commands: Commands,
    mut log: ResMut<EffectLog>,
    elements: Query<(Entity, &FloatingText)>,
) {
    for (entity, fx) in elements.iter() {
        if fx.phase == AnimationPhase::Finished {
            log.log(
                EffectLogEventType::Despawned,
                format!("preset={}", fx.preset.name()),
            );
            commands.entity(entity).despawn_recursive();
        }
    }
}

// ============================================================================
// Phase transitions
// ============================================================================

/// Capture the origin and derive preset-specific state, then enter the
/// moving phase.
fn begin_animation(
    fx: &mut FloatingText,
    transform: &Transform,
    color: &mut TextColor,
    rng: &mut EffectsRng,
) {
    fx.origin = transform.translation;

    match fx.preset.clone() {
        MotionPreset::Fade => {
            // Fade-in starts from transparent
            color.0 = color.0.with_alpha(0.0);
        }
        MotionPreset::Smoke => {
            fx.curve = build_smoke_curve(fx.origin.truncate(), rng);
        }
        MotionPreset::Custom { points } => {
            fx.curve = CubicBezier::new([points]).to_curve().ok();
        }
        MotionPreset::Physics { impulse } => {
            fx.velocity = impulse;
        }
        _ => {}
    }

    fx.phase = AnimationPhase::Moving;
    fx.elapsed = 0.0;
}

/// A rising zigzag from the element's position, mirrored left or right
/// 50/50 per spawn. Offsets grow 25/50/75/100 px while the horizontal
/// component alternates sides.
fn build_smoke_curve(origin: Vec2, rng: &mut EffectsRng) -> Option<CubicCurve<Vec2>> {
    let mirror = if rng.coin() { 1.0 } else { -1.0 };
    let [a, b, c, d] = SMOKE_OFFSETS;

    let points = [
        origin + Vec2::new(a * mirror, a),
        origin + Vec2::new(-b * mirror, b),
        origin + Vec2::new(c * mirror, c),
        origin + Vec2::new(-(a * mirror), d),
    ];
    CubicBezier::new([points]).to_curve().ok()
}

/// Apply one frame of the moving phase for the element's preset.
fn apply_motion(
    fx: &mut FloatingText,
    transform: &mut Transform,
    color: &mut TextColor,
    progress: f32,
    dt: f32,
) {
    match fx.preset.clone() {
        MotionPreset::Up { distance } => {
            transform.translation.y = fx.origin.y + distance * progress;
        }
        MotionPreset::Down { distance } => {
            transform.translation.y = fx.origin.y - distance * progress;
        }
        MotionPreset::Left { distance } => {
            transform.translation.x = fx.origin.x - distance * progress;
        }
        MotionPreset::Right { distance } => {
            transform.translation.x = fx.origin.x + distance * progress;
        }
        MotionPreset::Fade => {
            color.0 = color.0.with_alpha(progress);
        }
        MotionPreset::Explode { scale } => {
            transform.scale = Vec3::splat(1.0 + (scale - 1.0) * progress);
        }
        MotionPreset::Smoke | MotionPreset::Custom { .. } => {
            if let Some(curve) = &fx.curve {
                let position = curve.position(progress);
                transform.translation.x = position.x;
                transform.translation.y = position.y;
            }
        }
        MotionPreset::Physics { .. } => {
            fx.velocity.y += PHYSICS_GRAVITY * dt;
            transform.translation.x += fx.velocity.x * dt;
            transform.translation.y += fx.velocity.y * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke_curve_starts_offset_from_origin() {
        let mut rng = EffectsRng::from_seed(1);
        let origin = Vec2::new(10.0, 20.0);
        let curve = build_smoke_curve(origin, &mut rng).expect("one segment always builds");

        let start = curve.position(0.0);
        // First control point sits 25 px up and 25 px to one side
        assert_eq!(start.y, origin.y + 25.0);
        assert_eq!((start.x - origin.x).abs(), 25.0);

        let end = curve.position(1.0);
        assert_eq!(end.y, origin.y + 100.0);
    }

    #[test]
    fn test_smoke_mirror_is_seed_deterministic() {
        let origin = Vec2::ZERO;
        let first = build_smoke_curve(origin, &mut EffectsRng::from_seed(9)).unwrap();
        let second = build_smoke_curve(origin, &mut EffectsRng::from_seed(9)).unwrap();
        assert_eq!(first.position(0.0), second.position(0.0));
        assert_eq!(first.position(0.5), second.position(0.5));
    }
}
