//! Effect settings and configuration
//!
//! Serde-facing layer for the default effect template. Preset, easing, and
//! alignment names are strings here and are validated into the typed
//! configuration at the boundary; everything past `to_config` is a closed
//! enum.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{
    Align, EffectError, MotionPreset, TextAppearance, TextEffectConfig,
    DEFAULT_ANIMATION_DISTANCE, DEFAULT_FONT_SIZE, DEFAULT_PHYSICS_IMPULSE,
    DEFAULT_TIME_TO_LIVE_MS,
};

/// User-configurable effect defaults, loaded from `floatext.ron`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectSettings {
    /// Alignment mode: "center", "left", "right", or "top-center"
    #[serde(default = "default_align")]
    pub align: String,
    #[serde(default)]
    pub offset_x: f32,
    #[serde(default)]
    pub offset_y: f32,
    /// Preset name: up, down, left, right, fade, explode, smoke, custom,
    /// physics
    #[serde(default = "default_preset")]
    pub preset: String,
    /// Motion distance in pixels (explode reuses it as the scale target)
    #[serde(default = "default_distance")]
    pub distance: f32,
    /// Duration of one animation phase in milliseconds
    #[serde(default = "default_time_to_live")]
    pub time_to_live_ms: u64,
    /// Easing name, e.g. "Sine.easeOut", "Power1", "Linear"
    #[serde(default = "default_ease")]
    pub ease: String,
    #[serde(default)]
    pub camera_fixed: bool,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Label color as linear RGBA components
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    /// Control points for the custom preset (exactly four pairs)
    #[serde(default)]
    pub points: Option<Vec<[f32; 2]>>,
    /// Launch impulse for the physics preset
    #[serde(default)]
    pub impulse: Option<[f32; 2]>,
}

fn default_align() -> String {
    "center".to_string()
}

fn default_preset() -> String {
    "up".to_string()
}

fn default_distance() -> f32 {
    DEFAULT_ANIMATION_DISTANCE
}

fn default_time_to_live() -> u64 {
    DEFAULT_TIME_TO_LIVE_MS
}

fn default_ease() -> String {
    "Sine.easeOut".to_string()
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

fn default_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            align: default_align(),
            offset_x: 0.0,
            offset_y: 0.0,
            preset: default_preset(),
            distance: default_distance(),
            time_to_live_ms: default_time_to_live(),
            ease: default_ease(),
            camera_fixed: false,
            font_size: default_font_size(),
            color: default_color(),
            points: None,
            impulse: None,
        }
    }
}

impl EffectSettings {
    /// Get the path to the settings file
    fn settings_path() -> PathBuf {
        PathBuf::from("floatext.ron")
    }

    /// Load settings from file, or return default if file doesn't exist
    pub fn load() -> Self {
        let path = Self::settings_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => match ron::from_str(&contents) {
                    Ok(settings) => {
                        info!("Loaded effect settings from {:?}", path);
                        settings
                    }
                    Err(e) => {
                        warn!("Failed to parse settings file: {}", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    warn!("Failed to read settings file: {}", e);
                    Self::default()
                }
            }
        } else {
            info!("No settings file found, using defaults");
            Self::default()
        }
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::settings_path();
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(&path, contents)?;
        info!("Saved effect settings to {:?}", path);
        Ok(())
    }

    /// Load the settings file and validate it into a default template,
    /// falling back to built-in defaults if validation fails.
    pub fn load_config() -> TextEffectConfig {
        match Self::load().to_config() {
            Ok(config) => config,
            Err(e) => {
                warn!("Invalid effect settings ({}); using built-in defaults", e);
                TextEffectConfig::default()
            }
        }
    }

    /// Validate into the typed configuration.
    pub fn to_config(&self) -> Result<TextEffectConfig, EffectError> {
        let [r, g, b, a] = self.color;
        Ok(TextEffectConfig {
            align: parse_align(&self.align)?,
            offset: Vec2::new(self.offset_x, self.offset_y),
            preset: parse_preset(
                &self.preset,
                self.distance,
                self.points.as_deref(),
                self.impulse,
            )?,
            time_to_live: Duration::from_millis(self.time_to_live_ms),
            ease: parse_ease(&self.ease)?,
            camera_fixed: self.camera_fixed,
            text: String::new(),
            store: false,
            parent: None,
            appearance: TextAppearance {
                font: Handle::default(),
                font_size: self.font_size,
                color: Color::linear_rgba(r, g, b, a),
            },
        })
    }
}

// ============================================================================
// String -> enum parsing
// ============================================================================

/// Parse an alignment name into [`Align`]
pub fn parse_align(name: &str) -> Result<Align, EffectError> {
    match name {
        "center" => Ok(Align::Center),
        "left" => Ok(Align::LeftCenter),
        "right" => Ok(Align::RightCenter),
        "top-center" => Ok(Align::TopCenter),
        _ => Err(EffectError::UnknownAlign(name.to_string())),
    }
}

/// Parse a preset name into [`MotionPreset`], pulling in the fields the
/// chosen variant needs.
pub fn parse_preset(
    name: &str,
    distance: f32,
    points: Option<&[[f32; 2]]>,
    impulse: Option<[f32; 2]>,
) -> Result<MotionPreset, EffectError> {
    match name {
        "up" => Ok(MotionPreset::Up { distance }),
        "down" => Ok(MotionPreset::Down { distance }),
        "left" => Ok(MotionPreset::Left { distance }),
        "right" => Ok(MotionPreset::Right { distance }),
        "fade" => Ok(MotionPreset::Fade),
        "explode" => Ok(MotionPreset::Explode { scale: distance }),
        "smoke" => Ok(MotionPreset::Smoke),
        "custom" => {
            let points: Vec<Vec2> = points
                .unwrap_or(&[])
                .iter()
                .map(|p| Vec2::new(p[0], p[1]))
                .collect();
            MotionPreset::custom(&points)
        }
        "physics" => {
            let impulse = impulse
                .map(|[x, y]| Vec2::new(x, y))
                .unwrap_or(DEFAULT_PHYSICS_IMPULSE);
            Ok(MotionPreset::Physics { impulse })
        }
        _ => Err(EffectError::UnknownPreset(name.to_string())),
    }
}

/// Parse an easing name into a bevy [`EaseFunction`]. Accepts the Phaser
/// names the original configuration format used ("Sine.easeOut",
/// "Power1") alongside the plain families.
pub fn parse_ease(name: &str) -> Result<EaseFunction, EffectError> {
    match name {
        "Linear" => Ok(EaseFunction::Linear),
        "Sine.easeIn" => Ok(EaseFunction::SineIn),
        "Sine.easeOut" => Ok(EaseFunction::SineOut),
        "Sine.easeInOut" => Ok(EaseFunction::SineInOut),
        "Quad.easeIn" => Ok(EaseFunction::QuadraticIn),
        "Quad.easeOut" | "Power1" => Ok(EaseFunction::QuadraticOut),
        "Quad.easeInOut" => Ok(EaseFunction::QuadraticInOut),
        "Cubic.easeIn" => Ok(EaseFunction::CubicIn),
        "Cubic.easeOut" | "Power2" => Ok(EaseFunction::CubicOut),
        "Cubic.easeInOut" => Ok(EaseFunction::CubicInOut),
        "Quart.easeIn" => Ok(EaseFunction::QuarticIn),
        "Quart.easeOut" | "Power3" => Ok(EaseFunction::QuarticOut),
        "Quart.easeInOut" => Ok(EaseFunction::QuarticInOut),
        "Quint.easeIn" => Ok(EaseFunction::QuinticIn),
        "Quint.easeOut" | "Power4" => Ok(EaseFunction::QuinticOut),
        "Quint.easeInOut" => Ok(EaseFunction::QuinticInOut),
        "Expo.easeIn" => Ok(EaseFunction::ExponentialIn),
        "Expo.easeOut" => Ok(EaseFunction::ExponentialOut),
        "Expo.easeInOut" => Ok(EaseFunction::ExponentialInOut),
        "Circ.easeIn" => Ok(EaseFunction::CircularIn),
        "Circ.easeOut" => Ok(EaseFunction::CircularOut),
        "Circ.easeInOut" => Ok(EaseFunction::CircularInOut),
        "Back.easeIn" => Ok(EaseFunction::BackIn),
        "Back.easeOut" => Ok(EaseFunction::BackOut),
        "Back.easeInOut" => Ok(EaseFunction::BackInOut),
        "Elastic.easeIn" => Ok(EaseFunction::ElasticIn),
        "Elastic.easeOut" => Ok(EaseFunction::ElasticOut),
        "Elastic.easeInOut" => Ok(EaseFunction::ElasticInOut),
        "Bounce.easeIn" => Ok(EaseFunction::BounceIn),
        "Bounce.easeOut" => Ok(EaseFunction::BounceOut),
        "Bounce.easeInOut" => Ok(EaseFunction::BounceInOut),
        _ => Err(EffectError::UnknownEase(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_builtin_config() {
        let config = EffectSettings::default()
            .to_config()
            .expect("defaults are valid");
        let builtin = TextEffectConfig::default();

        assert_eq!(config.align, builtin.align);
        assert_eq!(config.preset, builtin.preset);
        assert_eq!(config.time_to_live, builtin.time_to_live);
        assert_eq!(config.offset, builtin.offset);
        assert_eq!(config.appearance.font_size, builtin.appearance.font_size);
        assert!(!config.store);
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert_eq!(
            parse_preset("spiral", 10.0, None, None),
            Err(EffectError::UnknownPreset("spiral".to_string()))
        );
        assert_eq!(
            parse_ease("Mystery.easeOut"),
            Err(EffectError::UnknownEase("Mystery.easeOut".to_string()))
        );
        assert_eq!(
            parse_align("bottom"),
            Err(EffectError::UnknownAlign("bottom".to_string()))
        );
    }

    #[test]
    fn test_custom_preset_needs_four_points() {
        let too_few = [[0.0, 0.0], [1.0, 1.0]];
        assert_eq!(
            parse_preset("custom", 0.0, Some(&too_few), None),
            Err(EffectError::InvalidCurvePoints { got: 2 })
        );

        let exact = [[0.0, 0.0], [10.0, 20.0], [20.0, 40.0], [30.0, 0.0]];
        let preset = parse_preset("custom", 0.0, Some(&exact), None).unwrap();
        assert!(matches!(preset, MotionPreset::Custom { .. }));

        // Omitting points entirely is the classic misuse
        assert_eq!(
            parse_preset("custom", 0.0, None, None),
            Err(EffectError::InvalidCurvePoints { got: 0 })
        );
    }

    #[test]
    fn test_phaser_power_aliases() {
        assert_eq!(
            parse_ease("Power1").unwrap(),
            parse_ease("Quad.easeOut").unwrap()
        );
        assert_eq!(
            parse_ease("Power2").unwrap(),
            parse_ease("Cubic.easeOut").unwrap()
        );
    }

    #[test]
    fn test_explode_reuses_distance_as_scale() {
        let preset = parse_preset("explode", 3.0, None, None).unwrap();
        assert_eq!(preset, MotionPreset::Explode { scale: 3.0 });
    }

    #[test]
    fn test_settings_ron_round_trip() {
        let settings = EffectSettings {
            preset: "smoke".to_string(),
            time_to_live_ms: 650,
            ..Default::default()
        };
        let ron = ron::ser::to_string(&settings).unwrap();
        let parsed: EffectSettings = ron::from_str(&ron).unwrap();
        assert_eq!(parsed.preset, "smoke");
        assert_eq!(parsed.time_to_live_ms, 650);
    }
}
