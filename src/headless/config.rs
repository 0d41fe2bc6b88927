//! JSON script parsing for headless mode
//!
//! Parses JSON effect scripts and validates them against the typed
//! configuration before the run starts, so a malformed script fails up
//! front instead of mid-run.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{EffectError, TextEffectOverrides};
use crate::settings::{parse_align, parse_ease, parse_preset};
use std::time::Duration;

/// A scripted effect run loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessScript {
    /// Timed steps, fired when the run clock passes their timestamp
    pub steps: Vec<ScriptStep>,
    /// Hard cap on the run duration in milliseconds (default: 5000)
    #[serde(default = "default_max_duration")]
    pub max_duration_ms: u64,
    /// Custom output path for the effect log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Random seed for deterministic smoke mirroring
    #[serde(default)]
    pub random_seed: Option<u64>,
}

/// One timed step: either a floating text spawn or a tooltip operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptStep {
    /// When to fire, in milliseconds from the start of the run
    pub at_ms: u64,
    #[serde(default)]
    pub effect: Option<EffectSpec>,
    #[serde(default)]
    pub tooltip: Option<TooltipStep>,
}

/// A floating text spawn request. Unset fields fall through to the default
/// template, same as the typed overrides they validate into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectSpec {
    pub text: String,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub distance: Option<f32>,
    #[serde(default)]
    pub align: Option<String>,
    #[serde(default)]
    pub offset: Option<[f32; 2]>,
    #[serde(default)]
    pub time_to_live_ms: Option<u64>,
    #[serde(default)]
    pub ease: Option<String>,
    #[serde(default)]
    pub store: Option<bool>,
    /// Control points for the custom preset (exactly four pairs)
    #[serde(default)]
    pub points: Option<Vec<[f32; 2]>>,
    /// Launch impulse for the physics preset
    #[serde(default)]
    pub impulse: Option<[f32; 2]>,
}

/// A tooltip operation: create, show, or hide by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TooltipStep {
    pub id: String,
    /// "create", "show", or "hide"
    pub action: String,
    #[serde(default)]
    pub animate: bool,
    /// Label text (create only)
    #[serde(default)]
    pub text: Option<String>,
    /// Container position (create only)
    #[serde(default)]
    pub position: Option<[f32; 2]>,
    /// Background size; present means the tooltip gets a background panel
    #[serde(default)]
    pub background: Option<[f32; 2]>,
}

fn default_max_duration() -> u64 {
    5000
}

impl EffectSpec {
    /// Validate into typed per-call overrides.
    pub fn to_overrides(&self) -> Result<TextEffectOverrides, EffectError> {
        use crate::config::DEFAULT_ANIMATION_DISTANCE;

        let preset = match &self.preset {
            Some(name) => Some(parse_preset(
                name,
                self.distance.unwrap_or(DEFAULT_ANIMATION_DISTANCE),
                self.points.as_deref(),
                self.impulse,
            )?),
            None => None,
        };
        let ease = match &self.ease {
            Some(name) => Some(parse_ease(name)?),
            None => None,
        };
        let align = match &self.align {
            Some(name) => Some(parse_align(name)?),
            None => None,
        };

        Ok(TextEffectOverrides {
            align,
            offset: self.offset.map(|[x, y]| bevy::math::Vec2::new(x, y)),
            preset,
            time_to_live: self.time_to_live_ms.map(Duration::from_millis),
            ease,
            text: Some(self.text.clone()),
            store: self.store,
            ..Default::default()
        })
    }
}

impl HeadlessScript {
    /// Load a script from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read script file: {}", e))?;

        let script: HeadlessScript = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        script.validate()?;
        Ok(script)
    }

    /// Validate the script
    pub fn validate(&self) -> Result<(), String> {
        if self.steps.is_empty() {
            return Err("script must contain at least one step".to_string());
        }
        if self.max_duration_ms == 0 {
            return Err("max_duration_ms must be positive".to_string());
        }

        for (i, step) in self.steps.iter().enumerate() {
            if step.at_ms > self.max_duration_ms {
                return Err(format!(
                    "step {} fires at {}ms, after the {}ms run cap",
                    i, step.at_ms, self.max_duration_ms
                ));
            }
            match (&step.effect, &step.tooltip) {
                (None, None) => {
                    return Err(format!("step {} has neither an effect nor a tooltip", i));
                }
                (Some(_), Some(_)) => {
                    return Err(format!(
                        "step {} has both an effect and a tooltip; split it into two steps",
                        i
                    ));
                }
                (Some(effect), None) => {
                    effect
                        .to_overrides()
                        .map_err(|e| format!("step {}: {}", i, e))?;
                }
                (None, Some(tooltip)) => {
                    match tooltip.action.as_str() {
                        "create" | "show" | "hide" => {}
                        other => {
                            return Err(format!(
                                "step {}: unknown tooltip action '{}'. Valid actions: create, show, hide",
                                i, other
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotionPreset;

    fn effect_step(at_ms: u64, spec: EffectSpec) -> ScriptStep {
        ScriptStep {
            at_ms,
            effect: Some(spec),
            tooltip: None,
        }
    }

    fn basic_spec(preset: &str) -> EffectSpec {
        EffectSpec {
            text: "64".to_string(),
            preset: Some(preset.to_string()),
            distance: None,
            align: None,
            offset: None,
            time_to_live_ms: None,
            ease: None,
            store: None,
            points: None,
            impulse: None,
        }
    }

    #[test]
    fn test_script_json_parses_with_defaults() {
        let json = r#"{
            "steps": [
                { "at_ms": 0, "effect": { "text": "128", "preset": "up" } },
                { "at_ms": 100, "tooltip": { "id": "hp", "action": "create", "text": "Health" } }
            ]
        }"#;
        let script: HeadlessScript = serde_json::from_str(json).unwrap();
        assert_eq!(script.max_duration_ms, 5000);
        assert!(script.random_seed.is_none());
        assert!(script.validate().is_ok());
    }

    #[test]
    fn test_spec_to_overrides_resolves_preset() {
        let overrides = basic_spec("down").to_overrides().unwrap();
        assert!(matches!(
            overrides.preset,
            Some(MotionPreset::Down { .. })
        ));
        assert_eq!(overrides.text.as_deref(), Some("64"));
        // Unset fields stay unset so the defaults template fills them
        assert!(overrides.time_to_live.is_none());
        assert!(overrides.ease.is_none());
    }

    #[test]
    fn test_unknown_preset_fails_validation() {
        let script = HeadlessScript {
            steps: vec![effect_step(0, basic_spec("spiral"))],
            max_duration_ms: 1000,
            output_path: None,
            random_seed: None,
        };
        let err = script.validate().unwrap_err();
        assert!(err.contains("spiral"));
    }

    #[test]
    fn test_step_after_cap_fails_validation() {
        let script = HeadlessScript {
            steps: vec![effect_step(2000, basic_spec("up"))],
            max_duration_ms: 1000,
            output_path: None,
            random_seed: None,
        };
        assert!(script.validate().is_err());
    }

    #[test]
    fn test_unknown_tooltip_action_fails_validation() {
        let script = HeadlessScript {
            steps: vec![ScriptStep {
                at_ms: 0,
                effect: None,
                tooltip: Some(TooltipStep {
                    id: "hp".to_string(),
                    action: "toggle".to_string(),
                    animate: false,
                    text: None,
                    position: None,
                    background: None,
                }),
            }],
            max_duration_ms: 1000,
            output_path: None,
            random_seed: None,
        };
        let err = script.validate().unwrap_err();
        assert!(err.contains("toggle"));
    }

    #[test]
    fn test_empty_script_fails_validation() {
        let script = HeadlessScript {
            steps: vec![],
            max_duration_ms: 1000,
            output_path: None,
            random_seed: None,
        };
        assert!(script.validate().is_err());
    }
}
