//! Floatext - Floating Text & Tooltip Effects for Bevy
//!
//! Spawns transient floating text (damage numbers, notifications), animates
//! it along a closed set of motion presets, and despawns it when the
//! animation completes. A separate tooltip registry manages persistent,
//! id-keyed overlay containers with show/hide fades.
//!
//! This library exposes the core effect modules for testing and reuse.

pub mod cli;
pub mod config;
pub mod effects;
pub mod headless;
pub mod settings;
pub mod tooltip;

// Re-export commonly used types
pub use config::{
    Align, EffectError, MotionPreset, TextAppearance, TextEffectConfig, TextEffectOverrides,
};
pub use effects::log::{EffectLog, EffectLogEventType};
pub use effects::{
    AnimateStoredText, AnimationPhase, EffectDefaults, EffectsRng, FloatingText,
    FloatingTextCommands, FloatingTextPlugin, OverlayOrder, SpawnFloatingText,
};
pub use headless::HeadlessScript;
pub use tooltip::{
    HideTooltip, ShowTooltip, TooltipCommands, TooltipOptions, TooltipPlugin, TooltipRegistry,
};
