//! Headless mode for agentic testing
//!
//! Runs a scripted sequence of effects without any graphical output,
//! suitable for automated testing and smoke runs. The effect log is written
//! as JSON when the script completes.
//!
//! ## Usage
//!
//! ```bash
//! # Run a headless effect script
//! cargo run --release -- --headless script.json
//! ```
//!
//! ## JSON script
//!
//! ```json
//! {
//!   "steps": [
//!     { "at_ms": 0, "effect": { "text": "128", "preset": "up" } },
//!     { "at_ms": 100, "tooltip": { "id": "hp", "action": "create", "text": "Health" } },
//!     { "at_ms": 200, "tooltip": { "id": "hp", "action": "show", "animate": true } }
//!   ],
//!   "max_duration_ms": 3000,
//!   "random_seed": 7
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::{EffectSpec, HeadlessScript, ScriptStep, TooltipStep};
pub use runner::run_headless_script;
