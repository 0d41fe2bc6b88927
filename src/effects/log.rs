//! Effect logging
//!
//! Records spawn, phase, and tooltip events for debugging and for the
//! headless runner's machine-readable output.

use bevy::prelude::*;
use serde::Serialize;

/// A single entry in the effect log
#[derive(Debug, Clone, Serialize)]
pub struct EffectLogEntry {
    /// Timestamp in seconds since the log clock started
    pub timestamp: f32,
    /// The type of event
    pub event_type: EffectLogEventType,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of effect log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EffectLogEventType {
    /// A floating text element was created
    Spawned,
    /// An animation sequence left its pending phase
    AnimationStarted,
    /// An animation moved from motion to fade-out
    PhaseChanged,
    /// A floating text element finished and was despawned
    Despawned,
    /// A tooltip container was created and registered
    TooltipCreated,
    /// A tooltip registration replaced an existing one
    TooltipReplaced,
    /// A tooltip was shown
    TooltipShown,
    /// A tooltip was hidden
    TooltipHidden,
}

/// The effect log resource storing all events
#[derive(Resource, Default)]
pub struct EffectLog {
    /// All log entries in chronological order
    pub entries: Vec<EffectLogEntry>,
    /// Current clock time in seconds
    pub clock: f32,
}

impl EffectLog {
    /// Clear the log and reset the clock
    pub fn clear(&mut self) {
        self.entries.clear();
        self.clock = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: EffectLogEventType, message: String) {
        self.entries.push(EffectLogEntry {
            timestamp: self.clock,
            event_type,
            message,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: EffectLogEventType) -> Vec<&EffectLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&EffectLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Save the log as pretty JSON. Returns the path written to.
    pub fn save_to_file(&self, output_path: Option<&str>) -> Result<String, String> {
        let path = output_path.unwrap_or("floatext_log.json").to_string();
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| format!("Failed to serialize effect log: {}", e))?;
        std::fs::write(&path, json).map_err(|e| format!("Failed to write {}: {}", path, e))?;
        Ok(path)
    }
}

/// Shared wiring for the effect log: both the floating text and tooltip
/// plugins need it, whichever is added first installs it.
pub struct EffectLogPlugin;

impl Plugin for EffectLogPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EffectLog>()
            .add_systems(PreUpdate, advance_effect_clock);
    }
}

/// Advance the log clock once per frame so entries carry frame-accurate
/// timestamps.
fn advance_effect_clock(time: Res<Time>, mut log: ResMut<EffectLog>) {
    log.clock += time.delta_secs();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_records_at_current_clock() {
        let mut log = EffectLog::default();
        log.clock = 1.25;
        log.log(EffectLogEventType::Spawned, "64".to_string());

        assert_eq!(log.entries.len(), 1);
        assert_eq!(log.entries[0].timestamp, 1.25);
        assert_eq!(log.entries[0].event_type, EffectLogEventType::Spawned);
    }

    #[test]
    fn test_filter_by_type() {
        let mut log = EffectLog::default();
        log.log(EffectLogEventType::Spawned, "a".to_string());
        log.log(EffectLogEventType::Despawned, "a".to_string());
        log.log(EffectLogEventType::Spawned, "b".to_string());

        assert_eq!(log.filter_by_type(EffectLogEventType::Spawned).len(), 2);
        assert_eq!(log.filter_by_type(EffectLogEventType::Despawned).len(), 1);
        assert_eq!(log.filter_by_type(EffectLogEventType::TooltipShown).len(), 0);
    }

    #[test]
    fn test_recent_keeps_order() {
        let mut log = EffectLog::default();
        for i in 0..5 {
            log.log(EffectLogEventType::Spawned, format!("{}", i));
        }
        let recent: Vec<_> = log.recent(2).iter().map(|e| e.message.clone()).collect();
        assert_eq!(recent, vec!["3", "4"]);
    }

    #[test]
    fn test_clear_resets_clock() {
        let mut log = EffectLog::default();
        log.clock = 9.0;
        log.log(EffectLogEventType::Spawned, "x".to_string());
        log.clear();
        assert!(log.entries.is_empty());
        assert_eq!(log.clock, 0.0);
    }
}
