use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::SessionMode;

/// Every state change of the session controller produces an Event.
/// Hosts render from them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: SessionMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: SessionMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Tick {
        mode: SessionMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase ran down to zero and the controller moved to the next mode.
    PhaseCompleted {
        from: SessionMode,
        to: SessionMode,
        completed_focus_sessions: u32,
        focus_cycle_count: u32,
        /// The configured session limit was hit and the controller reset.
        #[serde(default)]
        auto_reset: bool,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: SessionMode,
        to: SessionMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: SessionMode,
        label: String,
        is_running: bool,
        remaining_secs: u64,
        total_secs: u64,
        progress: f64,
        completed_focus_sessions: u32,
        focus_cycle_count: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name, e.g. for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::Tick { .. } => "tick",
            Event::PhaseCompleted { .. } => "phase_completed",
            Event::ModeSwitched { .. } => "mode_switched",
            Event::TimerReset { .. } => "timer_reset",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::TimerReset { at: Utc::now() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TimerReset");
        assert_eq!(event.kind(), "timer_reset");
    }

    #[test]
    fn phase_completed_carries_modes() {
        let event = Event::PhaseCompleted {
            from: SessionMode::Focus,
            to: SessionMode::LongBreak,
            completed_focus_sessions: 4,
            focus_cycle_count: 4,
            auto_reset: false,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["from"], "focus");
        assert_eq!(json["to"], "long_break");
    }
}
