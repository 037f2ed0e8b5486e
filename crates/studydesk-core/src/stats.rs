//! Display statistics derived from a [`TimerState`].
//!
//! Nothing here is stored; every figure is recomputed from the two session
//! counters and the configured durations.

use serde::{Deserialize, Serialize};

use crate::timer::{Durations, TimerState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub completed_pomodoros: u32,
    pub sessions: u32,
    pub focus_minutes: u64,
    /// Whole hours of focus, rounded down.
    pub focus_hours: u64,
    /// Focus completions since the last long break was earned.
    pub cycle_position: u32,
    pub sessions_until_long_break: u32,
}

impl SessionStats {
    pub fn compute(state: &TimerState, durations: &Durations) -> Self {
        let focus_secs =
            u64::from(state.completed_focus_sessions).saturating_mul(durations.focus_secs());
        let interval = durations.long_break_interval();
        let cycle_position = state.focus_cycle_count % interval;
        Self {
            completed_pomodoros: state.completed_focus_sessions,
            sessions: state.focus_cycle_count,
            focus_minutes: focus_secs / 60,
            focus_hours: focus_secs / 3600,
            cycle_position,
            sessions_until_long_break: interval - cycle_position,
        }
    }
}

/// Render seconds as a zero-padded `MM:SS` countdown.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::SessionMode;

    fn state(completed: u32, cycles: u32) -> TimerState {
        TimerState {
            remaining_secs: 1500,
            mode: SessionMode::Focus,
            is_running: false,
            completed_focus_sessions: completed,
            focus_cycle_count: cycles,
        }
    }

    #[test]
    fn fresh_state() {
        let stats = SessionStats::compute(&state(0, 0), &Durations::default());
        assert_eq!(stats.focus_hours, 0);
        assert_eq!(stats.cycle_position, 0);
        assert_eq!(stats.sessions_until_long_break, 4);
    }

    #[test]
    fn hours_round_down() {
        // 5 x 25 min = 125 min
        let stats = SessionStats::compute(&state(5, 5), &Durations::default());
        assert_eq!(stats.focus_minutes, 125);
        assert_eq!(stats.focus_hours, 2);
        assert_eq!(stats.cycle_position, 1);
        assert_eq!(stats.sessions_until_long_break, 3);
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(0), "00:00");
    }
}
