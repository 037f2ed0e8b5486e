//! Pomodoro session controller.
//!
//! The controller is a plain state machine over a single countdown. It owns
//! no clock and no threads: the host calls `tick()` once per second while the
//! controller is running (see [`super::ticker::SessionDriver`] for a host that
//! does exactly that).
//!
//! ## State Transitions
//!
//! ```text
//! Idle-X --toggle--> Running-X --toggle--> Idle-X
//! Running-Focus --expiry--> Idle-ShortBreak | Idle-LongBreak
//! Running-Break --expiry--> Idle-Focus
//! any --switch_mode(Y)--> Idle-Y
//! any --reset--> Idle-Focus (counters zeroed)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = SessionController::new(Durations::default());
//! controller.toggle_running();
//! // Once per second:
//! if let Some(event) = controller.tick() { /* phase completed */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::mode::{Durations, SessionMode};
use crate::events::Event;

/// Mutable session record exposed to hosts as a read-only snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_secs: u64,
    pub mode: SessionMode,
    pub is_running: bool,
    pub completed_focus_sessions: u32,
    /// Focus completions counted toward the long-break cadence.
    pub focus_cycle_count: u32,
}

impl TimerState {
    fn initial(durations: &Durations) -> Self {
        Self {
            remaining_secs: durations.duration(SessionMode::Focus),
            mode: SessionMode::Focus,
            is_running: false,
            completed_focus_sessions: 0,
            focus_cycle_count: 0,
        }
    }
}

/// Core session controller.
///
/// Operates on discrete one-second ticks; never goes below zero and performs
/// exactly one transition per expiry.
#[derive(Debug, Clone)]
pub struct SessionController {
    durations: Durations,
    state: TimerState,
    /// Full reset after this many completed focus sessions (0 = never).
    auto_reset_after: u32,
    /// Last clock sequence number applied by `tick_seq`.
    last_tick_seq: Option<u64>,
}

impl SessionController {
    /// Create a controller in Idle-Focus with a full focus countdown.
    pub fn new(durations: Durations) -> Self {
        Self {
            state: TimerState::initial(&durations),
            durations,
            auto_reset_after: 0,
            last_tick_seq: None,
        }
    }

    /// Reset everything once `sessions` focus phases have been completed.
    pub fn with_auto_reset(mut self, sessions: u32) -> Self {
        self.auto_reset_after = sessions;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn durations(&self) -> &Durations {
        &self.durations
    }

    pub fn mode(&self) -> SessionMode {
        self.state.mode
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.durations.duration(self.state.mode)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress_fraction(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.state.remaining_secs as f64 / total as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.state.mode,
            label: self.state.mode.label().to_string(),
            is_running: self.state.is_running,
            remaining_secs: self.state.remaining_secs,
            total_secs: self.total_secs(),
            progress: self.progress_fraction(),
            completed_focus_sessions: self.state.completed_focus_sessions,
            focus_cycle_count: self.state.focus_cycle_count,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Flip between running and paused. Countdown and mode are untouched.
    pub fn toggle_running(&mut self) -> Event {
        self.state.is_running = !self.state.is_running;
        let at = Utc::now();
        if self.state.is_running {
            // A fresh run gets a fresh clock; old sequence numbers are void.
            self.last_tick_seq = None;
            debug!(mode = ?self.state.mode, remaining = self.state.remaining_secs, "timer started");
            Event::TimerStarted {
                mode: self.state.mode,
                remaining_secs: self.state.remaining_secs,
                at,
            }
        } else {
            debug!(mode = ?self.state.mode, remaining = self.state.remaining_secs, "timer paused");
            Event::TimerPaused {
                mode: self.state.mode,
                remaining_secs: self.state.remaining_secs,
                at,
            }
        }
    }

    /// Jump to `target` with a full countdown, discarding current progress.
    pub fn switch_mode(&mut self, target: SessionMode) -> Event {
        let from = self.state.mode;
        self.load_mode(target);
        debug!(?from, to = ?target, "mode switched");
        Event::ModeSwitched {
            from,
            to: target,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Back to Idle-Focus with both counters zeroed.
    pub fn reset(&mut self) -> Event {
        self.state = TimerState::initial(&self.durations);
        self.last_tick_seq = None;
        debug!("timer reset");
        Event::TimerReset { at: Utc::now() }
    }

    /// One-second decrement. Returns `Some(Event::PhaseCompleted)` when the
    /// countdown expires; no-op while paused.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        if self.state.remaining_secs > 1 {
            self.state.remaining_secs -= 1;
            return None;
        }
        self.state.remaining_secs = 0;
        Some(self.complete_phase())
    }

    /// Clock-driven tick. A sequence number at or below the last one applied
    /// is a duplicate delivery and is ignored.
    pub fn tick_seq(&mut self, seq: u64) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        if matches!(self.last_tick_seq, Some(last) if seq <= last) {
            debug!(seq, "duplicate tick ignored");
            return None;
        }
        self.last_tick_seq = Some(seq);
        self.tick()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self) -> Event {
        let from = self.state.mode;
        let next = match from {
            SessionMode::Focus => {
                self.state.completed_focus_sessions += 1;
                self.state.focus_cycle_count += 1;
                if self.state.focus_cycle_count % self.durations.long_break_interval() == 0 {
                    SessionMode::LongBreak
                } else {
                    SessionMode::ShortBreak
                }
            }
            SessionMode::ShortBreak | SessionMode::LongBreak => SessionMode::Focus,
        };
        self.load_mode(next);

        let completed = self.state.completed_focus_sessions;
        let cycles = self.state.focus_cycle_count;
        info!(?from, to = ?next, completed, "phase completed");

        let auto_reset = self.auto_reset_after > 0 && completed >= self.auto_reset_after;
        if auto_reset {
            info!(after = self.auto_reset_after, "session limit reached, resetting");
            self.reset();
        }

        Event::PhaseCompleted {
            from,
            to: self.state.mode,
            completed_focus_sessions: completed,
            focus_cycle_count: cycles,
            auto_reset,
            at: Utc::now(),
        }
    }

    fn load_mode(&mut self, mode: SessionMode) {
        self.state.mode = mode;
        self.state.remaining_secs = self.durations.duration(mode);
        self.state.is_running = false;
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(Durations::default())
    }
}
