//! Periodic clock source for the session controller.
//!
//! [`Ticker`] is a tokio task firing on a fixed period; it hands out strictly
//! increasing sequence numbers over a channel of capacity one, so a slow
//! consumer delays the next tick instead of receiving overlapping ones.
//!
//! [`SessionDriver`] pairs one controller with at most one ticker and keeps
//! the two in step: a running controller has exactly one live ticker, a
//! paused one has none. Dropping the driver aborts the ticker task.
//!
//! Both must be used from inside a tokio runtime.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use super::engine::{SessionController, TimerState};
use super::mode::SessionMode;
use crate::events::Event;

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// A live periodic tick source. Aborted on drop.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
    rx: mpsc::Receiver<u64>,
}

impl Ticker {
    /// Spawn a ticker whose first tick arrives one `period` from now.
    pub fn start(period: Duration) -> Self {
        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut seq = 0u64;
            loop {
                interval.tick().await;
                seq += 1;
                trace!(seq, "tick");
                if tx.send(seq).await.is_err() {
                    break;
                }
            }
        });
        debug!(period_ms = period.as_millis() as u64, "ticker started");
        Self { handle, rx }
    }

    /// Wait for the next tick. `None` once the task has stopped.
    pub async fn next(&mut self) -> Option<u64> {
        self.rx.recv().await
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("ticker stopped");
    }
}

/// Hosts a [`SessionController`] and the clock that drives it.
#[derive(Debug)]
pub struct SessionDriver {
    controller: SessionController,
    ticker: Option<Ticker>,
    period: Duration,
}

impl SessionDriver {
    pub fn new(controller: SessionController, period: Duration) -> Self {
        Self {
            controller,
            ticker: None,
            period,
        }
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn state(&self) -> &TimerState {
        self.controller.state()
    }

    pub fn snapshot(&self) -> Event {
        self.controller.snapshot()
    }

    /// Whether a ticker task is currently attached.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn toggle_running(&mut self) -> Event {
        let event = self.controller.toggle_running();
        self.sync_ticker();
        event
    }

    pub fn switch_mode(&mut self, target: SessionMode) -> Event {
        let event = self.controller.switch_mode(target);
        self.sync_ticker();
        event
    }

    pub fn reset(&mut self) -> Event {
        let event = self.controller.reset();
        self.sync_ticker();
        event
    }

    /// Wait for the next clock tick and apply it.
    ///
    /// Returns `Event::Tick` for a plain decrement, `Event::PhaseCompleted`
    /// on expiry, and `None` immediately when the controller is idle.
    pub async fn next_event(&mut self) -> Option<Event> {
        let next = self.ticker.as_mut()?.next().await;
        let Some(seq) = next else {
            self.ticker = None;
            return None;
        };

        let completed = self.controller.tick_seq(seq);
        self.sync_ticker();

        Some(completed.unwrap_or_else(|| {
            let state = self.controller.state();
            Event::Tick {
                mode: state.mode,
                remaining_secs: state.remaining_secs,
                at: Utc::now(),
            }
        }))
    }

    fn sync_ticker(&mut self) {
        match (self.controller.is_running(), self.ticker.is_some()) {
            (true, false) => self.ticker = Some(Ticker::start(self.period)),
            (false, true) => self.ticker = None,
            _ => {}
        }
    }
}
