mod engine;
mod mode;
mod ticker;

pub use engine::{SessionController, TimerState};
pub use mode::{Durations, SessionMode};
pub use ticker::{SessionDriver, Ticker, DEFAULT_TICK_PERIOD};
