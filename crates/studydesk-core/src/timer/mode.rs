use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl SessionMode {
    /// Order used by the mode picker.
    pub const ALL: [SessionMode; 3] = [
        SessionMode::Focus,
        SessionMode::ShortBreak,
        SessionMode::LongBreak,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SessionMode::Focus => "Focus Time",
            SessionMode::ShortBreak => "Short Break",
            SessionMode::LongBreak => "Long Break",
        }
    }

    pub fn accent_color(&self) -> &'static str {
        match self {
            SessionMode::Focus => "#4F46E5",
            SessionMode::ShortBreak => "#10B981",
            SessionMode::LongBreak => "#F59E0B",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SessionMode::Focus => "🎯",
            SessionMode::ShortBreak => "☕",
            SessionMode::LongBreak => "🌴",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SessionMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focus" => Ok(SessionMode::Focus),
            "short" | "short_break" | "short-break" => Ok(SessionMode::ShortBreak),
            "long" | "long_break" | "long-break" => Ok(SessionMode::LongBreak),
            other => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("'{other}' is not one of focus, short, long"),
            }),
        }
    }
}

/// Fixed phase lengths and the long-break cadence.
///
/// Every field is non-zero; the only ways in are [`Durations::new`],
/// `Default` and deserialization, and the latter goes through `new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDurations")]
pub struct Durations {
    focus_secs: u64,
    short_break_secs: u64,
    long_break_secs: u64,
    long_break_interval: u32,
}

#[derive(Deserialize)]
struct RawDurations {
    focus_secs: u64,
    short_break_secs: u64,
    long_break_secs: u64,
    long_break_interval: u32,
}

impl TryFrom<RawDurations> for Durations {
    type Error = ValidationError;

    fn try_from(raw: RawDurations) -> Result<Self, Self::Error> {
        Durations::new(
            raw.focus_secs,
            raw.short_break_secs,
            raw.long_break_secs,
            raw.long_break_interval,
        )
    }
}

impl Durations {
    /// Build a duration set, rejecting zero-length phases and a zero interval.
    pub fn new(
        focus_secs: u64,
        short_break_secs: u64,
        long_break_secs: u64,
        long_break_interval: u32,
    ) -> Result<Self, ValidationError> {
        for (field, value) in [
            ("focus_secs", focus_secs),
            ("short_break_secs", short_break_secs),
            ("long_break_secs", long_break_secs),
        ] {
            if value == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    message: "must be greater than zero".into(),
                });
            }
        }
        if long_break_interval == 0 {
            return Err(ValidationError::InvalidValue {
                field: "long_break_interval".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(Self {
            focus_secs,
            short_break_secs,
            long_break_secs,
            long_break_interval,
        })
    }

    pub fn focus_secs(&self) -> u64 {
        self.focus_secs
    }

    /// A long break follows every Nth completed focus phase. Never zero.
    pub fn long_break_interval(&self) -> u32 {
        self.long_break_interval
    }

    /// Full length of a phase in seconds.
    pub fn duration(&self, mode: SessionMode) -> u64 {
        match mode {
            SessionMode::Focus => self.focus_secs,
            SessionMode::ShortBreak => self.short_break_secs,
            SessionMode::LongBreak => self.long_break_secs,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            focus_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            long_break_interval: 4,
        }
    }
}
