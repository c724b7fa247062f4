//! World clock — tick progression and calendar projection.
//!
//! The clock owns the current tick and only ever increases it. The
//! calendar is a pure function of the tick and the configured constants.

use crate::config::CalendarConfig;
use crate::types::Tick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldClock {
    current_tick: Tick,
    calendar: CalendarConfig,
}

/// A calendar date. Year, month and day are all 1-based:
/// tick 0 is year 1, month 1, day 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldDate {
    pub year: u64,
    pub month: u64,
    pub day: u64,
}

impl WorldClock {
    pub fn new() -> Self {
        Self::with_calendar(CalendarConfig::default())
    }

    pub fn with_calendar(calendar: CalendarConfig) -> Self {
        Self {
            current_tick: 0,
            calendar,
        }
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn calendar(&self) -> &CalendarConfig {
        &self.calendar
    }

    /// Advance one tick. Returns the new tick number.
    pub fn advance(&mut self) -> Tick {
        self.current_tick += 1;
        self.current_tick
    }

    /// Advance n ticks (n may be zero). Returns the new tick number.
    pub fn advance_by(&mut self, n: u64) -> Tick {
        self.current_tick += n;
        self.current_tick
    }

    pub fn current_date(&self) -> WorldDate {
        self.date_at(self.current_tick)
    }

    pub fn date_at(&self, tick: Tick) -> WorldDate {
        let dpm = self.calendar.days_per_month;
        let dpy = self.calendar.days_per_year();
        WorldDate {
            year: tick / dpy + 1,
            month: (tick % dpy) / dpm + 1,
            day: tick % dpm + 1,
        }
    }

    /// True iff a system with the given tick-period is due right now.
    /// Frequency 1 means "every tick". Panics on zero — a zero period is
    /// a wiring bug, not a runtime condition.
    pub fn is_due(&self, frequency: Tick) -> bool {
        assert!(frequency > 0, "is_due: frequency must be positive");
        self.current_tick % frequency == 0
    }
}

impl Default for WorldClock {
    fn default() -> Self {
        Self::new()
    }
}
