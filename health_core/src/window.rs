//! Time-of-day windows used to restrict aggregation (e.g. "breakfast").

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Name of the window every daily and period report aggregates over
pub const ALL_DAY: &str = "all";

/// A time-of-day interval `(start, end]`.
///
/// A window whose start equals its end is unbounded and matches every time of
/// day. Windows never wrap around midnight; [`Config::validate`] rejects a
/// start after the end.
///
/// [`Config::validate`]: crate::Config::validate
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Window with exclusive `start` and inclusive `end`
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Window matching any time of day
    pub fn unbounded() -> Self {
        Self::new(NaiveTime::MIN, NaiveTime::MIN)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start == self.end
    }

    /// Check whether `time` falls inside the window
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.is_unbounded() || (time > self.start && time <= self.end)
    }
}
