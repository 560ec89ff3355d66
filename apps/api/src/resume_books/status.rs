//! Time-window status for a resume book.
//!
//! A resume book accepts submissions between its `start_date` and `end_date`.
//! The status is always derived from the current instant and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A closed `[start, end]` interval during which submissions are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Returns `None` when `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WindowStatus {
    Upcoming,
    Active,
    Past,
}

/// Classifies `now` against `window`. Both boundaries count as active.
pub fn resolve_status(now: DateTime<Utc>, window: &TimeWindow) -> WindowStatus {
    if now < window.start() {
        WindowStatus::Upcoming
    } else if now > window.end() {
        WindowStatus::Past
    } else {
        WindowStatus::Active
    }
}
