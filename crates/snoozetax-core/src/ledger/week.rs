//! Week-bucket arithmetic.
//!
//! A week is seven local calendar days starting on a configurable weekday
//! (Sunday by default). Record dates are compared by their local calendar
//! date, so the whole of the last day is inside the bucket.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::alarm::LocalZone;

/// Inclusive range of local calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekBounds {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekCalendar {
    week_start: Weekday,
    zone: LocalZone,
}

impl WeekCalendar {
    pub fn new(week_start: Weekday, zone: LocalZone) -> Self {
        Self { week_start, zone }
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn zone(&self) -> LocalZone {
        self.zone
    }

    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        self.zone.local_date(at)
    }

    /// The week containing `at`. `None` only if date arithmetic leaves the
    /// representable range.
    pub fn week_containing(&self, at: DateTime<Utc>) -> Option<WeekBounds> {
        let today = self.local_date(at);
        let days_back = (7 + today.weekday().num_days_from_sunday()
            - self.week_start.num_days_from_sunday())
            % 7;
        let start = today.checked_sub_days(Days::new(u64::from(days_back)))?;
        let end = start.checked_add_days(Days::new(6))?;
        Some(WeekBounds { start, end })
    }

    pub fn contains(&self, bounds: &WeekBounds, at: DateTime<Utc>) -> bool {
        bounds.contains(self.local_date(at))
    }
}

impl Default for WeekCalendar {
    /// Sunday-based weeks in the host's time zone.
    fn default() -> Self {
        Self::new(Weekday::Sun, LocalZone::Host)
    }
}
