//! Wall-clock helpers for alarms.
//!
//! Alarms are stored as absolute UTC instants, but users pick a clock time
//! ("7:00 AM") and read back a clock-time label. These helpers convert
//! between the two in a [`LocalZone`]: the host's time zone, with its
//! daylight-saving rules, or a fixed offset from configuration.

use chrono::{
    DateTime, Days, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc,
};

use crate::error::ValidationError;

const TIME_FORMATS: [&str; 3] = ["%H:%M", "%I:%M %p", "%I:%M%p"];

/// Where wall-clock times are read and resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalZone {
    /// The host's time zone. The offset is looked up per instant, so
    /// daylight-saving changes are honoured.
    #[default]
    Host,
    Fixed(FixedOffset),
}

impl LocalZone {
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }

    /// The offset in effect at `at`.
    pub fn offset_at(&self, at: DateTime<Utc>) -> FixedOffset {
        match self {
            Self::Host => at.with_timezone(&Local).offset().fix(),
            Self::Fixed(offset) => *offset,
        }
    }

    pub fn naive_local(&self, at: DateTime<Utc>) -> NaiveDateTime {
        at.with_timezone(&self.offset_at(at)).naive_local()
    }

    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        self.naive_local(at).date()
    }

    /// The instant the local clock reads `local`. A reading that occurs
    /// twice resolves to the earlier one; a reading skipped by a
    /// daylight-saving jump resolves to the instant just after the jump.
    pub fn resolve(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        let exact = |naive: &NaiveDateTime| match self {
            Self::Host => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|t| t.with_timezone(&Utc)),
            Self::Fixed(offset) => offset
                .from_local_datetime(naive)
                .earliest()
                .map(|t| t.with_timezone(&Utc)),
        };
        exact(&local).or_else(|| exact(&(local + Duration::hours(1))))
    }
}

/// Parse `"07:00"`, `"19:30"`, `"7:00 AM"` or `"7:00pm"`.
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime, ValidationError> {
    let normalized = input.trim().to_uppercase();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&normalized, fmt).ok())
        .ok_or_else(|| ValidationError::InvalidTime(input.to_string()))
}

/// The next instant at which the local clock shows `time`.
///
/// A time that has already passed today rolls to the same clock time
/// tomorrow; a time equal to `now` stays today.
pub fn next_occurrence(time: NaiveTime, now: DateTime<Utc>, zone: LocalZone) -> DateTime<Utc> {
    let today = zone.local_date(now);
    (0..=2)
        .filter_map(|days| today.checked_add_days(Days::new(days)))
        .filter_map(|date| zone.resolve(date.and_time(time)))
        .find(|candidate| *candidate >= now)
        .unwrap_or(now)
}

/// Short clock-time label, e.g. `"7:00 AM"`.
pub fn format_short(time: DateTime<Utc>, zone: LocalZone) -> String {
    zone.naive_local(time).format("%-I:%M %p").to_string()
}
