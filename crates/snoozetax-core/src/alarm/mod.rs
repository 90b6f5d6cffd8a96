mod lifecycle;
mod model;
mod time_of_day;

pub use lifecycle::{AlarmLifecycle, AlarmState};
pub use model::{Alarm, TriggerState, MAX_SNOOZES, SNOOZE_MINUTES};
pub use time_of_day::{format_short, next_occurrence, parse_time_of_day, LocalZone};
