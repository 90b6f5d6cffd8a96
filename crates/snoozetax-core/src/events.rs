use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::alarm::{Alarm, AlarmState};
use crate::ledger::Money;

/// Every state change in the system produces an Event.
/// Hosts drain them to refresh views and fire cues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    AlarmSet {
        alarm_id: Uuid,
        time: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    AlarmRinging {
        alarm_id: Uuid,
        snooze_count: u8,
        at: DateTime<Utc>,
    },
    AlarmSnoozed {
        alarm_id: Uuid,
        snooze_count: u8,
        next_ring: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// Snooze requested after the cap was reached; nothing changed.
    SnoozeRefused {
        alarm_id: Uuid,
        snooze_count: u8,
        at: DateTime<Utc>,
    },
    AlarmDismissed {
        alarm_id: Uuid,
        /// True when prior snoozes pushed the alarm to the next day.
        rolled_over: bool,
        next_ring: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    AlarmDeleted {
        alarm_id: Uuid,
        at: DateTime<Utc>,
    },
    AlarmToggled {
        alarm_id: Uuid,
        enabled: bool,
        at: DateTime<Utc>,
    },
    ChargeRecorded {
        record_id: Uuid,
        amount: Money,
        alarm_time: String,
        at: DateTime<Utc>,
    },
    WeekSettled {
        week_start: NaiveDate,
        week_end: NaiveDate,
        records: usize,
        amount: Money,
        at: DateTime<Utc>,
    },
    PartnerChanged {
        username: Option<String>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: AlarmState,
        alarm: Option<Alarm>,
        can_snooze: bool,
        armed_for: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    },
}
