use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of snoozes before the alarm must be dismissed.
pub const MAX_SNOOZES: u8 = 3;

/// How far a snooze pushes the alarm out from the moment it was snoozed.
pub const SNOOZE_MINUTES: i64 = 9;

/// The single scheduled wake event.
///
/// Fields are private so `snooze_count` can never exceed [`MAX_SNOOZES`];
/// all mutation goes through [`super::AlarmLifecycle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    id: Uuid,
    time: DateTime<Utc>,
    #[serde(default = "default_true")]
    is_enabled: bool,
    #[serde(default)]
    snooze_count: u8,
    #[serde(default)]
    last_snooze_date: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Alarm {
    /// Fresh, enabled alarm with no snoozes.
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            time,
            is_enabled: true,
            snooze_count: 0,
            last_snooze_date: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    pub fn snooze_count(&self) -> u8 {
        self.snooze_count
    }

    pub fn last_snooze_date(&self) -> Option<DateTime<Utc>> {
        self.last_snooze_date
    }

    pub fn can_snooze(&self) -> bool {
        self.snooze_count < MAX_SNOOZES
    }

    pub fn snoozes_left(&self) -> u8 {
        MAX_SNOOZES.saturating_sub(self.snooze_count)
    }

    // ── Mutation (lifecycle only) ────────────────────────────────────

    /// Returns `false` without touching anything once the cap is reached.
    pub(crate) fn snooze(&mut self, now: DateTime<Utc>) -> bool {
        if !self.can_snooze() {
            return false;
        }
        self.snooze_count += 1;
        self.last_snooze_date = Some(now);
        self.time = now + Duration::minutes(SNOOZE_MINUTES);
        true
    }

    /// Push a snoozed alarm to the same instant tomorrow and clear its
    /// snooze history.
    pub(crate) fn roll_to_next_day(&mut self) {
        self.time += Duration::hours(24);
        self.snooze_count = 0;
        self.last_snooze_date = None;
    }

    /// Move an alarm whose time has passed to the same instant on the first
    /// later day that is not before `now`, clearing its snooze history.
    pub(crate) fn roll_forward_to(&mut self, now: DateTime<Utc>) {
        if self.time >= now {
            return;
        }
        let mut days = (now - self.time).num_days();
        if self.time + Duration::days(days) < now {
            days += 1;
        }
        self.time += Duration::days(days);
        self.snooze_count = 0;
        self.last_snooze_date = None;
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.is_enabled = enabled;
    }

    /// Stored alarms written by older builds may carry an out-of-range count.
    pub(crate) fn clamp_snooze_count(&mut self) {
        self.snooze_count = self.snooze_count.min(MAX_SNOOZES);
    }
}

/// Trigger bookkeeping that lives beside the alarm slot.
///
/// `armed_for` mirrors the instant the external scheduler was last armed
/// for; it is consumed when the alarm rings so a past time never rings
/// twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerState {
    #[serde(default)]
    pub ringing: bool,
    #[serde(default)]
    pub armed_for: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn seven_am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 7, 0, 0).unwrap()
    }

    #[test]
    fn new_alarm_is_fresh() {
        let alarm = Alarm::new(seven_am());
        assert_eq!(alarm.time(), seven_am());
        assert_eq!(alarm.snooze_count(), 0);
        assert!(alarm.is_enabled());
        assert!(alarm.last_snooze_date().is_none());
        assert!(alarm.can_snooze());
        assert_eq!(alarm.snoozes_left(), 3);
    }

    #[test]
    fn roll_forward_lands_on_first_day_not_before_now() {
        let mut alarm = Alarm::new(seven_am());
        alarm.snooze(seven_am());
        let snoozed = alarm.time();
        alarm.roll_forward_to(seven_am() + Duration::days(2) + Duration::hours(1));
        assert_eq!(alarm.time(), snoozed + Duration::days(3));
        assert_eq!(alarm.snooze_count(), 0);
        assert!(alarm.last_snooze_date().is_none());

        let mut exact = Alarm::new(seven_am());
        exact.roll_forward_to(seven_am() + Duration::days(1));
        assert_eq!(exact.time(), seven_am() + Duration::days(1));

        let mut upcoming = Alarm::new(seven_am());
        upcoming.roll_forward_to(seven_am() - Duration::hours(1));
        assert_eq!(upcoming.time(), seven_am());
    }

    #[test]
    fn snooze_stops_at_cap() {
        let mut alarm = Alarm::new(seven_am());
        let now = seven_am();
        for _ in 0..MAX_SNOOZES {
            assert!(alarm.snooze(now));
        }
        let before = alarm.clone();
        assert!(!alarm.snooze(now + Duration::minutes(30)));
        assert_eq!(alarm, before);
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let json = r#"{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","time":"2024-03-04T07:00:00Z"}"#;
        let alarm: Alarm = serde_json::from_str(json).unwrap();
        assert!(alarm.is_enabled());
        assert_eq!(alarm.snooze_count(), 0);
        assert!(alarm.last_snooze_date().is_none());
    }

    #[test]
    fn clamp_repairs_out_of_range_count() {
        let json = r#"{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","time":"2024-03-04T07:00:00Z","snooze_count":9}"#;
        let mut alarm: Alarm = serde_json::from_str(json).unwrap();
        alarm.clamp_snooze_count();
        assert_eq!(alarm.snooze_count(), MAX_SNOOZES);
    }
}
