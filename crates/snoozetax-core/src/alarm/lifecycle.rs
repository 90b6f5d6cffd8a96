//! Alarm lifecycle state machine.
//!
//! Owns the single alarm slot plus the ringing flag. Every command returns
//! `Some(Event)` when it changed something and `None` when a guard turned
//! it into a no-op (no alarm, snooze cap reached, already in that state).
//!
//! ## State Transitions
//!
//! ```text
//! Empty --set--> Scheduled --trigger/tick--> Ringing
//! Ringing --snooze--> Scheduled (+9 min)
//! Ringing --dismiss--> Scheduled (+24h if snoozed before)
//! any --delete--> Empty
//! ```
//!
//! The lifecycle never records charges; the caller pairs a successful
//! snooze with `DebtLedger::add_charge`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{Alarm, TriggerState};
use crate::clock::Clock;
use crate::events::Event;
use crate::notify::NotificationScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmState {
    Empty,
    Scheduled,
    Ringing,
}

pub struct AlarmLifecycle {
    alarm: Option<Alarm>,
    trigger: TriggerState,
    scheduler: Box<dyn NotificationScheduler>,
    clock: Arc<dyn Clock>,
}

impl AlarmLifecycle {
    /// Starts `Empty`.
    pub fn new(scheduler: Box<dyn NotificationScheduler>, clock: Arc<dyn Clock>) -> Self {
        Self {
            alarm: None,
            trigger: TriggerState::default(),
            scheduler,
            clock,
        }
    }

    /// Rehydrate persisted state without touching the scheduler.
    pub fn restore(&mut self, alarm: Option<Alarm>, trigger: TriggerState) {
        self.alarm = alarm.map(|mut a| {
            a.clamp_snooze_count();
            a
        });
        self.trigger = if self.alarm.is_some() {
            trigger
        } else {
            TriggerState::default()
        };
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn alarm(&self) -> Option<&Alarm> {
        self.alarm.as_ref()
    }

    pub fn is_ringing(&self) -> bool {
        self.trigger.ringing
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.trigger
    }

    pub fn state(&self) -> AlarmState {
        match (&self.alarm, self.trigger.ringing) {
            (None, _) => AlarmState::Empty,
            (Some(_), false) => AlarmState::Scheduled,
            (Some(_), true) => AlarmState::Ringing,
        }
    }

    pub fn can_snooze(alarm: &Alarm) -> bool {
        alarm.can_snooze()
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            alarm: self.alarm.clone(),
            can_snooze: self.alarm.as_ref().is_some_and(Alarm::can_snooze),
            armed_for: self.trigger.armed_for,
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the slot with a fresh alarm and arm it.
    pub fn set_alarm(&mut self, time: DateTime<Utc>) -> Option<Event> {
        let alarm = Alarm::new(time);
        self.trigger.ringing = false;
        self.arm(&alarm);
        tracing::debug!(alarm_id = %alarm.id(), %time, "alarm set");
        let event = Event::AlarmSet {
            alarm_id: alarm.id(),
            time,
            at: self.clock.now(),
        };
        self.alarm = Some(alarm);
        Some(event)
    }

    /// Start ringing. Invoked by the host when the wake trigger fires.
    pub fn trigger(&mut self) -> Option<Event> {
        if self.trigger.ringing {
            return None;
        }
        let alarm = self.alarm.as_ref().filter(|a| a.is_enabled())?;
        let event = Event::AlarmRinging {
            alarm_id: alarm.id(),
            snooze_count: alarm.snooze_count(),
            at: self.clock.now(),
        };
        tracing::debug!(alarm_id = %alarm.id(), "alarm ringing");
        self.trigger.ringing = true;
        self.trigger.armed_for = None;
        Some(event)
    }

    /// Call periodically on hosts without push delivery. Rings the alarm
    /// once its armed time has passed.
    pub fn tick(&mut self) -> Option<Event> {
        let armed_for = self.trigger.armed_for?;
        if self.trigger.ringing || self.clock.now() < armed_for {
            return None;
        }
        self.trigger()
    }

    /// Snooze for nine minutes. No-op without an alarm or at the cap.
    pub fn snooze_alarm(&mut self) -> Option<Event> {
        let now = self.clock.now();
        let alarm = self.alarm.as_mut()?;
        if !alarm.snooze(now) {
            tracing::debug!(
                alarm_id = %alarm.id(),
                snooze_count = alarm.snooze_count(),
                "snooze cap reached"
            );
            return None;
        }
        let alarm = alarm.clone();
        self.trigger.ringing = false;
        self.arm(&alarm);
        tracing::debug!(
            alarm_id = %alarm.id(),
            snooze_count = alarm.snooze_count(),
            next_ring = %alarm.time(),
            "alarm snoozed"
        );
        Some(Event::AlarmSnoozed {
            alarm_id: alarm.id(),
            snooze_count: alarm.snooze_count(),
            next_ring: alarm.time(),
            at: now,
        })
    }

    /// Stop ringing. A snoozed alarm moves to the same instant tomorrow with
    /// its snooze count reset; an alarm that was never snoozed keeps its
    /// time and is not re-armed.
    pub fn dismiss_alarm(&mut self) -> Option<Event> {
        let alarm = self.alarm.as_mut()?;
        let rolled_over = alarm.snooze_count() > 0;
        if rolled_over {
            alarm.roll_to_next_day();
        }
        let alarm = alarm.clone();
        self.trigger.ringing = false;
        if rolled_over {
            self.arm(&alarm);
        }
        tracing::debug!(alarm_id = %alarm.id(), rolled_over, "alarm dismissed");
        Some(Event::AlarmDismissed {
            alarm_id: alarm.id(),
            rolled_over,
            next_ring: alarm.time(),
            at: self.clock.now(),
        })
    }

    pub fn delete_alarm(&mut self) -> Option<Event> {
        let alarm = self.alarm.take()?;
        self.trigger = TriggerState::default();
        self.scheduler.cancel_all();
        tracing::debug!(alarm_id = %alarm.id(), "alarm deleted");
        Some(Event::AlarmDeleted {
            alarm_id: alarm.id(),
            at: self.clock.now(),
        })
    }

    /// Enabling re-arms the alarm, first moving a past time forward by whole
    /// days; disabling cancels the trigger and silences a ringing alarm.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<Event> {
        let now = self.clock.now();
        let alarm = self.alarm.as_mut()?;
        if alarm.is_enabled() == enabled {
            return None;
        }
        alarm.set_enabled(enabled);
        if enabled {
            alarm.roll_forward_to(now);
        }
        let alarm = alarm.clone();
        if enabled {
            self.arm(&alarm);
        } else {
            self.trigger = TriggerState::default();
            self.scheduler.cancel_all();
        }
        Some(Event::AlarmToggled {
            alarm_id: alarm.id(),
            enabled,
            at: now,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Disabled alarms are never armed. Scheduler failures are logged and
    /// leave the domain state alone; `tick()` still fires at `armed_for`.
    fn arm(&mut self, alarm: &Alarm) {
        if !alarm.is_enabled() {
            return;
        }
        self.trigger.armed_for = Some(alarm.time());
        if let Err(e) = self.scheduler.arm(alarm.id(), alarm.time()) {
            tracing::warn!(alarm_id = %alarm.id(), error = %e, "failed to arm wake trigger");
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::alarm::{MAX_SNOOZES, SNOOZE_MINUTES};
    use crate::clock::FixedClock;
    use crate::notify::LoggingScheduler;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    proptest! {
        #[test]
        fn set_alarm_reads_back(offset_min in 0i64..(60 * 24 * 365)) {
            let clock = Arc::new(FixedClock::new(base()));
            let mut lc = AlarmLifecycle::new(Box::new(LoggingScheduler), clock);
            let t = base() + Duration::minutes(offset_min);
            lc.set_alarm(t);
            let alarm = lc.alarm().unwrap();
            prop_assert_eq!(alarm.time(), t);
            prop_assert_eq!(alarm.snooze_count(), 0);
        }

        #[test]
        fn snooze_and_dismiss_properties(
            snoozes in 0u8..=MAX_SNOOZES,
            step_secs in 1i64..3600,
        ) {
            let clock = Arc::new(FixedClock::new(base()));
            let mut lc = AlarmLifecycle::new(Box::new(LoggingScheduler), clock.clone());
            lc.set_alarm(base());

            for i in 0..snoozes {
                clock.advance(Duration::seconds(step_secs));
                let now = clock.now();
                prop_assert!(lc.snooze_alarm().is_some());
                let alarm = lc.alarm().unwrap();
                prop_assert_eq!(alarm.snooze_count(), i + 1);
                prop_assert_eq!(alarm.time(), now + Duration::minutes(SNOOZE_MINUTES));
            }

            if snoozes == MAX_SNOOZES {
                let before = lc.alarm().cloned();
                prop_assert!(lc.snooze_alarm().is_none());
                prop_assert_eq!(lc.alarm().cloned(), before);
            }

            let before = lc.alarm().unwrap().clone();
            lc.dismiss_alarm();
            let after = lc.alarm().unwrap();
            prop_assert_eq!(after.snooze_count(), 0);
            if snoozes > 0 {
                prop_assert_eq!(after.time(), before.time() + Duration::hours(24));
                prop_assert!(after.last_snooze_date().is_none());
            } else {
                prop_assert_eq!(after.time(), before.time());
            }
            prop_assert!(!lc.is_ringing());
        }
    }
}
