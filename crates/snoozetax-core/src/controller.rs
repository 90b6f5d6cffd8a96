//! The composition boundary.
//!
//! [`SnoozeTax`] is what a UI talks to. It pairs each snooze with a ledger
//! charge, persists whatever changed, fires feedback cues and queues the
//! resulting events. The lifecycle and the ledger never see each other.

use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;

use crate::alarm::{format_short, next_occurrence, Alarm, AlarmLifecycle, AlarmState};
use crate::clock::Clock;
use crate::error::{PaymentError, Result};
use crate::events::Event;
use crate::ledger::{DebtLedger, Money, WeekCalendar, WeeklyDebt};
use crate::notify::{FeedbackCue, FeedbackSink, NotificationScheduler};
use crate::payment::{PaymentIntent, PaymentLinks};
use crate::storage::{KvStore, StateRepository};

/// Collaborators injected into the controller.
pub struct Services {
    pub scheduler: Box<dyn NotificationScheduler>,
    pub feedback: Box<dyn FeedbackSink>,
    pub clock: Arc<dyn Clock>,
}

/// Pull-based view of everything a UI renders.
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    pub state: AlarmState,
    pub alarm: Option<Alarm>,
    /// Clock-time label of the next ring, e.g. "7:09 AM".
    pub alarm_label: Option<String>,
    pub snoozes_left: u8,
    pub total_unpaid: Money,
    pub current_week: Option<WeeklyDebt>,
    pub partner: Option<String>,
}

pub struct SnoozeTax<S> {
    lifecycle: AlarmLifecycle,
    ledger: DebtLedger,
    repo: StateRepository<S>,
    feedback: Box<dyn FeedbackSink>,
    clock: Arc<dyn Clock>,
    payment: PaymentLinks,
    partner: Option<String>,
    events: Vec<Event>,
}

impl<S: KvStore> SnoozeTax<S> {
    /// Rebuild from persisted state. Unreadable records fall back to the
    /// empty state.
    pub fn load(
        repo: StateRepository<S>,
        services: Services,
        calendar: WeekCalendar,
        payment: PaymentLinks,
    ) -> Self {
        let mut lifecycle = AlarmLifecycle::new(services.scheduler, services.clock.clone());
        lifecycle.restore(repo.load_alarm_or_default(), repo.load_trigger_or_default());

        let ledger = DebtLedger::from_records(
            repo.load_records_or_default(),
            services.clock.clone(),
            calendar,
        );
        let partner = repo.load_partner_or_default();

        Self {
            lifecycle,
            ledger,
            repo,
            feedback: services.feedback,
            clock: services.clock,
            payment,
            partner,
            events: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn lifecycle(&self) -> &AlarmLifecycle {
        &self.lifecycle
    }

    pub fn ledger(&self) -> &DebtLedger {
        &self.ledger
    }

    pub fn partner(&self) -> Option<&str> {
        self.partner.as_deref()
    }

    pub fn status(&self) -> Status {
        let alarm = self.lifecycle.alarm().cloned();
        Status {
            state: self.lifecycle.state(),
            alarm_label: alarm.as_ref().map(|a| self.label(a.time())),
            snoozes_left: alarm.as_ref().map_or(0, Alarm::snoozes_left),
            alarm,
            total_unpaid: self.ledger.total_unpaid(),
            current_week: self.ledger.current_week(),
            partner: self.partner.clone(),
        }
    }

    /// Hand queued events to the caller, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Alarm commands ───────────────────────────────────────────────

    pub fn set_alarm(&mut self, time: DateTime<Utc>) -> Result<Option<Event>> {
        let event = self.lifecycle.set_alarm(time);
        self.save_alarm()?;
        Ok(self.emit(event, FeedbackCue::Set))
    }

    /// Set the alarm for the next time the local clock shows `time`.
    pub fn set_alarm_at(&mut self, time: NaiveTime) -> Result<Option<Event>> {
        let at = next_occurrence(time, self.clock.now(), self.ledger.calendar().zone());
        self.set_alarm(at)
    }

    pub fn trigger(&mut self) -> Result<Option<Event>> {
        let event = self.lifecycle.trigger();
        if event.is_some() {
            self.save_alarm()?;
        }
        Ok(self.emit(event, FeedbackCue::Ring))
    }

    pub fn tick(&mut self) -> Result<Option<Event>> {
        let event = self.lifecycle.tick();
        if event.is_some() {
            self.save_alarm()?;
        }
        Ok(self.emit(event, FeedbackCue::Ring))
    }

    /// Charge the snooze tax, then snooze. At the cap nothing is charged and
    /// a `SnoozeRefused` event is queued instead.
    pub fn snooze(&mut self) -> Result<Option<Event>> {
        let Some(alarm) = self.lifecycle.alarm() else {
            return Ok(None);
        };

        if !AlarmLifecycle::can_snooze(alarm) {
            let refused = Event::SnoozeRefused {
                alarm_id: alarm.id(),
                snooze_count: alarm.snooze_count(),
                at: self.clock.now(),
            };
            self.emit(Some(refused), FeedbackCue::Error);
            return Ok(None);
        }

        let label = self.label(alarm.time());
        let charge = self.ledger.add_charge(&label);
        let event = self.lifecycle.snooze_alarm();
        if let Some(alarm) = self.lifecycle.alarm() {
            self.repo.save_snooze(
                alarm,
                &self.lifecycle.trigger_state(),
                self.ledger.records(),
            )?;
        }

        self.emit(Some(charge), FeedbackCue::Charge);
        Ok(self.emit(event, FeedbackCue::Snooze))
    }

    pub fn dismiss(&mut self) -> Result<Option<Event>> {
        let event = self.lifecycle.dismiss_alarm();
        if event.is_some() {
            self.save_alarm()?;
        }
        Ok(self.emit(event, FeedbackCue::Dismiss))
    }

    pub fn delete(&mut self) -> Result<Option<Event>> {
        let event = self.lifecycle.delete_alarm();
        if event.is_some() {
            self.save_alarm()?;
        }
        Ok(self.emit(event, FeedbackCue::Delete))
    }

    pub fn set_enabled(&mut self, enabled: bool) -> Result<Option<Event>> {
        let event = self.lifecycle.set_enabled(enabled);
        if event.is_some() {
            self.save_alarm()?;
        }
        Ok(self.emit(event, FeedbackCue::Toggle))
    }

    // ── Ledger and settings ──────────────────────────────────────────

    pub fn settle_week(&mut self) -> Result<Option<Event>> {
        let event = self.ledger.mark_current_week_paid();
        if event.is_some() {
            self.repo.save_records(self.ledger.records())?;
        }
        Ok(self.emit(event, FeedbackCue::Settle))
    }

    /// Blank or `None` unsets the partner.
    pub fn set_partner(&mut self, username: Option<&str>) -> Result<Event> {
        self.repo.save_partner(username)?;
        self.partner = username
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        let event = Event::PartnerChanged {
            username: self.partner.clone(),
            at: self.clock.now(),
        };
        self.events.push(event.clone());
        Ok(event)
    }

    /// Payment link for this week's unpaid charges, if there is a partner
    /// and something to pay.
    pub fn payment_intent(&self) -> Result<Option<PaymentIntent>, PaymentError> {
        let (Some(partner), Some(week)) = (self.partner.as_deref(), self.ledger.current_week())
        else {
            return Ok(None);
        };
        self.payment.for_week(partner, &week)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn label(&self, time: DateTime<Utc>) -> String {
        format_short(time, self.ledger.calendar().zone())
    }

    fn save_alarm(&self) -> Result<()> {
        self.repo.save_alarm(self.lifecycle.alarm())?;
        self.repo.save_trigger(&self.lifecycle.trigger_state())?;
        Ok(())
    }

    fn emit(&mut self, event: Option<Event>, cue: FeedbackCue) -> Option<Event> {
        let event = event?;
        self.feedback.cue(cue);
        self.events.push(event.clone());
        Some(event)
    }
}
