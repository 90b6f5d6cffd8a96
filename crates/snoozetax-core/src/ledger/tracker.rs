//! Append-only debt ledger.
//!
//! Records are kept in insertion order and never removed. The only mutation
//! after append is the weekly settle pass, which flips `is_paid` on the
//! records of the current week.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use super::money::Money;
use super::record::{DebtRecord, WeeklyDebt};
use super::week::WeekCalendar;
use crate::clock::Clock;
use crate::events::Event;

pub struct DebtLedger {
    records: Vec<DebtRecord>,
    clock: Arc<dyn Clock>,
    calendar: WeekCalendar,
}

impl DebtLedger {
    pub fn new(clock: Arc<dyn Clock>, calendar: WeekCalendar) -> Self {
        Self::from_records(Vec::new(), clock, calendar)
    }

    /// Rebuild a ledger from persisted records, keeping their order.
    pub fn from_records(
        records: Vec<DebtRecord>,
        clock: Arc<dyn Clock>,
        calendar: WeekCalendar,
    ) -> Self {
        Self {
            records,
            clock,
            calendar,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn records(&self) -> &[DebtRecord] {
        &self.records
    }

    pub fn calendar(&self) -> &WeekCalendar {
        &self.calendar
    }

    pub fn unpaid(&self) -> impl Iterator<Item = &DebtRecord> {
        self.records.iter().filter(|r| !r.is_paid())
    }

    pub fn total_unpaid(&self) -> Money {
        self.unpaid().map(DebtRecord::amount).sum()
    }

    /// Up to `limit` records, most recent first.
    pub fn history(&self, limit: usize) -> Vec<&DebtRecord> {
        self.records.iter().rev().take(limit).collect()
    }

    /// Unpaid records of the calendar week containing now.
    pub fn current_week(&self) -> Option<WeeklyDebt> {
        let bounds = self.calendar.week_containing(self.clock.now())?;
        let records = self
            .unpaid()
            .filter(|r| self.calendar.contains(&bounds, r.date()))
            .cloned()
            .collect();
        Some(WeeklyDebt::new(bounds, records))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append one snooze charge. Every call adds a record.
    pub fn add_charge(&mut self, alarm_time: &str) -> Event {
        let now = self.clock.now();
        let record = DebtRecord::new(now, alarm_time);
        let event = Event::ChargeRecorded {
            record_id: record.id(),
            amount: record.amount(),
            alarm_time: record.alarm_time().to_string(),
            at: now,
        };
        tracing::debug!(record_id = %record.id(), alarm_time, "snooze charge recorded");
        self.records.push(record);
        event
    }

    /// Mark exactly the records of [`Self::current_week`] as paid.
    ///
    /// Older unpaid records stay unpaid.
    pub fn mark_current_week_paid(&mut self) -> Option<Event> {
        let week = self.current_week()?;
        if week.is_empty() {
            return None;
        }

        let ids: HashSet<Uuid> = week.records.iter().map(DebtRecord::id).collect();
        for record in self.records.iter_mut().filter(|r| ids.contains(&r.id())) {
            record.mark_paid();
        }

        tracing::debug!(
            records = ids.len(),
            amount = %week.total_amount,
            week_start = %week.week_start,
            "week settled"
        );
        Some(Event::WeekSettled {
            week_start: week.week_start,
            week_end: week.week_end,
            records: ids.len(),
            amount: week.total_amount,
            at: self.clock.now(),
        })
    }
}
