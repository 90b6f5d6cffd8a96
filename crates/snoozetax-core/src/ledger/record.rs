use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;
use super::week::WeekBounds;

/// What a single snooze costs.
pub const SNOOZE_CHARGE: Money = Money::from_cents(199);

/// One charge incurred by a single snooze.
///
/// Everything except `is_paid` is frozen at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtRecord {
    id: Uuid,
    date: DateTime<Utc>,
    amount: Money,
    /// Clock-time label of the alarm when it was snoozed, e.g. "7:00 AM".
    alarm_time: String,
    #[serde(default)]
    is_paid: bool,
}

impl DebtRecord {
    pub fn new(date: DateTime<Utc>, alarm_time: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount: SNOOZE_CHARGE,
            alarm_time: alarm_time.into(),
            is_paid: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn alarm_time(&self) -> &str {
        &self.alarm_time
    }

    pub fn is_paid(&self) -> bool {
        self.is_paid
    }

    pub(crate) fn mark_paid(&mut self) {
        self.is_paid = true;
    }
}

/// Unpaid charges of one calendar week. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyDebt {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub records: Vec<DebtRecord>,
    pub total_amount: Money,
}

impl WeeklyDebt {
    pub fn new(bounds: WeekBounds, records: Vec<DebtRecord>) -> Self {
        let total_amount = records.iter().map(DebtRecord::amount).sum();
        Self {
            week_start: bounds.start,
            week_end: bounds.end,
            records,
            total_amount,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `"$3.98"`
    pub fn formatted_amount(&self) -> String {
        self.total_amount.to_string()
    }
}
