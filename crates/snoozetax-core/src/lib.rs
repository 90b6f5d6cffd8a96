//! # SnoozeTax Core Library
//!
//! Core logic for an alarm clock that charges a small fee every time you hit
//! snooze and settles the week's debt with an accountability partner.
//!
//! ## Architecture
//!
//! - **Alarm**: a single-slot state machine. The caller drives it with
//!   commands and `tick()`; each command returns an optional [`Event`].
//! - **Ledger**: append-only snooze charges with weekly aggregation in a
//!   configurable calendar.
//! - **Payment**: builds payment deep links with a web fallback.
//! - **Storage**: SQLite key-value persistence and TOML configuration.
//!
//! ## Key Components
//!
//! - [`SnoozeTax`]: composition boundary a UI talks to
//! - [`AlarmLifecycle`]: alarm state machine
//! - [`DebtLedger`]: snooze charges and weekly settlement
//! - [`Database`]: persistence
//! - [`Config`]: application configuration

pub mod alarm;
pub mod clock;
pub mod controller;
pub mod error;
pub mod events;
pub mod ledger;
pub mod notify;
pub mod payment;
pub mod storage;

pub use alarm::{
    Alarm, AlarmLifecycle, AlarmState, LocalZone, TriggerState, MAX_SNOOZES, SNOOZE_MINUTES,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use controller::{Services, SnoozeTax, Status};
pub use error::{
    ConfigError, CoreError, PaymentError, SchedulerError, StorageError, ValidationError,
};
pub use events::Event;
pub use ledger::{DebtLedger, DebtRecord, Money, WeekBounds, WeekCalendar, WeeklyDebt, SNOOZE_CHARGE};
pub use notify::{FeedbackCue, FeedbackSink, LoggingScheduler, NotificationScheduler};
pub use payment::{LinkOpener, OpenedLink, PaymentIntent, PaymentLinks, SystemOpener};
pub use storage::{Config, Database, KvStore, MemoryStore, StateRepository};
